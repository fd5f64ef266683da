pub mod flight;
pub mod flight_staff;
pub mod flight_status;
pub mod passenger;
pub mod plane;
pub mod reservation;
pub mod seat;
pub mod ticket;
pub mod user;
