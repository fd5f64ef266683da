pub mod booking;
pub mod schedule;
pub mod seats;
pub mod tickets;
