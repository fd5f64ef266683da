use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{
    auth, flight_statuses, flights, passengers, planes, reports, reservations, tickets,
};
use crate::middleware::auth::{auth_middleware, require_admin};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::user_rate_limit::create_user_governor;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // IP-based governor for unauthenticated routes, per-user governor for the rest
    let public_governor = create_public_governor();
    let user_governor = create_user_governor();

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor);

    // Authenticated read surface used by booking agents
    let agent_routes = Router::new()
        .route("/flightAvailable/", get(flights::available_flights))
        .route("/flightFilter/", get(flights::filter_flights))
        .route("/flightDetail/{id}/", get(flights::flight_detail))
        .route("/availableSeats/{flight_id}/", get(flights::available_seats))
        .route("/planeLayout/{plane_id}/", get(planes::plane_layout))
        .route(
            "/checkSeatAvailability/{plane_id}/{seat_code}/",
            get(planes::check_seat_availability),
        )
        .route("/passengerDetail/{id}/", get(passengers::get_passenger))
        .route(
            "/reservationsByPassenger/{passenger_id}/",
            get(passengers::reservations_by_passenger),
        )
        .route(
            "/activeReservations/{passenger_id}/",
            get(reports::active_reservations),
        )
        .route(
            "/passengersByFlight/{flight_id}/",
            get(reports::passengers_by_flight),
        )
        .route(
            "/ticketInformation/{barcode}/",
            get(tickets::ticket_information),
        )
        .layer(user_governor.clone())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Core booking operations (requires auth + admin role)
    let booking_routes = Router::new()
        .route("/createReservation/", post(reservations::create_reservation))
        .route(
            "/changeReservationStatus/{id}/",
            patch(reservations::change_reservation_status),
        )
        .route(
            "/generateTicket/{reservation_id}/",
            post(tickets::generate_ticket),
        )
        .layer(user_governor.clone())
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Back-office CRUD (requires auth + admin role)
    let admin_routes = Router::new()
        // Fleet
        .route("/planes", get(planes::list_planes))
        .route("/planes", post(planes::create_plane))
        .route("/planes/{id}", get(planes::get_plane))
        .route("/planes/{id}", put(planes::update_plane))
        .route("/planes/{id}", delete(planes::delete_plane))
        // Schedule
        .route("/flights", get(flights::list_flights))
        .route("/flights", post(flights::create_flight))
        .route("/flights/{id}", put(flights::update_flight))
        .route("/flights/{id}", delete(flights::delete_flight))
        .route("/flight-statuses", get(flight_statuses::list_statuses))
        .route("/flight-statuses", post(flight_statuses::create_status))
        .route("/flight-statuses/{id}", put(flight_statuses::update_status))
        .route(
            "/flight-statuses/{id}",
            delete(flight_statuses::delete_status),
        )
        // Passengers
        .route("/passengers", get(passengers::list_passengers))
        .route("/passengers", post(passengers::create_passenger))
        .route("/passengers/{id}", get(passengers::get_passenger))
        .route("/passengers/{id}", put(passengers::update_passenger))
        .route("/passengers/{id}", delete(passengers::delete_passenger))
        // Reservations and tickets
        .route("/reservations", get(reservations::list_reservations))
        .route("/reservations/{id}", get(reservations::get_reservation))
        .route("/reservations/{id}", put(reservations::update_reservation))
        .route(
            "/reservations/{id}",
            delete(reservations::delete_reservation),
        )
        .route("/tickets", get(tickets::list_tickets))
        .layer(user_governor)
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", agent_routes.merge(booking_routes))
        .nest("/api/admin", admin_routes)
        .with_state(state)
}
