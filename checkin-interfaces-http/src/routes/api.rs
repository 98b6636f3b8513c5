use axum::Router;

use checkin_application::AppState;

use crate::handlers::{event_handlers, ops_handlers, ticket_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/events", axum::routing::get(event_handlers::list_events))
        .route(
            "/create-event",
            axum::routing::post(event_handlers::create_event),
        )
        .route(
            "/delete-event/:event_id",
            axum::routing::delete(event_handlers::delete_event),
        )
        .route(
            "/create-ticket/:event_id",
            axum::routing::post(ticket_handlers::create_ticket),
        )
        .route(
            "/update-ticket/:event_id/:ticket_id",
            axum::routing::put(ticket_handlers::update_ticket),
        )
        .route(
            "/delete-ticket/:event_id/:ticket_id",
            axum::routing::delete(ticket_handlers::delete_ticket),
        )
        .route(
            "/tickets/:event_id",
            axum::routing::get(ticket_handlers::list_tickets),
        )
        .route(
            "/tickets/:event_id/stats",
            axum::routing::get(ticket_handlers::event_stats),
        )
        .route(
            "/tickets/:event_id/emailable",
            axum::routing::get(ticket_handlers::list_emailable_tickets),
        )
        .route(
            "/ticket/:event_id/:ticket_id",
            axum::routing::get(ticket_handlers::get_ticket),
        )
        .route(
            "/update-ticket-status/:event_id/:ticket_id",
            axum::routing::post(ticket_handlers::update_ticket_status),
        )
        .route(
            "/scanner/update-ticket-status/:event_id/:ticket_id",
            axum::routing::post(ticket_handlers::scanner_update_ticket_status),
        )
        .route(
            "/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .route(
            "/ops/dead-letters",
            axum::routing::get(ops_handlers::list_dead_letters),
        )
        .with_state(state)
}
