pub mod event_queries;
pub mod ticket_queries;
