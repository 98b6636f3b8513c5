pub mod event_handlers;
pub mod ops_handlers;
pub mod ticket_handlers;

pub use event_handlers::*;
pub use ops_handlers::*;
pub use ticket_handlers::*;
