// Domain value objects
pub mod actor;
pub mod identifiers;
pub mod ticket_action;
pub mod ticket_status;

pub use actor::*;
pub use identifiers::*;
pub use ticket_action::*;
pub use ticket_status::*;
