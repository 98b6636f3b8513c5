pub mod event_cache;
pub mod ticket_locks;
pub mod write_behind;

pub use event_cache::*;
pub use ticket_locks::*;
pub use write_behind::*;
