// Domain entities

pub mod dead_letter;
pub mod event;
pub mod runtime_config;
pub mod ticket;

pub use dead_letter::*;
pub use event::*;
pub use runtime_config::*;
pub use ticket::*;
