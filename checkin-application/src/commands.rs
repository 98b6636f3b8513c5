pub mod event_commands;
pub mod ticket_commands;
