// Pure domain services

pub mod status_machine;

pub use status_machine::*;
