pub mod in_memory_store;
pub mod json_document_store;

pub use in_memory_store::*;
pub use json_document_store::*;
