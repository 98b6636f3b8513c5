// Dead letter entity
// A background store write that could not be applied

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetter {
    pub timestamp_ms: i64,
    pub event_id: String,
    pub ticket_id: String,
    pub operation: String,
    pub error: String,
}
