// Actor value object
// Who performed a status change

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Actor {
    QrScanner,
    Admin,
    ManualAdmin,
}

impl Actor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::QrScanner => "qr-scanner",
            Actor::Admin => "admin",
            Actor::ManualAdmin => "manual-admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "qr-scanner" => Some(Actor::QrScanner),
            "admin" => Some(Actor::Admin),
            "manual-admin" => Some(Actor::ManualAdmin),
            _ => None,
        }
    }
}
