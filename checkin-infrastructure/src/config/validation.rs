use std::net::SocketAddr;

use anyhow::{anyhow, Result};

pub const STORE_BACKENDS: [&str; 2] = ["file", "memory"];

pub fn validate_bind_addr(value: &str) -> Result<()> {
    value
        .parse::<SocketAddr>()
        .map_err(|err| anyhow!("invalid bind_addr '{}': {}", value, err))?;
    Ok(())
}

pub fn validate_store_backend(value: &str) -> Result<()> {
    if !STORE_BACKENDS.contains(&value) {
        return Err(anyhow!(
            "store_backend must be one of {}, got '{}'",
            STORE_BACKENDS.join(", "),
            value
        ));
    }
    Ok(())
}
