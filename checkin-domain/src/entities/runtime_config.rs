// Runtime configuration handed to the application layer

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub store_backend: String,
    pub data_dir: String,
    pub log_dir: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub dead_letter_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
            store_backend: "file".to_string(),
            data_dir: "./data".to_string(),
            log_dir: None,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            dead_letter_capacity: 256,
        }
    }
}
