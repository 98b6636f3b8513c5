// Identifier value objects

pub const MAX_IDENTIFIER_LEN: usize = 128;
pub const MIN_EVENT_ID_LEN: usize = 3;

/// Event and ticket ids end up as path components in the document store,
/// so only a conservative character set is accepted.
pub fn is_safe_identifier(value: &str) -> bool {
    if value.is_empty() || value.len() > MAX_IDENTIFIER_LEN {
        return false;
    }
    if value == "." || value == ".." {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}
