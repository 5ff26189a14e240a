//! Input validation shared by the service and HTTP layers

/// Identifiers longer than this are rejected (RFC 5321 address limit)
pub const MAX_IDENTIFIER_LENGTH: usize = 320;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Trim a username and check its length.
pub fn validate_username(username: &str) -> Result<String, String> {
    let trimmed = username.trim();
    let length = trimmed.chars().count();
    if length < MIN_USERNAME_LENGTH {
        return Err(format!(
            "Username must be at least {} characters long",
            MIN_USERNAME_LENGTH
        ));
    }
    if length > MAX_USERNAME_LENGTH {
        return Err(format!(
            "Username must be at most {} characters long",
            MAX_USERNAME_LENGTH
        ));
    }
    Ok(trimmed.to_string())
}
