//! Email address utilities

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\S+@\S+\.\S+$").expect("email regex is valid")
});

/// Trim and lowercase an address so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Mask an email address for logs (e.g., a***e@example.com)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let chars: Vec<char> = local.chars().collect();
            match chars.len() {
                1 => format!("*@{}", domain),
                2 => format!("{}*@{}", chars[0], domain),
                n => format!("{}***{}@{}", chars[0], chars[n - 1], domain),
            }
        }
        _ => "****".to_string(),
    }
}
