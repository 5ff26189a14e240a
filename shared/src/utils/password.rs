//! Password strength policy

use serde::Serialize;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Longest run of one repeated character that is still accepted
const MAX_REPEAT_RUN: usize = 3;

/// Outcome of a policy check, listing every violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

pub fn validate_password(password: &str) -> PasswordValidation {
    let mut errors = Vec::new();
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        errors.push(format!("Password must be at least {} characters long", MIN_PASSWORD_LENGTH));
    }
    if length > MAX_PASSWORD_LENGTH {
        errors.push(format!("Password must be less than {} characters", MAX_PASSWORD_LENGTH));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number".to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        errors.push(format!(
            "Password must contain at least one special character ({})",
            SPECIAL_CHARACTERS
        ));
    }
    if password.trim() != password {
        errors.push("Password cannot start or end with whitespace".to_string());
    }
    if longest_repeat_run(password) > MAX_REPEAT_RUN {
        errors.push("Password cannot contain repeated characters (more than 3 in a row)".to_string());
    }

    PasswordValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn longest_repeat_run(password: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut previous = None;

    for c in password.chars() {
        run = if previous == Some(c) { run + 1 } else { 1 };
        longest = longest.max(run);
        previous = Some(c);
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_password_passes() {
        let result = validate_password("Str0ng!Pass");
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_collects_every_violation() {
        let result = validate_password("abc");
        assert!(!result.is_valid);
        // too short, no uppercase, no digit, no special character
        assert_eq!(result.errors.len(), 4);
    }

    #[test]
    fn test_rejects_surrounding_whitespace() {
        let result = validate_password(" Str0ng!Pass");
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("whitespace")));
    }

    #[test]
    fn test_repeat_run_limit() {
        assert!(validate_password("Aaaaa1!xyz").errors.iter().any(|e| e.contains("repeated")));
        assert!(validate_password("Aaa1!xyzwq").is_valid);
    }

    #[test]
    fn test_length_upper_bound() {
        let long = format!("Aa1!{}", "xy".repeat(70));
        let result = validate_password(&long);
        assert!(result.errors.iter().any(|e| e.contains("less than 128")));
    }

    #[test]
    fn test_longest_repeat_run() {
        assert_eq!(longest_repeat_run(""), 0);
        assert_eq!(longest_repeat_run("abc"), 1);
        assert_eq!(longest_repeat_run("abbbbc"), 4);
    }
}
