// Common validation types plus credential field checks

use regex::Regex;

#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
            self.errors.extend(other.errors);
        }
    }

    pub fn first_message(&self) -> String {
        self.errors
            .first()
            .map(|e| format!("{}: {}", e.field, e.message))
            .unwrap_or_else(|| "invalid input".to_string())
    }
}

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validate an email address and password for signup
pub fn validate_credentials(email: &str, password: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !is_valid_email(email) {
        result.add_error("email", "must be a valid email address");
    }

    if password.len() < MIN_PASSWORD_LEN {
        result.add_error("password", "must be at least 8 characters");
    }

    result
}

/// Syntactic email check, not a deliverability check
pub fn is_valid_email(email: &str) -> bool {
    let re = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email regex is valid");
    email.len() <= 120 && re.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_normal_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.domain.org"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@nodot"));
    }

    #[test]
    fn test_validate_credentials_collects_both_errors() {
        let result = validate_credentials("bad", "short");
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_validate_credentials_passes() {
        let result = validate_credentials("user@example.com", "long-enough-pw");
        assert!(result.is_valid);
    }
}
