use std::collections::HashMap;

use crate::error::ApiError;

pub const MAX_NAME_LEN: usize = 80;
pub const MIN_PASSWORD_LEN: usize = 4;

/// Collects per-field validation failures for a single request body
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid input", Some(self.errors)))
        }
    }

    /// Required field; records an error and returns `None` when absent
    pub fn require<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, "This field is required");
        }
        value
    }

    /// Trimmed, non-empty name of at most `MAX_NAME_LEN` characters
    pub fn name(&mut self, field: &str, value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.add(field, "Must not be empty");
        } else if trimmed.chars().count() > MAX_NAME_LEN {
            self.add(field, format!("Must be at most {} characters", MAX_NAME_LEN));
        }
        trimmed.to_string()
    }

    pub fn price(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.add(field, "Must be a non-negative number");
        }
    }

    pub fn password(&mut self, field: &str, value: &str) {
        if value.chars().count() < MIN_PASSWORD_LEN {
            self.add(field, format!("Must be at least {} characters", MIN_PASSWORD_LEN));
        }
    }

    pub fn email(&mut self, field: &str, value: &str) -> String {
        let trimmed = value.trim();
        let valid = match trimmed.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !trimmed.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            self.add(field, "Invalid email format");
        }
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_bounded() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.name("name", "  Chair "), "Chair");
        assert!(errors.is_empty());

        errors.name("blank", "   ");
        errors.name("long", &"x".repeat(MAX_NAME_LEN + 1));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn prices_must_be_finite_and_non_negative() {
        let mut errors = FieldErrors::new();
        errors.price("price", 0.0);
        errors.price("price", 12.5);
        assert!(errors.is_empty());

        errors.price("price", -1.0);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        errors.price("price", f64::NAN);
        assert!(!errors.is_empty());
    }

    #[test]
    fn email_needs_local_part_and_domain() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.email("email", " ann@example.com "), "ann@example.com");
        assert!(errors.is_empty());

        for bad in ["ann", "@example.com", "ann@", "a@b@c", "an n@example.com"] {
            let mut errors = FieldErrors::new();
            errors.email("email", bad);
            assert!(!errors.is_empty(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn missing_required_field_is_reported_once() {
        let mut errors = FieldErrors::new();
        assert!(errors.require::<String>("name", None).is_none());
        errors.add("name", "second message");

        match errors.into_result() {
            Err(ApiError::ValidationError {
                field_errors: Some(fields),
                ..
            }) => assert_eq!(fields["name"], "This field is required"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
