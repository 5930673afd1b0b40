//! Input validation for booking submissions.
//!
//! Per-field validators return `Result<(), String>`; `ValidationErrorBuilder`
//! collects failures across fields into a single blocking error.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use super::BookingError;

lazy_static! {
    /// Regex for validating email addresses
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();

    /// Regex for validating phone numbers (optional +, digits with common separators)
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").unwrap();
}

/// Validate a patient's full name
pub fn validate_full_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Full name is required".to_string());
    }
    if name.len() > 120 {
        return Err("Full name is too long (max 120 characters)".to_string());
    }
    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email address is required".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address format".to_string());
    }
    Ok(())
}

/// Validate a phone number
pub fn validate_phone(phone: &str) -> Result<(), String> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err("Phone number is required".to_string());
    }
    if !PHONE_REGEX.is_match(phone) {
        return Err("Invalid phone number format".to_string());
    }
    Ok(())
}

/// Builder for collecting multiple validation errors
#[derive(Debug, Default)]
pub struct ValidationErrorBuilder {
    errors: HashMap<String, Vec<String>>,
}

impl ValidationErrorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation error for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Record a per-field validator result
    pub fn check(&mut self, field: &str, result: Result<(), String>) -> &mut Self {
        if let Err(message) = result {
            self.add(field, message);
        }
        self
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Return Ok(()) if no errors, or the collected validation error
    pub fn finish(self) -> Result<(), BookingError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(BookingError::Validation(self.errors))
        }
    }
}
