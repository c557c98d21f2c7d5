// SPDX-License-Identifier: MIT

//! Client-side field validators.
//!
//! Each validator yields at most one inline error message; a field shows
//! the first failure only. Payload structs reuse these through `validator`
//! derive attributes where possible, with [`phone_validator`] bridging the
//! phone rule into the derive.

use validator::{ValidateEmail, ValidationError};

/// Required-field check.
pub fn required(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        Some("This field is required")
    } else {
        None
    }
}

/// Email pattern check (empty values pass; combine with [`required`]).
pub fn email(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() || value.validate_email() {
        None
    } else {
        Some("Please enter a valid email address")
    }
}

/// Phone pattern check: optional `+`, separators allowed, 10-12 digits.
pub fn phone(value: &str) -> Option<&'static str> {
    let trimmed: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if trimmed.is_empty() {
        return None;
    }

    let rest = trimmed.strip_prefix('+').unwrap_or(&trimmed);
    let mut digits = 0usize;
    for c in rest.chars() {
        match c {
            '0'..='9' => digits += 1,
            '(' | ')' | '-' | '.' => {}
            _ => return Some("Please enter a valid phone number"),
        }
    }

    if (10..=12).contains(&digits) {
        None
    } else {
        Some("Please enter a valid phone number")
    }
}

/// Minimum-length check (passwords).
pub fn min_length(value: &str, min: usize) -> Option<&'static str> {
    if value.len() < min {
        Some("Password is too short")
    } else {
        None
    }
}

/// Confirmation-match check (password confirmation).
pub fn matches(value: &str, other: &str) -> Option<&'static str> {
    if value != other {
        Some("Passwords do not match")
    } else {
        None
    }
}

/// First failing message among the given results, if any.
///
/// Matches the inline-error discipline: one message per field, first
/// failure wins.
pub fn first_error(results: &[Option<&'static str>]) -> Option<&'static str> {
    results.iter().copied().flatten().next()
}

/// Phone rule as a `validator` custom function for derived payloads.
pub fn phone_validator(value: &str) -> Result<(), ValidationError> {
    match phone(value) {
        None => Ok(()),
        Some(msg) => Err(ValidationError::new("phone").with_message(msg.into())),
    }
}
