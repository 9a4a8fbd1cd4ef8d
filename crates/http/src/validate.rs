//! Field-level request validation.
//!
//! Request types implement [`Validate`] and report every constraint they break
//! into a [`Violations`] collector. The extractors in [`crate::extract`] turn a
//! non-empty collector into a 422 [`AppError::Validation`].

use serde_json::json;

use crate::error::AppError;

/// Constraint checks for a deserialized request value.
pub trait Validate {
    fn validate(&self, violations: &mut Violations);

    /// Run [`Validate::validate`] and convert any violations into an [`AppError`].
    fn check(&self) -> Result<(), AppError> {
        let mut violations = Violations::new();
        self.validate(&mut violations);
        violations.into_result()
    }
}

/// Accumulates `{field, error}` entries for a single request.
#[derive(Debug, Default)]
pub struct Violations {
    details: Vec<serde_json::Value>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, error: impl Into<String>) {
        self.details.push(json!({ "field": field, "error": error.into() }));
    }

    /// String must contain at least `min` characters.
    pub fn min_chars(&mut self, field: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.push(field, format!("must be at least {min} characters"));
        }
    }

    /// String length in characters must lie in `min..=max`.
    pub fn chars_between(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            self.push(field, format!("must be between {min} and {max} characters"));
        }
    }

    /// Value must lie in `min..=max`.
    pub fn in_range<T>(&mut self, field: &str, value: T, min: T, max: T)
    where
        T: PartialOrd + std::fmt::Display,
    {
        if value < min || value > max {
            self.push(field, format!("must be between {min} and {max}"));
        }
    }

    /// Value must lie strictly between `low` and `high`.
    pub fn strictly_between<T>(&mut self, field: &str, value: T, low: T, high: T)
    where
        T: PartialOrd + std::fmt::Display,
    {
        if value <= low || value >= high {
            self.push(field, format!("must be after {low} and before {high}"));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.details.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.details, "request validation failed"))
        }
    }
}
