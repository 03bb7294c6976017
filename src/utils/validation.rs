use crate::utils::error::{HypixelError, Result};
use std::fmt::Display;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> HypixelError {
    HypixelError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// An http(s) URL, as used for every upstream API base.
pub fn validate_url(field: &str, raw: &str) -> Result<()> {
    validate_url_scheme(field, raw, &["http", "https"])
}

pub fn validate_url_scheme(field: &str, raw: &str, schemes: &[&str]) -> Result<()> {
    if raw.is_empty() {
        return Err(invalid(field, raw, "URL is empty"));
    }
    let url = Url::parse(raw).map_err(|e| invalid(field, raw, format!("Not a URL: {}", e)))?;
    if !schemes.contains(&url.scheme()) {
        return Err(invalid(
            field,
            raw,
            format!("Scheme '{}' is not one of {}", url.scheme(), schemes.join(", ")),
        ));
    }
    Ok(())
}

/// Names that end up in a file path or a Redis key.
pub fn validate_path(field: &str, path: &str) -> Result<()> {
    match path {
        "" => Err(invalid(field, path, "Name is empty")),
        p if p.contains('\0') => Err(invalid(field, p, "Name contains a NUL byte")),
        _ => Ok(()),
    }
}

pub fn validate_positive_number(field: &str, value: usize, min: usize) -> Result<()> {
    validate_range(field, value, min, usize::MAX)
}

pub fn validate_non_empty_string(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value is blank"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display + Copy>(field: &str, value: T, min: T, max: T) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field, value, format!("Expected {} to {}", min, max)));
    }
    Ok(())
}
