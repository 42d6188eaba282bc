use rust_decimal::Decimal;

use super::{ValidationError, ValidationResult};

/// Maximum length for category and item display names
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for item descriptions
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Upper bound for menu prices; generous but catches unit mistakes
/// (prices entered in øre/cents instead of whole currency units)
pub const MAX_PRICE: u32 = 10_000;

/// Validate a display name: non-blank after trimming and within length bounds
pub fn validate_display_name(field: &str, name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max_length: MAX_NAME_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    Ok(())
}

/// Validate an optional description against the length bound
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    if let Some(description) = description {
        if description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::TooLong {
                field: "description".to_string(),
                max_length: MAX_DESCRIPTION_LENGTH,
                actual_length: description.len(),
            });
        }
    }

    Ok(())
}

/// Validate a price: strictly positive, bounded, at most two decimal places
pub fn validate_price(field: &str, price: &Decimal) -> ValidationResult<()> {
    if *price <= Decimal::ZERO {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: price.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    if *price > Decimal::from(MAX_PRICE) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0.01".to_string(),
            max: MAX_PRICE.to_string(),
            value: price.to_string(),
        });
    }

    if price.normalize().scale() > 2 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: price.to_string(),
            reason: "at most two decimal places".to_string(),
        });
    }

    Ok(())
}

/// Validate an entity identifier: non-blank
pub fn validate_entity_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    Ok(())
}
