use thiserror::Error;

/// Input rejected before any calculation runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing product name in row {0}")]
    MissingName(usize),
    #[error("Duplicate product name: {0}")]
    DuplicateName(String),
    #[error("Missing value for {0}")]
    MissingField(String),
    #[error("Invalid number for {field}: {text:?}")]
    InvalidNumber { field: String, text: String },
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: String, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: f64 },
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: String, value: f64 },
    #[error("{field} must be a fraction between 0 and 1, got {value}")]
    NotAFraction { field: String, value: f64 },
}

pub fn finite(field: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite {
            field: field.to_string(),
            value,
        })
    }
}

pub fn non_negative(field: &str, value: f64) -> Result<f64, ValidationError> {
    if finite(field, value)? < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

pub fn positive(field: &str, value: f64) -> Result<f64, ValidationError> {
    if finite(field, value)? <= 0.0 {
        return Err(ValidationError::NotPositive {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

pub fn fraction(field: &str, value: f64) -> Result<f64, ValidationError> {
    if !(0.0..=1.0).contains(&finite(field, value)?) {
        return Err(ValidationError::NotAFraction {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Parse a user-typed amount such as `2,000,000` or `10.50`
pub fn parse_number(field: &str, text: &str) -> Result<f64, ValidationError> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    let value = cleaned.parse::<f64>().map_err(|_| ValidationError::InvalidNumber {
        field: field.to_string(),
        text: text.to_string(),
    })?;
    finite(field, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_with_separators() {
        assert_eq!(parse_number("sales", "2,000,000").unwrap(), 2_000_000.0);
        assert_eq!(parse_number("price", " 10.50 ").unwrap(), 10.5);
    }

    #[test]
    fn test_parse_number_rejects_text() {
        assert!(matches!(
            parse_number("price", "ten"),
            Err(ValidationError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_number("price", "inf"),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_range_helpers() {
        assert!(non_negative("cost", 0.0).is_ok());
        assert!(non_negative("cost", -0.01).is_err());
        assert!(positive("years", 0.0).is_err());
        assert!(fraction("share", 1.0).is_ok());
        assert!(fraction("share", 1.5).is_err());
        assert!(finite("x", f64::NAN).is_err());
    }
}
