//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO carrying the full replacement record

use rust_decimal::Decimal;
use validator::ValidationError;

pub mod character;
pub mod game;

/// Names must contain at least one non-whitespace character.
fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Name is required".into());
        return Err(err);
    }
    Ok(())
}

/// Decimal places kept by the `price` column.
const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound of the `price` column, `NUMERIC(12, 2)`.
fn price_limit() -> Decimal {
    Decimal::new(10_000_000_000, 0)
}

/// Prices must fit the column exactly: non-negative, at most two decimal
/// places, below 10^10.
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    let (code, message) = if price.is_sign_negative() && !price.is_zero() {
        ("range", "Price must not be negative")
    } else if price.normalize().scale() > PRICE_SCALE {
        ("precision", "Price must have at most two decimal places")
    } else if *price >= price_limit() {
        ("range", "Price must be below 10000000000")
    } else {
        return Ok(());
    };

    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Chess").is_ok());
    }

    #[test]
    fn negative_prices_are_rejected() {
        assert!(validate_price(&Decimal::new(-1, 2)).is_err());
        assert!(validate_price(&Decimal::ZERO).is_ok());
        assert!(validate_price(&Decimal::new(1999, 2)).is_ok());
    }

    #[test]
    fn prices_with_extra_decimals_are_rejected() {
        let err = validate_price(&Decimal::new(19999, 3)).unwrap_err();
        assert_eq!(err.code, "precision");
        // Trailing zeros do not count as extra precision.
        assert!(validate_price(&Decimal::new(19990, 3)).is_ok());
    }

    #[test]
    fn prices_must_fit_the_column() {
        assert!(validate_price(&Decimal::new(999_999_999_999, 2)).is_ok());
        let err = validate_price(&Decimal::new(10_000_000_000, 0)).unwrap_err();
        assert_eq!(err.code, "range");
    }
}
