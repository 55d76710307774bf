//! # Validation Module
//!
//! Input validation utilities for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum)                                        │
//! │  ├── Type validation (JSON deserialization, path ids)                  │
//! │  └── Rejections become {"error": "..."} with 400                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository entry points                                      │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints (stock >= 0, price >= 0)             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::validation::{validate_name, validate_quantity};
//!
//! validate_name("name", "Kopi Susu").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CheckoutItem, DateRange};
use crate::{MAX_CHECKOUT_ITEMS, MAX_ITEM_QUANTITY, MAX_REPORT_RANGE_DAYS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name for products and categories.
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Teh Botol ").unwrap(), "Teh Botol");
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

/// Trims an optional description, mapping blank text to `None`.
pub fn normalize_description(value: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if value.chars().count() > 1000 {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 1000,
        });
    }

    Ok(Some(value.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a checkout line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: crate::Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an administrative stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates an id taken from a path or body.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates a checkout item list before any stock is read.
///
/// ## Rules
/// - At least one item, at most MAX_CHECKOUT_ITEMS (100)
/// - Every quantity passes [`validate_quantity`]
/// - Every product id is positive
///
/// Duplicate product ids are allowed; the checkout fold handles them in order.
pub fn validate_checkout_items(items: &[CheckoutItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if items.len() > MAX_CHECKOUT_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_CHECKOUT_ITEMS as i64,
        });
    }

    for item in items {
        validate_id("product_id", item.product_id)?;
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a report date in strict `YYYY-MM-DD` form.
///
/// ## Example
/// ```rust
/// use kasir_core::validation::parse_report_date;
///
/// assert!(parse_report_date("start_date", "2026-02-28").is_ok());
/// assert!(parse_report_date("start_date", "2026-13-01").is_err());
/// assert!(parse_report_date("start_date", "2026-2-28").is_err());
/// ```
pub fn parse_report_date(field: &str, value: &str) -> CoreResult<NaiveDate> {
    let value = value.trim();

    if value.is_empty() {
        return Err(CoreError::invalid_date_range(format!("{field} is required")));
    }

    // chrono accepts unpadded fields, so pin the width first
    if value.len() != 10 {
        return Err(CoreError::invalid_date_range(format!(
            "{field} must use YYYY-MM-DD format"
        )));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CoreError::invalid_date_range(format!("{field} must use YYYY-MM-DD format"))
    })
}

/// Checks ordering and span of a report range.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> CoreResult<DateRange> {
    if start > end {
        return Err(CoreError::invalid_date_range(
            "start_date must not be after end_date",
        ));
    }

    let range = DateRange {
        start_date: start,
        end_date: end,
    };

    if range.days() > MAX_REPORT_RANGE_DAYS {
        return Err(CoreError::invalid_date_range(format!(
            "range must not exceed {MAX_REPORT_RANGE_DAYS} days"
        )));
    }

    Ok(range)
}

/// Parses and checks both ends of a report range in one step.
pub fn parse_date_range(start: &str, end: &str) -> CoreResult<DateRange> {
    let start = parse_report_date("start_date", start)?;
    let end = parse_report_date("end_date", end)?;
    validate_date_range(start, end)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Money;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "Kopi").unwrap(), "Kopi");
        assert_eq!(validate_name("name", "  Kopi  ").unwrap(), "Kopi");

        assert_eq!(
            validate_name("name", ""),
            Err(ValidationError::required("name"))
        );
        assert!(validate_name("name", "  \t ").is_err());
        assert!(validate_name("name", &"A".repeat(200)).is_ok());
        assert!(validate_name("name", &"A".repeat(201)).is_err());
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description(None).unwrap(), None);
        assert_eq!(normalize_description(Some("   ")).unwrap(), None);
        assert_eq!(
            normalize_description(Some(" Minuman dingin ")).unwrap(),
            Some("Minuman dingin".to_string())
        );
        assert!(normalize_description(Some(&"x".repeat(1001))).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price(Money::new(0)).is_ok());
        assert!(validate_price(Money::new(15_000)).is_ok());
        assert!(validate_price(Money::new(-1)).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn test_validate_checkout_items() {
        let item = |product_id, quantity| CheckoutItem {
            product_id,
            quantity,
        };

        assert!(validate_checkout_items(&[item(1, 2), item(1, 3)]).is_ok());

        assert_eq!(
            validate_checkout_items(&[]),
            Err(ValidationError::required("items"))
        );
        assert!(validate_checkout_items(&[item(1, 0)]).is_err());
        assert!(validate_checkout_items(&[item(0, 1)]).is_err());

        let too_many: Vec<CheckoutItem> = (1..=101).map(|id| item(id, 1)).collect();
        assert!(validate_checkout_items(&too_many).is_err());
        assert!(validate_checkout_items(&too_many[..100]).is_ok());
    }

    #[test]
    fn test_parse_report_date() {
        let d = parse_report_date("start_date", "2026-02-28").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());

        for bad in ["", "2026-13-01", "2026-02-30", "2026-2-28", "28-02-2026", "today"] {
            let err = parse_report_date("start_date", bad).unwrap_err();
            assert!(matches!(err, CoreError::InvalidDateRange { .. }), "{bad}");
        }
    }

    #[test]
    fn test_validate_date_range() {
        let range = parse_date_range("2026-01-01", "2026-01-31").unwrap();
        assert_eq!(range.days(), 31);

        let same = parse_date_range("2026-01-01", "2026-01-01").unwrap();
        assert_eq!(same.days(), 1);

        let err = parse_date_range("2026-02-01", "2026-01-01").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid date range: start_date must not be after end_date"
        );

        // 2024 is a leap year: Jan 1 to Dec 31 is 366 days
        assert!(parse_date_range("2024-01-01", "2024-12-31").is_ok());
        assert!(parse_date_range("2024-01-01", "2025-01-01").is_err());
    }
}
