use bigdecimal::{BigDecimal, Zero};
use thiserror::Error;

use super::amount::fits_storage;
use super::order::Item;

/// An item as it arrives from a caller, before any checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemCandidate {
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("productId is required")]
    MissingProductId,
    #[error("quantity must be a positive integer")]
    InvalidQuantity,
    #[error("price is required")]
    MissingPrice,
    #[error("price must not be negative")]
    NegativePrice,
    #[error("price must have at most two decimal places and twelve integer digits")]
    PriceOutOfRange,
}

/// Checks a candidate against the required-field rules and returns the typed item.
pub fn validate_item(candidate: &ItemCandidate) -> Result<Item, ItemError> {
    let product_id = match candidate.product_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(ItemError::MissingProductId),
    };

    let quantity = candidate
        .quantity
        .filter(|q| *q > 0)
        .and_then(|q| i32::try_from(q).ok())
        .ok_or(ItemError::InvalidQuantity)?;

    let price = candidate.price.clone().ok_or(ItemError::MissingPrice)?;
    if price < BigDecimal::zero() {
        return Err(ItemError::NegativePrice);
    }
    if !fits_storage(&price) {
        return Err(ItemError::PriceOutOfRange);
    }

    Ok(Item {
        product_id,
        quantity,
        price,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn candidate(
        product_id: Option<&str>,
        quantity: Option<i64>,
        price: Option<&str>,
    ) -> ItemCandidate {
        ItemCandidate {
            product_id: product_id.map(str::to_string),
            quantity,
            price: price.map(|p| BigDecimal::from_str(p).expect("valid decimal")),
        }
    }

    #[test]
    fn accepts_complete_item() {
        let item = validate_item(&candidate(Some("P1"), Some(2), Some("10"))).expect("valid item");
        assert_eq!(item.product_id, "P1");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, BigDecimal::from(10));
    }

    #[test]
    fn accepts_zero_price() {
        assert!(validate_item(&candidate(Some("P1"), Some(1), Some("0"))).is_ok());
    }

    #[test]
    fn rejects_missing_or_empty_product_id() {
        assert_eq!(
            validate_item(&candidate(None, Some(1), Some("1"))),
            Err(ItemError::MissingProductId)
        );
        assert_eq!(
            validate_item(&candidate(Some(""), Some(1), Some("1"))),
            Err(ItemError::MissingProductId)
        );
    }

    #[test]
    fn rejects_missing_zero_and_negative_quantity() {
        for quantity in [None, Some(0), Some(-3)] {
            assert_eq!(
                validate_item(&candidate(Some("P1"), quantity, Some("1"))),
                Err(ItemError::InvalidQuantity)
            );
        }
    }

    #[test]
    fn rejects_quantity_beyond_storage_range() {
        assert_eq!(
            validate_item(&candidate(Some("P1"), Some(i64::from(i32::MAX) + 1), Some("1"))),
            Err(ItemError::InvalidQuantity)
        );
    }

    #[test]
    fn rejects_missing_price() {
        assert_eq!(
            validate_item(&candidate(Some("P1"), Some(1), None)),
            Err(ItemError::MissingPrice)
        );
    }

    #[test]
    fn rejects_price_that_would_be_rounded_or_overflow() {
        for price in ["4.505", "1000000000000"] {
            assert_eq!(
                validate_item(&candidate(Some("P1"), Some(1), Some(price))),
                Err(ItemError::PriceOutOfRange),
                "{}",
                price
            );
        }
    }

    #[test]
    fn rejects_negative_price() {
        assert_eq!(
            validate_item(&candidate(Some("P1"), Some(1), Some("-0.01"))),
            Err(ItemError::NegativePrice)
        );
    }
}
