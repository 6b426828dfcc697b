//! Serde helpers for monetary amounts.
//!
//! Amounts are read from JSON numbers or numeric strings and written back as
//! JSON numbers.

use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl RawAmount {
    fn parse<E: serde::de::Error>(self) -> Result<BigDecimal, E> {
        // serde_json prints the shortest form of a float, so 0.1 stays 0.1.
        let text = match self {
            RawAmount::Number(n) => n.to_string(),
            RawAmount::Text(s) => s,
        };
        BigDecimal::from_str(text.trim())
            .map_err(|_| E::custom(format!("invalid monetary amount '{}'", text)))
    }
}

pub fn serialize<S: Serializer>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.with_scale(0) == *amount {
        if let Some(whole) = amount.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    match amount.to_f64() {
        Some(n) => serializer.serialize_f64(n),
        None => Err(S::Error::custom(format!("amount {} is out of range", amount))),
    }
}

pub fn deserialize_option<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BigDecimal>, D::Error> {
    Option::<RawAmount>::deserialize(deserializer)?
        .map(|raw| raw.parse::<D::Error>())
        .transpose()
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize)]
    struct Out {
        #[serde(serialize_with = "serialize")]
        amount: BigDecimal,
    }

    #[derive(Deserialize)]
    struct In {
        #[serde(default, deserialize_with = "deserialize_option")]
        amount: Option<BigDecimal>,
    }

    fn read(json: &str) -> Option<BigDecimal> {
        serde_json::from_str::<In>(json).expect("valid json").amount
    }

    fn write(amount: &str) -> String {
        serde_json::to_string(&Out {
            amount: BigDecimal::from_str(amount).expect("valid decimal"),
        })
        .expect("serializable")
    }

    #[test]
    fn reads_numbers_and_strings() {
        assert_eq!(read(r#"{"amount": 100}"#), Some(BigDecimal::from(100)));
        assert_eq!(
            read(r#"{"amount": 0.1}"#),
            Some(BigDecimal::from_str("0.1").unwrap())
        );
        assert_eq!(
            read(r#"{"amount": "19.99"}"#),
            Some(BigDecimal::from_str("19.99").unwrap())
        );
    }

    #[test]
    fn absent_and_null_read_as_none() {
        assert_eq!(read("{}"), None);
        assert_eq!(read(r#"{"amount": null}"#), None);
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert!(serde_json::from_str::<In>(r#"{"amount": "ten"}"#).is_err());
    }

    #[test]
    fn writes_whole_amounts_as_integers() {
        assert_eq!(write("100.00"), r#"{"amount":100}"#);
    }

    #[test]
    fn writes_fractional_amounts_as_floats() {
        assert_eq!(write("10.50"), r#"{"amount":10.5}"#);
    }
}
