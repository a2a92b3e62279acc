//! Serde support for exact decimal amounts.
//!
//! Amounts are written as decimal strings and read from either a string or a
//! JSON number. Numbers are taken from their literal text, never through `f64`,
//! so every digit the sender wrote is kept.
//!
//! ```
//! use bigdecimal::BigDecimal;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Payment {
//!     #[serde(with = "paygate_core::domain::amount_serde")]
//!     amount: BigDecimal,
//! }
//! ```

use bigdecimal::BigDecimal;
use serde::{de, Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Serializes a `BigDecimal` as its decimal string.
pub fn serialize<S>(amount: &BigDecimal, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(amount)
}

/// Deserializes a `BigDecimal` from a decimal string or a JSON number.
pub fn deserialize<'de, D>(d: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    from_value(Value::deserialize(d)?)
}

fn from_value<E>(value: Value) -> Result<BigDecimal, E>
where
    E: de::Error,
{
    let text = match value {
        Value::String(s) => s,
        // With `arbitrary_precision` this is the literal as sent.
        Value::Number(n) => n.to_string(),
        other => {
            return Err(E::custom(format!(
                "expected a decimal amount, got {other}"
            )))
        }
    };

    text.trim()
        .parse::<BigDecimal>()
        .map_err(|e| E::custom(format!("invalid decimal amount {text:?}: {e}")))
}

pub mod option {
    //! Same as the parent module for `Option<BigDecimal>`; `null` reads as
    //! `None`. Combine with `#[serde(default)]` to also accept a missing field.

    use bigdecimal::BigDecimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(amount: &Option<BigDecimal>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match amount {
            Some(amount) => s.collect_str(amount),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            value => super::from_value(value).map(Some),
        }
    }
}
