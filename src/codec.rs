//! Codec for integers the node renders as JSON strings of decimal digits
//! (balances, deposits, fees, rewards, counters). Decoding rejects anything
//! that is not a plain base-10 integer; encoding always re-renders the
//! canonical form.

use crate::rpc::error::RpcError;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Parses a decimal string into an `i64`.
///
/// Only an optional leading `-` followed by ASCII digits is accepted: no
/// whitespace, no `+`, no exponent, no fractional part.
pub fn parse_decimal(value: &str) -> Result<i64, ParseNumericError> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseNumericError::NotNumeric(value.to_owned()));
    }
    value
        .parse::<i64>()
        .map_err(|_| ParseNumericError::OutOfRange(value.to_owned()))
}

/// Renders an integer as the canonical base-10 string the node expects.
pub fn encode(value: i64) -> String {
    value.to_string()
}

/// Decodes a raw response body holding a single numeric string, e.g.
/// `"1216660108948"`.
pub fn decode(body: &[u8]) -> Result<i64, RpcError> {
    serde_json::from_slice::<NumericString>(body)
        .map(NumericString::get)
        .map_err(|err| RpcError::decode(err, body))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNumericError {
    NotNumeric(String),
    OutOfRange(String),
}

impl fmt::Display for ParseNumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseNumericError::NotNumeric(value) => {
                write!(f, "'{value}' is not a numeric string")
            }
            ParseNumericError::OutOfRange(value) => {
                write!(f, "'{value}' does not fit in a 64-bit integer")
            }
        }
    }
}

impl std::error::Error for ParseNumericError {}

/// A 64-bit integer carried on the wire as a JSON string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericString(pub i64);

impl NumericString {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for NumericString {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<NumericString> for i64 {
    fn from(value: NumericString) -> Self {
        value.0
    }
}

impl FromStr for NumericString {
    type Err = ParseNumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s).map(Self)
    }
}

impl fmt::Display for NumericString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for NumericString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        numeric_string::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for NumericString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        numeric_string::deserialize(deserializer).map(Self)
    }
}

struct NumericStringVisitor;

impl<'de> Visitor<'de> for NumericStringVisitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string of decimal digits")
    }

    fn visit_str<E>(self, value: &str) -> Result<i64, E>
    where
        E: de::Error,
    {
        parse_decimal(value).map_err(E::custom)
    }
}

/// `#[serde(with = "crate::codec::numeric_string")]` for `i64` fields.
pub mod numeric_string {
    use super::NumericStringVisitor;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::encode(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(NumericStringVisitor)
    }

    /// Variant for `Option<i64>` fields; `null` and a missing key (with
    /// `#[serde(default)]`) both map to `None`.
    pub mod option {
        use super::super::NumericString;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            value.map(NumericString).serialize(serializer)
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(Option::<NumericString>::deserialize(deserializer)?.map(NumericString::get))
        }
    }

    /// Variant for `Vec<i64>` fields such as per-slot reward tables.
    pub mod vec {
        use super::super::NumericString;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(values: &[i64], serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_seq(values.iter().copied().map(NumericString))
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let values = Vec::<NumericString>::deserialize(deserializer)?;
            Ok(values.into_iter().map(NumericString::get).collect())
        }
    }
}
