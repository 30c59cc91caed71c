//! Argument coercion shared by tool `Args` structs
//!
//! Agents send identifiers either as JSON numbers or as strings; both are
//! accepted wherever an integer is required.

use serde::{Deserialize, Deserializer, de};

use super::error::ToolError;

#[derive(Deserialize)]
#[serde(untagged)]
enum IntegerLike {
    Int(i64),
    Text(String),
}

impl IntegerLike {
    fn into_i64<E: de::Error>(self) -> Result<i64, E> {
        match self {
            IntegerLike::Int(n) => Ok(n),
            IntegerLike::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected an integer, got \"{}\"", s))),
        }
    }
}

/// Integer given as a number or a string of digits
pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    IntegerLike::deserialize(deserializer)?.into_i64()
}

/// Optional form of [`integer`]; pair with `#[serde(default)]`
pub fn optional_integer<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    Option::<IntegerLike>::deserialize(deserializer)?
        .map(|v| v.into_i64::<D::Error>())
        .transpose()
}

/// Reject blank required strings before any request is made
pub fn require(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        Err(ToolError::validation(format!("{} cannot be empty", field)))
    } else {
        Ok(())
    }
}

/// Empty strings count as not given
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
