//! Scalar cell values shared by rows, filters, and interval bounds.

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap};

///
/// Row
///
/// One projected result row: data-key to cell value.
///

pub type Row = BTreeMap<String, Value>;

///
/// Value
///
/// Untagged on the wire: JSON scalars map directly onto variants.
/// Integers deserialize as `Int`, fractional numbers as `Float`.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Return true when this value is the null scalar.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view used by aggregation; `None` for non-numeric variants.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Compare two values within the same family.
    ///
    /// Int/Float pairs are coerced through f64; cross-family comparisons
    /// (and anything involving null) yield `None`.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                let (a, b) = (self.as_f64()?, other.as_f64()?);
                a.partial_cmp(&b)
            }
            _ => None,
        }
    }

    /// Equality with numeric coercion; nulls are equal to each other only.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        if self.is_null() || other.is_null() {
            return self.is_null() && other.is_null();
        }

        self.compare(other) == Some(Ordering::Equal)
    }

    /// Case-insensitive substring match; only text values can match.
    #[must_use]
    pub fn text_contains_ci(&self, needle: &str) -> bool {
        match self {
            Self::Text(text) => text.to_lowercase().contains(&needle.to_lowercase()),
            _ => false,
        }
    }
}
