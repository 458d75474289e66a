//! Executor-facing query contracts: predicates, sort, and pagination.
//!
//! Top-level predicate slices are AND-combined by the executor; `Or` exists
//! for multi-column search. Evaluation semantics: missing fields never
//! match, and invalid comparisons evaluate to false.

use crate::value::{Row, Value};
use serde::{Deserialize, Serialize};
use std::ops::Bound;

///
/// ComparisonOp
///
/// Column match operator. `Like` is a case-insensitive substring match;
/// `Exact` is coercion-aware equality.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum ComparisonOp {
    #[default]
    #[serde(rename = "exact", alias = "Exact")]
    Exact,

    #[serde(rename = "like", alias = "LIKE")]
    Like,
}

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    None,
    Asc,
    Desc,
}

///
/// SortSpec
///
/// Executor-facing ordering specification (applied after filtering).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

///
/// PageSpec
///
/// Executor-facing pagination specification. `limit: None` means
/// "return every matching row".
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageSpec {
    pub offset: u32,
    pub limit: Option<u32>,
}

impl PageSpec {
    /// A page spec with no offset and no row cap.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }
}

///
/// Predicate
///
/// One row filter. Executors receive predicate slices and must apply
/// them conjunctively.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Single-column comparison against a scalar operand.
    Compare {
        column: String,
        op: ComparisonOp,
        value: Value,
    },

    /// Interval filter; either bound may be unbounded.
    Range {
        column: String,
        lower: Bound<Value>,
        upper: Bound<Value>,
    },

    /// Disjunction, used for full-mode search across searchable columns.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Evaluate this predicate against one row.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Self::Compare { column, op, value } => {
                let Some(actual) = row.get(column) else {
                    return false;
                };

                match op {
                    ComparisonOp::Exact => actual.equals(value),
                    ComparisonOp::Like => match value {
                        Value::Text(term) => actual.text_contains_ci(term),
                        _ => actual.equals(value),
                    },
                }
            }
            Self::Range {
                column,
                lower,
                upper,
            } => {
                let Some(actual) = row.get(column) else {
                    return false;
                };

                within_bound(actual, lower, true) && within_bound(actual, upper, false)
            }
            Self::Or(children) => children.iter().any(|child| child.matches(row)),
        }
    }

    /// Evaluate an AND-combined predicate slice against one row.
    #[must_use]
    pub fn matches_all(predicates: &[Self], row: &Row) -> bool {
        predicates.iter().all(|predicate| predicate.matches(row))
    }
}

// Check one side of a range; an incomparable bound never matches.
fn within_bound(actual: &Value, bound: &Bound<Value>, is_lower: bool) -> bool {
    let (limit, allow_equal) = match bound {
        Bound::Unbounded => return true,
        Bound::Included(limit) => (limit, true),
        Bound::Excluded(limit) => (limit, false),
    };

    actual.compare(limit).is_some_and(|ord| {
        let strict = if is_lower { ord.is_gt() } else { ord.is_lt() };

        strict || (allow_equal && ord.is_eq())
    })
}
