//! Query executor seam: the relational backend this pipeline drives.
//!
//! The pipeline composes predicates, sort, and page instructions; the
//! executor owns wire formats, retries, and read consistency. Empty
//! result sets are a successful outcome, never an error.

use crate::{
    predicate::{PageSpec, Predicate, SortSpec},
    value::Row,
};
use thiserror::Error as ThisError;

///
/// ExecutorError
///
/// External executor failure, surfaced as a server error. This core does
/// not retry; retry policy belongs to the executor.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("query execution failed: {message}")]
pub struct ExecutorError {
    pub message: String,
}

impl ExecutorError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

///
/// QueryExecutor
///
/// Capability consumed from the relational backend. Predicate slices are
/// AND-combined; an unsorted select must still return rows in a
/// deterministic order so pagination stays stable.
///

pub trait QueryExecutor {
    /// Count rows matching the predicates; empty predicates count all rows.
    fn count(&self, predicates: &[Predicate]) -> Result<u64, ExecutorError>;

    /// Select projected rows with sort and pagination applied.
    ///
    /// An empty projection selects every field.
    fn select(
        &self,
        projection: &[String],
        predicates: &[Predicate],
        sort: Option<&SortSpec>,
        page: PageSpec,
    ) -> Result<Vec<Row>, ExecutorError>;

    /// Sum one numeric column over the rows matching the predicates.
    fn sum(&self, column: &str, predicates: &[Predicate]) -> Result<f64, ExecutorError>;
}
