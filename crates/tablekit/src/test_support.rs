//! Shared in-memory collaborators for crate tests.

use crate::{
    executor::{ExecutorError, QueryExecutor},
    predicate::{PageSpec, Predicate, SortDirection, SortSpec},
    value::{Row, Value},
};
use std::cmp::Ordering;

/// Build a row from field pairs.
pub(crate) fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

///
/// MemoryExecutor
///
/// Reference in-memory query executor: rows are kept in insertion order,
/// which doubles as the deterministic unsorted order.
///

pub(crate) struct MemoryExecutor {
    rows: Vec<Row>,
    fail: bool,
}

impl MemoryExecutor {
    pub(crate) const fn new(rows: Vec<Row>) -> Self {
        Self { rows, fail: false }
    }

    /// An executor whose every call fails.
    pub(crate) const fn failing() -> Self {
        Self {
            rows: Vec::new(),
            fail: true,
        }
    }

    fn matching<'a>(&'a self, predicates: &'a [Predicate]) -> impl Iterator<Item = &'a Row> {
        self.rows
            .iter()
            .filter(move |row| Predicate::matches_all(predicates, row))
    }

    fn check(&self) -> Result<(), ExecutorError> {
        if self.fail {
            Err(ExecutorError::new("executor offline"))
        } else {
            Ok(())
        }
    }
}

impl QueryExecutor for MemoryExecutor {
    fn count(&self, predicates: &[Predicate]) -> Result<u64, ExecutorError> {
        self.check()?;

        Ok(self.matching(predicates).count() as u64)
    }

    fn select(
        &self,
        projection: &[String],
        predicates: &[Predicate],
        sort: Option<&SortSpec>,
        page: PageSpec,
    ) -> Result<Vec<Row>, ExecutorError> {
        self.check()?;

        let mut rows: Vec<Row> = self.matching(predicates).cloned().collect();

        if let Some(sort) = sort {
            rows.sort_by(|a, b| {
                let ord = a
                    .get(&sort.column)
                    .zip(b.get(&sort.column))
                    .and_then(|(x, y)| x.compare(y))
                    .unwrap_or(Ordering::Equal);

                match sort.direction {
                    SortDirection::Desc => ord.reverse(),
                    _ => ord,
                }
            });
        }

        let paged = rows.into_iter().skip(page.offset as usize);
        let paged: Vec<Row> = match page.limit {
            Some(limit) => paged.take(limit as usize).collect(),
            None => paged.collect(),
        };

        if projection.is_empty() {
            return Ok(paged);
        }

        Ok(paged
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .filter(|(key, _)| projection.contains(key))
                    .collect()
            })
            .collect())
    }

    fn sum(&self, column: &str, predicates: &[Predicate]) -> Result<f64, ExecutorError> {
        self.check()?;

        Ok(self
            .matching(predicates)
            .filter_map(|row| row.get(column))
            .filter_map(Value::as_f64)
            .sum())
    }
}
