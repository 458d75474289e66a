//! Table templates: the declarative schema-for-display of one table.
//!
//! A template is built once per request cycle from a descriptor and is
//! read-only afterward. Column declaration order is preserved and becomes
//! the default projection order in responses.

mod column;


pub use column::{ColumnError, ColumnMeta, RawColumn};

use crate::predicate::ComparisonOp;
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Key namespace for per-table cached unfiltered counts.
pub const COUNT_CACHE_PREFIX: &str = "enso:tables:";

const fn default_count_cache() -> bool {
    true
}

///
/// TableDescriptor
///
/// Declarative input for one table: column declarations plus table-level
/// settings. `buttons` is opaque UI passthrough.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescriptor {
    pub route_prefix: String,

    #[serde(default)]
    pub columns: Vec<RawColumn>,

    #[serde(default)]
    pub comparison_operator: ComparisonOp,

    #[serde(default = "default_count_cache")]
    pub count_cache: bool,

    #[serde(default)]
    pub total: bool,

    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub buttons: serde_json::Value,
}

///
/// TemplateError
///

#[derive(Debug, ThisError)]
pub enum TemplateError {
    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error("duplicate column `{name}` in table template")]
    DuplicateColumn { name: String },
}

///
/// Template
///
/// Resolved table schema: ordered column metadata plus table-level
/// settings. Build-once; read accessors only.
///

#[derive(Clone, Debug)]
pub struct Template {
    route_prefix: String,
    columns: Vec<ColumnMeta>,
    comparison_operator: ComparisonOp,
    count_cache: bool,
    total: bool,
    buttons: serde_json::Value,
}

impl Template {
    /// Build a template from its descriptor, resolving every declared
    /// column in order.
    pub fn build(descriptor: TableDescriptor) -> Result<Self, TemplateError> {
        let mut columns: Vec<ColumnMeta> = Vec::with_capacity(descriptor.columns.len());

        for raw in &descriptor.columns {
            let meta = ColumnMeta::resolve(raw)?;

            if columns.iter().any(|column| column.name() == meta.name()) {
                return Err(TemplateError::DuplicateColumn {
                    name: meta.name().to_string(),
                });
            }

            columns.push(meta);
        }

        Ok(Self {
            route_prefix: descriptor.route_prefix,
            columns,
            comparison_operator: descriptor.comparison_operator,
            count_cache: descriptor.count_cache,
            total: descriptor.total,
            buttons: descriptor.buttons,
        })
    }

    #[must_use]
    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    /// Columns in declared order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// Look up one column by display name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|column| column.name() == name)
    }

    /// Table-level default match operator.
    #[must_use]
    pub const fn comparison_operator(&self) -> ComparisonOp {
        self.comparison_operator
    }

    /// True when unfiltered counts may be served from the count cache.
    #[must_use]
    pub const fn count_cache(&self) -> bool {
        self.count_cache
    }

    /// True when aggregate totals are computed for this table.
    #[must_use]
    pub const fn total_enabled(&self) -> bool {
        self.total
    }

    /// Opaque UI passthrough.
    #[must_use]
    pub const fn buttons(&self) -> &serde_json::Value {
        &self.buttons
    }

    /// Deterministic count-cache key for this table.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "{COUNT_CACHE_PREFIX}{}",
            self.route_prefix.to_case(Case::Snake)
        )
    }
}
