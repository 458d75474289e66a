use crate::predicate::{ComparisonOp, SortDirection};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

// Recognized meta flag vocabulary. Anything else passes through opaquely.
const FLAG_SORTABLE: &str = "sortable";
const FLAG_SEARCHABLE: &str = "searchable";
const FLAG_TOTAL: &str = "total";
const FLAG_SORT_PREFIX: &str = "sort:";

///
/// RawColumn
///
/// One declared column before resolution: display name, row data key,
/// and a free-form list of meta flags.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawColumn {
    pub name: String,
    pub data: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_operator: Option<ComparisonOp>,
}

///
/// ColumnError
///
/// Malformed column declarations; fatal at template build.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ColumnError {
    #[error("column declaration is missing a name")]
    MissingName,

    #[error("column `{name}` is missing a data key")]
    MissingDataKey { name: String },

    #[error("column `{name}` has invalid sort flag direction `{direction}`")]
    InvalidSortFlag { name: String, direction: String },
}

///
/// ColumnMeta
///
/// Normalized per-column behavior, derived once from the raw flag list
/// and immutable for the life of the template.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnMeta {
    name: String,
    data_key: String,
    sortable: bool,
    searchable: bool,
    default_sort: SortDirection,
    aggregatable: bool,
    comparison_operator: Option<ComparisonOp>,
    extra: Vec<String>,
}

impl ColumnMeta {
    /// Resolve one raw declaration into normalized column metadata.
    ///
    /// Deterministic: the same raw input always yields identical metadata.
    pub fn resolve(raw: &RawColumn) -> Result<Self, ColumnError> {
        if raw.name.is_empty() {
            return Err(ColumnError::MissingName);
        }
        if raw.data.is_empty() {
            return Err(ColumnError::MissingDataKey {
                name: raw.name.clone(),
            });
        }

        let mut meta = Self {
            name: raw.name.clone(),
            data_key: raw.data.clone(),
            sortable: false,
            searchable: false,
            default_sort: SortDirection::None,
            aggregatable: false,
            comparison_operator: raw.comparison_operator,
            extra: Vec::new(),
        };

        for flag in &raw.meta {
            match flag.as_str() {
                FLAG_SORTABLE => meta.sortable = true,
                FLAG_SEARCHABLE => meta.searchable = true,
                FLAG_TOTAL => meta.aggregatable = true,
                other if other.starts_with(FLAG_SORT_PREFIX) => {
                    let direction = &other[FLAG_SORT_PREFIX.len()..];

                    meta.default_sort = match direction {
                        "asc" => SortDirection::Asc,
                        "desc" => SortDirection::Desc,
                        _ => {
                            return Err(ColumnError::InvalidSortFlag {
                                name: raw.name.clone(),
                                direction: direction.to_string(),
                            });
                        }
                    };
                }
                other => meta.extra.push(other.to_string()),
            }
        }

        Ok(meta)
    }

    /// Display name; unique within a template.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key into row data for this column.
    #[must_use]
    pub fn data_key(&self) -> &str {
        &self.data_key
    }

    #[must_use]
    pub const fn sortable(&self) -> bool {
        self.sortable
    }

    #[must_use]
    pub const fn searchable(&self) -> bool {
        self.searchable
    }

    #[must_use]
    pub const fn default_sort(&self) -> SortDirection {
        self.default_sort
    }

    /// True when this column participates in aggregate totals.
    #[must_use]
    pub const fn aggregatable(&self) -> bool {
        self.aggregatable
    }

    /// Column-level operator override; falls back to the template default.
    #[must_use]
    pub const fn comparison_operator(&self) -> Option<ComparisonOp> {
        self.comparison_operator
    }

    /// Unrecognized flags, preserved for UI passthrough.
    #[must_use]
    pub fn extra(&self) -> &[String] {
        &self.extra
    }
}
