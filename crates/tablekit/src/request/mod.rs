//! Client query requests: wire envelope parsing and normalization.
//!
//! The envelope mirrors the inbound wire shape; `Request` is the
//! normalized, immutable form the rest of the pipeline consumes.


use crate::{predicate::SortDirection, value::Value};
use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Page length applied when a request does not specify one.
pub const DEFAULT_PAGE_LENGTH: u32 = 10;

///
/// SearchMode
///
/// `Full` matches the term against every searchable column, OR-combined;
/// `PerColumn` matches only columns named by filter keys.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    #[default]
    Full,
    PerColumn,
}

impl SearchMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::PerColumn => "perColumn",
        }
    }
}

///
/// Interval
///
/// One `[min, max]` range filter. Serialized as a two-element array;
/// a missing side is an open-ended bound, not an error.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interval {
    pub min: Option<Value>,
    pub max: Option<Value>,
}

impl Interval {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accept short arrays: `[min]` leaves the upper side open.
        let mut bounds = Vec::<Option<Value>>::deserialize(deserializer)?.into_iter();

        Ok(Self {
            min: bounds.next().flatten(),
            max: bounds.next().flatten(),
        })
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.min, &self.max).serialize(serializer)
    }
}

///
/// Filters
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, Value>);

///
/// Intervals
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Intervals(BTreeMap<String, Interval>);

///
/// RequestMeta
///
/// Wire-shape pagination/search block. `length` stays loose on purpose:
/// non-numeric input falls back to the default rather than erroring.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_column: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_info_record_limit: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<bool>,
}

///
/// RequestEnvelope
///
/// Inbound wire shape: selected columns, meta block, per-column filters,
/// and interval filters.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestEnvelope {
    pub columns: Vec<String>,
    pub meta: RequestMeta,
    pub filters: Filters,
    pub intervals: Intervals,
}

///
/// RequestError
///
/// Malformed client queries; surfaced as client-facing validation errors.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RequestError {
    #[error("length must be non-negative, got {value}")]
    NegativeLength { value: i64 },

    #[error("offset must be non-negative, got {value}")]
    NegativeOffset { value: i64 },

    #[error("length {value} exceeds the supported range")]
    LengthOutOfRange { value: i64 },

    #[error("offset {value} exceeds the supported range")]
    OffsetOutOfRange { value: i64 },

    #[error("fullInfoRecordLimit must be non-negative, got {value}")]
    NegativeFullInfoLimit { value: i64 },

    #[error("unknown search mode `{mode}`")]
    InvalidSearchMode { mode: String },

    #[error("unknown sort direction `{direction}`")]
    InvalidSortDirection { direction: String },
}

///
/// RequestDefaults
///

#[derive(Clone, Copy, Debug)]
pub struct RequestDefaults {
    pub length: u32,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            length: DEFAULT_PAGE_LENGTH,
        }
    }
}

///
/// Request
///
/// One normalized client query; immutable after parse.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    columns: Vec<String>,
    search_term: String,
    search_mode: SearchMode,
    filters: Filters,
    intervals: Intervals,
    length: u32,
    offset: u32,
    sort_column: Option<String>,
    sort_direction: SortDirection,
    full_info_record_limit: Option<u64>,
    total: bool,
}

impl Request {
    /// Parse a wire envelope with the standard defaults.
    pub fn parse(envelope: RequestEnvelope) -> Result<Self, RequestError> {
        Self::parse_with(envelope, RequestDefaults::default())
    }

    /// Parse a wire envelope into a normalized request.
    pub fn parse_with(
        envelope: RequestEnvelope,
        defaults: RequestDefaults,
    ) -> Result<Self, RequestError> {
        // Non-numeric `length` falls back to the default rather than erroring.
        let length = match envelope.meta.length.as_ref().and_then(serde_json::Value::as_i64) {
            Some(value) if value < 0 => return Err(RequestError::NegativeLength { value }),
            Some(value) => {
                u32::try_from(value).map_err(|_| RequestError::LengthOutOfRange { value })?
            }
            None => defaults.length,
        };

        let offset = match envelope.meta.offset {
            Some(value) if value < 0 => return Err(RequestError::NegativeOffset { value }),
            Some(value) => {
                u32::try_from(value).map_err(|_| RequestError::OffsetOutOfRange { value })?
            }
            None => 0,
        };

        let search_mode = match envelope.meta.search_mode.as_deref() {
            None | Some("full") => SearchMode::Full,
            Some("perColumn") => SearchMode::PerColumn,
            Some(mode) => {
                return Err(RequestError::InvalidSearchMode {
                    mode: mode.to_string(),
                });
            }
        };

        let sort_direction = match envelope.meta.sort_direction.as_deref() {
            None | Some("none") => SortDirection::None,
            Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(direction) => {
                return Err(RequestError::InvalidSortDirection {
                    direction: direction.to_string(),
                });
            }
        };

        let full_info_record_limit = match envelope.meta.full_info_record_limit {
            Some(value) if value < 0 => {
                return Err(RequestError::NegativeFullInfoLimit { value });
            }
            Some(value) => Some(value.unsigned_abs()),
            None => None,
        };

        Ok(Self {
            columns: envelope.columns,
            search_term: envelope.meta.search.unwrap_or_default(),
            search_mode,
            filters: envelope.filters,
            intervals: envelope.intervals,
            length,
            offset,
            sort_column: envelope.meta.sort_column,
            sort_direction,
            full_info_record_limit,
            total: envelope.meta.total.unwrap_or(false),
        })
    }

    /// Requested column identifiers, in request order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Free-text search term; empty means no search.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub const fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    #[must_use]
    pub const fn filters(&self) -> &Filters {
        &self.filters
    }

    #[must_use]
    pub const fn intervals(&self) -> &Intervals {
        &self.intervals
    }

    /// Raw page length; `0` is the "no limit" sentinel.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Effective page cap; `None` when the request asked for all rows.
    #[must_use]
    pub const fn limit(&self) -> Option<u32> {
        if self.length == 0 {
            None
        } else {
            Some(self.length)
        }
    }

    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    #[must_use]
    pub fn sort_column(&self) -> Option<&str> {
        self.sort_column.as_deref()
    }

    #[must_use]
    pub const fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Threshold for the fetch-all short circuit; `None` disables it.
    #[must_use]
    pub const fn full_info_record_limit(&self) -> Option<u64> {
        self.full_info_record_limit
    }

    /// True when the request asked for aggregate totals.
    #[must_use]
    pub const fn total(&self) -> bool {
        self.total
    }

    /// True when any predicate narrows the result set; disables the
    /// count cache for this request.
    #[must_use]
    pub fn has_narrowing(&self) -> bool {
        !self.search_term.is_empty() || !self.filters.is_empty() || !self.intervals.is_empty()
    }

    /// Render this request back into its canonical wire envelope.
    #[must_use]
    pub fn to_envelope(&self) -> RequestEnvelope {
        RequestEnvelope {
            columns: self.columns.clone(),
            meta: RequestMeta {
                length: Some(serde_json::Value::from(self.length)),
                offset: Some(i64::from(self.offset)),
                search: Some(self.search_term.clone()),
                search_mode: Some(self.search_mode.as_str().to_string()),
                sort_column: self.sort_column.clone(),
                sort_direction: Some(direction_str(self.sort_direction).to_string()),
                full_info_record_limit: self
                    .full_info_record_limit
                    .and_then(|limit| i64::try_from(limit).ok()),
                total: Some(self.total),
            },
            filters: self.filters.clone(),
            intervals: self.intervals.clone(),
        }
    }
}

const fn direction_str(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::None => "none",
        SortDirection::Asc => "asc",
        SortDirection::Desc => "desc",
    }
}
