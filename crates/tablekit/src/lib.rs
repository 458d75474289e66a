//! Tablekit: a server-side table data pipeline.
//!
//! Translates a declarative column template plus a client-issued grid
//! query (pagination, search, filters, sort, totals) into executor
//! instructions and a structured, paged response payload — so a
//! UI-facing grid can request server-computed pages without the caller
//! writing SQL.
//!
//! The pipeline is stateless per request: template, request, and config
//! are rebuilt per call; the count cache is the only cross-request
//! shared resource.

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod executor;
pub mod obs;
pub mod predicate;
pub mod request;
pub mod template;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, ErrorClass};

///
/// Prelude
///
/// Domain vocabulary only; errors, executors, and caches are imported
/// from their modules.
///

pub mod prelude {
    pub use crate::{
        config::Config,
        data::{DataBuilder, TableData},
        request::{Request, RequestEnvelope, SearchMode},
        template::{ColumnMeta, RawColumn, TableDescriptor, Template},
        value::{Row, Value},
    };
}
