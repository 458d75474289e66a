use crate::{executor::ExecutorError, request::RequestError, template::TemplateError};
use thiserror::Error as ThisError;

///
/// ErrorClass
///
/// Stable classification for surfacing: configuration errors are the
/// integrator's fault, bad requests map to client-facing validation
/// (HTTP 4xx equivalent), execution failures to server errors.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidConfiguration,
    BadRequest,
    Execution,
}

///
/// Error
///
/// Top-level error surface of the pipeline.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    QueryExecution(#[from] ExecutorError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Template(_) => ErrorClass::InvalidConfiguration,
            Self::Request(_) => ErrorClass::BadRequest,
            Self::QueryExecution(_) => ErrorClass::Execution,
        }
    }
}
