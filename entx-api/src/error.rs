use thiserror::Error;

/// Boxed source error carried by [`QueryError`] variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by query collaborators while counting or fetching rows.
///
/// The paginator hands these back to the caller untouched.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Count error: {0}")]
    Count(#[source] BoxError),

    #[error("Fetch error: {0}")]
    Fetch(#[source] BoxError),

    #[error("Decode error: {0}")]
    Decode(#[source] BoxError),

    #[error("Query cancelled")]
    Cancelled,

    #[error("Query deadline exceeded")]
    DeadlineExceeded,
}

impl QueryError {
    pub fn count(err: impl Into<BoxError>) -> Self {
        Self::Count(err.into())
    }

    pub fn fetch(err: impl Into<BoxError>) -> Self {
        Self::Fetch(err.into())
    }

    pub fn decode(err: impl Into<BoxError>) -> Self {
        Self::Decode(err.into())
    }
}

/// Errors raised while mutating an OpenAPI document.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Missing field: {0}")]
    MissingField(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

pub type ApiResult<T> = Result<T, ApiError>;
