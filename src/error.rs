use std::backtrace::Backtrace;

use axum::http::StatusCode;
use sea_orm::DbErr;

/// Stable numeric code identifying a class of domain error.
///
/// Codes are part of the API surface: clients branch on them, so they must
/// never be renumbered. Two errors are considered equal when their codes
/// match, regardless of message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(i32);

impl ErrorCode {
    /// Catch-all for failures with no more specific classification.
    pub const UNKNOWN: ErrorCode = ErrorCode(10001);
    /// Store-layer failure passed through unclassified.
    pub const DATABASE: ErrorCode = ErrorCode(10002);
    /// A by-identity or by-condition read matched zero rows.
    pub const NOT_FOUND: ErrorCode = ErrorCode(10404);
    /// Neither an identifier nor a usable condition was supplied to a read.
    pub const QUERY_PARAM_EMPTY: ErrorCode = ErrorCode(10400);

    pub const fn new(code: i32) -> Self {
        ErrorCode(code)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    /// Default HTTP status for this code, if one applies.
    pub fn http_status(self) -> Option<StatusCode> {
        match self {
            ErrorCode::NOT_FOUND => Some(StatusCode::NOT_FOUND),
            ErrorCode::QUERY_PARAM_EMPTY => Some(StatusCode::BAD_REQUEST),
            ErrorCode::DATABASE | ErrorCode::UNKNOWN => Some(StatusCode::INTERNAL_SERVER_ERROR),
            _ => None,
        }
    }
}

/// Domain error: a stable code, a human-readable message, and optionally the
/// underlying cause plus the backtrace captured at construction.
///
/// The code and the HTTP status are independently queryable; the status falls
/// back to the code's default mapping unless overridden with
/// [`Error::with_http_status`].
#[derive(Debug)]
pub struct Error {
    code: ErrorCode,
    message: String,
    http_status: Option<StatusCode>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            http_status: None,
            source: None,
            backtrace: Backtrace::capture(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UNKNOWN, message)
    }

    pub fn not_found(what: impl AsRef<str>) -> Self {
        Self::new(ErrorCode::NOT_FOUND, format!("{} not found", what.as_ref()))
    }

    pub fn query_param_empty() -> Self {
        Self::new(
            ErrorCode::QUERY_PARAM_EMPTY,
            "neither id nor query condition supplied",
        )
    }

    /// Attach the underlying cause, preserved for `source()` inspection.
    pub fn wrap(mut self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Override the HTTP status derived from the code.
    pub fn with_http_status(mut self, status: StatusCode) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn http_status(&self) -> Option<StatusCode> {
        self.http_status.or_else(|| self.code.http_status())
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

/// Identity is the stable code, not the message text.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

/// Classification glue for store failures.
///
/// The "no rows" sentinel becomes the not-found domain error with the
/// sentinel kept as its cause; every other store error passes through as
/// DATABASE, message and cause intact, with no reinterpretation.
impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(what) => {
                Error::new(ErrorCode::NOT_FOUND, format!("{what} not found")).wrap(err)
            }
            _ => Error::new(ErrorCode::DATABASE, err.to_string()).wrap(err),
        }
    }
}

/// Result type alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Flatten an error's cause chain into a single diagnostic string.
///
/// For logging only; control flow must branch on [`ErrorCode`] instead.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut chain = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        current = cause.source();
    }
    chain
}
