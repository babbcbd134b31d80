use thiserror::Error;

/// Request errors raised while interpreting a page request.
///
/// None of these are recovered locally: an out-of-range page index is not an
/// error and never shows up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid sort direction '{token}' in segment '{segment}'")]
    InvalidSortDirection { segment: String, token: String },

    #[error("invalid sort spec: {0}")]
    InvalidSortSpec(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("page size must be greater than zero, got {0}")]
    InvalidPageSize(i64),

    #[error("record type has no relative scope field")]
    UnsupportedRelativeScope,
}

impl Error {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidSortDirection { .. } => "INVALID_SORT_DIRECTION",
            Error::InvalidSortSpec(_) => "INVALID_SORT_SPEC",
            Error::UnknownField(_) => "UNKNOWN_FIELD",
            Error::InvalidPageSize(_) => "INVALID_PAGE_SIZE",
            Error::UnsupportedRelativeScope => "UNSUPPORTED_RELATIVE_SCOPE",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
