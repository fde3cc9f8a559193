use thiserror::Error;

/// Error taxonomy for the storage engine and writer façade.
///
/// Internals always return `Result<T>`; the `IndexWriter` boundary catches
/// every variant, copies its message into `last_error`, and returns the
/// documented sentinel (`false` / `0`) instead of propagating the error.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("database error: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error(
        "database is not compatible: loaded version {loaded} does not match supported version {supported}"
    )]
    IncompatibleDatabase { loaded: i32, supported: i32 },

    #[error("bad input: {0}")]
    BadInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to convert integer \"{0}\" to a location kind")]
    BadKind(i64),

    #[error("usage error: {0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;
