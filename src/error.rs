use thiserror::Error;

/// Errors raised by a tile data source.
///
/// "No tile at these coordinates" is deliberately not represented here: a
/// valid query that matches no stored tile is the `None` half of
/// `Result<Option<_>, SourceError>` throughout the crate. A `SourceError`
/// always means a genuine failure (unreadable package, broken query,
/// malformed metadata), which callers surface as a server error rather than
/// a not-found.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The package could not be opened at all
    #[error("failed to open tile package {path}: {message}")]
    Open { path: String, message: String },

    /// A query against an open package failed
    #[error("tile package query failed: {0}")]
    Query(String),

    /// The package metadata table holds a value that cannot be parsed
    #[error("invalid package metadata for {field}: {message}")]
    Metadata { field: String, message: String },
}
