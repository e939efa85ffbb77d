//! Error types for the storefront interaction core.
//!
//! [`StorefrontError`] is the single error type for the crate, with a [`Result`]
//! alias used throughout. Nothing the core does is fatal to the page: the
//! coordinator converts most of these into view state (retry affordances,
//! inline cart messages) rather than surfacing them to the runtime.

use thiserror::Error;

/// The main error type for storefront core operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Reading or writing persisted preferences failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is missing a value or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The commerce API client could not complete a request.
    ///
    /// Transport-level failure. Search treats this as "keep the last good
    /// results and offer a retry".
    #[error("Commerce client error: {0}")]
    Client(String),

    /// The commerce API accepted the request but rejected the mutation.
    ///
    /// Carries the user-facing messages returned by the API, joined.
    #[error("Mutation rejected: {0}")]
    Rejected(String),

    /// A response payload did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Worker could not service a message.
    #[error("Worker error: {0}")]
    Worker(String),

    /// A cart edit referenced a line the cart does not hold.
    #[error("Unknown cart line: {0}")]
    UnknownLine(String),
}

/// A specialized `Result` type for storefront core operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;
