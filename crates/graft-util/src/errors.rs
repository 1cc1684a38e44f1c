use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all graft operations.
#[derive(Debug, Error, Diagnostic)]
pub enum GraftError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A PDoc (POM) or metadata document could not be parsed.
    #[error("XML parse error: {message}")]
    #[diagnostic(help("Check the document for well-formedness; malformed non-root PDocs are skipped, not fatal"))]
    XmlParse { message: String },

    /// Dependency resolution failed in a way that is not recoverable by degrading gracefully.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// Network request to a repository failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// User settings are missing or malformed.
    #[error("Settings error: {message}")]
    Settings { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type GraftResult<T> = miette::Result<T>;
