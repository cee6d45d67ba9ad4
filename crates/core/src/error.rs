//! Error types for palletpack.

use thiserror::Error;

/// Result type alias for palletpack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running the packing engine.
///
/// A box that does not fit is never an error: it is simply left out of the
/// placement. These variants only cover malformed input.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid box specification provided.
    #[error("Invalid box: {0}")]
    InvalidBox(String),

    /// Invalid pallet specification provided.
    #[error("Invalid pallet: {0}")]
    InvalidPallet(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidPallet("length must be positive".into());
        assert_eq!(err.to_string(), "Invalid pallet: length must be positive");

        let err = Error::ConfigError("epsilon must be positive".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: epsilon must be positive"
        );
    }
}
