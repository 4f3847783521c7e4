use super::Error;

/// Error when a backend cannot perform a requested feature at execution
/// time, such as stored procedures on SQLite.
///
/// Generators that cannot express an operation return an empty batch
/// instead; this error is for commands that reach a connection anyway.
#[derive(Debug)]
pub(super) struct UnsupportedFeatureError {
    message: Box<str>,
}

impl std::error::Error for UnsupportedFeatureError {}

impl core::fmt::Display for UnsupportedFeatureError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported feature: {}", self.message)
    }
}

impl Error {
    /// Creates an unsupported feature error.
    pub fn unsupported_feature(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedFeature(
            UnsupportedFeatureError {
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error, or any error it wraps, is an unsupported feature error.
    pub fn is_unsupported_feature(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnsupportedFeature(_)))
    }
}
