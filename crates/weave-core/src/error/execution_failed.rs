use super::{Error, ErrorKind};

/// Error when executing a batch against one source fails.
///
/// Used as context on top of the underlying driver error so the caller can
/// tell which source failed and what was being attempted. Writes already
/// applied to other sources are left in place.
#[derive(Debug)]
pub(super) struct ExecutionFailedError {
    source: Box<str>,
    operation: Box<str>,
}

impl std::error::Error for ExecutionFailedError {}

impl core::fmt::Display for ExecutionFailedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "execution failed: source `{}`, operation `{}`",
            self.source, self.operation
        )
    }
}

impl Error {
    /// Creates an execution failure for `operation` against `source`.
    pub fn execution_failed(source: impl Into<String>, operation: impl Into<String>) -> Error {
        Error::from(ErrorKind::ExecutionFailed(ExecutionFailedError {
            source: source.into().into(),
            operation: operation.into().into(),
        }))
    }

    /// Returns `true` if any error in the chain is an execution failure.
    pub fn is_execution_failed(&self) -> bool {
        self.any_kind(|kind| matches!(kind, ErrorKind::ExecutionFailed(_)))
    }

    /// Name of the source whose execution failed, if this is an execution failure.
    pub fn failed_source(&self) -> Option<&str> {
        self.execution_failure().map(|err| &*err.source)
    }

    /// The operation that was attempted when execution failed.
    pub fn failed_operation(&self) -> Option<&str> {
        self.execution_failure().map(|err| &*err.operation)
    }

    fn execution_failure(&self) -> Option<&ExecutionFailedError> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::ExecutionFailed(failure) => Some(failure),
            _ => None,
        })
    }
}
