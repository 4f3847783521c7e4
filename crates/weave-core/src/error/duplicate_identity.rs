use super::Error;

/// Error when a mapping declares a second identity property.
#[derive(Debug)]
pub(super) struct DuplicateIdentityError {
    mapping: Box<str>,
    existing: Box<str>,
    attempted: Box<str>,
}

impl std::error::Error for DuplicateIdentityError {}

impl core::fmt::Display for DuplicateIdentityError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "duplicate identity: mapping `{}` already declares `{}` as its identity; cannot also declare `{}`",
            self.mapping, self.existing, self.attempted
        )
    }
}

impl Error {
    /// Creates a duplicate identity error.
    ///
    /// Raised while declaring a mapping; it must abort startup.
    pub fn duplicate_identity(
        mapping: impl Into<String>,
        existing: impl Into<String>,
        attempted: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::DuplicateIdentity(DuplicateIdentityError {
            mapping: mapping.into().into(),
            existing: existing.into().into(),
            attempted: attempted.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a duplicate identity error.
    pub fn is_duplicate_identity(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::DuplicateIdentity(_)))
    }
}
