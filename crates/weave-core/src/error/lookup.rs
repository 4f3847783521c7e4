use super::{Error, ErrorKind};

/// Error when a named source, mapping or provider does not exist and cannot
/// be synthesized.
#[derive(Debug)]
pub(super) struct LookupError {
    what: What,
    name: Box<str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum What {
    Source,
    Mapping,
    Provider,
}

impl std::error::Error for LookupError {}

impl core::fmt::Display for LookupError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.what {
            What::Source => write!(f, "unknown source `{}`", self.name),
            What::Mapping => write!(f, "no mapping registered for `{}`", self.name),
            What::Provider => write!(f, "no provider registered for `{}`", self.name),
        }
    }
}

impl Error {
    /// Creates an error for a source name missing from the registry.
    pub fn unknown_source(name: impl Into<String>) -> Error {
        Error::lookup(What::Source, name.into())
    }

    /// Creates an error for an entity without any mapping.
    pub fn unknown_mapping(entity: impl Into<String>) -> Error {
        Error::lookup(What::Mapping, entity.into())
    }

    /// Creates an error for a source whose technology has no registered provider.
    pub fn unknown_provider(name: impl Into<String>) -> Error {
        Error::lookup(What::Provider, name.into())
    }

    fn lookup(what: What, name: String) -> Error {
        Error::from(ErrorKind::Lookup(LookupError {
            what,
            name: name.into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is an unknown source error.
    pub fn is_unknown_source(&self) -> bool {
        self.is_lookup(What::Source)
    }

    /// Returns `true` if this error, or any error it wraps, is an unknown mapping error.
    pub fn is_unknown_mapping(&self) -> bool {
        self.is_lookup(What::Mapping)
    }

    /// Returns `true` if this error, or any error it wraps, is an unknown provider error.
    pub fn is_unknown_provider(&self) -> bool {
        self.is_lookup(What::Provider)
    }

    fn is_lookup(&self, what: What) -> bool {
        self.any_kind(|kind| matches!(kind, ErrorKind::Lookup(err) if err.what == what))
    }
}
