mod config;
pub use config::SourceConfig;

mod manager;
pub use manager::SourceManager;

use crate::{Error, Result};

use std::any::{type_name, TypeId};

/// Describes one configured data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Unique name within the registry
    pub name: String,

    /// Connection string, usually a URL whose scheme names the provider
    pub connection: String,

    /// Explicit provider name; overrides the connection URL's scheme
    pub provider: Option<String>,

    pub readable: bool,

    pub writable: bool,

    /// Writes to this source are emitted as audit events
    pub audit: bool,

    /// Write priority. Lower orders are written first and read with higher
    /// precedence.
    pub order: i32,

    /// Capability marker type used to look the source up by type
    pub marker: Option<Marker>,
}

/// Identifies a source by a Rust type instead of by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    id: TypeId,
    name: &'static str,
}

impl Source {
    /// Order given to sources synthesized from configuration or on lookup.
    pub const DEFAULT_ORDER: i32 = i32::MAX;

    /// A readable, writable, unaudited source with order `0`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connection: String::new(),
            provider: None,
            readable: true,
            writable: true,
            audit: false,
            order: 0,
            marker: None,
        }
    }

    /// A source created without a code declaration. It has the lowest
    /// priority.
    pub fn synthesized(name: impl Into<String>) -> Self {
        Self {
            order: Self::DEFAULT_ORDER,
            ..Self::new(name)
        }
    }

    pub fn connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = connection.into();
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn readable(mut self, readable: bool) -> Self {
        self.readable = readable;
        self
    }

    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    pub fn audit(mut self, audit: bool) -> Self {
        self.audit = audit;
        self
    }

    /// Associates a marker type with the source.
    pub fn marker<M: 'static>(mut self) -> Self {
        self.marker = Some(Marker::of::<M>());
        self
    }

    /// Name of the provider serving this source: the explicit provider if
    /// set, otherwise the scheme of the connection URL.
    pub fn provider_name(&self) -> Result<String> {
        if let Some(provider) = &self.provider {
            return Ok(provider.clone());
        }

        if self.connection.is_empty() {
            return Err(Error::invalid_connection_url(format!(
                "source `{}` has no connection string",
                self.name
            )));
        }

        let url = url::Url::parse(&self.connection)?;
        Ok(url.scheme().to_string())
    }
}

impl Marker {
    pub fn of<M: 'static>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: type_name::<M>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn is<M: 'static>(&self) -> bool {
        self.id == TypeId::of::<M>()
    }
}
