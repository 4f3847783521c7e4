use super::Source;

use serde::{Deserialize, Serialize};

/// Ambient configuration for one source.
///
/// Flags left unset keep the value of the code declaration, or the
/// synthesized defaults when the source was not declared in code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub name: String,

    #[serde(default)]
    pub connection: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, connection: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connection: connection.into(),
            ..Self::default()
        }
    }

    /// Applies the configured values on top of `source`.
    pub(crate) fn apply(&self, source: &mut Source) {
        if !self.connection.is_empty() {
            source.connection = self.connection.clone();
        }

        if let Some(provider) = &self.provider {
            source.provider = Some(provider.clone());
        }

        if let Some(readable) = self.readable {
            source.readable = readable;
        }

        if let Some(writable) = self.writable {
            source.writable = writable;
        }

        if let Some(audit) = self.audit {
            source.audit = audit;
        }

        if let Some(order) = self.order {
            source.order = order;
        }
    }
}
