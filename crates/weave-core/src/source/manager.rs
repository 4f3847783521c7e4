use super::{Source, SourceConfig};
use crate::{Error, Result};

use indexmap::IndexMap;

/// Registry of every configured source, keyed by name.
///
/// Iteration is always sorted by ascending [`Source::order`], with ties kept
/// in registration order.
#[derive(Debug, Default, Clone)]
pub struct SourceManager {
    sources: IndexMap<String, Source>,
}

impl SourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source declared in code. Names must be unique.
    pub fn register(&mut self, source: Source) -> Result<&Source> {
        if self.sources.contains_key(&source.name) {
            return Err(Error::invalid_config(format!(
                "source `{}` is registered more than once",
                source.name
            )));
        }

        let (index, _) = self.sources.insert_full(source.name.clone(), source);
        Ok(&self.sources[index])
    }

    /// Returns the named source, synthesizing and registering a default one
    /// if it does not exist yet.
    pub fn get_source(&mut self, name: &str) -> &Source {
        if !self.sources.contains_key(name) {
            tracing::debug!(source = name, "synthesizing source");
        }

        self.sources
            .entry(name.to_string())
            .or_insert_with(|| Source::synthesized(name))
    }

    /// Returns the named source without synthesizing.
    pub fn source(&self, name: &str) -> Result<&Source> {
        self.sources
            .get(name)
            .ok_or_else(|| Error::unknown_source(name))
    }

    /// Returns the source registered with the marker type `M`.
    pub fn source_for<M: 'static>(&self) -> Result<&Source> {
        self.sources
            .values()
            .find(|source| source.marker.is_some_and(|marker| marker.is::<M>()))
            .ok_or_else(|| Error::unknown_source(std::any::type_name::<M>()))
    }

    /// Merges ambient configuration into the registry. Declared sources pick
    /// up the configured values; undeclared ones are synthesized first.
    pub fn configure<'a>(&mut self, configs: impl IntoIterator<Item = &'a SourceConfig>) {
        for config in configs {
            let source = self
                .sources
                .entry(config.name.clone())
                .or_insert_with(|| Source::synthesized(&config.name));
            config.apply(source);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Sources sorted by ascending order, then registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        let mut sources: Vec<_> = self.sources.values().collect();
        // Stable, so equal orders keep registration order
        sources.sort_by_key(|source| source.order);
        sources.into_iter()
    }
}
