use super::{Binding, Db, Shared};
use crate::Result;

use indexmap::IndexMap;
use serde::Deserialize;
use std::sync::Arc;
use weave_core::{
    driver::{Provider, SourceHandle},
    Error, Mapping, Schema, Source, SourceConfig, SourceManager,
};

/// Collects providers, sources and mappings, then connects everything into
/// a [`Db`].
#[derive(Debug)]
pub struct Builder {
    providers: IndexMap<String, Arc<dyn Provider>>,
    sources: SourceManager,
    schema: Schema,

    /// Applied on top of the declared sources when building
    configs: Vec<SourceConfig>,
}

/// Ambient configuration document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Config {
    #[serde(default)]
    sources: Vec<SourceConfig>,
}

impl Default for Builder {
    fn default() -> Self {
        #[allow(unused_mut)]
        let mut builder = Self {
            providers: IndexMap::new(),
            sources: SourceManager::new(),
            schema: Schema::new(),
            configs: vec![],
        };

        #[cfg(feature = "directory")]
        builder.provider(weave_driver_directory::Directory::new());

        #[cfg(feature = "sqlite")]
        builder.provider(weave_driver_sqlite::Sqlite::new());

        builder
    }
}

impl Builder {
    /// Registers a provider under its name, replacing any provider of the
    /// same name.
    pub fn provider(&mut self, provider: impl Provider) -> &mut Self {
        self.providers
            .insert(provider.name().to_string(), Arc::new(provider));
        self
    }

    pub fn register_source(&mut self, source: Source) -> Result<&mut Self> {
        self.sources.register(source)?;
        Ok(self)
    }

    pub fn mapping(&mut self, mapping: Mapping) -> &mut Self {
        self.schema.add(mapping);
        self
    }

    /// Adds ambient source configuration. Sources not declared in code are
    /// synthesized when the database is built.
    pub fn configure(&mut self, configs: impl IntoIterator<Item = SourceConfig>) -> &mut Self {
        self.configs.extend(configs);
        self
    }

    /// Parses a `{ "sources": [...] }` document and adds it as ambient
    /// configuration.
    pub fn configure_json(&mut self, json: &str) -> Result<&mut Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|err| Error::invalid_config(err.to_string()))?;
        Ok(self.configure(config.sources))
    }

    pub fn build(&self) -> Result<Db> {
        let mut sources = self.sources.clone();
        sources.configure(&self.configs);

        self.validate(&sources)?;

        let mut bindings: IndexMap<String, Vec<Binding>> = IndexMap::new();

        for source in sources.iter() {
            let mappings: Vec<_> = self
                .schema
                .iter()
                .filter(|mapping| mapping.applies_to(&source.name))
                .collect();

            if mappings.is_empty() {
                tracing::debug!(source = %source.name, "no mappings bound; not connecting");
                continue;
            }

            let provider = self.provider_for(source)?;
            let source = Arc::new(source.clone());
            let connection = provider.connect(&source).map_err(|err| {
                err.context(weave_core::err!("connecting to source `{}`", source.name))
            })?;
            let handle = SourceHandle::new(source.clone(), connection);

            for mapping in mappings {
                let winner = self.schema.resolve(&mapping.entity, &source.name)?;

                if !Arc::ptr_eq(winner, mapping) {
                    tracing::warn!(
                        entity = %mapping.entity,
                        source = %source.name,
                        table = %mapping.table_name,
                        "ignoring mapping; the entity is already mapped on this source"
                    );
                    continue;
                }

                let generator = mapping.add_to_provider(&**provider, &handle, &self.schema)?;
                let order = mapping.order_for(&source.name).unwrap_or(source.order);

                tracing::debug!(
                    entity = %mapping.entity,
                    source = %source.name,
                    provider = provider.name(),
                    order,
                    "bound mapping"
                );

                bindings
                    .entry(mapping.entity.clone())
                    .or_default()
                    .push(Binding {
                        source: source.clone(),
                        order,
                        capability: *provider.capability(),
                        generator,
                    });
            }
        }

        for entity in self.schema.entities() {
            match bindings.get_mut(entity) {
                // Stable, so equal orders keep source order
                Some(list) => list.sort_by_key(|binding| binding.order),
                None => {
                    return Err(Error::invalid_mapping(format!(
                        "`{entity}` is not bound to any source"
                    )))
                }
            }
        }

        Ok(Db {
            shared: Arc::new(Shared {
                sources,
                schema: self.schema.clone(),
                bindings,
            }),
        })
    }

    /// Declaration errors abort the build.
    fn validate(&self, sources: &SourceManager) -> Result<()> {
        for mapping in self.schema.iter() {
            for property in mapping.associations() {
                let Some(target) = property.target() else {
                    continue;
                };

                if !self.schema.contains(target) {
                    return Err(Error::invalid_mapping(format!(
                        "`{}::{}` targets `{target}`, which has no mapping",
                        mapping.entity, property.name
                    )));
                }
            }

            for binding in &mapping.sources {
                sources.source(&binding.source)?;
            }
        }

        Ok(())
    }

    fn provider_for(&self, source: &Source) -> Result<&Arc<dyn Provider>> {
        let name = source.provider_name()?;
        self.providers
            .get(&name)
            .ok_or_else(|| Error::unknown_provider(name))
    }
}
