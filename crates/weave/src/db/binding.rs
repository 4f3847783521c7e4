use weave_core::{
    driver::{Capability, Generator},
    Mapping, Source,
};

use std::sync::Arc;

/// One entity's generator on one source.
#[derive(Debug)]
pub struct Binding {
    pub(crate) source: Arc<Source>,

    /// Effective order: the mapping's override, else the source's order
    pub(crate) order: i32,

    pub(crate) capability: Capability,

    pub(crate) generator: Box<dyn Generator>,
}

impl Binding {
    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn source_name(&self) -> &str {
        &self.source.name
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    /// What the source's provider supports.
    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    pub fn mapping(&self) -> &Arc<Mapping> {
        self.generator.mapping()
    }

    pub fn generator(&self) -> &dyn Generator {
        &*self.generator
    }
}
