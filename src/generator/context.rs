use crate::components::ComponentStore;
use crate::config::ServerConfig;
use crate::resources::ResourceContainer;
use crate::source::{JsonApiServer, SchemaRegistry};

/// State shared by every builder during one generation run.
///
/// Owns the run's [`ComponentStore`] and [`ResourceContainer`]; the server
/// and configuration are borrowed read-only.
pub struct GenerationContext<'a> {
    pub server: &'a dyn JsonApiServer,
    pub config: &'a ServerConfig,
    pub components: ComponentStore,
    pub resources: ResourceContainer<'a>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(server: &'a dyn JsonApiServer, config: &'a ServerConfig) -> Self {
        GenerationContext {
            server,
            config,
            components: ComponentStore::new(),
            resources: ResourceContainer::new(server),
        }
    }

    /// The server's schema registry, borrowed independently of `self`.
    pub fn schemas(&self) -> &'a SchemaRegistry {
        self.server.schemas()
    }

    /// Base URL without a trailing `/`.
    pub fn base_url(&self) -> &'a str {
        self.server.base_url().trim_end_matches('/')
    }
}
