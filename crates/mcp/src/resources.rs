// Static MCP resources

use crate::protocol::{ResourceContents, ResourceSchema};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Version reported in `serverInfo` and by `config://version`.
pub const SERVER_VERSION: &str = "1.3.0";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "StockAnalysisServer";

/// A readable resource addressed by URI
pub trait Resource: Send + Sync {
    fn schema(&self) -> ResourceSchema;

    fn read(&self) -> Vec<ResourceContents>;
}

/// Resources keyed by URI
pub struct ResourceRegistry {
    resources: BTreeMap<String, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
    }

    /// Registry with the built-in server resources.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(VersionResource));
        registry
    }

    pub fn register(&mut self, resource: Arc<dyn Resource>) {
        let schema = resource.schema();
        self.resources.insert(schema.uri, resource);
    }

    pub fn list_schemas(&self) -> Vec<ResourceSchema> {
        self.resources.values().map(|r| r.schema()).collect()
    }

    /// Contents of the resource at `uri`, if one is registered.
    pub fn read(&self, uri: &str) -> Option<Vec<ResourceContents>> {
        self.resources.get(uri).map(|r| r.read())
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// `config://version`: the server version as plain text
pub struct VersionResource;

impl VersionResource {
    pub const URI: &'static str = "config://version";
}

impl Resource for VersionResource {
    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            uri: Self::URI.to_string(),
            name: "version".to_string(),
            description: Some("Server version".to_string()),
            mime_type: Some("text/plain".to_string()),
        }
    }

    fn read(&self) -> Vec<ResourceContents> {
        vec![ResourceContents {
            uri: Self::URI.to_string(),
            mime_type: Some("text/plain".to_string()),
            text: SERVER_VERSION.to_string(),
        }]
    }
}
