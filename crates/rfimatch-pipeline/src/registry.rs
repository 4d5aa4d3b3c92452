use rfimatch_core::error::{Result, RfiMatchError};
use rfimatch_core::ports::ArchiveSource;
use std::collections::HashMap;
use std::sync::Arc;

/// Observatory name to archive source lookup table
#[derive(Clone, Default)]
pub struct ArchiveRegistry {
    sources: HashMap<String, Arc<dyn ArchiveSource>>,
}

impl ArchiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under its own name, replacing any previous one
    pub fn register(&mut self, source: Arc<dyn ArchiveSource>) {
        self.sources.insert(source.name().to_string(), source);
    }

    pub fn with_source(mut self, source: Arc<dyn ArchiveSource>) -> Self {
        self.register(source);
        self
    }

    pub fn get(&self, observatory: &str) -> Result<Arc<dyn ArchiveSource>> {
        self.sources
            .get(observatory)
            .cloned()
            .ok_or_else(|| RfiMatchError::UnknownArchive { name: observatory.to_string() })
    }

    pub fn contains(&self, observatory: &str) -> bool {
        self.sources.contains_key(observatory)
    }

    /// Registered observatory names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ArchiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveRegistry").field("sources", &self.names()).finish()
    }
}
