//! # Node Registry
//!
//! Maps `id_name`s to node kinds. The registry is built explicitly at startup
//! (see `anim_std::standard_registry`) and queried to create nodes, compile
//! trees and fill node menus.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{NodeDeclaration, NodeKind};
use crate::error::GraphError;

#[derive(Clone, Default)]
pub struct NodeRegistry {
    kinds: BTreeMap<String, Arc<dyn NodeKind>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node kind under its declared `id_name`.
    ///
    /// Registering the same name twice replaces the earlier kind.
    pub fn register<K: NodeKind + 'static>(&mut self, kind: K) -> &mut Self {
        self.register_arc(Arc::new(kind))
    }

    pub fn register_arc(&mut self, kind: Arc<dyn NodeKind>) -> &mut Self {
        let id_name = kind.declaration().id_name;
        if self.kinds.insert(id_name.to_string(), kind).is_some() {
            warn!(id_name, "node kind registered twice, replacing");
        } else {
            debug!(id_name, "registered node kind");
        }
        self
    }

    pub fn get(&self, id_name: &str) -> Option<&Arc<dyn NodeKind>> {
        self.kinds.get(id_name)
    }

    /// Like [`get`](Self::get) but unknown kinds are an error.
    pub fn require(&self, id_name: &str) -> Result<Arc<dyn NodeKind>, GraphError> {
        self.kinds
            .get(id_name)
            .cloned()
            .ok_or_else(|| GraphError::UnknownKind(id_name.to_string()))
    }

    pub fn contains(&self, id_name: &str) -> bool {
        self.kinds.contains_key(id_name)
    }

    /// Declarations of all registered kinds, ordered by `id_name`.
    pub fn declarations(&self) -> Vec<NodeDeclaration> {
        self.kinds.values().map(|kind| kind.declaration()).collect()
    }

    /// Declarations in one category
    pub fn by_category(&self, category: &str) -> Vec<NodeDeclaration> {
        self.declarations()
            .into_iter()
            .filter(|decl| decl.category == category)
            .collect()
    }

    /// All unique categories
    pub fn categories(&self) -> Vec<&'static str> {
        let mut categories: Vec<_> = self
            .kinds
            .values()
            .map(|kind| kind.declaration().category)
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Case-insensitive substring search over labels and search tags.
    ///
    /// Kinds with `only_search_tags` are matched by their tags alone.
    pub fn search(&self, term: &str) -> Vec<NodeDeclaration> {
        let term = term.to_lowercase();
        self.declarations()
            .into_iter()
            .filter(|decl| {
                let label_hit = !decl.only_search_tags && decl.label.to_lowercase().contains(&term);
                label_hit
                    || decl
                        .search_tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("kinds", &self.kinds.keys().collect::<Vec<_>>())
            .finish()
    }
}
