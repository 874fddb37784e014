use std::collections::HashMap;

use anyhow::{bail, Result};
use skywatch_engine::EntityId;

/// Where a body lives: its scene entity and its index in the body list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef {
    pub entity: EntityId,
    pub body: usize,
}

/// Flat body id -> scene node map. Built once per scene; entries are never
/// removed while the scene lives.
#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    nodes: HashMap<String, NodeRef>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body. Ids are unique; a second insert of the same id fails
    /// and leaves the first entry in place.
    pub fn insert(&mut self, id: &str, node: NodeRef) -> Result<()> {
        if self.nodes.contains_key(id) {
            bail!("duplicate body id {id:?}");
        }
        self.nodes.insert(id.to_string(), node);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<NodeRef> {
        self.nodes.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeRef)> {
        self.nodes.iter().map(|(id, node)| (id.as_str(), *node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = ObjectRegistry::new();
        let first = NodeRef { entity: EntityId(1), body: 0 };
        registry.insert("earth", first).unwrap();
        assert!(registry
            .insert("earth", NodeRef { entity: EntityId(2), body: 1 })
            .is_err());
        assert_eq!(registry.get("earth"), Some(first));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("mars").is_none());
    }
}
