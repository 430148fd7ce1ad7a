use fxhash::FxHashMap;

use crate::network::NodeId;

/// Index from node names to nodes
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    map: FxHashMap<Box<str>, NodeId>,
}

impl NameMap {
    /// Register a name. Returns false if it is already taken
    pub fn reg_name(&mut self, name: &str, node: NodeId) -> bool {
        if self.map.contains_key(name) {
            return false;
        }
        self.map.insert(name.into(), node);
        true
    }

    /// Remove a name
    pub fn del_name(&mut self, name: &str) {
        self.map.remove(name);
    }

    /// Lookup a name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.map.get(name).copied()
    }

    /// Returns true if the name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no name is registered
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Remove every name
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
