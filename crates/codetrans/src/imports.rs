//! Per-session set of referenced external types.

use crate::types::ClassType;
use indexmap::IndexSet;

/// Insertion-ordered, deduplicated set of referenced types.
///
/// Owned by a backend session; it accumulates across every render pass
/// driven through that session until [`ImportSet::clear`].
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    types: IndexSet<ClassType>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reference; returns true the first time `ty` is seen.
    pub fn insert(&mut self, ty: &ClassType) -> bool {
        if self.types.contains(ty) {
            return false;
        }
        self.types.insert(ty.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn clear(&mut self) {
        self.types.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse_in_first_seen_order() {
        let color = ClassType::enumeration("io.example.Color");
        let vertx = ClassType::api("io.vertx.core.Vertx");
        let mut imports = ImportSet::new();
        assert!(imports.insert(&color));
        assert!(imports.insert(&vertx));
        assert!(!imports.insert(&color));
        assert!(!imports.insert(&vertx));
        let names: Vec<_> = imports.iter().map(|t| t.simple_name.as_str()).collect();
        assert_eq!(names, vec!["Color", "Vertx"]);
    }
}
