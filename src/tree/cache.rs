//! The process-wide bare-tree cache.

use core::any::TypeId;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use hashbrown::HashMap;

use crate::shape::Record;
use crate::tree::build;
use crate::tree::error::BuildError;
use crate::tree::node::Tree;

/// A cache of bare resolver trees, keyed by record type.
///
/// The first construction for a type builds and stores the bare tree;
/// later constructions clone the stored one. Entries are never evicted.
/// Concurrent first-time builds of the same type may both run; the last
/// insert wins, and since both results are structurally identical the
/// race is harmless.
///
/// [`Resolver::new`](crate::Resolver::new) uses the process-global
/// instance; tests can pass their own via
/// [`Resolver::with_cache`](crate::Resolver::with_cache).
#[derive(Default)]
pub struct TreeCache {
    trees: RwLock<HashMap<TypeId, Arc<Tree>>>,
}

impl TreeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-global cache.
    pub fn global() -> &'static TreeCache {
        static GLOBAL: LazyLock<TreeCache> = LazyLock::new(TreeCache::new);
        &GLOBAL
    }

    /// Returns the bare tree for `T`, building and storing it on first use.
    pub(crate) fn get_or_build<T: Record>(&self) -> Result<Arc<Tree>, BuildError> {
        let id = TypeId::of::<T>();
        {
            let trees = self.trees.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(tree) = trees.get(&id) {
                return Ok(tree.clone());
            }
        }

        // Built outside any lock; a concurrent builder of the same type
        // just produces an equivalent tree.
        let tree = Arc::new(build::build(T::shape())?);

        let mut trees = self.trees.write().unwrap_or_else(PoisonError::into_inner);
        if trees.insert(id, tree.clone()).is_some() {
            log::trace!(
                "resolver tree for `{}` was built concurrently; keeping the newest",
                T::shape().type_name()
            );
        }
        Ok(tree)
    }

    /// `true` if a bare tree for `T` is cached.
    pub fn contains<T: Record>(&self) -> bool {
        self.trees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    /// The number of cached trees.
    pub fn len(&self) -> usize {
        self.trees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Record;

    #[derive(Record)]
    struct Alpha {
        value: u32,
    }

    #[derive(Record)]
    struct Beta {
        name: String,
    }

    #[test]
    fn one_entry_per_type() {
        let cache = TreeCache::new();
        assert!(cache.is_empty());

        let first = cache.get_or_build::<Alpha>().unwrap();
        let second = cache.get_or_build::<Alpha>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains::<Alpha>());
        assert!(!cache.contains::<Beta>());

        cache.get_or_build::<Beta>().unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn concurrent_first_builds_converge() {
        let cache = TreeCache::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| cache.get_or_build::<Alpha>().unwrap());
            }
        });
        assert_eq!(cache.len(), 1);
        assert!(cache.contains::<Alpha>());
    }
}
