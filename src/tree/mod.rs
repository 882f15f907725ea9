//! The resolver tree: building, caching, cloning, configuring, navigating.

mod build;
mod cache;
mod error;
mod node;
mod options;

pub use cache::TreeCache;
pub use error::{BuildError, BuildErrorKind, ConfigurationError, NewError};
pub use node::Node;
pub use options::{NodeMut, TreeOption, seed_context, with_namespace};

pub(crate) use node::{Assembly, Tree};

use core::fmt;

use crate::shape::Record;

// -----------------------------------------------------------------------------
// Resolver

/// A configured resolver tree for one record type.
///
/// Construction builds (or fetches from the cache) the bare tree for the
/// type, clones it into a private instance, applies the given options to
/// every node, and validates the result. The resolver is then immutable;
/// [`resolve`](Resolver::resolve) may be called any number of times, from
/// any number of threads.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use rigging::derive::Record;
/// use rigging::{Namespace, Resolver, with_namespace};
///
/// #[derive(Record)]
/// struct Login {
///     #[rig("required")]
///     user: String,
///     #[rig("required; secret")]
///     password: String,
/// }
///
/// let ns = Arc::new(Namespace::new());
/// let resolver = Resolver::new::<Login>([with_namespace(ns)])?;
///
/// let password = resolver.lookup("password").unwrap();
/// assert!(password.directive("secret").is_some());
/// # Ok::<(), rigging::NewError>(())
/// ```
pub struct Resolver {
    pub(crate) tree: Tree,
}

impl Resolver {
    /// Creates a resolver for `T` using the process-global tree cache.
    ///
    /// `options` are applied to every node in list order; at least a
    /// namespace binding ([`with_namespace`]) is required.
    pub fn new<T: Record>(
        options: impl IntoIterator<Item = Box<dyn TreeOption>>,
    ) -> Result<Self, NewError> {
        Self::with_cache::<T>(TreeCache::global(), options)
    }

    /// Creates a resolver for `T` using an explicit tree cache.
    pub fn with_cache<T: Record>(
        cache: &TreeCache,
        options: impl IntoIterator<Item = Box<dyn TreeOption>>,
    ) -> Result<Self, NewError> {
        let bare = cache.get_or_build::<T>()?;
        let mut tree = bare.bare_clone();

        let options: Vec<_> = options.into_iter().collect();
        options::apply_options(&mut tree, &options)?;
        options::validate(&tree)?;

        Ok(Self { tree })
    }

    /// The root node, representing the record itself.
    pub fn root(&self) -> Node<'_> {
        self.tree.root()
    }

    /// Finds a node by dotted field path, e.g. `"pagination.page"`.
    pub fn lookup(&self, path: &str) -> Option<Node<'_>> {
        self.root().lookup(path)
    }

    /// Depth-first pre-order traversal of the whole tree.
    pub fn iterate<E, F>(&self, visitor: &mut F) -> Result<(), E>
    where
        F: for<'a> FnMut(Node<'a>) -> Result<(), E>,
    {
        self.root().iterate(visitor)
    }

    /// See [`Node::debug_layout_text`].
    pub fn debug_layout_text(&self) -> String {
        self.root().debug_layout_text()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("record", &self.root().type_name())
            .field("nodes", &self.tree.nodes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::derive::Record;
    use crate::namespace::Namespace;

    #[derive(Record)]
    struct Window {
        #[rig("clamp=1,120")]
        seconds: u32,
    }

    #[test]
    fn construction_reuses_the_cached_bare_tree() {
        let cache = TreeCache::new();
        let ns = Arc::new(Namespace::new());

        let first =
            Resolver::with_cache::<Window>(&cache, [with_namespace(ns.clone())]).unwrap();
        let second = Resolver::with_cache::<Window>(&cache, [with_namespace(ns)]).unwrap();
        assert_eq!(cache.len(), 1);

        let d = first.lookup("seconds").unwrap();
        assert_eq!(d.directive("clamp").unwrap().argv, vec!["1", "120"]);
        assert!(second.lookup("seconds").is_some());

        let rendered = format!("{first:?}");
        assert!(rendered.contains("Resolver"));
        assert!(rendered.contains(core::any::type_name::<Window>()));
    }

    #[test]
    fn instances_share_no_mutable_state() {
        #[derive(Clone, PartialEq, Debug)]
        struct Label(&'static str);

        let cache = TreeCache::new();
        let ns = Arc::new(Namespace::new());

        let tagged = Resolver::with_cache::<Window>(
            &cache,
            [with_namespace(ns.clone()), seed_context(Label("a"))],
        )
        .unwrap();
        let plain = Resolver::with_cache::<Window>(&cache, [with_namespace(ns)]).unwrap();

        assert_eq!(tagged.root().context().get::<Label>(), Some(&Label("a")));
        assert!(plain.root().context().get::<Label>().is_none());
    }
}
