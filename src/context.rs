//! Per-node and per-resolve state.

use core::any::{Any, TypeId};
use std::sync::Arc;

use hashbrown::HashMap;

use crate::namespace::Namespace;

/// State attached to a resolver node by build options, or threaded through
/// one resolve pass by resolve options.
///
/// The [`Namespace`] binding is an explicit slot; everything else lives in a
/// `TypeId`-keyed map, one value per type.
///
/// # Examples
///
/// ```
/// use rigging::Context;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Tenant(String);
///
/// let mut ctx = Context::new();
/// ctx.insert(Tenant("acme".into()));
/// assert_eq!(ctx.get::<Tenant>(), Some(&Tenant("acme".into())));
/// assert!(ctx.get::<u32>().is_none());
/// ```
#[derive(Default)]
pub struct Context {
    namespace: Option<Arc<Namespace>>,
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Context {
    /// Creates an empty context with no namespace bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound executor registry, if any.
    #[inline]
    pub fn namespace(&self) -> Option<&Arc<Namespace>> {
        self.namespace.as_ref()
    }

    /// Binds the executor registry. Replaces any previous binding.
    #[inline]
    pub fn bind_namespace(&mut self, namespace: Arc<Namespace>) {
        self.namespace = Some(namespace);
    }

    /// Stores `value`, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Returns the stored value of type `T`, if any.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Returns the stored value of type `T` mutably, if any.
    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Removes and returns the stored value of type `T`, if any.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }

    /// `true` when no namespace is bound and no values are stored.
    pub fn is_empty(&self) -> bool {
        self.namespace.is_none() && self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_values_round_trip() {
        let mut ctx = Context::new();
        assert!(ctx.is_empty());

        ctx.insert(7_u32);
        ctx.insert("tag");
        assert_eq!(ctx.get::<u32>(), Some(&7));
        assert_eq!(ctx.get::<&str>(), Some(&"tag"));

        *ctx.get_mut::<u32>().unwrap() = 8;
        assert_eq!(ctx.remove::<u32>(), Some(8));
        assert!(ctx.get::<u32>().is_none());
    }

    #[test]
    fn insert_replaces_same_type() {
        let mut ctx = Context::new();
        ctx.insert(1_i64);
        ctx.insert(2_i64);
        assert_eq!(ctx.get::<i64>(), Some(&2));
    }

    #[test]
    fn namespace_slot() {
        let mut ctx = Context::new();
        assert!(ctx.namespace().is_none());
        ctx.bind_namespace(Arc::new(Namespace::new()));
        assert!(ctx.namespace().is_some());
        assert!(!ctx.is_empty());
    }
}
