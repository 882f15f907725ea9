use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::impls::impl_leaf_field;
use crate::shape::{AccessError, Expansion, Field};

impl_leaf_field!(String);

impl<T: Field> Field for Box<T> {
    #[inline]
    fn empty() -> Self {
        Box::new(T::empty())
    }

    /// `Box<R>` expands when `R` is directly a record; the assembled
    /// record replaces the boxed zero value. `Box<Box<R>>` and
    /// `Box<Option<R>>` stay opaque.
    fn expansion() -> Option<Expansion> {
        T::record_shape().map(|shape| Expansion {
            shape,
            new_inner: || Box::new(T::empty()),
            attach: |outer, inner| {
                let slot = outer
                    .downcast_mut::<Box<T>>()
                    .ok_or_else(AccessError::mismatch::<Box<T>>)?;
                let inner = inner
                    .downcast::<T>()
                    .map_err(|_| AccessError::mismatch::<T>())?;
                *slot = inner;
                Ok(())
            },
        })
    }
}

// Sequences and mappings are opaque leaves, record element or not.

impl<T: Send + 'static> Field for Vec<T> {
    #[inline]
    fn empty() -> Self {
        Vec::new()
    }
}

impl<T: Send + 'static> Field for VecDeque<T> {
    #[inline]
    fn empty() -> Self {
        VecDeque::new()
    }
}

impl<K: Send + 'static, V: Send + 'static> Field for BTreeMap<K, V> {
    #[inline]
    fn empty() -> Self {
        BTreeMap::new()
    }
}

impl<T: Send + 'static> Field for BTreeSet<T> {
    #[inline]
    fn empty() -> Self {
        BTreeSet::new()
    }
}
