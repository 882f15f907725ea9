use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::hash::BuildHasher;
use std::path::PathBuf;

use crate::impls::impl_leaf_field;
use crate::shape::Field;

impl_leaf_field!(PathBuf, OsString);

impl<K, V, S> Field for HashMap<K, V, S>
where
    K: Send + 'static,
    V: Send + 'static,
    S: BuildHasher + Default + Send + 'static,
{
    #[inline]
    fn empty() -> Self {
        HashMap::default()
    }
}

impl<T, S> Field for HashSet<T, S>
where
    T: Send + 'static,
    S: BuildHasher + Default + Send + 'static,
{
    #[inline]
    fn empty() -> Self {
        HashSet::default()
    }
}
