use std::hash::BuildHasher;

use crate::shape::Field;

impl<K, V, S> Field for hashbrown::HashMap<K, V, S>
where
    K: Send + 'static,
    V: Send + 'static,
    S: BuildHasher + Default + Send + 'static,
{
    #[inline]
    fn empty() -> Self {
        hashbrown::HashMap::default()
    }
}

impl<T, S> Field for hashbrown::HashSet<T, S>
where
    T: Send + 'static,
    S: BuildHasher + Default + Send + 'static,
{
    #[inline]
    fn empty() -> Self {
        hashbrown::HashSet::default()
    }
}
