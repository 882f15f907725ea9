use ::core::time::Duration;

use crate::impls::impl_leaf_field;
use crate::shape::{AccessError, Expansion, Field};

impl_leaf_field!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
);

impl Field for &'static str {
    #[inline]
    fn empty() -> Self {
        ""
    }
}

impl<T: Field> Field for Option<T> {
    #[inline]
    fn empty() -> Self {
        None
    }

    /// `Option<R>` expands when `R` is directly a record; the assembled
    /// record is attached as `Some(inner)`. `Option<Option<R>>` and
    /// `Option<Box<R>>` stay opaque (one level of indirection only).
    fn expansion() -> Option<Expansion> {
        T::record_shape().map(|shape| Expansion {
            shape,
            new_inner: || Box::new(T::empty()),
            attach: |outer, inner| {
                let slot = outer
                    .downcast_mut::<Option<T>>()
                    .ok_or_else(AccessError::mismatch::<Option<T>>)?;
                let inner = inner
                    .downcast::<T>()
                    .map_err(|_| AccessError::mismatch::<T>())?;
                *slot = Some(*inner);
                Ok(())
            },
        })
    }
}

impl<T: Field, E: Send + 'static> Field for Result<T, E> {
    #[inline]
    fn empty() -> Self {
        Ok(T::empty())
    }
}

impl Field for Duration {
    #[inline]
    fn empty() -> Self {
        Self::default()
    }
}
