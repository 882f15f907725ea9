//! [`Field`] implementations for foreign types, split by origin crate.
//!
//! Everything here is an opaque leaf except `Option<R>` and `Box<R>`
//! for record types `R`, which expose a one-level [`Expansion`].
//!
//! [`Field`]: crate::shape::Field
//! [`Expansion`]: crate::shape::Expansion

mod alloc;
mod core;
mod hashbrown;
mod std;

macro_rules! impl_leaf_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::shape::Field for $ty {
                #[inline]
                fn empty() -> Self {
                    <$ty as Default>::default()
                }
            }
        )*
    };
}

pub(crate) use impl_leaf_field;
