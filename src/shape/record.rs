use crate::shape::{Expansion, Shape};

// -----------------------------------------------------------------------------
// Field

/// A type that can occupy a field slot in a record.
///
/// Implementations for std scalar and collection types live in
/// [`crate::impls`]; record types get theirs from
/// [`#[derive(Record)]`](crate::derive::Record). A custom leaf type only
/// needs [`empty`](Field::empty):
///
/// ```
/// use rigging::Field;
///
/// struct Port(u16);
///
/// impl Field for Port {
///     fn empty() -> Self {
///         Port(0)
///     }
/// }
/// ```
pub trait Field: Send + 'static {
    /// Returns a fresh zero value of this type.
    fn empty() -> Self
    where
        Self: Sized;

    /// The shape of this type when it is *directly* a record.
    ///
    /// `None` for leaves and for indirected records (`Option<R>`, `Box<R>`).
    fn record_shape() -> Option<&'static Shape>
    where
        Self: Sized,
    {
        None
    }

    /// The record expansion reachable through exactly one level of
    /// indirection.
    ///
    /// Overridden by `Option<R>` and `Box<R>` when `R` is directly a
    /// record; everything else, including doubly-indirected records,
    /// stays `None` and is treated as an opaque leaf.
    fn expansion() -> Option<Expansion>
    where
        Self: Sized,
    {
        None
    }
}

// -----------------------------------------------------------------------------
// Record

/// A structured type with a [`Shape`] descriptor table.
///
/// Normally implemented via [`#[derive(Record)]`](crate::derive::Record).
/// A manual implementation must also implement [`Field`] and return
/// `Some(Self::shape())` from [`Field::record_shape`] so the type expands
/// when used as a field.
pub trait Record: Field {
    /// The record's field-descriptor table. Built once, `'static`.
    fn shape() -> &'static Shape;
}
