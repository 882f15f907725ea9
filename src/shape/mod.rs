//! Compile-time record descriptors.
//!
//! A [`Shape`] is the `'static` field-descriptor table of one record type:
//! per visible field a [`FieldShape`] carrying the field name, type, raw tag
//! string, declaration ordinal, and fn-pointer hooks for allocating and
//! assigning values without runtime reflection. Shapes are normally emitted
//! by [`#[derive(Record)]`](crate::derive::Record) and consumed by the tree
//! builder; they are never mutated after creation.

use core::any::{Any, TypeId};

use thiserror::Error;

mod field;
mod record;

pub use field::{AssignFn, Expansion, FieldShape};
pub use record::{Field, Record};

/// Allocates a fresh zero value for one field or record type.
pub type NewValueFn = fn() -> Box<dyn Any + Send>;

// -----------------------------------------------------------------------------
// Shape

/// The `'static` descriptor table of a record type.
///
/// # Examples
///
/// ```
/// use rigging::derive::Record;
/// use rigging::Record as _;
///
/// #[derive(Record)]
/// struct User {
///     #[rig("required")]
///     name: String,
///     age: u32,
/// }
///
/// let shape = User::shape();
/// assert_eq!(shape.name(), "User");
/// assert_eq!(shape.field_len(), 2);
/// assert_eq!(shape.field("name").unwrap().tag(), "required");
/// assert_eq!(shape.field_at(1).unwrap().name(), "age");
/// ```
pub struct Shape {
    name: &'static str,
    type_name: &'static str,
    ty_id: TypeId,
    new_value: NewValueFn,
    fields: Box<[FieldShape]>,
}

impl Shape {
    /// Creates the shape for record type `T` from its visible fields,
    /// in declaration order.
    pub fn of<T: Field>(name: &'static str, fields: Vec<FieldShape>) -> Self {
        Self {
            name,
            type_name: core::any::type_name::<T>(),
            ty_id: TypeId::of::<T>(),
            new_value: || Box::new(T::empty()),
            fields: fields.into_boxed_slice(),
        }
    }

    /// The record's type identifier (its ident, without module path).
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The record's full type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The record's `TypeId`.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// The visible fields, in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    /// Returns the field descriptor named `name`, if present.
    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the `index`-th visible field descriptor, if present.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldShape> {
        self.fields.get(index)
    }

    /// The number of visible fields.
    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Allocates a fresh zero value of the record type.
    #[inline]
    pub fn new_value(&self) -> Box<dyn Any + Send> {
        (self.new_value)()
    }

    #[inline]
    pub(crate) fn new_value_fn(&self) -> NewValueFn {
        self.new_value
    }
}

// -----------------------------------------------------------------------------
// AccessError

/// A type mismatch while moving a value through a type-erased slot.
///
/// Descriptor tables are generated, so under normal use this error is
/// unreachable; it can surface when a hand-written [`Field`] impl or
/// executor downcasts to the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value slot type mismatch: expected `{expected}`")]
pub struct AccessError {
    expected: &'static str,
}

impl AccessError {
    /// The error for a slot that did not hold a `T`.
    pub fn mismatch<T: 'static>() -> Self {
        Self {
            expected: core::any::type_name::<T>(),
        }
    }

    /// The full type name the access expected.
    #[inline]
    pub fn expected(&self) -> &'static str {
        self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign_noop(
        _parent: &mut (dyn Any + Send),
        _value: Box<dyn Any + Send>,
    ) -> Result<(), AccessError> {
        Ok(())
    }

    #[derive(Default)]
    struct Bare {
        _id: u64,
    }

    impl Field for Bare {
        fn empty() -> Self {
            Self::default()
        }
    }

    #[test]
    fn shape_accessors() {
        let shape = Shape::of::<Bare>(
            "Bare",
            vec![FieldShape::of::<u64>("id", "required", 0, assign_noop)],
        );

        assert_eq!(shape.name(), "Bare");
        assert_eq!(shape.ty_id(), TypeId::of::<Bare>());
        assert_eq!(shape.field_len(), 1);
        assert!(shape.field("id").is_some());
        assert!(shape.field("missing").is_none());
        assert!(shape.field_at(1).is_none());
        assert!(shape.new_value().downcast::<Bare>().is_ok());
    }

    #[test]
    fn access_error_names_expected_type() {
        let err = AccessError::mismatch::<u64>();
        assert_eq!(err.expected(), "u64");
        assert_eq!(err.to_string(), "value slot type mismatch: expected `u64`");
    }
}
