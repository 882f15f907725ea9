use core::any::{Any, TypeId};

use crate::shape::{AccessError, Field, NewValueFn, Shape};

// -----------------------------------------------------------------------------
// FieldShape

/// Writes an already-resolved child value into its declaring record.
///
/// Generated per field by `#[derive(Record)]`; the engine calls it during
/// post-order assembly.
pub type AssignFn = fn(&mut (dyn Any + Send), Box<dyn Any + Send>) -> Result<(), AccessError>;

/// The descriptor of one visible record field.
///
/// Type-dependent behavior (zero-value allocation, record detection,
/// indirection expansion) is captured as fn pointers at construction, so a
/// `FieldShape` stays a plain `'static` datum.
pub struct FieldShape {
    name: &'static str,
    type_name: &'static str,
    ty_id: TypeId,
    tag: &'static str,
    index: usize,
    record_shape: fn() -> Option<&'static Shape>,
    expansion: fn() -> Option<Expansion>,
    new_value: NewValueFn,
    assign: AssignFn,
}

impl FieldShape {
    /// Creates the descriptor for a field of type `T`.
    ///
    /// `index` is the field's ordinal position in the declaring record
    /// (counting skipped fields); `tag` is the raw, unparsed tag string.
    pub fn of<T: Field>(
        name: &'static str,
        tag: &'static str,
        index: usize,
        assign: AssignFn,
    ) -> Self {
        Self {
            name,
            type_name: core::any::type_name::<T>(),
            ty_id: TypeId::of::<T>(),
            tag,
            index,
            record_shape: T::record_shape,
            expansion: T::expansion,
            new_value: || Box::new(T::empty()),
            assign,
        }
    }

    /// The field name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The field's full type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The field type's `TypeId`.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// The raw tag string, exactly as written in the source.
    #[inline]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// The field's ordinal position in the declaring record.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The shape of the field type, when it is *directly* a record.
    #[inline]
    pub fn record_shape(&self) -> Option<&'static Shape> {
        (self.record_shape)()
    }

    /// The record expansion reachable through one level of indirection.
    #[inline]
    pub fn expansion(&self) -> Option<Expansion> {
        (self.expansion)()
    }

    /// Allocates a fresh zero value of the field type.
    #[inline]
    pub fn new_value(&self) -> Box<dyn Any + Send> {
        (self.new_value)()
    }

    /// Writes `value` into `parent` at this field.
    #[inline]
    pub fn assign(
        &self,
        parent: &mut (dyn Any + Send),
        value: Box<dyn Any + Send>,
    ) -> Result<(), AccessError> {
        (self.assign)(parent, value)
    }

    #[inline]
    pub(crate) fn new_value_fn(&self) -> NewValueFn {
        self.new_value
    }
}

// -----------------------------------------------------------------------------
// Expansion

/// A record type reachable through exactly one level of indirection
/// (`Option<R>`, `Box<R>`).
///
/// During resolution the engine allocates the underlying record with
/// [`new_inner`], assembles child values into it, then [`attach`]es it to
/// the outer field value (`Some(inner)`, a fresh box, ...).
///
/// [`new_inner`]: Expansion::new_inner
/// [`attach`]: Expansion::attach
#[derive(Clone, Copy)]
pub struct Expansion {
    /// The underlying record's shape.
    pub shape: &'static Shape,
    /// Allocates a zero value of the underlying record type.
    pub new_inner: NewValueFn,
    /// Attaches the assembled record to the outer field value.
    pub attach: AssignFn,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, PartialEq, Debug)]
    struct Point {
        x: i32,
    }

    impl Field for Point {
        fn empty() -> Self {
            Self::default()
        }
    }

    fn assign_x(
        parent: &mut (dyn Any + Send),
        value: Box<dyn Any + Send>,
    ) -> Result<(), AccessError> {
        let parent = parent
            .downcast_mut::<Point>()
            .ok_or_else(AccessError::mismatch::<Point>)?;
        let value = value
            .downcast::<i32>()
            .map_err(|_| AccessError::mismatch::<i32>())?;
        parent.x = *value;
        Ok(())
    }

    #[test]
    fn field_shape_metadata() {
        let fs = FieldShape::of::<i32>("x", "default=3", 0, assign_x);
        assert_eq!(fs.name(), "x");
        assert_eq!(fs.tag(), "default=3");
        assert_eq!(fs.index(), 0);
        assert_eq!(fs.ty_id(), TypeId::of::<i32>());
        assert_eq!(fs.type_name(), "i32");
        // A scalar field is an opaque leaf.
        assert!(fs.record_shape().is_none());
        assert!(fs.expansion().is_none());
    }

    #[test]
    fn assign_writes_through_the_slot() {
        let fs = FieldShape::of::<i32>("x", "", 0, assign_x);
        let mut point = Point::empty();
        fs.assign(&mut point, Box::new(7_i32)).unwrap();
        assert_eq!(point, Point { x: 7 });
    }

    #[test]
    fn assign_rejects_a_foreign_value() {
        let fs = FieldShape::of::<i32>("x", "", 0, assign_x);
        let mut point = Point::empty();
        let err = fs.assign(&mut point, Box::new("seven")).unwrap_err();
        assert_eq!(err, AccessError::mismatch::<i32>());
    }
}
