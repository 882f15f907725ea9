use core::any::Any;

use crate::context::Context;
use crate::directive::Directive;
use crate::shape::AccessError;
use crate::tree::Node;

/// Everything an [`Executor`](crate::Executor) sees while running one
/// directive: the directive itself, the owning node, the per-call context,
/// and the value slot to inspect or populate.
pub struct DirectiveRuntime<'a> {
    pub(crate) directive: &'a Directive,
    pub(crate) node: Node<'a>,
    pub(crate) context: &'a Context,
    pub(crate) value: &'a mut (dyn Any + Send),
}

impl<'a> DirectiveRuntime<'a> {
    /// The directive being executed, including its raw arguments.
    #[inline]
    pub fn directive(&self) -> &'a Directive {
        self.directive
    }

    /// The node the directive is attached to. Gives access to the field's
    /// path, type, and the per-node context set by build options.
    #[inline]
    pub fn node(&self) -> Node<'a> {
        self.node
    }

    /// The per-call context built by resolve options.
    #[inline]
    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// The raw value slot.
    #[inline]
    pub fn value(&mut self) -> &mut (dyn Any + Send) {
        self.value
    }

    /// The value slot, downcast to `T`.
    pub fn value_ref<T: 'static>(&self) -> Result<&T, AccessError> {
        self.value
            .downcast_ref::<T>()
            .ok_or_else(AccessError::mismatch::<T>)
    }

    /// The value slot, downcast to `T` mutably.
    pub fn value_mut<T: 'static>(&mut self) -> Result<&mut T, AccessError> {
        self.value
            .downcast_mut::<T>()
            .ok_or_else(AccessError::mismatch::<T>)
    }

    /// Replaces the slot's value with `value`.
    pub fn set_value<T: Send + 'static>(&mut self, value: T) -> Result<(), AccessError> {
        *self.value_mut()? = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::derive::Record;
    use crate::{Namespace, Resolver, with_namespace};

    #[derive(Record)]
    struct Probe {
        #[rig("probe=arg")]
        value: String,
    }

    #[test]
    fn runtime_exposes_directive_node_and_slot() {
        let mut ns = Namespace::new();
        ns.register(
            "probe",
            |rt: &mut DirectiveRuntime<'_>| -> Result<(), crate::BoxError> {
                assert_eq!(rt.directive().name, "probe");
                assert_eq!(rt.directive().argv, vec!["arg"]);
                assert_eq!(rt.node().path_string(), "value");

                assert_eq!(rt.value_ref::<String>()?, "");
                assert!(rt.value_ref::<u32>().is_err());
                rt.set_value("filled".to_owned())?;
                Ok(())
            },
        )
        .unwrap();

        let resolver = Resolver::new::<Probe>([with_namespace(Arc::new(ns))]).unwrap();
        let probe = resolver.resolve_into::<Probe>().unwrap();
        assert_eq!(probe.value, "filled");
    }
}
