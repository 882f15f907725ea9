//! The resolve engine: depth-first directive execution with post-order
//! value assembly.

use core::any::Any;

use crate::context::Context;
use crate::namespace::BoxError;
use crate::shape::{AccessError, Record};
use crate::tree::{Assembly, Node, Resolver};

mod error;
mod runtime;

pub use error::{DirectiveExecutionError, ResolveError};
pub use runtime::DirectiveRuntime;

// -----------------------------------------------------------------------------
// ResolveOption

/// A per-call context transformation, applied sequentially before the
/// traversal starts (not per node).
pub trait ResolveOption: Send + Sync {
    /// Transforms the context for this resolution pass.
    fn apply(&self, context: &mut Context);
}

struct WithValue<T>(T);

impl<T: Clone + Send + Sync + 'static> ResolveOption for WithValue<T> {
    fn apply(&self, context: &mut Context) {
        context.insert(self.0.clone());
    }
}

/// Stores a clone of `value` in the per-call context, where executors can
/// read it via [`DirectiveRuntime::context`].
pub fn with_value<T: Clone + Send + Sync + 'static>(value: T) -> Box<dyn ResolveOption> {
    Box::new(WithValue(value))
}

// -----------------------------------------------------------------------------
// Entry points

impl Resolver {
    /// Resolves the whole tree, returning the assembled value type-erased.
    ///
    /// Prefer [`resolve_into`](Resolver::resolve_into) at the root; this
    /// form exists for callers that hold the record type only indirectly.
    pub fn resolve(&self) -> Result<Box<dyn Any + Send>, ResolveError> {
        self.root().resolve()
    }

    /// [`resolve`](Resolver::resolve) with resolve options.
    pub fn resolve_with(
        &self,
        options: impl IntoIterator<Item = Box<dyn ResolveOption>>,
    ) -> Result<Box<dyn Any + Send>, ResolveError> {
        self.root().resolve_with(options)
    }

    /// Resolves the whole tree into a `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use rigging::derive::Record;
    /// use rigging::{Namespace, Resolver, with_namespace};
    ///
    /// #[derive(Record)]
    /// struct Empty {
    ///     note: String,
    ///     count: u64,
    /// }
    ///
    /// let ns = Arc::new(Namespace::new());
    /// let resolver = Resolver::new::<Empty>([with_namespace(ns)])?;
    ///
    /// // No directives anywhere: resolution yields the zero value.
    /// let value = resolver.resolve_into::<Empty>()?;
    /// assert_eq!(value.note, "");
    /// assert_eq!(value.count, 0);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn resolve_into<T: Record>(&self) -> Result<T, ResolveError> {
        self.resolve_into_with(core::iter::empty())
    }

    /// [`resolve_into`](Resolver::resolve_into) with resolve options.
    pub fn resolve_into_with<T: Record>(
        &self,
        options: impl IntoIterator<Item = Box<dyn ResolveOption>>,
    ) -> Result<T, ResolveError> {
        let value = self.root().resolve_with(options)?;
        value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| ResolveError::Value(AccessError::mismatch::<T>()))
    }
}

impl Node<'_> {
    /// Resolves this subtree with an empty per-call context.
    pub fn resolve(&self) -> Result<Box<dyn Any + Send>, ResolveError> {
        self.resolve_with(core::iter::empty())
    }

    /// Resolves this subtree.
    ///
    /// Depth-first: the node's directives run first, in declared order,
    /// against a freshly allocated zero value; then each child resolves
    /// and its value is written into the assembly target. The first
    /// failure anywhere aborts the pass — remaining directives and
    /// siblings never run.
    pub fn resolve_with(
        &self,
        options: impl IntoIterator<Item = Box<dyn ResolveOption>>,
    ) -> Result<Box<dyn Any + Send>, ResolveError> {
        let mut context = Context::new();
        for option in options {
            option.apply(&mut context);
        }
        resolve_node(*self, &context)
    }
}

// -----------------------------------------------------------------------------
// Engine

fn resolve_node(node: Node<'_>, context: &Context) -> Result<Box<dyn Any + Send>, ResolveError> {
    let data = node.data();
    let mut value = (data.new_value)();

    run_directives(node, context, value.as_mut())?;

    match data.assembly {
        Assembly::Leaf => {}
        Assembly::Direct(_) => {
            resolve_children(node, context, value.as_mut())?;
        }
        Assembly::Indirect(expansion) => {
            // One level of indirection: assemble into the underlying
            // record, then attach it to the outer value.
            let mut inner = (expansion.new_inner)();
            resolve_children(node, context, inner.as_mut())?;
            (expansion.attach)(value.as_mut(), inner)?;
        }
    }

    Ok(value)
}

fn resolve_children(
    node: Node<'_>,
    context: &Context,
    target: &mut (dyn Any + Send),
) -> Result<(), ResolveError> {
    for child in node.children() {
        let value =
            resolve_node(child, context).map_err(|err| ResolveError::field(child, err))?;
        if let Some(field) = child.field() {
            field.assign(&mut *target, value)?;
        }
    }
    Ok(())
}

fn run_directives(
    node: Node<'_>,
    context: &Context,
    value: &mut (dyn Any + Send),
) -> Result<(), ResolveError> {
    let data = node.data();
    if data.directives.is_empty() {
        return Ok(());
    }

    let namespace = data.context.namespace();
    for directive in &data.directives {
        let executor = namespace
            .and_then(|ns| ns.lookup_executor(&directive.name))
            .ok_or_else(|| DirectiveExecutionError::MissingExecutor {
                directive: directive.name.clone(),
            })?;

        let mut runtime = DirectiveRuntime {
            directive,
            node,
            context,
            value: &mut *value,
        };
        executor
            .execute(&mut runtime)
            .map_err(|source| map_execution_error(&directive.name, source))?;
    }
    Ok(())
}

fn map_execution_error(directive: &str, source: BoxError) -> DirectiveExecutionError {
    DirectiveExecutionError::Failed {
        directive: directive.to_owned(),
        source,
    }
}
