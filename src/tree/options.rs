//! Build-time configuration options.
//!
//! Options are applied to every node of a freshly cloned tree, depth-first
//! pre-order, in list order per node, strictly sequentially — a later
//! option observes state set by an earlier one. After all options ran the
//! tree is validated.

use std::sync::Arc;

use crate::context::Context;
use crate::directive::Directive;
use crate::namespace::{BoxError, Namespace};
use crate::tree::error::ConfigurationError;
use crate::tree::node::{NodeData, Tree};

// -----------------------------------------------------------------------------
// TreeOption

/// A per-node configuration step run once at construction time.
///
/// Use the built-ins [`with_namespace`] and [`seed_context`], or implement
/// the trait to attach custom state or amend directives.
pub trait TreeOption: Send + Sync {
    /// Applies this option to one node. An error aborts the whole
    /// construction.
    fn apply(&self, node: NodeMut<'_>) -> Result<(), BoxError>;
}

/// A mutable view of one node, as seen by a [`TreeOption`].
pub struct NodeMut<'a> {
    data: &'a mut NodeData,
}

impl NodeMut<'_> {
    /// `true` for the sentinel node representing the record itself.
    pub fn is_root(&self) -> bool {
        self.data.parent.is_none()
    }

    /// The full type name of the node's value.
    pub fn type_name(&self) -> &'static str {
        self.data.type_name
    }

    /// The field name, or `None` for the root.
    pub fn field_name(&self) -> Option<&'static str> {
        self.data.field.map(|f| f.name())
    }

    /// The field-name path from the root.
    pub fn path(&self) -> &[&'static str] {
        &self.data.path
    }

    /// The dot-joined path. Empty for the root.
    pub fn path_string(&self) -> String {
        self.data.path.join(".")
    }

    /// The node's directives, in declaration order.
    pub fn directives(&self) -> &[Directive] {
        &self.data.directives
    }

    /// Mutable access to the node's directives; options may amend them.
    pub fn directives_mut(&mut self) -> &mut Vec<Directive> {
        &mut self.data.directives
    }

    /// The node's context.
    pub fn context(&self) -> &Context {
        &self.data.context
    }

    /// Mutable access to the node's context.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.data.context
    }
}

// -----------------------------------------------------------------------------
// Built-in options

struct WithNamespace(Arc<Namespace>);

impl TreeOption for WithNamespace {
    fn apply(&self, mut node: NodeMut<'_>) -> Result<(), BoxError> {
        node.context_mut().bind_namespace(self.0.clone());
        Ok(())
    }
}

/// Binds the shared executor registry to every node.
///
/// Construction fails with
/// [`ConfigurationError::UnboundNamespace`] unless some option binds a
/// namespace to the root.
pub fn with_namespace(namespace: Arc<Namespace>) -> Box<dyn TreeOption> {
    Box::new(WithNamespace(namespace))
}

struct SeedContext<T>(T);

impl<T: Clone + Send + Sync + 'static> TreeOption for SeedContext<T> {
    fn apply(&self, mut node: NodeMut<'_>) -> Result<(), BoxError> {
        node.context_mut().insert(self.0.clone());
        Ok(())
    }
}

/// Stores a clone of `value` in every node's context, where executors can
/// read it via [`DirectiveRuntime::node`](crate::DirectiveRuntime::node).
pub fn seed_context<T: Clone + Send + Sync + 'static>(value: T) -> Box<dyn TreeOption> {
    Box::new(SeedContext(value))
}

// -----------------------------------------------------------------------------
// Application & validation

/// Applies `options` to every node. The arena is stored in pre-order, so
/// an indexed sweep is exactly the depth-first application the contract
/// asks for.
pub(crate) fn apply_options(
    tree: &mut Tree,
    options: &[Box<dyn TreeOption>],
) -> Result<(), ConfigurationError> {
    for data in tree.nodes.iter_mut() {
        for option in options {
            option
                .apply(NodeMut { data: &mut *data })
                .map_err(|source| ConfigurationError::OptionFailed {
                    path: data.path.join("."),
                    source,
                })?;
        }
    }
    Ok(())
}

/// Post-option validation: the root must have a namespace bound.
pub(crate) fn validate(tree: &Tree) -> Result<(), ConfigurationError> {
    if tree.root().context().namespace().is_none() {
        return Err(ConfigurationError::UnboundNamespace);
    }
    Ok(())
}
