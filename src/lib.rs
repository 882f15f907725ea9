#![doc = include_str!("../README.md")]

// `#[derive(Record)]` emits `rigging::` paths; this alias lets the crate's
// own tests and doctests use the derive too.
extern crate self as rigging;

// -----------------------------------------------------------------------------
// Modules

mod impls;

pub mod context;
pub mod directive;
pub mod namespace;
pub mod resolve;
pub mod shape;
pub mod tree;

// -----------------------------------------------------------------------------
// Top-level exports

pub use context::Context;
pub use directive::Directive;
pub use namespace::{BoxError, Executor, Namespace};
pub use resolve::{
    DirectiveExecutionError, DirectiveRuntime, ResolveError, ResolveOption, with_value,
};
pub use shape::{AccessError, Field, Record, Shape};
pub use tree::{
    BuildError, ConfigurationError, NewError, Node, NodeMut, Resolver, TreeCache, TreeOption,
    seed_context, with_namespace,
};

pub use rigging_derive as derive;

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __macro_exports {
    pub use inventory;
}
