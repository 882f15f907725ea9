//! The executor registry.
//!
//! A [`Namespace`] maps directive names to [`Executor`]s. Registration is a
//! separate phase from lookup: a namespace is populated mutably, then shared
//! immutably (`Arc`) with one or more resolvers, so the resolve path reads
//! it without locking.

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use thiserror::Error;

use crate::directive::is_valid_name;
use crate::resolve::DirectiveRuntime;

/// The error type executors report; wrapped with the directive identity
/// by the engine.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

// -----------------------------------------------------------------------------
// Executor

/// One directive's behavior, executed against a field's value slot.
///
/// This is the engine's sole extension point. Implemented for closures:
///
/// ```
/// use rigging::{BoxError, DirectiveRuntime, Namespace};
///
/// let mut ns = Namespace::new();
/// ns.register("required", |rt: &mut DirectiveRuntime<'_>| -> Result<(), BoxError> {
///     if rt.value_ref::<String>()?.is_empty() {
///         return Err(format!("field `{}` is required", rt.node().path_string()).into());
///     }
///     Ok(())
/// })?;
/// # Ok::<(), rigging::namespace::NamespaceError>(())
/// ```
pub trait Executor: Send + Sync + 'static {
    /// Runs the directive. A returned error aborts the owning node's
    /// resolution.
    fn execute(&self, rt: &mut DirectiveRuntime<'_>) -> Result<(), BoxError>;
}

impl<F> Executor for F
where
    F: for<'a> Fn(&mut DirectiveRuntime<'a>) -> Result<(), BoxError> + Send + Sync + 'static,
{
    fn execute(&self, rt: &mut DirectiveRuntime<'_>) -> Result<(), BoxError> {
        self(rt)
    }
}

// -----------------------------------------------------------------------------
// Namespace

/// A registry of [`Executor`]s, keyed by directive name.
///
/// Never mutated by the engine; [`lookup_executor`] is safe for concurrent
/// reads through a shared `Arc`.
///
/// [`lookup_executor`]: Namespace::lookup_executor
#[derive(Default)]
pub struct Namespace {
    executors: HashMap<String, Arc<dyn Executor>>,
}

/// A rejected registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NamespaceError {
    #[error("invalid directive name `{name}`")]
    InvalidName { name: String },

    #[error("directive `{name}` is already registered")]
    AlreadyRegistered { name: String },
}

impl Namespace {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `executor` under `name`.
    ///
    /// Names follow the directive grammar (`[A-Za-z][A-Za-z0-9_-]*`) and
    /// must be unused.
    pub fn register<E: Executor>(
        &mut self,
        name: &str,
        executor: E,
    ) -> Result<&mut Self, NamespaceError> {
        self.register_arc(name, Arc::new(executor))
    }

    /// Registers an already-shared executor under `name`.
    pub fn register_arc(
        &mut self,
        name: &str,
        executor: Arc<dyn Executor>,
    ) -> Result<&mut Self, NamespaceError> {
        if !is_valid_name(name) {
            return Err(NamespaceError::InvalidName { name: name.into() });
        }
        if self.executors.contains_key(name) {
            return Err(NamespaceError::AlreadyRegistered { name: name.into() });
        }
        self.executors.insert(name.to_owned(), executor);
        Ok(self)
    }

    /// Replaces the executor under `name`, registering it if absent.
    pub fn replace<E: Executor>(
        &mut self,
        name: &str,
        executor: E,
    ) -> Result<&mut Self, NamespaceError> {
        if !is_valid_name(name) {
            return Err(NamespaceError::InvalidName { name: name.into() });
        }
        self.executors.insert(name.to_owned(), Arc::new(executor));
        Ok(self)
    }

    /// Looks up the executor for `name`.
    pub fn lookup_executor(&self, name: &str) -> Option<&dyn Executor> {
        self.executors.get(name).map(Arc::as_ref)
    }

    /// The number of registered executors.
    pub fn len(&self) -> usize {
        self.executors.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut directives: Vec<_> = self.executors.keys().collect();
        directives.sort_unstable();
        f.debug_struct("Namespace")
            .field("directives", &directives)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Auto-registration

/// An executor submitted for collection by [`Namespace::with_registered`].
#[cfg(feature = "auto_register")]
pub struct ExecutorRegistration {
    /// The directive name to register under.
    pub name: &'static str,
    /// Builds the executor instance.
    pub build: fn() -> Arc<dyn Executor>,
}

#[cfg(feature = "auto_register")]
inventory::collect!(ExecutorRegistration);

#[cfg(feature = "auto_register")]
impl Namespace {
    /// Creates a namespace pre-populated with every executor submitted via
    /// [`submit_executor!`](crate::submit_executor).
    ///
    /// Fails on an invalid or doubly-submitted name.
    pub fn with_registered() -> Result<Self, NamespaceError> {
        let mut ns = Self::new();
        for registration in inventory::iter::<ExecutorRegistration> {
            ns.register_arc(registration.name, (registration.build)())?;
        }
        Ok(ns)
    }
}

/// Submits an executor for process-wide collection.
///
/// ```
/// use rigging::{submit_executor, BoxError, DirectiveRuntime, Namespace};
///
/// submit_executor!("noop" => |_rt: &mut DirectiveRuntime<'_>| -> Result<(), BoxError> {
///     Ok(())
/// });
///
/// fn main() {
///     let ns = Namespace::with_registered().unwrap();
///     assert!(ns.lookup_executor("noop").is_some());
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_executor {
    ($name:literal => $executor:expr) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::namespace::ExecutorRegistration {
                name: $name,
                build: || ::std::sync::Arc::new($executor),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_rt: &mut DirectiveRuntime<'_>) -> Result<(), BoxError> {
        Ok(())
    }

    #[test]
    fn register_and_lookup() {
        let mut ns = Namespace::new();
        ns.register("trim", noop).unwrap();
        assert!(ns.lookup_executor("trim").is_some());
        assert!(ns.lookup_executor("pad").is_none());
        assert_eq!(ns.len(), 1);
        assert_eq!(
            format!("{ns:?}"),
            r#"Namespace { directives: ["trim"] }"#
        );
    }

    #[test]
    fn register_rejects_invalid_names() {
        let mut ns = Namespace::new();
        assert_eq!(
            ns.register("2fast", noop).unwrap_err(),
            NamespaceError::InvalidName {
                name: "2fast".into()
            }
        );
        assert!(ns.register("", noop).is_err());
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut ns = Namespace::new();
        ns.register("trim", noop).unwrap();
        assert_eq!(
            ns.register("trim", noop).unwrap_err(),
            NamespaceError::AlreadyRegistered {
                name: "trim".into()
            }
        );
    }

    #[test]
    fn replace_overrides() {
        let mut ns = Namespace::new();
        ns.register("trim", noop).unwrap();
        ns.replace("trim", noop).unwrap();
        assert_eq!(ns.len(), 1);
    }
}
