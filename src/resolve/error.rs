use thiserror::Error;

use crate::namespace::BoxError;
use crate::shape::AccessError;
use crate::tree::Node;

// -----------------------------------------------------------------------------
// DirectiveExecutionError

/// A directive that could not run, or ran and failed.
///
/// Fatal to the owning node: later directives on the same node are
/// skipped and the error propagates upward.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DirectiveExecutionError {
    /// The bound namespace has no executor under the directive's name.
    #[error("missing executor for directive `{directive}`")]
    MissingExecutor { directive: String },

    /// The executor returned an error.
    #[error("directive `{directive}` failed: {source}")]
    Failed {
        directive: String,
        #[source]
        source: BoxError,
    },
}

impl DirectiveExecutionError {
    /// The name of the directive that failed.
    pub fn directive(&self) -> &str {
        match self {
            Self::MissingExecutor { directive } | Self::Failed { directive, .. } => directive,
        }
    }
}

// -----------------------------------------------------------------------------
// ResolveError

/// A failed resolution pass.
///
/// Each ancestor wraps its failing child, so the chain reconstructs the
/// exact failing dotted path — [`path`](ResolveError::path) — without
/// re-running anything. There is no partial success: callers never see a
/// partially populated value alongside an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// A directive on the node itself could not run or failed.
    #[error(transparent)]
    Directive(#[from] DirectiveExecutionError),

    /// A child node failed; `path` is the child's dotted path.
    #[error("resolve field `{path}` failed: {source}")]
    Field {
        path: String,
        #[source]
        source: Box<ResolveError>,
    },

    /// A value could not be moved through a type-erased slot.
    #[error(transparent)]
    Value(#[from] AccessError),
}

impl ResolveError {
    pub(crate) fn field(child: Node<'_>, source: ResolveError) -> Self {
        Self::Field {
            path: child.path_string(),
            source: Box::new(source),
        }
    }

    /// The dotted path of the deepest failing field, or `None` when the
    /// failure occurred at the node `resolve` was called on.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Field { path, source } => Some(source.path().unwrap_or(path)),
            _ => None,
        }
    }

    /// The innermost error in the wrap chain.
    pub fn root_cause(&self) -> &ResolveError {
        match self {
            Self::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_executor_message() {
        let err = DirectiveExecutionError::MissingExecutor {
            directive: "required".into(),
        };
        assert_eq!(err.directive(), "required");
        assert_eq!(err.to_string(), "missing executor for directive `required`");
    }

    #[test]
    fn path_reports_the_deepest_field() {
        let inner = ResolveError::Directive(DirectiveExecutionError::MissingExecutor {
            directive: "required".into(),
        });
        let err = ResolveError::Field {
            path: "db".into(),
            source: Box::new(ResolveError::Field {
                path: "db.host".into(),
                source: Box::new(inner),
            }),
        };
        assert_eq!(err.path(), Some("db.host"));
        assert!(matches!(
            err.root_cause(),
            ResolveError::Directive(DirectiveExecutionError::MissingExecutor { .. })
        ));
    }
}
