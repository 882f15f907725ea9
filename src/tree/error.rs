use thiserror::Error;

use crate::directive::{ParseError, TagError};
use crate::namespace::BoxError;

// -----------------------------------------------------------------------------
// BuildError

/// A failed bare-tree build: malformed tag or duplicate directive.
///
/// Fatal to the whole construction; no partial tree ever surfaces. The
/// dotted [`path`](BuildError::path) names the field at which the build
/// failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("build resolver for `{path}` failed: {kind}")]
pub struct BuildError {
    path: String,
    kind: BuildErrorKind,
}

/// What went wrong while building one node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BuildErrorKind {
    #[error("parse directives: {0}")]
    ParseTag(ParseError),

    #[error("duplicate directive `{0}`")]
    DuplicateDirective(String),
}

impl BuildError {
    pub(crate) fn new(path: &[&str], err: TagError) -> Self {
        Self {
            path: path.join("."),
            kind: match err {
                TagError::Parse(err) => BuildErrorKind::ParseTag(err),
                TagError::Duplicate(name) => BuildErrorKind::DuplicateDirective(name),
            },
        }
    }

    /// The dotted path of the field the build failed at.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The failure kind.
    #[inline]
    pub fn kind(&self) -> &BuildErrorKind {
        &self.kind
    }
}

// -----------------------------------------------------------------------------
// ConfigurationError

/// A failed option application or post-option validation.
///
/// Fatal to the whole construction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// No namespace was bound to the root after all options ran.
    #[error("no namespace bound; construct the resolver with `with_namespace`")]
    UnboundNamespace,

    /// A build option returned an error at the named node.
    #[error("option failed at `{path}`: {source}")]
    OptionFailed {
        path: String,
        #[source]
        source: BoxError,
    },
}

// -----------------------------------------------------------------------------
// NewError

/// Any error from [`Resolver::new`](crate::Resolver::new).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NewError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_error_names_the_path() {
        let err = BuildError::new(
            &["db", "host"],
            TagError::Duplicate("required".into()),
        );
        assert_eq!(err.path(), "db.host");
        assert_eq!(
            err.to_string(),
            "build resolver for `db.host` failed: duplicate directive `required`"
        );
    }

    #[test]
    fn unbound_namespace_message() {
        assert_eq!(
            ConfigurationError::UnboundNamespace.to_string(),
            "no namespace bound; construct the resolver with `with_namespace`"
        );
    }
}
