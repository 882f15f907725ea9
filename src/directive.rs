//! Directive metadata and the tag-segment parser.
//!
//! A field tag is a `;`-separated list of segments; each segment is one
//! directive in the form `name` or `name=arg1,arg2`. The engine never
//! interprets the arguments, it only carries them to the [`Executor`]
//! looked up by name at resolve time.
//!
//! [`Executor`]: crate::Executor

use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Directive

/// A named, parameterized instruction attached to a field.
///
/// # Examples
///
/// ```
/// use rigging::Directive;
///
/// let d = Directive::parse("in=query,header")?;
/// assert_eq!(d.name, "in");
/// assert_eq!(d.argv, vec!["query".to_owned(), "header".to_owned()]);
/// assert_eq!(d.to_string(), "in=query,header");
/// # Ok::<(), rigging::directive::ParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// The directive name, used to look up an executor.
    pub name: String,
    /// Raw arguments, in written order. Never interpreted by the engine.
    pub argv: Vec<String>,
}

impl Directive {
    /// Creates a directive from parts. The name is **not** validated;
    /// use [`Directive::parse`] for tag input.
    pub fn new(name: impl Into<String>, argv: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a single tag segment, e.g. `required` or `default=8080`.
    ///
    /// Directive names must match `[A-Za-z][A-Za-z0-9_-]*`. Arguments are
    /// split on `,` and kept verbatim.
    pub fn parse(segment: &str) -> Result<Self, ParseError> {
        let segment = segment.trim();
        let (name, args) = match segment.split_once('=') {
            Some((name, args)) => (name.trim(), Some(args)),
            None => (segment, None),
        };

        if name.is_empty() {
            return Err(ParseError::EmptyName {
                segment: segment.into(),
            });
        }
        if !is_valid_name(name) {
            return Err(ParseError::InvalidName { name: name.into() });
        }

        let argv = match args {
            Some(args) => args.split(',').map(str::to_owned).collect(),
            None => Vec::new(),
        };
        Ok(Self {
            name: name.to_owned(),
            argv,
        })
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.argv.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}={}", self.name, self.argv.join(","))
        }
    }
}

// -----------------------------------------------------------------------------
// Tag parsing

/// An invalid tag segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("empty directive name in segment `{segment}`")]
    EmptyName { segment: String },

    #[error("invalid directive name `{name}`")]
    InvalidName { name: String },
}

#[derive(Debug)]
pub(crate) enum TagError {
    Parse(ParseError),
    /// A directive name occurred twice within one field's tag.
    Duplicate(String),
}

/// Splits a raw tag on `;`, parsing each non-empty trimmed segment.
///
/// Directive order is preserved; a repeated name is an error.
pub(crate) fn parse_tag(tag: &str) -> Result<Vec<Directive>, TagError> {
    let mut directives: Vec<Directive> = Vec::new();
    for segment in tag.split(';') {
        if segment.trim().is_empty() {
            continue;
        }
        let directive = Directive::parse(segment).map_err(TagError::Parse)?;
        if directives.iter().any(|d| d.name == directive.name) {
            return Err(TagError::Duplicate(directive.name));
        }
        directives.push(directive);
    }
    Ok(directives)
}

/// Directive (and executor) name grammar: `[A-Za-z][A-Za-z0-9_-]*`.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_name() {
        let d = Directive::parse("required").unwrap();
        assert_eq!(d.name, "required");
        assert!(d.argv.is_empty());
        assert_eq!(d.to_string(), "required");
    }

    #[test]
    fn parse_with_args() {
        let d = Directive::parse(" in = query,header ").unwrap();
        assert_eq!(d.name, "in");
        // The segment itself is trimmed, then only the name side again;
        // interior argument text is verbatim.
        assert_eq!(d.argv, vec![" query", "header"]);
    }

    #[test]
    fn parse_keeps_empty_args() {
        let d = Directive::parse("default=").unwrap();
        assert_eq!(d.argv, vec![String::new()]);
    }

    #[test]
    fn parse_rejects_bad_names() {
        assert!(matches!(
            Directive::parse("=x"),
            Err(ParseError::EmptyName { .. })
        ));
        assert!(matches!(
            Directive::parse("9lives"),
            Err(ParseError::InvalidName { .. })
        ));
        assert!(matches!(
            Directive::parse("a b"),
            Err(ParseError::InvalidName { .. })
        ));
    }

    #[test]
    fn tag_ignores_empty_segments() {
        let directives = parse_tag(" required ;; default=1; ").unwrap();
        let names: Vec<_> = directives.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["required", "default"]);
    }

    #[test]
    fn tag_rejects_duplicates() {
        match parse_tag("required; default=1; required") {
            Err(TagError::Duplicate(name)) => assert_eq!(name, "required"),
            _ => panic!("expected duplicate directive error"),
        }
    }

    #[test]
    fn empty_tag_is_no_directives() {
        assert!(parse_tag("").unwrap().is_empty());
        assert!(parse_tag("  ;  ").unwrap().is_empty());
    }
}
