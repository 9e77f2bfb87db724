//! Diagnostics produced while building and validating a design.
//!
//! Nothing in this crate returns early on the first problem: structural
//! errors and validation errors are collected into [`Diagnostics`] so a
//! single evaluation run reports everything it found.

use std::fmt;

use thiserror::Error;

/// Structural errors raised at the builder call site (E2001–E2004).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DslError {
    /// E2001: Builder call used in a context that does not accept it.
    #[error("E2001: invalid use of {call} in {current}")]
    IncompatibleDsl { call: &'static str, current: String },

    /// E2002: Builder call given an invalid argument.
    #[error("E2002: {0}")]
    InvalidArgument(String),

    /// E2003: Top-level definition declared twice.
    #[error("E2003: {0}")]
    Duplicate(String),

    /// E2004: Builder call given more arguments than it accepts.
    #[error("E2004: too many arguments given to {0}")]
    TooManyArguments(&'static str),
}

/// Errors that abort a whole evaluation run (E2100–E2101).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    /// E2100: DSL blocks nested deeper than the configured limit.
    #[error("E2100: maximum DSL nesting depth of {0} exceeded")]
    DepthExceeded(usize),

    /// E2101: The node popped after a DSL block is not the one pushed.
    #[error("E2101: evaluation context corrupted, expected {0} on top of the stack")]
    ContextCorrupted(&'static str),
}

/// A cross-node violation found by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct ValidationError {
    /// Name of the offending node (e.g. `service "users"`).
    pub location: String,
    /// Human readable message.
    pub message: String,
}

/// A single diagnostic, either structural or semantic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Reported immediately by a builder call.
    #[error("{0}")]
    Structural(#[from] DslError),

    /// Reported by the validate stage.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Ended the evaluation run.
    #[error("{0}")]
    Fatal(#[from] FatalError),
}

impl Diagnostic {
    /// Whether this diagnostic was raised while building the tree.
    pub fn is_structural(&self) -> bool {
        matches!(self, Diagnostic::Structural(_))
    }
}

/// Ordered accumulator of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a validation error against the node named `location`.
    pub fn add(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.items.push(Diagnostic::Validation(ValidationError {
            location: location.into(),
            message: message.into(),
        }));
    }

    /// Record an arbitrary diagnostic.
    pub fn push(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.items.push(diagnostic.into());
    }

    /// Append every diagnostic of `other`, preserving order.
    pub fn merge(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// The error that aborted the run, if any.
    pub fn fatal(&self) -> Option<&FatalError> {
        self.items.iter().find_map(|d| match d {
            Diagnostic::Fatal(f) => Some(f),
            _ => None,
        })
    }

    /// Number of structural diagnostics.
    pub fn structural_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_structural()).count()
    }

    /// `Ok(value)` when nothing was recorded, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, Diagnostics> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incompatible_dsl_message_names_call_and_context() {
        let err = DslError::IncompatibleDsl {
            call: "Title",
            current: "contact".into(),
        };
        assert_eq!(err.to_string(), "E2001: invalid use of Title in contact");
    }

    #[test]
    fn merge_preserves_order() {
        let mut a = Diagnostics::new();
        a.add("service \"a\"", "first");
        let mut b = Diagnostics::new();
        b.push(DslError::InvalidArgument("second".into()));
        b.add("service \"b\"", "third");
        a.merge(b);

        let messages: Vec<String> = a.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "service \"a\": first",
                "E2002: second",
                "service \"b\": third"
            ]
        );
        assert_eq!(a.structural_count(), 1);
    }

    #[test]
    fn fatal_is_found_among_diagnostics() {
        let mut d = Diagnostics::new();
        d.add("x", "one");
        assert!(d.fatal().is_none());
        d.push(FatalError::DepthExceeded(4));
        assert_eq!(d.fatal(), Some(&FatalError::DepthExceeded(4)));
        assert_eq!(d.structural_count(), 0);
    }

    #[test]
    fn display_is_one_line_per_diagnostic() {
        let mut d = Diagnostics::new();
        d.add("x", "one");
        d.add("y", "two");
        assert_eq!(d.to_string(), "x: one\ny: two");
    }

    #[test]
    fn into_result_ok_when_empty() {
        assert_eq!(Diagnostics::new().into_result(7), Ok(7));
        let mut d = Diagnostics::new();
        d.add("x", "boom");
        assert!(d.into_result(7).is_err());
    }
}
