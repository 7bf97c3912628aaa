//! Error types for rule resolution and tree validation.

use crate::Span;

/// Error resolving or registering a rule. Returned before any tree mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RuleError {
    /// The requested occurrence of the target does not exist.
    #[error("occurrence {occurrence} of {target:?} not found")]
    OccurrenceNotFound {
        /// Literal text searched for.
        target: String,
        /// 1-based occurrence requested.
        occurrence: usize,
    },

    /// The span does not fit inside the text.
    #[error("range {start}..{end} is outside text of length {len}")]
    RangeOutOfBounds {
        /// Requested start position.
        start: usize,
        /// Requested end position.
        end: usize,
        /// Length of the text in characters.
        len: usize,
    },
}

/// Broken structural invariant found by [`RuleTree::validate`](crate::RuleTree::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InvariantViolation {
    /// Root does not cover the whole text.
    #[error("root span {span} does not cover text of length {len}")]
    RootSpan {
        /// Span of the root rule.
        span: Span,
        /// Length of the text in characters.
        len: usize,
    },

    /// Root carries an edit.
    #[error("root transform is not identity")]
    RootTransform,

    /// Child reaches outside its parent.
    #[error("child {child} escapes parent {parent}")]
    Escapes {
        /// Span of the child.
        child: Span,
        /// Span of the parent.
        parent: Span,
    },

    /// Two siblings share characters.
    #[error("siblings {first} and {second} overlap")]
    Overlap {
        /// Earlier sibling.
        first: Span,
        /// Later sibling.
        second: Span,
    },

    /// Siblings are not sorted by start offset.
    #[error("siblings {first} and {second} are out of order")]
    Unordered {
        /// Sibling listed first.
        first: Span,
        /// Sibling listed second.
        second: Span,
    },

    /// Parent back-reference does not match the owning node.
    #[error("rule {child} has a stale parent reference")]
    Parent {
        /// Span of the rule with the stale reference.
        child: Span,
    },
}
