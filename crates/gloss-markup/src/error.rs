//! Error types for markup scanning.

use gloss_rules::RuleError;

/// Error while scanning markup or deriving tags.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MarkupError {
    /// Unbalanced tag found while scanning in strict mode.
    #[error("malformed markup: {kind} tag {tag:?} at byte {offset}")]
    Malformed {
        /// Whether the tag was an unmatched open tag or a stray close tag.
        kind: &'static str,
        /// The tag literal.
        tag: String,
        /// Byte offset of the tag in the scanned markup.
        offset: usize,
    },

    /// Open-tag literal without a usable element name.
    #[error("invalid open tag: {0:?}")]
    InvalidTag(String),

    /// Scanner configuration could not be parsed.
    #[error("invalid markup configuration")]
    Config(#[from] toml::de::Error),

    /// Rule registration failed while building the rule tree.
    #[error("rule registration failed")]
    Rule(#[from] RuleError),
}
