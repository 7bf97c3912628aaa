//! Error type for annotation sessions.

use gloss_markup::MarkupError;
use gloss_rules::RuleError;

/// Error from a [`Session`](crate::Session) operation.
///
/// A failed edit leaves the session unchanged.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Target could not be resolved or the span does not fit the text.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Markup could not be scanned or a tag literal is invalid.
    #[error(transparent)]
    Markup(#[from] MarkupError),
}
