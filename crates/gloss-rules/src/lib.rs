//! Rule composition and application for text annotation.
//!
//! A [`RuleTree`] holds possibly nested edits over a base text. Each rule
//! pairs a [`Span`] of the text with a [`Transform`] (wrap, replace, or
//! identity). Rules can be registered in any order and may cross each
//! other's boundaries; the tree keeps them properly nested by splitting
//! incoming rules where they straddle existing ones.
//!
//! [`apply`] then produces the edited text in a single bottom-up pass.
//!
//! # Example
//!
//! ```
//! use gloss_rules::{RuleTree, Span, Transform, apply, find_occurrence};
//!
//! let text = "A sentence with some markup.";
//! let mut tree = RuleTree::new(text.chars().count());
//! tree.insert(find_occurrence(text, "sentence with", 1)?, Transform::wrap("<i>", "</i>"))?;
//! tree.insert(find_occurrence(text, "with some", 1)?, Transform::wrap("<b>", "</b>"))?;
//!
//! assert_eq!(
//!     apply(&tree, text),
//!     "A <i>sentence <b>with</b></i><b> some</b> markup."
//! );
//! # Ok::<(), gloss_rules::RuleError>(())
//! ```

mod apply;
mod error;
mod occurrence;
mod span;
mod transform;
mod tree;

pub use apply::apply;
pub use error::{InvariantViolation, RuleError};
pub use occurrence::find_occurrence;
pub use span::Span;
pub use transform::{ReplaceFn, Replacement, Transform};
pub use tree::{RuleId, RuleTree};
