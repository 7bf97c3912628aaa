//! Markup bootstrapping for text annotation.
//!
//! [`MarkupScanner`] strips tags from markup, yielding the plain text and
//! one [`TagRule`] per matched tag pair. Inserting those rules into a
//! [`gloss_rules::RuleTree`] and applying it restores the original markup,
//! so new edits can be layered over existing tags.
//!
//! # Example
//!
//! ```
//! use gloss_markup::MarkupScanner;
//!
//! let markup = "A <i>sentence with</i> <b>some more</b> markup.";
//! let scanned = MarkupScanner::default().scan(markup)?;
//! assert_eq!(scanned.text, "A sentence with some more markup.");
//!
//! let tree = scanned.rule_tree()?;
//! assert_eq!(gloss_rules::apply(&tree, &scanned.text), markup);
//! # Ok::<(), gloss_markup::MarkupError>(())
//! ```

mod config;
mod error;
mod scanner;
mod tag;

pub use config::MarkupConfig;
pub use error::MarkupError;
pub use scanner::{Bootstrap, MarkupScanner, MarkupWarning, TagRule};
pub use tag::{TagKind, closing_tag, element_name};
