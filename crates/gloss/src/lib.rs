//! Layer overlapping edits over text or existing markup.
//!
//! A [`Session`] holds a base text and a tree of rules over it. Rules wrap
//! a span in tags, replace it, or leave it alone; they may be registered in
//! any order and may cross each other's boundaries. Sessions built from
//! markup start with one wrap rule per tag pair, so new edits land between
//! the existing tags and [`Session::apply`] reproduces the markup with the
//! edits folded in.
//!
//! # Architecture
//!
//! - [`gloss_rules`]: spans, transforms, occurrence lookup, the rule tree
//!   and the bottom-up applier
//! - [`gloss_markup`]: the balanced-tag scanner that seeds a session from markup
//! - this crate: the [`Session`] facade
//!
//! # Example
//!
//! ```
//! use gloss::Session;
//!
//! let mut session = Session::from_markup("A <i>sentence with</i> some markup.")?;
//! assert_eq!(session.text(), "A sentence with some markup.");
//!
//! session.wrap_in("<b>", "with some")?;
//! session.replace("text", "markup")?;
//! assert_eq!(
//!     session.apply(),
//!     "A <i>sentence <b>with</b></i><b> some</b> text."
//! );
//! # Ok::<(), gloss::Error>(())
//! ```

mod error;
mod session;

pub use error::Error;
pub use gloss_markup::{MarkupConfig, MarkupWarning};
pub use gloss_rules::{RuleTree, Span, Transform};
pub use session::Session;
