//! Offset-aware application of a rule tree to its text.
//!
//! Rules are applied bottom-up. Each rule reports how much it grew or
//! shrank the text, and that delta shifts every rule still waiting to be
//! applied to its right, so spans recorded against the original text keep
//! addressing the right characters.

use crate::{RuleId, RuleTree};

/// Apply every rule in `tree` to `text` and return the result.
///
/// `text` is the base text the tree's spans were computed against; it is
/// not modified.
///
/// # Examples
///
/// ```
/// use gloss_rules::{RuleTree, Span, Transform, apply};
///
/// let text = "A sentence with no markup.";
/// let mut tree = RuleTree::new(text.chars().count());
/// tree.insert(Span::new(11, 18), Transform::wrap("<b>", "</b>")).unwrap();
///
/// assert_eq!(apply(&tree, text), "A sentence <b>with no</b> markup.");
/// ```
#[must_use]
pub fn apply(tree: &RuleTree, text: &str) -> String {
    let mut buffer: Vec<char> = text.chars().collect();
    apply_rule(tree, tree.root(), &mut buffer, 0);
    buffer.into_iter().collect()
}

/// Apply the subtree rooted at `id`, whose span is displaced by `offset`.
///
/// Returns the change in length this subtree made to the buffer.
fn apply_rule(tree: &RuleTree, id: RuleId, buffer: &mut Vec<char>, offset: isize) -> isize {
    let span = tree.span(id);

    let mut shift = offset;
    for &child in tree.children(id) {
        shift += apply_rule(tree, child, buffer, shift);
    }

    let transform = tree.transform(id);
    if transform.is_identity() {
        return shift - offset;
    }

    let start = span.start.saturating_add_signed(offset);
    let end = span.end.saturating_add_signed(shift);
    let input: String = buffer[start..end].iter().collect();
    let output = transform.apply(&input);
    let produced = output.chars().count();
    buffer.splice(start..end, output.chars());

    delta(produced, span.len())
}

#[allow(clippy::cast_possible_wrap)] // Text lengths are far below isize::MAX
fn delta(new_len: usize, old_len: usize) -> isize {
    new_len as isize - old_len as isize
}
