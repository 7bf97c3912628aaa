//! Rule forest and the composition algorithm.
//!
//! Rules live in an arena and refer to each other by [`RuleId`]. The tree
//! keeps two invariants after every insertion: a child's span lies inside
//! its parent's span, and siblings are disjoint and sorted by start offset.
//!
//! # Composition
//!
//! An incoming rule descends from the root. At each rule it meets, one of
//! four things happens:
//!
//! ```text
//! existing   |-----------|          incoming inside  -> descend, maybe adopt children
//! incoming      |-----|
//!
//! existing      |-----|             existing inside  -> report to parent, which moves
//! incoming   |-----------|                              the existing rule under incoming
//!
//! existing   |-----|                disjoint         -> try the next sibling
//! incoming           |-----|
//!
//! existing   |-------|              partial overlap  -> shared part goes inside existing,
//! incoming       |-------|                              remainder keeps looking
//! ```
//!
//! On partial overlap the existing structure keeps the shared region; only
//! the incoming rule is ever split.

use std::collections::VecDeque;

use crate::{InvariantViolation, RuleError, Span, Transform};

/// Index of a rule in its [`RuleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(usize);

impl RuleId {
    /// Arena slot of this rule.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct RuleNode {
    span: Span,
    transform: Transform,
    children: Vec<RuleId>,
    parent: Option<RuleId>,
}

/// Outcome of offering an incoming rule to an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Incoming rule was absorbed into the existing rule's subtree.
    Inside,
    /// The rules do not interact.
    Outside,
    /// The existing rule lies inside the incoming one, which must take it over.
    ContainedBy(RuleId),
    /// The shared part was absorbed; the returned remainder still needs a place.
    Split(RuleId),
}

/// Forest of rules under a single identity root covering the whole text.
#[derive(Debug, Clone)]
pub struct RuleTree {
    nodes: Vec<RuleNode>,
    root: RuleId,
    /// Children of split rules awaiting re-insertion from the root.
    orphans: VecDeque<RuleId>,
}

impl RuleTree {
    /// Create a tree whose identity root covers `len` characters.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            nodes: vec![RuleNode {
                span: Span::new(0, len),
                transform: Transform::Identity,
                children: Vec::new(),
                parent: None,
            }],
            root: RuleId(0),
            orphans: VecDeque::new(),
        }
    }

    /// The identity root.
    #[must_use]
    pub fn root(&self) -> RuleId {
        self.root
    }

    /// Number of characters the tree covers.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.span(self.root).len()
    }

    /// Number of rules, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.preorder().count()
    }

    /// Whether the tree holds only its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// Span covered by a rule.
    #[must_use]
    pub fn span(&self, id: RuleId) -> Span {
        self.nodes[id.0].span
    }

    /// Edit carried by a rule.
    #[must_use]
    pub fn transform(&self, id: RuleId) -> &Transform {
        &self.nodes[id.0].transform
    }

    /// Direct children of a rule, sorted by start offset.
    #[must_use]
    pub fn children(&self, id: RuleId) -> &[RuleId] {
        &self.nodes[id.0].children
    }

    /// Parent of a rule; `None` for the root.
    #[must_use]
    pub fn parent(&self, id: RuleId) -> Option<RuleId> {
        self.nodes[id.0].parent
    }

    /// Rules in pre-order, starting at the root.
    pub fn preorder(&self) -> impl Iterator<Item = RuleId> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev());
            Some(id)
        })
    }

    /// Insert a rule, letting existing structure win any partial overlap.
    ///
    /// A rule straddling the boundary of an existing one is split: the part
    /// inside the existing rule nests under it, the rest is placed on its own.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::RangeOutOfBounds`] when `span` does not fit the text;
    /// the tree is left untouched.
    pub fn insert(&mut self, span: Span, transform: Transform) -> Result<(), RuleError> {
        self.check_bounds(span)?;
        let id = self.alloc(span, transform);
        let placement = self.place(self.root, id);
        debug_assert_eq!(placement, Placement::Inside, "root covers every valid span");
        self.settle_orphans();
        Ok(())
    }

    /// Insert a rule that takes precedence over existing structure.
    ///
    /// The new rule goes under the innermost rule strictly enclosing it. The
    /// children of that rule are then folded back in around the new rule, so
    /// existing rules that straddle its boundary are the ones split, at any
    /// depth. Rules with the same span end up inside the new rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::RangeOutOfBounds`] when `span` does not fit the text;
    /// the tree is left untouched.
    pub fn insert_outermost(&mut self, span: Span, transform: Transform) -> Result<(), RuleError> {
        self.check_bounds(span)?;
        let container = self.enclosing(span);
        let id = self.alloc(span, transform);
        self.adopt(container, id);
        self.settle_orphans();
        Ok(())
    }

    /// Check every structural invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let root = &self.nodes[self.root.0];
        if root.span.start != 0 {
            return Err(InvariantViolation::RootSpan {
                span: root.span,
                len: root.span.end,
            });
        }
        if !root.transform.is_identity() {
            return Err(InvariantViolation::RootTransform);
        }
        if root.parent.is_some() {
            return Err(InvariantViolation::Parent { child: root.span });
        }

        for id in self.preorder() {
            let node = &self.nodes[id.0];
            for &child in &node.children {
                let child_node = &self.nodes[child.0];
                if child_node.parent != Some(id) {
                    return Err(InvariantViolation::Parent {
                        child: child_node.span,
                    });
                }
                if !node.span.contains(child_node.span) {
                    return Err(InvariantViolation::Escapes {
                        child: child_node.span,
                        parent: node.span,
                    });
                }
            }
            for pair in node.children.windows(2) {
                let first = self.span(pair[0]);
                let second = self.span(pair[1]);
                if first.start > second.start {
                    return Err(InvariantViolation::Unordered { first, second });
                }
                if first.intersection(second).is_some() {
                    return Err(InvariantViolation::Overlap { first, second });
                }
            }
        }
        Ok(())
    }

    fn check_bounds(&self, span: Span) -> Result<(), RuleError> {
        let len = self.text_len();
        if span.end > len {
            return Err(RuleError::RangeOutOfBounds {
                start: span.start,
                end: span.end,
                len,
            });
        }
        Ok(())
    }

    fn alloc(&mut self, span: Span, transform: Transform) -> RuleId {
        let id = RuleId(self.nodes.len());
        self.nodes.push(RuleNode {
            span,
            transform,
            children: Vec::new(),
            parent: None,
        });
        id
    }

    /// Offer `incoming` to the rule at `at`.
    fn place(&mut self, at: RuleId, incoming: RuleId) -> Placement {
        let existing = self.span(at);
        let span = self.span(incoming);

        if existing.contains(span) {
            tracing::trace!(%existing, %span, "Descending into rule");
            self.descend(at, incoming);
            return Placement::Inside;
        }
        if span.contains(existing) {
            tracing::trace!(%existing, %span, "Rule contained by incoming");
            return Placement::ContainedBy(incoming);
        }
        match existing.intersection(span) {
            None => Placement::Outside,
            Some(shared) => Placement::Split(self.split(at, incoming, shared)),
        }
    }

    /// Fold `incoming`, known to lie inside `at`, into the subtree of `at`.
    fn descend(&mut self, at: RuleId, incoming: RuleId) {
        let mut input = incoming;
        let mut adopted = Vec::new();

        let children = self.nodes[at.0].children.clone();
        for child in children {
            match self.place(child, input) {
                Placement::Inside => return,
                Placement::Outside => {}
                Placement::ContainedBy(container) => {
                    debug_assert_eq!(container, input);
                    adopted.push(child);
                }
                Placement::Split(rest) => input = rest,
            }
        }

        if !adopted.is_empty() {
            self.nodes[at.0].children.retain(|c| !adopted.contains(c));
            for child in adopted {
                self.nodes[child.0].parent = None;
                let placement = self.place(input, child);
                debug_assert_eq!(placement, Placement::Inside);
            }
        }
        self.attach(at, input);
    }

    /// Innermost rule whose span contains `span` and differs from it.
    fn enclosing(&self, span: Span) -> RuleId {
        let mut container = self.root;
        loop {
            let inner = self.children(container).iter().copied().find(|&child| {
                let existing = self.span(child);
                existing != span && existing.contains(span)
            });
            match inner {
                Some(child) => container = child,
                None => return container,
            }
        }
    }

    /// Make `detached` the only child of `container`, then fold the previous
    /// children of `container` back in around it.
    fn adopt(&mut self, container: RuleId, detached: RuleId) {
        let previous = std::mem::take(&mut self.nodes[container.0].children);
        self.attach(container, detached);
        for child in previous {
            self.nodes[child.0].parent = None;
            let placement = self.place(container, child);
            debug_assert_eq!(placement, Placement::Inside);
        }
    }

    /// Split `incoming` around `shared`, the region it has in common with `at`.
    ///
    /// The shared fragment is inserted under `at`; `incoming` itself is
    /// narrowed to the remainder and returned.
    fn split(&mut self, at: RuleId, incoming: RuleId, shared: Span) -> RuleId {
        let span = self.span(incoming);
        let (rest, shared_first) = match span.difference(shared) {
            (None, Some(after)) => (after, true),
            (Some(before), None) => (before, false),
            _ => unreachable!("partial overlap leaves exactly one side outside"),
        };
        debug_assert_eq!(shared.len() + rest.len(), span.len());

        let transform = &self.nodes[incoming.0].transform;
        let (first, second) = transform.split(rest.len());
        let (shared_transform, rest_transform) = if shared_first {
            (first, second)
        } else {
            (second, first)
        };

        tracing::debug!(%span, %shared, %rest, "Splitting rule across existing boundary");

        let node = &mut self.nodes[incoming.0];
        node.span = rest;
        node.transform = rest_transform;
        let children = std::mem::take(&mut node.children);
        if !children.is_empty() {
            tracing::debug!(count = children.len(), "Re-queueing children of split rule");
            self.orphans.extend(children);
        }

        let fragment = self.alloc(shared, shared_transform);
        let placement = self.place(at, fragment);
        debug_assert_eq!(placement, Placement::Inside);
        incoming
    }

    fn settle_orphans(&mut self) {
        while let Some(orphan) = self.orphans.pop_front() {
            self.nodes[orphan.0].parent = None;
            let placement = self.place(self.root, orphan);
            debug_assert_eq!(placement, Placement::Inside);
        }
    }

    /// Add `child` to `parent`, keeping children sorted by start offset.
    fn attach(&mut self, parent: RuleId, child: RuleId) {
        let start = self.span(child).start;
        let position = self.nodes[parent.0]
            .children
            .partition_point(|&c| self.nodes[c.0].span.start <= start);
        self.nodes[parent.0].children.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn wrap(tag: &str) -> Transform {
        Transform::wrap(format!("<{tag}>"), format!("</{tag}>"))
    }

    /// Spans of every non-root rule in pre-order.
    fn spans(tree: &RuleTree) -> Vec<Span> {
        tree.preorder().skip(1).map(|id| tree.span(id)).collect()
    }

    #[test]
    fn test_new_tree() {
        let tree = RuleTree::new(10);
        assert_eq!(tree.span(tree.root()), Span::new(0, 10));
        assert!(tree.transform(tree.root()).is_identity());
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_insert_disjoint_siblings_sorted() {
        let mut tree = RuleTree::new(20);
        tree.insert(Span::new(10, 15), wrap("b")).unwrap();
        tree.insert(Span::new(0, 5), wrap("i")).unwrap();

        let children: Vec<Span> = tree
            .children(tree.root())
            .iter()
            .map(|&c| tree.span(c))
            .collect();
        assert_eq!(children, vec![Span::new(0, 5), Span::new(10, 15)]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_insert_nested() {
        let mut tree = RuleTree::new(20);
        tree.insert(Span::new(2, 15), wrap("i")).unwrap();
        tree.insert(Span::new(4, 8), wrap("b")).unwrap();

        let outer = tree.children(tree.root())[0];
        let inner = tree.children(outer)[0];
        assert_eq!(tree.span(inner), Span::new(4, 8));
        assert_eq!(tree.parent(inner), Some(outer));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_insert_equal_span_nests_inside_existing() {
        let mut tree = RuleTree::new(5);
        tree.insert(Span::new(0, 5), wrap("i")).unwrap();
        tree.insert(Span::new(0, 5), wrap("b")).unwrap();

        let outer = tree.children(tree.root())[0];
        assert_eq!(tree.transform(outer), &wrap("i"));
        let inner = tree.children(outer)[0];
        assert_eq!(tree.transform(inner), &wrap("b"));
    }

    #[test]
    fn test_insert_adopts_contained_rules() {
        let mut tree = RuleTree::new(30);
        tree.insert(Span::new(2, 4), wrap("a")).unwrap();
        tree.insert(Span::new(6, 8), wrap("b")).unwrap();
        tree.insert(Span::new(20, 25), wrap("c")).unwrap();
        tree.insert(Span::new(0, 10), wrap("outer")).unwrap();

        let root_children = tree.children(tree.root());
        assert_eq!(root_children.len(), 2);
        let outer = root_children[0];
        assert_eq!(tree.span(outer), Span::new(0, 10));
        let adopted: Vec<Span> = tree.children(outer).iter().map(|&c| tree.span(c)).collect();
        assert_eq!(adopted, vec![Span::new(2, 4), Span::new(6, 8)]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_partial_overlap_splits_incoming() {
        // "A sentence with some markup." with <i> over "sentence with".
        let mut tree = RuleTree::new(28);
        tree.insert(Span::new(2, 15), wrap("i")).unwrap();
        tree.insert(Span::new(11, 20), wrap("b")).unwrap();

        assert_eq!(
            spans(&tree),
            vec![Span::new(2, 15), Span::new(11, 15), Span::new(15, 20)]
        );
        let italic = tree.children(tree.root())[0];
        assert_eq!(tree.transform(tree.children(italic)[0]), &wrap("b"));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_partial_overlap_on_left_boundary() {
        let mut tree = RuleTree::new(20);
        tree.insert(Span::new(5, 15), wrap("i")).unwrap();
        tree.insert(Span::new(0, 8), Transform::replace("ABCDEFGH")).unwrap();

        let root_children = tree.children(tree.root());
        assert_eq!(tree.span(root_children[0]), Span::new(0, 5));
        assert_eq!(tree.transform(root_children[0]), &Transform::replace("ABCDE"));
        let shared = tree.children(root_children[1])[0];
        assert_eq!(tree.span(shared), Span::new(5, 8));
        assert_eq!(tree.transform(shared), &Transform::replace("FGH"));
    }

    #[test]
    fn test_overlap_with_two_siblings() {
        let mut tree = RuleTree::new(12);
        tree.insert(Span::new(0, 4), wrap("a")).unwrap();
        tree.insert(Span::new(6, 10), wrap("c")).unwrap();
        tree.insert(Span::new(2, 8), wrap("b")).unwrap();

        assert_eq!(
            spans(&tree),
            vec![
                Span::new(0, 4),
                Span::new(2, 4),
                Span::new(4, 6),
                Span::new(6, 10),
                Span::new(6, 8),
            ]
        );
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_split_conserves_length() {
        let mut tree = RuleTree::new(30);
        tree.insert(Span::new(3, 12), wrap("i")).unwrap();
        tree.insert(Span::new(7, 21), wrap("b")).unwrap();

        let fragments: Vec<Span> = tree
            .preorder()
            .filter(|&id| tree.transform(id) == &wrap("b"))
            .map(|id| tree.span(id))
            .collect();
        let total: usize = fragments.iter().map(|s| s.len()).sum();
        assert_eq!(total, Span::new(7, 21).len());
    }

    #[test]
    fn test_insert_out_of_bounds_leaves_tree_untouched() {
        let mut tree = RuleTree::new(5);
        tree.insert(Span::new(0, 2), wrap("b")).unwrap();

        let result = tree.insert(Span::new(3, 9), wrap("i"));
        assert_eq!(
            result,
            Err(RuleError::RangeOutOfBounds {
                start: 3,
                end: 9,
                len: 5,
            })
        );
        assert_eq!(spans(&tree), vec![Span::new(0, 2)]);
    }

    #[test]
    fn test_insert_outermost_splits_existing() {
        let mut tree = RuleTree::new(28);
        tree.insert(Span::new(2, 15), wrap("i")).unwrap();
        tree.insert_outermost(Span::new(11, 20), wrap("b")).unwrap();

        let root_children: Vec<Span> = tree
            .children(tree.root())
            .iter()
            .map(|&c| tree.span(c))
            .collect();
        assert_eq!(root_children, vec![Span::new(2, 11), Span::new(11, 20)]);

        let bold = tree.children(tree.root())[1];
        assert_eq!(tree.transform(bold), &wrap("b"));
        let shared = tree.children(bold)[0];
        assert_eq!(tree.span(shared), Span::new(11, 15));
        assert_eq!(tree.transform(shared), &wrap("i"));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_insert_outermost_equal_span_wraps_existing() {
        let mut tree = RuleTree::new(5);
        tree.insert(Span::new(0, 5), wrap("i")).unwrap();
        tree.insert_outermost(Span::new(0, 5), wrap("b")).unwrap();

        let outer = tree.children(tree.root())[0];
        assert_eq!(tree.transform(outer), &wrap("b"));
        assert_eq!(tree.transform(tree.children(outer)[0]), &wrap("i"));
    }

    #[test]
    fn test_insert_outermost_requeues_children_of_split_rule() {
        let mut tree = RuleTree::new(20);
        tree.insert(Span::new(0, 10), wrap("p")).unwrap();
        tree.insert(Span::new(1, 3), wrap("em")).unwrap();
        tree.insert(Span::new(6, 9), wrap("code")).unwrap();
        tree.insert_outermost(Span::new(5, 15), wrap("q")).unwrap();

        assert!(tree.validate().is_ok());
        let em = tree
            .preorder()
            .find(|&id| tree.transform(id) == &wrap("em"))
            .unwrap();
        let em_parent = tree.parent(em).unwrap();
        assert_eq!(tree.span(em_parent), Span::new(0, 5));

        let code = tree
            .preorder()
            .find(|&id| tree.transform(id) == &wrap("code"))
            .unwrap();
        let code_parent = tree.parent(code).unwrap();
        assert_eq!(tree.span(code_parent), Span::new(5, 10));
        assert_eq!(tree.transform(code_parent), &wrap("p"));
        assert_eq!(tree.span(tree.parent(code_parent).unwrap()), Span::new(5, 15));
    }

    #[test]
    fn test_insert_outermost_splits_nested_rule() {
        // p > i, and the new rule crosses i from inside p.
        let mut tree = RuleTree::new(10);
        tree.insert(Span::new(0, 10), wrap("p")).unwrap();
        tree.insert(Span::new(2, 5), wrap("i")).unwrap();
        tree.insert_outermost(Span::new(3, 7), wrap("q")).unwrap();

        assert!(tree.validate().is_ok());
        let q: Vec<RuleId> = tree
            .preorder()
            .filter(|&id| tree.transform(id) == &wrap("q"))
            .collect();
        assert_eq!(q.len(), 1);
        assert_eq!(tree.span(q[0]), Span::new(3, 7));
        assert_eq!(tree.transform(tree.parent(q[0]).unwrap()), &wrap("p"));

        let inside: Vec<Span> = tree.children(q[0]).iter().map(|&c| tree.span(c)).collect();
        assert_eq!(inside, vec![Span::new(3, 5)]);
        assert_eq!(
            spans(&tree),
            vec![
                Span::new(0, 10),
                Span::new(2, 3),
                Span::new(3, 7),
                Span::new(3, 5),
            ]
        );
    }

    #[test]
    fn test_insert_outermost_deep_nesting() {
        let mut tree = RuleTree::new(20);
        tree.insert(Span::new(0, 20), wrap("div")).unwrap();
        tree.insert(Span::new(2, 18), wrap("p")).unwrap();
        tree.insert(Span::new(4, 9), wrap("i")).unwrap();
        tree.insert(Span::new(5, 7), wrap("b")).unwrap();
        tree.insert(Span::new(11, 16), wrap("em")).unwrap();
        tree.insert_outermost(Span::new(6, 13), wrap("q")).unwrap();

        assert!(tree.validate().is_ok());
        let q: Vec<RuleId> = tree
            .preorder()
            .filter(|&id| tree.transform(id) == &wrap("q"))
            .collect();
        assert_eq!(q.len(), 1);
        assert_eq!(tree.span(q[0]), Span::new(6, 13));
        assert_eq!(tree.transform(tree.parent(q[0]).unwrap()), &wrap("p"));
        let inside: Vec<Span> = tree.children(q[0]).iter().map(|&c| tree.span(c)).collect();
        assert_eq!(inside, vec![Span::new(6, 9), Span::new(11, 13)]);
    }

    #[test]
    fn test_iter_is_preorder() {
        let mut tree = RuleTree::new(10);
        tree.insert(Span::new(0, 6), wrap("a")).unwrap();
        tree.insert(Span::new(1, 3), wrap("b")).unwrap();
        tree.insert(Span::new(7, 9), wrap("c")).unwrap();

        assert_eq!(
            spans(&tree),
            vec![Span::new(0, 6), Span::new(1, 3), Span::new(7, 9)]
        );
    }
}
