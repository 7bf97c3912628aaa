//! Balanced-tag scanner.
//!
//! Strips tags from markup and records, for every matched tag pair, a wrap
//! rule over the plain text the pair encloses. Feeding those rules through
//! a [`RuleTree`] and applying them reconstructs the markup.
//!
//! This is not a validating parser. Tags are matched by depth alone, so the
//! close tag paired with an open tag is whichever one brings the depth back
//! to zero. Markup that cannot be paired is kept as literal text.

use std::collections::HashMap;
use std::ops::Range;

use gloss_rules::{RuleTree, Span, Transform};

use crate::tag::{TagKind, element_name, find_tag};
use crate::{MarkupConfig, MarkupError};

/// Wrap rule derived from a matched tag pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRule {
    /// Plain-text span enclosed by the pair.
    pub span: Span,
    /// Open tag literal, attributes included.
    pub open: String,
    /// Close tag literal.
    pub close: String,
}

impl TagRule {
    /// Wrap transform restoring the tag pair.
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform::wrap(self.open.clone(), self.close.clone())
    }
}

/// Tag that could not be paired and was kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupWarning {
    /// Open tag with no matching close tag.
    UnmatchedOpen {
        /// The tag literal.
        tag: String,
        /// Byte offset in the scanned markup.
        offset: usize,
    },
    /// Close tag with no open tag before it.
    StrayClose {
        /// The tag literal.
        tag: String,
        /// Byte offset in the scanned markup.
        offset: usize,
    },
}

/// Result of scanning markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bootstrap {
    /// Markup with matched tags removed.
    pub text: String,
    /// Wrap rules in pre-order: outer pairs before the pairs they enclose.
    pub rules: Vec<TagRule>,
    /// Tags kept as literal text.
    pub warnings: Vec<MarkupWarning>,
}

impl Bootstrap {
    /// Build a rule tree over [`text`](Self::text) holding every tag rule.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::Rule`] if a rule does not fit the text.
    pub fn rule_tree(&self) -> Result<RuleTree, MarkupError> {
        let mut tree = RuleTree::new(self.text.chars().count());
        for rule in &self.rules {
            tree.insert(rule.span, rule.transform())?;
        }
        Ok(tree)
    }
}

/// How the scanner treats a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Open,
    Close,
    /// Occupies no text and never pairs: void, self-closing, declarations.
    Literal,
}

/// Scans markup into plain text and wrap rules.
#[derive(Debug, Clone, Default)]
pub struct MarkupScanner {
    config: MarkupConfig,
}

impl MarkupScanner {
    /// Create a scanner with the given configuration.
    #[must_use]
    pub fn new(config: MarkupConfig) -> Self {
        Self { config }
    }

    /// Scan `markup`.
    ///
    /// Tags that cannot be paired are kept as literal text and reported in
    /// [`Bootstrap::warnings`], unless the scanner is strict.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::Malformed`] for the first unpaired tag when the
    /// configuration is strict.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloss_markup::MarkupScanner;
    ///
    /// let scanned = MarkupScanner::default().scan("A <i>sentence with</i> some markup.")?;
    /// assert_eq!(scanned.text, "A sentence with some markup.");
    /// assert_eq!(scanned.rules.len(), 1);
    /// # Ok::<(), gloss_markup::MarkupError>(())
    /// ```
    pub fn scan(&self, markup: &str) -> Result<Bootstrap, MarkupError> {
        let mut flattener = Flattener {
            scanner: self,
            pairs: self.pair_tags(markup),
            text: String::with_capacity(markup.len()),
            chars: 0,
            rules: Vec::new(),
            warnings: Vec::new(),
        };
        flattener.flatten(markup, 0, markup.len())?;

        let bootstrap = Bootstrap {
            text: flattener.text,
            rules: flattener.rules.into_iter().flatten().collect(),
            warnings: flattener.warnings,
        };
        tracing::debug!(
            rule_count = bootstrap.rules.len(),
            text_len = flattener.chars,
            "Scanned markup"
        );
        Ok(bootstrap)
    }

    fn role(&self, literal: &str) -> Role {
        // `a < b > c` is text, not a tag.
        let Some(name) = element_name(literal) else {
            return Role::Literal;
        };
        match TagKind::of(literal) {
            TagKind::Close => Role::Close,
            TagKind::SelfClosing | TagKind::Declaration => Role::Literal,
            TagKind::Open if self.config.is_void(name) => Role::Literal,
            TagKind::Open => Role::Open,
        }
    }

    /// Pair open and close tags by depth in a single pass.
    ///
    /// Maps the byte offset of each paired open tag to the byte range of its
    /// close tag. Open tags left on the stack at the end are unmatched.
    fn pair_tags(&self, markup: &str) -> HashMap<usize, Range<usize>> {
        let mut pairs = HashMap::new();
        let mut open = Vec::new();
        let mut position = 0;
        while let Some(tag) = find_tag(markup, position) {
            match self.role(&markup[tag.clone()]) {
                Role::Open => open.push(tag.start),
                Role::Close => {
                    if let Some(start) = open.pop() {
                        pairs.insert(start, tag.clone());
                    }
                }
                Role::Literal => {}
            }
            position = tag.end;
        }
        pairs
    }
}

/// Accumulates plain text and rules during one scan.
struct Flattener<'s> {
    scanner: &'s MarkupScanner,
    /// Close tag range for every paired open tag, keyed by open tag offset.
    pairs: HashMap<usize, Range<usize>>,
    text: String,
    /// Characters in `text` so far.
    chars: usize,
    /// Slots are reserved before an element's content is scanned so rules
    /// stay in pre-order; a slot is `None` only while its content is pending.
    rules: Vec<Option<TagRule>>,
    warnings: Vec<MarkupWarning>,
}

impl Flattener<'_> {
    /// Flatten `markup[rest..end]`, appending to the text and rules gathered so far.
    fn flatten(&mut self, markup: &str, mut rest: usize, end: usize) -> Result<(), MarkupError> {
        loop {
            let Some(tag) = find_tag(markup, rest).filter(|tag| tag.end <= end) else {
                self.push_text(&markup[rest..end]);
                return Ok(());
            };
            self.push_text(&markup[rest..tag.start]);
            let literal = &markup[tag.clone()];

            match self.scanner.role(literal) {
                Role::Literal => self.push_text(literal),
                Role::Close => {
                    self.recover(MarkupWarning::StrayClose {
                        tag: literal.to_owned(),
                        offset: tag.start,
                    })?;
                    self.push_text(literal);
                }
                Role::Open => {
                    if let Some(close) = self.pairs.get(&tag.start).cloned() {
                        self.element(markup, tag, close.clone())?;
                        rest = close.end;
                        continue;
                    }
                    self.recover(MarkupWarning::UnmatchedOpen {
                        tag: literal.to_owned(),
                        offset: tag.start,
                    })?;
                    self.push_text(literal);
                }
            }
            rest = tag.end;
        }
    }

    /// Flatten a matched pair and record its wrap rule.
    fn element(
        &mut self,
        markup: &str,
        open: Range<usize>,
        close: Range<usize>,
    ) -> Result<(), MarkupError> {
        let start = self.chars;
        let slot = self.rules.len();
        self.rules.push(None);

        self.flatten(markup, open.end, close.start)?;

        let open = &markup[open];
        let close = &markup[close];
        let span = Span::new(start, self.chars);
        if span.is_empty() {
            // Nothing to anchor an empty element to; keep it verbatim.
            self.rules.truncate(slot);
            self.push_text(open);
            self.push_text(close);
        } else {
            self.rules[slot] = Some(TagRule {
                span,
                open: open.to_owned(),
                close: close.to_owned(),
            });
        }
        Ok(())
    }

    fn recover(&mut self, warning: MarkupWarning) -> Result<(), MarkupError> {
        if self.scanner.config.strict {
            let (kind, tag, offset) = match warning {
                MarkupWarning::UnmatchedOpen { tag, offset } => ("unmatched open", tag, offset),
                MarkupWarning::StrayClose { tag, offset } => ("stray close", tag, offset),
            };
            return Err(MarkupError::Malformed { kind, tag, offset });
        }
        tracing::warn!(?warning, "Keeping unpaired tag as literal text");
        self.warnings.push(warning);
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
        self.chars += text.chars().count();
    }
}
