//! Annotation sessions over a fixed base text.

use gloss_markup::{MarkupConfig, MarkupScanner, MarkupWarning, closing_tag};
use gloss_rules::{RuleTree, Span, Transform, apply, find_occurrence};

use crate::Error;

/// A base text plus the rules layered over it.
///
/// The base text never changes; edits only add rules, and [`apply`](Self::apply)
/// renders them. Targets are literal substrings of the base text, looked up
/// by occurrence (1 for the first match).
///
/// # Example
///
/// ```
/// use gloss::Session;
///
/// let mut session = Session::from_markup("A <i>sentence with</i> some markup.")?;
/// session.wrap_in("<b>", "with some")?;
/// assert_eq!(
///     session.apply(),
///     "A <i>sentence <b>with</b></i><b> some</b> markup."
/// );
/// # Ok::<(), gloss::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    text: String,
    tree: RuleTree,
    warnings: Vec<MarkupWarning>,
}

impl Session {
    /// Start a session over plain text.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let tree = RuleTree::new(text.chars().count());
        Self {
            text,
            tree,
            warnings: Vec::new(),
        }
    }

    /// Start a session over markup, using the default scanner configuration.
    ///
    /// The base text is the markup with its tags removed; every matched tag
    /// pair becomes a wrap rule, so [`apply`](Self::apply) without further
    /// edits returns the markup. Unpaired tags are kept as literal text and
    /// listed in [`warnings`](Self::warnings).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Markup`] if the tag rules cannot be registered.
    pub fn from_markup(markup: &str) -> Result<Self, Error> {
        Self::from_markup_with(markup, MarkupConfig::default())
    }

    /// Start a session over markup with an explicit scanner configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Markup`] for unpaired tags when `config.strict` is set.
    pub fn from_markup_with(markup: &str, config: MarkupConfig) -> Result<Self, Error> {
        let scanned = MarkupScanner::new(config).scan(markup)?;
        let tree = scanned.rule_tree()?;
        Ok(Self {
            text: scanned.text,
            tree,
            warnings: scanned.warnings,
        })
    }

    /// The base text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The rules registered so far.
    #[must_use]
    pub fn rules(&self) -> &RuleTree {
        &self.tree
    }

    /// Tags kept as literal text while scanning markup.
    #[must_use]
    pub fn warnings(&self) -> &[MarkupWarning] {
        &self.warnings
    }

    /// Wrap the first occurrence of `target` in `open_tag` and its closing tag.
    ///
    /// Existing rules win where the target crosses their boundaries: the
    /// wrap is split so each piece stays properly nested.
    ///
    /// # Errors
    ///
    /// Fails without changing the session if `target` is not found or
    /// `open_tag` is not an open tag.
    pub fn wrap_in(&mut self, open_tag: &str, target: &str) -> Result<(), Error> {
        self.wrap_in_nth(open_tag, target, 1)
    }

    /// Like [`wrap_in`](Self::wrap_in), for the `occurrence`-th match of `target`.
    ///
    /// # Errors
    ///
    /// Fails without changing the session if `target` is not found or
    /// `open_tag` is not an open tag.
    pub fn wrap_in_nth(
        &mut self,
        open_tag: &str,
        target: &str,
        occurrence: usize,
    ) -> Result<(), Error> {
        let span = self.locate(target, occurrence)?;
        self.wrap_span(open_tag, span)
    }

    /// Wrap the first occurrence of `target` so the new tag is outermost.
    ///
    /// Existing rules crossing the target's boundaries are split instead of
    /// the new wrap, and rules covering exactly the target end up inside it.
    ///
    /// # Errors
    ///
    /// Fails without changing the session if `target` is not found or
    /// `open_tag` is not an open tag.
    pub fn wrap_out(&mut self, open_tag: &str, target: &str) -> Result<(), Error> {
        self.wrap_out_nth(open_tag, target, 1)
    }

    /// Like [`wrap_out`](Self::wrap_out), for the `occurrence`-th match of `target`.
    ///
    /// # Errors
    ///
    /// Fails without changing the session if `target` is not found or
    /// `open_tag` is not an open tag.
    pub fn wrap_out_nth(
        &mut self,
        open_tag: &str,
        target: &str,
        occurrence: usize,
    ) -> Result<(), Error> {
        let span = self.locate(target, occurrence)?;
        let transform = wrap_transform(open_tag)?;
        tracing::debug!(%span, open_tag, "Wrapping outermost");
        self.tree.insert_outermost(span, transform)?;
        Ok(())
    }

    /// Replace the first occurrence of `target` with `replacement`.
    ///
    /// # Errors
    ///
    /// Fails without changing the session if `target` is not found.
    pub fn replace(&mut self, replacement: &str, target: &str) -> Result<(), Error> {
        self.replace_nth(replacement, target, 1)
    }

    /// Like [`replace`](Self::replace), for the `occurrence`-th match of `target`.
    ///
    /// # Errors
    ///
    /// Fails without changing the session if `target` is not found.
    pub fn replace_nth(
        &mut self,
        replacement: &str,
        target: &str,
        occurrence: usize,
    ) -> Result<(), Error> {
        let span = self.locate(target, occurrence)?;
        self.replace_span(replacement, span)
    }

    /// Replace the `occurrence`-th match of `target` with the output of `f`.
    ///
    /// `f` receives the text occupying the span at application time, with
    /// edits from rules nested inside it already made.
    ///
    /// # Errors
    ///
    /// Fails without changing the session if `target` is not found.
    pub fn replace_with(
        &mut self,
        target: &str,
        occurrence: usize,
        f: impl Fn(&str) -> String + 'static,
    ) -> Result<(), Error> {
        let span = self.locate(target, occurrence)?;
        tracing::debug!(%span, "Replacing with computed text");
        self.tree.insert(span, Transform::replace_with(f))?;
        Ok(())
    }

    /// Wrap an explicit character span in `open_tag` and its closing tag.
    ///
    /// # Errors
    ///
    /// Fails without changing the session if `span` runs past the text or
    /// `open_tag` is not an open tag.
    pub fn wrap_span(&mut self, open_tag: &str, span: Span) -> Result<(), Error> {
        let transform = wrap_transform(open_tag)?;
        tracing::debug!(%span, open_tag, "Wrapping");
        self.tree.insert(span, transform)?;
        Ok(())
    }

    /// Replace an explicit character span with `replacement`.
    ///
    /// # Errors
    ///
    /// Fails without changing the session if `span` runs past the text.
    pub fn replace_span(&mut self, replacement: &str, span: Span) -> Result<(), Error> {
        tracing::debug!(%span, replacement, "Replacing");
        self.tree.insert(span, Transform::replace(replacement))?;
        Ok(())
    }

    /// Render the base text with every rule applied.
    #[must_use]
    pub fn apply(&self) -> String {
        apply(&self.tree, &self.text)
    }

    fn locate(&self, target: &str, occurrence: usize) -> Result<Span, Error> {
        Ok(find_occurrence(&self.text, target, occurrence)?)
    }
}

fn wrap_transform(open_tag: &str) -> Result<Transform, Error> {
    let close = closing_tag(open_tag)?;
    Ok(Transform::wrap(open_tag, close))
}
