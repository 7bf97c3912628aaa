//! Tag lookup and classification.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::MarkupError;

/// A tag: `<` followed by anything but angle brackets, then `>`.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("invalid tag regex"));

/// Element name after `<` or `</`.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^</?([^\s/>]+)").expect("invalid tag name regex"));

/// Syntactic kind of a tag literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`
    Open,
    /// `</name>`
    Close,
    /// `<name ... />`
    SelfClosing,
    /// `<!-- ... -->`, `<!DOCTYPE ...>`, `<?xml ...?>`
    Declaration,
}

impl TagKind {
    /// Classify a tag literal such as `<b>` or `</b>`.
    #[must_use]
    pub fn of(literal: &str) -> Self {
        if literal.starts_with("<!") || literal.starts_with("<?") {
            Self::Declaration
        } else if literal.starts_with("</") {
            Self::Close
        } else if literal.ends_with("/>") {
            Self::SelfClosing
        } else {
            Self::Open
        }
    }
}

/// Element name of a tag literal: `b` for `<b class="x">` and for `</b>`.
#[must_use]
pub fn element_name(literal: &str) -> Option<&str> {
    NAME_PATTERN
        .captures(literal)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Closing tag matching an open-tag literal.
///
/// # Errors
///
/// Returns [`MarkupError::InvalidTag`] unless `open` is an open tag with an
/// element name.
///
/// # Examples
///
/// ```
/// use gloss_markup::closing_tag;
///
/// assert_eq!(closing_tag("<a href=\"/\">").unwrap(), "</a>");
/// assert!(closing_tag("</a>").is_err());
/// ```
pub fn closing_tag(open: &str) -> Result<String, MarkupError> {
    let invalid = || MarkupError::InvalidTag(open.to_owned());
    if !TAG_PATTERN.find(open).is_some_and(|m| m.range() == (0..open.len())) {
        return Err(invalid());
    }
    if TagKind::of(open) != TagKind::Open {
        return Err(invalid());
    }
    let name = element_name(open).ok_or_else(invalid)?;
    Ok(format!("</{name}>"))
}

/// Byte range of the first tag at or after `from`.
pub(crate) fn find_tag(markup: &str, from: usize) -> Option<Range<usize>> {
    TAG_PATTERN.find_at(markup, from).map(|m| m.range())
}
