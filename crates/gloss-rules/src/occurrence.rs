//! Literal occurrence lookup.

use crate::{RuleError, Span};

/// Locate the `occurrence`-th (1-based) non-overlapping match of `target` in `context`.
///
/// Matches are literal and found left to right; each search resumes after
/// the end of the previous match. The returned span is in characters.
///
/// # Examples
///
/// ```
/// use gloss_rules::{Span, find_occurrence};
///
/// assert_eq!(find_occurrence("ababab", "ab", 2), Ok(Span::new(2, 4)));
/// assert!(find_occurrence("ababab", "ab", 4).is_err());
/// ```
pub fn find_occurrence(context: &str, target: &str, occurrence: usize) -> Result<Span, RuleError> {
    let not_found = || RuleError::OccurrenceNotFound {
        target: target.to_owned(),
        occurrence,
    };

    if target.is_empty() || occurrence == 0 {
        return Err(not_found());
    }

    let mut position = 0;
    let mut count = 0;
    while let Some(found) = context[position..].find(target) {
        let start = position + found;
        let end = start + target.len();
        count += 1;
        if count == occurrence {
            let char_start = context[..start].chars().count();
            let char_len = target.chars().count();
            return Ok(Span::new(char_start, char_start + char_len));
        }
        position = end;
    }

    Err(not_found())
}
