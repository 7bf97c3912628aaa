//! Edit operations attached to rules.

use std::fmt;
use std::rc::Rc;

/// Function computing replacement text from the text a rule covers.
pub type ReplaceFn = Rc<dyn Fn(&str) -> String>;

/// Edit applied to the text occupying a rule's span.
#[derive(Clone)]
pub enum Transform {
    /// Output equals input. Only used by the root rule.
    Identity,
    /// Output is the replacement, input is discarded.
    Replace(Replacement),
    /// Output is `prefix + input + suffix`.
    Wrap {
        /// Text inserted before the input (e.g. an open tag).
        prefix: String,
        /// Text inserted after the input (e.g. a close tag).
        suffix: String,
    },
}

/// Replacement payload: a literal string or a function of the covered text.
#[derive(Clone)]
pub enum Replacement {
    /// Fixed replacement text.
    Literal(String),
    /// Replacement computed from the text currently occupying the span,
    /// including edits already made by nested rules.
    Computed(ReplaceFn),
}

impl Transform {
    /// Literal replacement.
    #[must_use]
    pub fn replace(text: impl Into<String>) -> Self {
        Self::Replace(Replacement::Literal(text.into()))
    }

    /// Replacement computed by `f`.
    #[must_use]
    pub fn replace_with(f: impl Fn(&str) -> String + 'static) -> Self {
        Self::Replace(Replacement::Computed(Rc::new(f)))
    }

    /// Wrap in `prefix` and `suffix`.
    #[must_use]
    pub fn wrap(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self::Wrap {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Whether this is the identity transform.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Produce the output text for `input`.
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        match self {
            Self::Identity => input.to_owned(),
            Self::Replace(Replacement::Literal(text)) => text.clone(),
            Self::Replace(Replacement::Computed(f)) => f(input),
            Self::Wrap { prefix, suffix } => {
                let mut out = String::with_capacity(prefix.len() + input.len() + suffix.len());
                out.push_str(prefix);
                out.push_str(input);
                out.push_str(suffix);
                out
            }
        }
    }

    /// Divide this transform in two, cutting a replacement after `at` characters.
    ///
    /// A literal replacement keeps its first `at` characters in the first
    /// transform and the rest in the second; `at` past the end leaves the
    /// second empty. Wraps and computed replacements are duplicated so each
    /// fragment carries the whole edit.
    #[must_use]
    pub fn split(&self, at: usize) -> (Transform, Transform) {
        match self {
            Self::Replace(Replacement::Literal(text)) => {
                let cut = text.char_indices().nth(at).map_or(text.len(), |(i, _)| i);
                (
                    Self::replace(&text[..cut]),
                    Self::replace(&text[cut..]),
                )
            }
            Self::Identity | Self::Replace(Replacement::Computed(_)) | Self::Wrap { .. } => {
                (self.clone(), self.clone())
            }
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("Identity"),
            Self::Replace(replacement) => f.debug_tuple("Replace").field(replacement).finish(),
            Self::Wrap { prefix, suffix } => f
                .debug_struct("Wrap")
                .field("prefix", prefix)
                .field("suffix", suffix)
                .finish(),
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Identity, Self::Identity) => true,
            (Self::Replace(a), Self::Replace(b)) => a == b,
            (
                Self::Wrap { prefix, suffix },
                Self::Wrap {
                    prefix: other_prefix,
                    suffix: other_suffix,
                },
            ) => prefix == other_prefix && suffix == other_suffix,
            _ => false,
        }
    }
}

impl PartialEq for Replacement {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Computed(a), Self::Computed(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
