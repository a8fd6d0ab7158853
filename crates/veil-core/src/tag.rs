//! Visibility tags and the directive strings that introduce them.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// How much of a declaration is hidden from introspection.
///
/// Totally ordered by strictness: `Normal < HideSource < Sensitive`.
/// `Sensitive` implies every guarantee of `HideSource` plus stack-frame
/// omission. Tags are plain values; once stamped onto a record at creation
/// there is no operation anywhere that changes one.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum VisibilityTag {
    /// Full source and full stack positions are observable.
    #[default]
    Normal,
    /// Stringification is redacted; stack frames lose position data.
    HideSource,
    /// Everything of `HideSource`, and the frame vanishes from traces.
    Sensitive,
}

impl VisibilityTag {
    /// True if stringification must be redacted for this tag.
    #[inline]
    pub fn hides_source(self) -> bool {
        self >= VisibilityTag::HideSource
    }

    /// True if stack frames carrying this tag are omitted from traces.
    #[inline]
    pub fn omits_frame(self) -> bool {
        self == VisibilityTag::Sensitive
    }

    /// Static string form (kebab-case, matches `Display`).
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

/// A recognized directive-prologue string.
///
/// Ordered by strictness so conflicting directives in one prologue fold
/// deterministically to the stricter one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Directive {
    HideSource,
    Sensitive,
}

impl Directive {
    /// The exact source text of the hide-source directive.
    pub const HIDE_SOURCE: &'static str = "hide source";
    /// The exact source text of the sensitive directive.
    pub const SENSITIVE: &'static str = "sensitive";

    /// Recognize a directive from the raw characters of a string literal.
    ///
    /// Matching is exact, not normalized: no trimming, no case folding, no
    /// unescaping. Anything else is an inert statement, never an error
    /// (unrecognized directives are tolerated for forward compatibility).
    pub fn recognize(raw: &str) -> Option<Directive> {
        match raw {
            Self::HIDE_SOURCE => Some(Directive::HideSource),
            Self::SENSITIVE => Some(Directive::Sensitive),
            _ => None,
        }
    }

    /// The visibility tag this directive requests.
    #[inline]
    pub fn tag(self) -> VisibilityTag {
        match self {
            Directive::HideSource => VisibilityTag::HideSource,
            Directive::Sensitive => VisibilityTag::Sensitive,
        }
    }
}
