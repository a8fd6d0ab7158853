//! Visibility inheritance across eval boundaries.
//!
//! A direct `eval` call executes with the visibility ambience of the scope
//! enclosing the call site, so code it compiles starts from that tag as a
//! floor. An indirect eval runs as a fresh top-level script and always
//! starts from `Normal`, regardless of where the reference was obtained.

use crate::tag::VisibilityTag;
use crate::unit::{EvalSite, SourceUnit};

/// How an eval invocation reached the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// Syntactic `eval(...)` at a known call site.
    Direct { ambient: VisibilityTag },
    /// Called through an alias or extracted reference.
    Indirect,
}

impl EvalMode {
    /// Direct eval at `site`, inheriting the effective tag of the scope
    /// that lexically encloses the call.
    pub fn direct_from(unit: &SourceUnit, site: &EvalSite) -> Self {
        EvalMode::Direct {
            ambient: unit.eval_ambient(site),
        }
    }

    /// The ambient tag the evaluated text is resolved under.
    pub fn ambient(&self) -> VisibilityTag {
        match self {
            EvalMode::Direct { ambient } => *ambient,
            EvalMode::Indirect => VisibilityTag::Normal,
        }
    }
}
