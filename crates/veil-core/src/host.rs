//! Host source-retention policy hook.
//!
//! An out-of-band host switch may drop source text entirely (a memory
//! concern, not a visibility one). The renderer asks this narrow interface
//! before falling back to stored source; the answer can only ever *add*
//! redaction. Tag-driven redaction is a strict superset guarantee and wins
//! even when the host says source is available.

/// Query interface the host implements.
pub trait SourcePolicy {
    /// Is source text available for the unit identified by `file`?
    ///
    /// `file` is `None` for units without a file identity (eval text).
    fn source_available(&self, file: Option<&str>) -> bool;
}

/// Default policy: the host retained all source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetainAll;

impl SourcePolicy for RetainAll {
    fn source_available(&self, _file: Option<&str>) -> bool {
        true
    }
}

/// Host dropped every unit's source text (e.g. a low-memory embedding).
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardAll;

impl SourcePolicy for DiscardAll {
    fn source_available(&self, _file: Option<&str>) -> bool {
        false
    }
}
