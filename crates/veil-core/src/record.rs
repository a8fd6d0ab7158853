//! The function record store.
//!
//! One record per runtime instantiation of a declaration. The visibility
//! tag is stamped onto the record as a plain value when it is created and
//! the public contract has no update operation, so "uncensoring" a record
//! is structurally impossible, not merely forbidden by policy.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::RwLock;

use crate::tag::VisibilityTag;
use crate::tree::{ScopeId, Span};
use crate::unit::{DeclId, DeclKind, LineCol, SourceUnit};

static NEXT_FUNCTION_ID: AtomicU32 = AtomicU32::new(1);

/// Unique monotonic id of a function record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub u32);

impl std::fmt::Display for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-function runtime metadata.
///
/// Carries enough provenance to render the function (source handle, span,
/// kind, position) but exposes none of it when the tag says otherwise.
/// All fields are private and immutable behind accessors.
#[derive(Debug)]
pub struct FunctionRecord {
    id: FunctionId,
    kind: DeclKind,
    name: Option<String>,
    tag: VisibilityTag,
    span: Span,
    pos: LineCol,
    source: Arc<str>,
    file: Option<Arc<str>>,
    declaring_scope: ScopeId,
}

impl FunctionRecord {
    pub fn id(&self) -> FunctionId {
        self.id
    }

    pub fn kind(&self) -> DeclKind {
        self.kind
    }

    /// The display name, if the declaration had one (directly or inferred
    /// from its binding).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The visibility tag. Constant for the lifetime of the record.
    #[inline]
    pub fn tag(&self) -> VisibilityTag {
        self.tag
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Declaration position (1-based line/column).
    pub fn pos(&self) -> LineCol {
        self.pos
    }

    /// File identity of the declaring unit, if any.
    pub fn file(&self) -> Option<&Arc<str>> {
        self.file.as_ref()
    }

    /// Scope id of the declaring scope, for diagnostics only.
    pub fn declaring_scope(&self) -> ScopeId {
        self.declaring_scope
    }

    /// The verbatim source slice of the declaration.
    ///
    /// Provenance for rendering; callers must go through
    /// [`crate::stringify::stringify`] for anything user-visible.
    pub fn source_slice(&self) -> &str {
        self.source.get(self.span.start..self.span.end).unwrap_or("")
    }
}

/// Append-only store of function records.
///
/// `create` is called by the evaluator whenever a function or class value
/// is instantiated; `tag_of` is the O(1) read side. There is deliberately
/// no update operation.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<HashMap<FunctionId, Arc<FunctionRecord>>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate a record for `decl` of `unit`.
    ///
    /// The effective tag of the declaration's body scope is copied here,
    /// exactly once. Multiple calls for the same declaration model closure
    /// factories: distinct records, one shared tag.
    pub fn create(&self, unit: &SourceUnit, decl: DeclId) -> Arc<FunctionRecord> {
        let d = unit.decl(decl);
        let record = Arc::new(FunctionRecord {
            id: FunctionId(NEXT_FUNCTION_ID.fetch_add(1, Ordering::SeqCst)),
            kind: d.kind,
            name: d.name.clone(),
            tag: unit.tag_of_decl(decl),
            span: d.span,
            pos: d.pos,
            source: unit.text().clone(),
            file: unit.name().cloned(),
            declaring_scope: d.body_scope,
        });
        self.records.write().insert(record.id, record.clone());
        record
    }

    /// Instantiate records for every declaration in a unit, in order.
    pub fn create_all(&self, unit: &SourceUnit) -> Vec<Arc<FunctionRecord>> {
        unit.decl_ids().map(|id| self.create(unit, id)).collect()
    }

    /// Look up a record by id.
    pub fn get(&self, id: FunctionId) -> Option<Arc<FunctionRecord>> {
        self.records.read().get(&id).cloned()
    }

    /// Read a record's tag. O(1); `None` only for ids this store never
    /// issued (reading before creation is prevented by construction
    /// order).
    pub fn tag_of(&self, id: FunctionId) -> Option<VisibilityTag> {
        self.records.read().get(&id).map(|r| r.tag)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
