//! Lexical scope tree for one source unit.
//!
//! Scopes live in an index arena owned by the tree: a `ScopeId` is a plain
//! index into the unit's scope table, so child records can point back at
//! their scope without owning it and the tree stays acyclic by
//! construction. The tree is built once during parsing and only read
//! afterwards.

use smallvec::SmallVec;
use strum_macros::{Display, IntoStaticStr};

use crate::tag::{Directive, VisibilityTag};

/// Index of a scope within its unit's scope table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScopeId(pub u32);

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Byte range of a construct in its unit's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// What kind of syntactic construct introduced a scope.
///
/// Only `Program`, `FunctionBody`, and `ClassBody` may carry a directive
/// prologue; plain blocks appear in the tree so nesting is mirrored
/// exactly, but never declare anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ScopeKind {
    Program,
    FunctionBody,
    ClassBody,
    Block,
}

/// One node of the scope tree.
#[derive(Debug, Clone)]
pub struct ScopeData {
    parent: Option<ScopeId>,
    children: SmallVec<[ScopeId; 4]>,
    kind: ScopeKind,
    span: Span,
    declared: Option<Directive>,
    effective: VisibilityTag,
}

impl ScopeData {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// The directive this scope's own prologue declared, if any.
    pub fn declared(&self) -> Option<Directive> {
        self.declared
    }

    /// The resolved, inherited visibility level for this scope.
    pub fn effective(&self) -> VisibilityTag {
        self.effective
    }

    /// The tag this scope's own prologue asks for, `Normal` when silent.
    pub fn declared_tag(&self) -> VisibilityTag {
        self.declared.map(Directive::tag).unwrap_or_default()
    }
}

/// The scope tree of one source unit.
///
/// The root is always `ScopeId(0)`. Mutation is only possible through the
/// builder-facing methods; once the owning `SourceUnit` is constructed the
/// tree is resolved and exposed read-only.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
}

impl ScopeTree {
    /// The root scope of every tree.
    pub const ROOT: ScopeId = ScopeId(0);

    /// Create a tree containing only the root scope.
    pub fn new(root_kind: ScopeKind, span: Span) -> Self {
        Self {
            scopes: vec![ScopeData {
                parent: None,
                children: SmallVec::new(),
                kind: root_kind,
                span,
                declared: None,
                effective: VisibilityTag::Normal,
            }],
        }
    }

    /// Number of scopes in the tree (root included).
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        false // the root always exists
    }

    /// Append a child scope under `parent` and return its id.
    pub(crate) fn add_child(&mut self, parent: ScopeId, kind: ScopeKind, span: Span) -> ScopeId {
        debug_assert!((parent.0 as usize) < self.scopes.len(), "bad parent id");
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData {
            parent: Some(parent),
            children: SmallVec::new(),
            kind,
            span,
            declared: None,
            effective: VisibilityTag::Normal,
        });
        self.scopes[parent.0 as usize].children.push(id);
        id
    }

    /// Record a directive declared in `id`'s prologue.
    ///
    /// Duplicate and conflicting directives fold with max: the stricter one
    /// wins, matching prologue semantics where duplicates are tolerated
    /// rather than rejected.
    pub(crate) fn declare(&mut self, id: ScopeId, directive: Directive) {
        let slot = &mut self.scopes[id.0 as usize].declared;
        *slot = Some(match *slot {
            Some(existing) => existing.max(directive),
            None => directive,
        });
    }

    pub(crate) fn set_effective(&mut self, id: ScopeId, tag: VisibilityTag) {
        self.scopes[id.0 as usize].effective = tag;
    }

    /// Borrow a scope's data.
    pub fn get(&self, id: ScopeId) -> &ScopeData {
        &self.scopes[id.0 as usize]
    }

    /// The resolved effective tag of a scope. O(1).
    #[inline]
    pub fn effective(&self, id: ScopeId) -> VisibilityTag {
        self.get(id).effective
    }

    /// Iterate all scope ids in creation order (root first).
    pub fn iter_ids(&self) -> impl Iterator<Item = ScopeId> + '_ {
        (0..self.scopes.len() as u32).map(ScopeId)
    }
}
