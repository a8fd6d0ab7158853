//! Parsed source units and the builder front ends drive.
//!
//! A front end (e.g. `veil-js`) walks its parse tree and narrates what it
//! sees to a [`UnitBuilder`]: scopes entered and left, directives found in
//! prologue position, function and class declarations, and direct-eval
//! call sites. `finish` resolves the scope tree once and seals everything
//! into an immutable [`SourceUnit`].

use std::sync::Arc;

use strum_macros::{Display, IntoStaticStr};

use crate::resolve::resolve_tree;
use crate::tag::{Directive, VisibilityTag};
use crate::tree::{ScopeId, ScopeKind, ScopeTree, Span};

/// Index of a declaration within its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(pub u32);

impl std::fmt::Display for DeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The declared kind of a function-like construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum DeclKind {
    Function,
    Arrow,
    Method,
    ClassConstructor,
    Accessor,
}

/// 1-based line/column position in a source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One function, method, accessor, or class declaration found at parse
/// time.
///
/// `body_scope` is the scope the declaration itself introduces; its
/// effective tag is the declaration-site tag, so a directive in a function
/// body hides that very function. The tag belongs to the declaration site:
/// every runtime instantiation of this declaration (closure factories
/// included) shares it.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub kind: DeclKind,
    pub name: Option<String>,
    pub span: Span,
    pub pos: LineCol,
    pub body_scope: ScopeId,
}

/// A syntactically direct `eval(...)` call site and its enclosing scope.
#[derive(Debug, Clone)]
pub struct EvalSite {
    pub scope: ScopeId,
    pub span: Span,
    pub pos: LineCol,
}

/// One parsed program or evaluated text, immutable after construction.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    name: Option<Arc<str>>,
    text: Arc<str>,
    tree: ScopeTree,
    decls: Vec<FunctionDecl>,
    eval_sites: Vec<EvalSite>,
}

impl SourceUnit {
    /// File identity of the unit, if it has one (eval units do not).
    pub fn name(&self) -> Option<&Arc<str>> {
        self.name.as_ref()
    }

    /// The raw source text, shared so records can outlive the unit.
    pub fn text(&self) -> &Arc<str> {
        &self.text
    }

    /// The resolved scope tree.
    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    /// All declarations, in source order of their body scopes.
    pub fn decls(&self) -> &[FunctionDecl] {
        &self.decls
    }

    pub fn decl(&self, id: DeclId) -> &FunctionDecl {
        &self.decls[id.0 as usize]
    }

    /// Ids of all declarations.
    pub fn decl_ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.decls.len() as u32).map(DeclId)
    }

    /// Direct-eval call sites observed in this unit.
    pub fn eval_sites(&self) -> &[EvalSite] {
        &self.eval_sites
    }

    /// The declaration-site tag of a declaration: the effective tag of the
    /// scope its own body introduces.
    pub fn tag_of_decl(&self, id: DeclId) -> VisibilityTag {
        self.tree.effective(self.decl(id).body_scope)
    }

    /// The ambient tag a direct eval at `site` inherits.
    pub fn eval_ambient(&self, site: &EvalSite) -> VisibilityTag {
        self.tree.effective(site.scope)
    }

    /// Slice the source text for a span. Out-of-range spans yield "".
    pub fn source_slice(&self, span: Span) -> &str {
        self.text.get(span.start..span.end).unwrap_or("")
    }

    /// Find a declaration by display name (first match, for diagnostics
    /// and tests).
    pub fn decl_by_name(&self, name: &str) -> Option<DeclId> {
        self.decls
            .iter()
            .position(|d| d.name.as_deref() == Some(name))
            .map(|i| DeclId(i as u32))
    }
}

/// Incrementally builds a [`SourceUnit`] during one parse.
///
/// Scope entry/exit must nest properly; `finish` checks the builder is
/// back at the root. The builder is the only place the scope tree is ever
/// mutable.
#[derive(Debug)]
pub struct UnitBuilder {
    name: Option<Arc<str>>,
    text: Arc<str>,
    tree: ScopeTree,
    decls: Vec<FunctionDecl>,
    eval_sites: Vec<EvalSite>,
    stack: Vec<ScopeId>,
}

impl UnitBuilder {
    /// Start a unit over `text`. The root `Program` scope spans the whole
    /// text and is current.
    pub fn new(name: Option<&str>, text: &str) -> Self {
        let tree = ScopeTree::new(ScopeKind::Program, Span::new(0, text.len()));
        Self {
            name: name.map(Arc::from),
            text: Arc::from(text),
            tree,
            decls: Vec::new(),
            eval_sites: Vec::new(),
            stack: vec![ScopeTree::ROOT],
        }
    }

    /// The innermost open scope.
    pub fn current_scope(&self) -> ScopeId {
        *self.stack.last().expect("builder stack never empties")
    }

    /// Open a child scope under the current one and make it current.
    pub fn enter_scope(&mut self, kind: ScopeKind, span: Span) -> ScopeId {
        let id = self.tree.add_child(self.current_scope(), kind, span);
        self.stack.push(id);
        id
    }

    /// Close the current scope. The root cannot be left.
    pub fn leave_scope(&mut self) {
        debug_assert!(self.stack.len() > 1, "cannot leave the root scope");
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Report a string found in the current scope's directive prologue.
    ///
    /// Returns true if the string is a recognized directive. Unrecognized
    /// strings are inert and do not terminate the prologue; the caller
    /// keeps scanning.
    pub fn directive(&mut self, raw: &str) -> bool {
        match Directive::recognize(raw) {
            Some(directive) => {
                tracing::debug!(scope = %self.current_scope(), %directive, "directive recognized");
                self.tree.declare(self.current_scope(), directive);
                true
            }
            None => false,
        }
    }

    /// Record a declaration whose body introduced `body_scope`.
    pub fn add_decl(
        &mut self,
        kind: DeclKind,
        name: Option<&str>,
        span: Span,
        pos: LineCol,
        body_scope: ScopeId,
    ) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(FunctionDecl {
            kind,
            name: name.map(str::to_owned),
            span,
            pos,
            body_scope,
        });
        id
    }

    /// Record a direct-eval call site in the current scope.
    pub fn record_eval_site(&mut self, span: Span, pos: LineCol) {
        self.eval_sites.push(EvalSite {
            scope: self.current_scope(),
            span,
            pos,
        });
    }

    /// Resolve the tree under `ambient` and seal the unit.
    ///
    /// This is the single point where effective tags come into existence;
    /// nothing after it can revisit them.
    pub fn finish(mut self, ambient: VisibilityTag) -> SourceUnit {
        debug_assert_eq!(self.stack.len(), 1, "unbalanced scope entry/exit");
        resolve_tree(&mut self.tree, ambient);
        SourceUnit {
            name: self.name,
            text: self.text,
            tree: self.tree,
            decls: self.decls,
            eval_sites: self.eval_sites,
        }
    }
}
