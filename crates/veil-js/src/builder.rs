//! Concrete-syntax-tree walker.
//!
//! Translates a tree-sitter JavaScript parse into a [`SourceUnit`]: scopes
//! for every body that can carry a directive prologue, one declaration per
//! function-like node, and an eval site for every syntactic `eval(...)`
//! call. Directive recognition is byte-exact, so escape sequences in a
//! string literal never match because the raw text between the quotes is
//! compared as written.

use tree_sitter::Node;
use veil_core::{DeclKind, LineCol, ScopeKind, SourceUnit, Span, UnitBuilder, VisibilityTag};

pub(crate) struct Walker<'a> {
    text: &'a str,
    builder: UnitBuilder,
}

fn span_of(node: Node) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn pos_of(node: Node) -> LineCol {
    let point = node.start_position();
    LineCol::new(point.row as u32 + 1, point.column as u32 + 1)
}

impl<'a> Walker<'a> {
    pub(crate) fn build(
        name: Option<&str>,
        text: &'a str,
        root: Node,
        ambient: VisibilityTag,
    ) -> SourceUnit {
        let mut walker = Walker {
            text,
            builder: UnitBuilder::new(name, text),
        };
        walker.scan_prologue(root);
        walker.walk_children(root);
        walker.builder.finish(ambient)
    }

    fn node_text(&self, node: Node) -> &'a str {
        self.text.get(node.start_byte()..node.end_byte()).unwrap_or("")
    }

    /// Scan the leading bare string statements of `body` and declare any
    /// recognized directives on the current scope. Unrecognized strings
    /// (like `"use strict"`) stay part of the prologue; the first
    /// non-string statement ends it.
    fn scan_prologue(&mut self, body: Node) {
        let mut cursor = body.walk();
        for stmt in body.named_children(&mut cursor) {
            if stmt.kind() != "expression_statement" {
                break;
            }
            let Some(expr) = stmt.named_child(0) else { break };
            if expr.kind() != "string" {
                break;
            }
            let quoted = self.node_text(expr);
            // Raw text between the quotes, exactly as written.
            if quoted.len() >= 2 {
                let raw = &quoted[1..quoted.len() - 1];
                self.builder.directive(raw);
            }
        }
    }

    /// Class bodies have no statement position, so a directive there is a
    /// leading value-less field definition whose name is a string literal:
    /// `class C { "hide source"; ... }`. Static, computed, or initialized
    /// fields are real members and end the prologue.
    fn scan_class_prologue(&mut self, body: Node) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() != "field_definition" {
                break;
            }
            if member.child_by_field_name("value").is_some() {
                break;
            }
            let mut members = member.walk();
            if member.children(&mut members).any(|c| c.kind() == "static") {
                break;
            }
            let Some(property) = member.child_by_field_name("property") else {
                break;
            };
            if property.kind() != "string" {
                break;
            }
            let quoted = self.node_text(property);
            if quoted.len() >= 2 {
                let raw = &quoted[1..quoted.len() - 1];
                self.builder.directive(raw);
            }
        }
    }

    fn walk_children(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.walk(child, None);
        }
    }

    /// `inferred` carries a name from the syntactic position (declarator,
    /// assignment target, property key) into anonymous function forms.
    fn walk(&mut self, node: Node, inferred: Option<&'a str>) {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                let name = self.name_field(node).or(inferred);
                self.handle_function(node, DeclKind::Function, name);
            }
            "function_expression" | "generator_function" => {
                let name = self.name_field(node).or(inferred);
                self.handle_function(node, DeclKind::Function, name);
            }
            "arrow_function" => self.handle_arrow(node, inferred),
            "class_declaration" | "class" => self.handle_class(node, inferred),
            "method_definition" => self.handle_method(node),
            "call_expression" => self.handle_call(node),
            "variable_declarator" => {
                let name = node
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| self.node_text(n));
                if let Some(value) = node.child_by_field_name("value") {
                    self.walk(value, name);
                }
            }
            "assignment_expression" => {
                let left = node.child_by_field_name("left");
                let name = left
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| self.node_text(n));
                if let Some(right) = node.child_by_field_name("right") {
                    self.walk(right, name);
                }
            }
            "pair" => {
                let name = node
                    .child_by_field_name("key")
                    .filter(|n| n.kind() == "property_identifier")
                    .map(|n| self.node_text(n));
                if let Some(value) = node.child_by_field_name("value") {
                    self.walk(value, name);
                }
            }
            "field_definition" => {
                let name = node
                    .child_by_field_name("property")
                    .map(|n| self.node_text(n));
                if let Some(value) = node.child_by_field_name("value") {
                    self.walk(value, name);
                }
            }
            "statement_block" => {
                // A bare block; function bodies are consumed by their
                // declaration handlers and never reach here. Blocks carry
                // no directive prologue, they only mirror nesting.
                self.builder.enter_scope(ScopeKind::Block, span_of(node));
                self.walk_children(node);
                self.builder.leave_scope();
            }
            _ => self.walk_children(node),
        }
    }

    fn name_field(&self, node: Node) -> Option<&'a str> {
        node.child_by_field_name("name").map(|n| self.node_text(n))
    }

    /// Enter a function body scope, resolve its prologue, and walk its
    /// contents. Returns the scope the body introduced.
    fn enter_body(&mut self, body: Node) -> veil_core::ScopeId {
        let scope = self
            .builder
            .enter_scope(ScopeKind::FunctionBody, span_of(body));
        self.scan_prologue(body);
        self.walk_children(body);
        self.builder.leave_scope();
        scope
    }

    fn handle_function(&mut self, node: Node, kind: DeclKind, name: Option<&'a str>) {
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let scope = self.enter_body(body);
        self.builder
            .add_decl(kind, name, span_of(node), pos_of(node), scope);
    }

    fn handle_arrow(&mut self, node: Node, inferred: Option<&'a str>) {
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let scope = if body.kind() == "statement_block" {
            self.enter_body(body)
        } else {
            // Expression-bodied arrow: the body still forms a scope so
            // nested functions inherit through it, but there is no
            // statement position for a prologue.
            let scope = self
                .builder
                .enter_scope(ScopeKind::FunctionBody, span_of(body));
            self.walk(body, None);
            self.builder.leave_scope();
            scope
        };
        self.builder
            .add_decl(DeclKind::Arrow, inferred, span_of(node), pos_of(node), scope);
    }

    /// A class yields a single declaration. A directive prologue in its
    /// constructor body tags the class itself; other members resolve
    /// against the class body scope.
    fn handle_class(&mut self, node: Node, inferred: Option<&'a str>) {
        let name = self.name_field(node).or(inferred);
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let class_scope = self.builder.enter_scope(ScopeKind::ClassBody, span_of(body));
        self.scan_class_prologue(body);

        let mut ctor_scope = None;
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() == "method_definition" && self.is_constructor(member) {
                if let Some(ctor_body) = member.child_by_field_name("body") {
                    ctor_scope = Some(self.enter_body(ctor_body));
                }
            } else {
                self.walk(member, None);
            }
        }
        self.builder.leave_scope();

        let body_scope = ctor_scope.unwrap_or(class_scope);
        self.builder.add_decl(
            DeclKind::ClassConstructor,
            name,
            span_of(node),
            pos_of(node),
            body_scope,
        );
    }

    fn is_constructor(&self, method: Node) -> bool {
        method
            .child_by_field_name("name")
            .is_some_and(|n| n.kind() == "property_identifier" && self.node_text(n) == "constructor")
    }

    fn handle_method(&mut self, node: Node) {
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let kind = if self.is_accessor(node) {
            DeclKind::Accessor
        } else {
            DeclKind::Method
        };
        let name = self.name_field(node);
        let scope = self.enter_body(body);
        self.builder
            .add_decl(kind, name, span_of(node), pos_of(node), scope);
    }

    fn is_accessor(&self, method: Node) -> bool {
        let mut cursor = method.walk();
        method
            .children(&mut cursor)
            .any(|c| matches!(c.kind(), "get" | "set"))
    }

    /// Record syntactic `eval(...)` calls. Only a bare (possibly
    /// parenthesized) `eval` identifier in callee position is direct;
    /// member access or an aliased name is indirect and not recorded.
    fn handle_call(&mut self, node: Node) {
        if let Some(callee) = node.child_by_field_name("function") {
            let mut target = callee;
            while target.kind() == "parenthesized_expression" {
                match target.named_child(0) {
                    Some(inner) => target = inner,
                    None => break,
                }
            }
            if target.kind() == "identifier" && self.node_text(target) == "eval" {
                tracing::debug!(pos = %pos_of(node), "direct eval site");
                self.builder.record_eval_site(span_of(node), pos_of(node));
            }
        }
        self.walk_children(node);
    }
}
