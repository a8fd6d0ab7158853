//! JavaScript front end.
//!
//! Parses JavaScript with tree-sitter and lowers the concrete syntax tree
//! into a resolved [`SourceUnit`]: directive prologues recognized, scope
//! tags propagated, declarations and eval sites collected.

mod builder;

use std::cell::RefCell;

use veil_core::{EvalMode, SourceUnit, VisibilityTag};
use veil_error::{Error, Result};

use crate::builder::Walker;

/// Parse a top-level program. Top-level scripts resolve under a `Normal`
/// ambient tag.
pub fn parse_program(name: Option<&str>, text: &str) -> Result<SourceUnit> {
    parse_with(name, text, VisibilityTag::Normal)
        .map_err(|err| err.with_operation("js::parse_program"))
}

/// Parse text handed to an eval invocation. Direct eval inherits the
/// effective tag of its call site as the ambient floor; indirect eval
/// always resolves under `Normal`.
pub fn parse_eval(text: &str, mode: EvalMode) -> Result<SourceUnit> {
    parse_with(None, text, mode.ambient()).map_err(|err| err.with_operation("js::parse_eval"))
}

fn parse_with(name: Option<&str>, text: &str, ambient: VisibilityTag) -> Result<SourceUnit> {
    // Thread-local parser reuse to avoid contention from Parser::new()
    thread_local! {
        static PARSER: RefCell<tree_sitter::Parser> = {
            let mut parser = tree_sitter::Parser::new();
            parser
                .set_language(&tree_sitter_javascript::LANGUAGE.into())
                .expect("javascript grammar matches the linked tree-sitter ABI");
            RefCell::new(parser)
        };
    }

    let tree = PARSER
        .with(|parser| parser.borrow_mut().parse(text, None))
        .ok_or_else(|| Error::parse_failed("tree-sitter returned no tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        tracing::warn!(
            file = name.unwrap_or("<eval>"),
            "syntax errors present, building from the recoverable portion"
        );
    }
    Ok(Walker::build(name, text, root, ambient))
}
