//! Shared helpers for front-end integration tests.

use veil_core::{SourceUnit, VisibilityTag};
use veil_js::parse_program;

pub fn parse(source: &str) -> SourceUnit {
    parse_program(Some("test.js"), source).expect("source should parse")
}

/// Effective tag of the declaration named `name`, panicking when absent.
pub fn tag_of(unit: &SourceUnit, name: &str) -> VisibilityTag {
    let id = unit
        .decl_by_name(name)
        .unwrap_or_else(|| panic!("no declaration named {name}"));
    unit.tag_of_decl(id)
}
