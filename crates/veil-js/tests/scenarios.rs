mod common;

use common::{parse, tag_of};
use pretty_assertions::assert_eq;
use veil_core::{
    CallStack, DeclKind, EvalMode, FrameLocation, RecordStore, VisibilityTag, stringify,
};
use veil_js::{parse_eval, parse_program};

#[test]
fn plain_program_resolves_normal() {
    let unit = parse("function foo() { return 1; }\n");
    assert_eq!(tag_of(&unit, "foo"), VisibilityTag::Normal);
}

#[test]
fn nested_declarations_inherit_through_scopes() {
    // Worked example: foo holds a plain arrow x and an arrow y whose body
    // opens with "hide source" and declares class Z with method m.
    let source = r#"
function foo() {
  const x = (a) => a + 1;
  const y = () => {
    "hide source";
    class Z {
      m() { return 1; }
    }
  };
  return [x, y];
}
"#;
    let unit = parse(source);

    assert_eq!(tag_of(&unit, "foo"), VisibilityTag::Normal);
    assert_eq!(tag_of(&unit, "x"), VisibilityTag::Normal);
    assert_eq!(tag_of(&unit, "y"), VisibilityTag::HideSource);
    assert_eq!(tag_of(&unit, "Z"), VisibilityTag::HideSource);
    assert_eq!(tag_of(&unit, "m"), VisibilityTag::HideSource);
}

#[test]
fn sensitive_frame_vanishes_from_trace() {
    let source = r#"
function onLine(chunk) { return chunk.length; }
function bound(chunk) {
  "sensitive";
  return onLine(chunk);
}
function runBound(chunk) { return bound(chunk); }
"#;
    let unit = parse(source);
    let store = RecordStore::new();

    let mut stack = CallStack::new();
    for name in ["runBound", "bound", "onLine"] {
        let id = unit.decl_by_name(name).unwrap();
        stack.push(store.create(&unit, id), None);
    }
    assert_eq!(stack.depth(), 3);

    let trace = stack.capture();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.frames()[0].name.as_deref(), Some("onLine"));
    assert_eq!(trace.frames()[1].name.as_deref(), Some("runBound"));
    assert!(!trace.to_string().contains("bound ("));
}

#[test]
fn hidden_frame_keeps_name_without_position() {
    let source = r#"
function onLine(chunk) { return chunk.length; }
function bound(chunk) {
  "hide source";
  return onLine(chunk);
}
function runBound(chunk) { return bound(chunk); }
"#;
    let unit = parse(source);
    let store = RecordStore::new();

    let mut stack = CallStack::new();
    for name in ["runBound", "bound", "onLine"] {
        let id = unit.decl_by_name(name).unwrap();
        stack.push(store.create(&unit, id), None);
    }

    let trace = stack.capture();
    assert_eq!(trace.len(), 3);

    let hidden = &trace.frames()[1];
    assert_eq!(hidden.name.as_deref(), Some("bound"));
    assert_eq!(hidden.location, FrameLocation::Anonymous);

    for frame in [&trace.frames()[0], &trace.frames()[2]] {
        assert!(matches!(frame.location, FrameLocation::Source(_)));
    }
}

#[test]
fn hidden_function_stringifies_as_native() {
    let source = r#"
function secret(a, b, c) {
  "hide source";
  return a * b * c;
}
"#;
    let unit = parse(source);
    let store = RecordStore::new();
    let record = store.create(&unit, unit.decl_by_name("secret").unwrap());

    assert_eq!(stringify(&record), "function secret() { [native code] }");
}

#[test]
fn normal_function_stringifies_verbatim() {
    let source = "function visible(a) { return a + 1; }";
    let unit = parse(source);
    let store = RecordStore::new();
    let record = store.create(&unit, unit.decl_by_name("visible").unwrap());

    assert_eq!(stringify(&record), source);
}

#[test]
fn direct_eval_inherits_sensitive_ambience() {
    let source = r#"
function launcher(payload) {
  "sensitive";
  return eval(payload);
}
"#;
    let unit = parse(source);
    assert_eq!(unit.eval_sites().len(), 1);

    let mode = EvalMode::direct_from(&unit, &unit.eval_sites()[0]);
    assert_eq!(mode.ambient(), VisibilityTag::Sensitive);

    let payload = "function planted() { return 42; }";
    let inner = parse_eval(payload, mode).unwrap();
    assert_eq!(tag_of(&inner, "planted"), VisibilityTag::Sensitive);

    // The same text through an indirect eval resolves from scratch.
    let inner = parse_eval(payload, EvalMode::Indirect).unwrap();
    assert_eq!(tag_of(&inner, "planted"), VisibilityTag::Normal);
}

#[test]
fn aliased_eval_is_not_a_direct_site() {
    let source = r#"
const run = eval;
run("1 + 1");
globalThis.eval("2 + 2");
(eval)("3 + 3");
"#;
    let unit = parse(source);
    // Only the parenthesized bare identifier counts.
    assert_eq!(unit.eval_sites().len(), 1);
}

#[test]
fn prologue_ends_at_first_non_string_statement() {
    let source = r#"
function late() {
  let x = 1;
  "hide source";
  return x;
}
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "late"), VisibilityTag::Normal);
}

#[test]
fn use_strict_does_not_terminate_the_prologue() {
    let source = r#"
function guarded() {
  "use strict";
  "hide source";
  return 1;
}
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "guarded"), VisibilityTag::HideSource);
}

#[test]
fn block_level_strings_are_not_directives() {
    let source = r#"
function f() {
  {
    "hide source";
  }
  return 1;
}
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "f"), VisibilityTag::Normal);
}

#[test]
fn escaped_directive_text_never_matches() {
    let source = "function f() {\n  \"hide\\u0020source\";\n  return 1;\n}\n";
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "f"), VisibilityTag::Normal);
}

#[test]
fn conflicting_directives_fold_to_the_stricter() {
    let source = r#"
function torn() {
  "hide source";
  "sensitive";
  return 1;
}
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "torn"), VisibilityTag::Sensitive);
}

#[test]
fn inner_scope_can_only_raise() {
    let source = r#"
function outer() {
  "sensitive";
  function inner() {
    "hide source";
    return 1;
  }
  return inner;
}
"#;
    let unit = parse(source);
    // The weaker inner directive cannot lower the inherited tag.
    assert_eq!(tag_of(&unit, "outer"), VisibilityTag::Sensitive);
    assert_eq!(tag_of(&unit, "inner"), VisibilityTag::Sensitive);
}

#[test]
fn constructor_prologue_tags_the_class() {
    let source = r#"
class Vault {
  constructor() {
    "hide source";
    this.held = [];
  }
  peek() { return this.held.length; }
}
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "Vault"), VisibilityTag::HideSource);
    // Sibling methods resolve against the class body, not the constructor.
    assert_eq!(tag_of(&unit, "peek"), VisibilityTag::Normal);

    let store = RecordStore::new();
    let record = store.create(&unit, unit.decl_by_name("Vault").unwrap());
    assert_eq!(record.kind(), DeclKind::ClassConstructor);
    assert_eq!(stringify(&record), "class Vault { [native code] }");
}

#[test]
fn class_body_directive_tags_class_and_members() {
    let source = r#"
class Vault {
  "hide source";
  peek() { return 1; }
  take() { return 2; }
}
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "Vault"), VisibilityTag::HideSource);
    assert_eq!(tag_of(&unit, "peek"), VisibilityTag::HideSource);
    assert_eq!(tag_of(&unit, "take"), VisibilityTag::HideSource);

    let store = RecordStore::new();
    let record = store.create(&unit, unit.decl_by_name("Vault").unwrap());
    assert_eq!(stringify(&record), "class Vault { [native code] }");
}

#[test]
fn class_body_directive_after_a_member_is_inert() {
    let source = r#"
class Api {
  open() { return 1; }
  "sensitive";
}
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "Api"), VisibilityTag::Normal);
    assert_eq!(tag_of(&unit, "open"), VisibilityTag::Normal);
}

#[test]
fn initialized_or_static_string_fields_end_the_class_prologue() {
    // A field with a value or a static marker is a real member, not a
    // directive, even when its name is the directive text.
    let source = r#"
class Store {
  "hide source" = 1;
  load() { return this.x; }
}
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "Store"), VisibilityTag::Normal);

    let source = r#"
class Marked {
  static "sensitive";
  run() { return 1; }
}
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "Marked"), VisibilityTag::Normal);
}

#[test]
fn method_directive_tags_only_that_method() {
    let source = r#"
class Api {
  open() { return 1; }
  locked() {
    "sensitive";
    return 2;
  }
  get token() {
    "hide source";
    return this.t;
  }
}
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "Api"), VisibilityTag::Normal);
    assert_eq!(tag_of(&unit, "open"), VisibilityTag::Normal);
    assert_eq!(tag_of(&unit, "locked"), VisibilityTag::Sensitive);
    assert_eq!(tag_of(&unit, "token"), VisibilityTag::HideSource);

    let store = RecordStore::new();
    let record = store.create(&unit, unit.decl_by_name("token").unwrap());
    assert_eq!(record.kind(), DeclKind::Accessor);
    assert_eq!(stringify(&record), "token() { [native code] }");
}

#[test]
fn function_expressions_and_generators_are_collected() {
    let source = r#"
const named = function real() { "hide source"; return 1; };
const anon = function () { return 2; };
function* pump() {
  "sensitive";
  yield 1;
}
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "real"), VisibilityTag::HideSource);
    assert_eq!(tag_of(&unit, "anon"), VisibilityTag::Normal);
    assert_eq!(tag_of(&unit, "pump"), VisibilityTag::Sensitive);
}

#[test]
fn object_literal_methods_take_their_key_name() {
    let source = r#"
const handlers = {
  onData(chunk) {
    "hide source";
    return chunk;
  },
  plain: (x) => x,
};
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "onData"), VisibilityTag::HideSource);
    assert_eq!(tag_of(&unit, "plain"), VisibilityTag::Normal);
}

#[test]
fn program_level_prologue_floors_every_declaration() {
    let source = r#"
"sensitive";
function anything() { return 1; }
const arrow = () => 2;
"#;
    let unit = parse(source);
    assert_eq!(tag_of(&unit, "anything"), VisibilityTag::Sensitive);
    assert_eq!(tag_of(&unit, "arrow"), VisibilityTag::Sensitive);
}

#[test]
fn empty_program_parses() {
    let unit = parse_program(None, "").unwrap();
    assert!(unit.decls().is_empty());
    assert!(unit.eval_sites().is_empty());
}

#[test]
fn tags_survive_unit_disposal() {
    let source = r#"
function keeper() {
  "hide source";
  return 1;
}
"#;
    let unit = parse(source);
    let store = RecordStore::new();
    let record = store.create(&unit, unit.decl_by_name("keeper").unwrap());
    drop(unit);

    assert_eq!(record.tag(), VisibilityTag::HideSource);
    assert_eq!(stringify(&record), "function keeper() { [native code] }");
}
