//! Function-to-source stringification.
//!
//! Total over all records, never errors. A `Normal` record renders its
//! verbatim source slice; anything stricter renders a canonical form that
//! announces only kind and name, with a parameter-free header (arity is
//! implementation detail too) and a fixed `[native code]` body. The
//! redacted shape is indistinguishable from a genuine builtin's
//! stringification, which is what makes polyfill cloaking work.

use crate::host::{RetainAll, SourcePolicy};
use crate::record::FunctionRecord;
use crate::unit::DeclKind;

/// The fixed body marker shared with genuine native functions.
pub const NATIVE_BODY: &str = "{ [native code] }";

/// Render a record under the default retain-everything host policy.
pub fn stringify(record: &FunctionRecord) -> String {
    stringify_with(record, &RetainAll)
}

/// Render a record, consulting `policy` for source availability.
///
/// Redaction wins in both directions: a hidden tag redacts even when the
/// host says source is available, and a host that dropped source redacts
/// `Normal` records too.
pub fn stringify_with(record: &FunctionRecord, policy: &dyn SourcePolicy) -> String {
    if record.tag().hides_source() {
        return redacted(record.kind(), record.name());
    }
    if !policy.source_available(record.file().map(|f| f.as_ref())) {
        return redacted(record.kind(), record.name());
    }
    record.source_slice().to_owned()
}

/// The canonical redacted form for a kind/name pair.
///
/// Headers carry no parameters regardless of the real arity.
fn redacted(kind: DeclKind, name: Option<&str>) -> String {
    match kind {
        DeclKind::Function => match name {
            Some(name) => format!("function {name}() {NATIVE_BODY}"),
            None => format!("function () {NATIVE_BODY}"),
        },
        DeclKind::Arrow => format!("() => {NATIVE_BODY}"),
        DeclKind::Method | DeclKind::Accessor => {
            format!("{}() {NATIVE_BODY}", name.unwrap_or(""))
        }
        DeclKind::ClassConstructor => match name {
            Some(name) => format!("class {name} {NATIVE_BODY}"),
            None => format!("class {NATIVE_BODY}"),
        },
    }
}
