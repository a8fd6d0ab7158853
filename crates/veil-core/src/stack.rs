//! Call-stack maintenance and trace capture.
//!
//! A [`CallStack`] tracks live invocations as `Arc<FunctionRecord>` handles,
//! so capture consults no side tables. [`CallStack::capture`] is the second
//! enforcement point: per-frame tags decide whether a frame appears at all
//! and, when it does, whether its location survives.

use std::fmt;
use std::sync::Arc;

use crate::record::FunctionRecord;
use crate::unit::LineCol;

/// A resolved frame position, file plus 1-based line/column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePos {
    pub file: Option<Arc<str>>,
    pub pos: LineCol,
}

impl FramePos {
    pub fn new(file: Option<Arc<str>>, pos: LineCol) -> Self {
        Self { file, pos }
    }
}

/// One live invocation on the stack.
#[derive(Debug, Clone)]
struct LiveFrame {
    record: Arc<FunctionRecord>,
    /// Call-site position inside this frame, when the host tracks one.
    /// Falls back to the record's declaration position at capture time.
    site: Option<FramePos>,
}

/// Where a captured frame points, after enforcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameLocation {
    /// Full position survives the frame's tag.
    Source(FramePos),
    /// The frame is visible but its origin is scrubbed.
    Anonymous,
}

/// One frame of a captured trace. Plain data, detached from any stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDescriptor {
    pub name: Option<String>,
    pub location: FrameLocation,
}

/// A stack of live invocations, innermost last.
#[derive(Debug, Default)]
pub struct CallStack {
    frames: Vec<LiveFrame>,
}

impl CallStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Push an invocation of `record`, optionally with a call-site position.
    pub fn push(&mut self, record: Arc<FunctionRecord>, site: Option<FramePos>) {
        self.frames.push(LiveFrame { record, site });
    }

    pub fn pop(&mut self) -> Option<Arc<FunctionRecord>> {
        self.frames.pop().map(|f| f.record)
    }

    /// Capture the current stack as a trace, innermost frame first.
    ///
    /// Enforcement happens here, per frame:
    /// - `Sensitive` frames are omitted entirely, so the trace is shorter
    ///   than the live stack and adjacent frames appear contiguous.
    /// - `HideSource` frames keep their name but lose their location.
    /// - `Normal` frames carry file and position through.
    pub fn capture(&self) -> StackTrace {
        let mut out = Vec::with_capacity(self.frames.len());
        for frame in self.frames.iter().rev() {
            let tag = frame.record.tag();
            if tag.omits_frame() {
                tracing::trace!(
                    name = frame.record.name().unwrap_or("<anonymous>"),
                    "omitting sensitive frame from trace"
                );
                continue;
            }
            let location = if tag.hides_source() {
                FrameLocation::Anonymous
            } else {
                let pos = frame.site.clone().unwrap_or_else(|| {
                    FramePos::new(frame.record.file().cloned(), frame.record.pos())
                });
                FrameLocation::Source(pos)
            };
            out.push(FrameDescriptor {
                name: frame.record.name().map(str::to_owned),
                location,
            });
        }
        StackTrace { frames: out }
    }
}

/// An immutable captured trace. Frames are ordered innermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTrace {
    frames: Vec<FrameDescriptor>,
}

impl StackTrace {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[FrameDescriptor] {
        &self.frames
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameDescriptor> {
        self.frames.iter()
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.frames {
            let name = frame.name.as_deref();
            match (&frame.location, name) {
                (FrameLocation::Source(pos), Some(name)) => match &pos.file {
                    Some(file) => writeln!(f, "    at {name} ({file}:{})", pos.pos)?,
                    None => writeln!(f, "    at {name} (<unknown>:{})", pos.pos)?,
                },
                (FrameLocation::Source(pos), None) => match &pos.file {
                    Some(file) => writeln!(f, "    at {file}:{}", pos.pos)?,
                    None => writeln!(f, "    at <unknown>:{}", pos.pos)?,
                },
                (FrameLocation::Anonymous, Some(name)) => {
                    writeln!(f, "    at {name} (<anonymous>)")?;
                }
                (FrameLocation::Anonymous, None) => {
                    writeln!(f, "    at <anonymous>")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordStore;
    use crate::tag::VisibilityTag;
    use crate::tree::{ScopeKind, Span};
    use crate::unit::{DeclKind, SourceUnit, UnitBuilder};
    use pretty_assertions::assert_eq;

    /// Build a unit with three sibling functions tagged per `directives`,
    /// named f0, f1, f2 at lines 1, 2, 3.
    fn three_functions(directives: [Option<&str>; 3]) -> SourceUnit {
        let text = "function f0() {}\nfunction f1() {}\nfunction f2() {}\n";
        let mut b = UnitBuilder::new(Some("stack.js"), text);
        for (i, directive) in directives.iter().enumerate() {
            let start = i * 17;
            let span = Span::new(start, start + 16);
            let body = Span::new(start + 14, start + 16);
            let scope = b.enter_scope(ScopeKind::FunctionBody, body);
            if let Some(raw) = directive {
                assert!(b.directive(raw));
            }
            let name = format!("f{i}");
            b.add_decl(
                DeclKind::Function,
                Some(name.as_str()),
                span,
                LineCol::new(i as u32 + 1, 1),
                scope,
            );
            b.leave_scope();
        }
        b.finish(VisibilityTag::Normal)
    }

    fn stack_of(unit: &SourceUnit) -> CallStack {
        let store = RecordStore::new();
        let mut stack = CallStack::new();
        for record in store.create_all(unit) {
            stack.push(record, None);
        }
        stack
    }

    #[test]
    fn test_capture_is_innermost_first() {
        let unit = three_functions([None, None, None]);
        let stack = stack_of(&unit);

        let trace = stack.capture();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.frames()[0].name.as_deref(), Some("f2"));
        assert_eq!(trace.frames()[2].name.as_deref(), Some("f0"));
    }

    #[test]
    fn test_hidden_frame_keeps_name_loses_location() {
        // Scenario B shape: hidden callee between normal frames.
        let unit = three_functions([None, Some("hide source"), None]);
        let stack = stack_of(&unit);

        let trace = stack.capture();
        assert_eq!(trace.len(), 3);
        let hidden = &trace.frames()[1];
        assert_eq!(hidden.name.as_deref(), Some("f1"));
        assert_eq!(hidden.location, FrameLocation::Anonymous);

        // Neighbors keep their positions.
        for frame in [&trace.frames()[0], &trace.frames()[2]] {
            match &frame.location {
                FrameLocation::Source(pos) => {
                    assert_eq!(pos.file.as_deref(), Some("stack.js"));
                }
                FrameLocation::Anonymous => panic!("normal frame lost its location"),
            }
        }
    }

    #[test]
    fn test_sensitive_frame_omitted_entirely() {
        // Scenario C shape: the sensitive callee vanishes and the trace
        // shows its neighbors as contiguous.
        let unit = three_functions([None, Some("sensitive"), None]);
        let stack = stack_of(&unit);
        assert_eq!(stack.depth(), 3);

        let trace = stack.capture();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.frames()[0].name.as_deref(), Some("f2"));
        assert_eq!(trace.frames()[1].name.as_deref(), Some("f0"));

        let rendered = trace.to_string();
        assert!(!rendered.contains("f1"));
        assert!(!rendered.contains(":2:"));
    }

    #[test]
    fn test_all_sensitive_yields_empty_trace() {
        let unit = three_functions([Some("sensitive"), Some("sensitive"), Some("sensitive")]);
        let stack = stack_of(&unit);

        let trace = stack.capture();
        assert!(trace.is_empty());
        assert_eq!(trace.to_string(), "");
    }

    #[test]
    fn test_call_site_overrides_declaration_position() {
        let unit = three_functions([None, None, None]);
        let store = RecordStore::new();
        let records = store.create_all(&unit);

        let mut stack = CallStack::new();
        stack.push(
            records[0].clone(),
            Some(FramePos::new(Some(Arc::from("stack.js")), LineCol::new(9, 5))),
        );

        let trace = stack.capture();
        match &trace.frames()[0].location {
            FrameLocation::Source(pos) => assert_eq!(pos.pos, LineCol::new(9, 5)),
            FrameLocation::Anonymous => panic!("normal frame lost its location"),
        }
    }

    #[test]
    fn test_display_rendering() {
        let unit = three_functions([None, Some("hide source"), None]);
        let stack = stack_of(&unit);
        let rendered = stack.capture().to_string();

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "    at f2 (stack.js:3:1)");
        assert_eq!(lines[1], "    at f1 (<anonymous>)");
        assert_eq!(lines[2], "    at f0 (stack.js:1:1)");
    }

    #[test]
    fn test_pop_returns_record() {
        let unit = three_functions([None, None, None]);
        let mut stack = stack_of(&unit);

        let popped = stack.pop().unwrap();
        assert_eq!(popped.name(), Some("f2"));
        assert_eq!(stack.depth(), 2);
    }
}
