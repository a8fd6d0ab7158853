pub mod eval;
pub mod host;
pub mod record;
pub mod resolve;
pub mod stack;
pub mod stringify;
pub mod tag;
pub mod tree;
pub mod unit;

pub use eval::EvalMode;
pub use host::{DiscardAll, RetainAll, SourcePolicy};
pub use record::{FunctionId, FunctionRecord, RecordStore};
pub use stack::{CallStack, FrameDescriptor, FrameLocation, FramePos, StackTrace};
pub use stringify::{stringify, stringify_with};
pub use tag::{Directive, VisibilityTag};
pub use tree::{ScopeId, ScopeKind, ScopeTree, Span};
pub use unit::{DeclId, DeclKind, EvalSite, FunctionDecl, LineCol, SourceUnit, UnitBuilder};

pub use veil_error::{Error, ErrorKind, Result};
