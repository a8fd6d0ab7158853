//! Effective-tag resolution.
//!
//! One top-down pass over a completed scope tree. Propagation is
//! monotonic, inclusive-downward, and non-reversible: a nested scope may
//! only raise strictness over its parent, never lower it, and there is no
//! syntax that opts a scope back out once an ancestor opted in.

use crate::tag::VisibilityTag;
use crate::tree::{ScopeId, ScopeTree};

/// Resolve every scope's effective tag.
///
/// `effective(root) = max(ambient, declared(root))` and
/// `effective(child) = max(effective(parent), declared(child))`.
///
/// `ambient` is `Normal` for an ordinary parse; direct evaluation threads
/// the call site's effective tag through here instead (see
/// [`crate::eval::EvalMode`]). Uses an explicit work stack so arbitrarily
/// deep nesting cannot overflow.
pub(crate) fn resolve_tree(tree: &mut ScopeTree, ambient: VisibilityTag) {
    let mut work: Vec<(ScopeId, VisibilityTag)> = vec![(ScopeTree::ROOT, ambient)];

    while let Some((id, inherited)) = work.pop() {
        let effective = inherited.max(tree.get(id).declared_tag());
        tree.set_effective(id, effective);

        if effective > inherited {
            tracing::trace!(scope = %id, tag = %effective, "scope raises visibility strictness");
        }

        for child in tree.get(id).children() {
            work.push((*child, effective));
        }
    }
}
