// Shared walker infrastructure
//
// - position.rs: byte offset -> (line, column)
// - walker.rs: BaseWalker state, emission and dedupe helpers
// - tree_methods.rs: tree navigation helpers

pub mod position;
pub mod tree_methods;
pub mod walker;

pub use position::LineIndex;
pub use walker::{BaseWalker, WalkOutput};

use std::panic::{catch_unwind, AssertUnwindSafe};
use tree_sitter::{Node, Tree};

/// A per-language traversal over one parsed region
pub trait Walker<'a> {
    fn base(&mut self) -> &mut BaseWalker<'a>;

    fn into_base(self) -> BaseWalker<'a>;

    /// Closed match over the node kinds this language cares about
    fn visit_node(&mut self, node: Node);

    /// ERROR nodes that valid source in this language can produce because
    /// the grammar lags the platform. They are not reported as warnings.
    fn is_grammar_gap(_node: &Node) -> bool
    where
        Self: Sized,
    {
        false
    }

    /// Walk the whole tree. A panic inside the traversal is converted into a
    /// parse warning and whatever was detected before it is kept.
    fn walk(mut self, tree: &Tree) -> WalkOutput
    where
        Self: Sized,
    {
        let root = tree.root_node();
        self.base().collect_syntax_errors(&root, Self::is_grammar_gap);

        let outcome = catch_unwind(AssertUnwindSafe(|| self.visit_node(root)));
        if outcome.is_err() {
            self.base().record_walk_failure(root.kind());
        }

        self.base().scan_source();
        self.into_base().into_output()
    }
}

/// Fails the test when any of `ids` is missing from the bundled snapshot
#[cfg(test)]
pub(crate) fn assert_in_bundled_snapshot<'i>(ids: impl IntoIterator<Item = &'i str>) {
    use crate::dataset::{Dataset, DatasetIndex};

    let index = DatasetIndex::build(&Dataset::bundled().unwrap());
    let missing: Vec<&str> = ids.into_iter().filter(|id| index.get(id).is_none()).collect();
    assert!(missing.is_empty(), "feature ids missing from the bundled snapshot: {:?}", missing);
}
