//! Detected chunk loaders.

use std::sync::Arc;

use indexmap::IndexSet;

use crate::chunk::{ChunkEntry, ChunkId};
use crate::extract::extract_ids;
use crate::resolve::Resolver;
use crate::sandbox::Evaluator;
use crate::scan::AssignmentIndex;
use crate::syntax::{Node, pretty_print};

/// A function that maps chunk ids to file names, together with the module's assignment index.
///
/// Loaders are immutable; repeated calls to [`Loader::ids`] and [`Loader::resolve`] return the
/// same results.
#[derive(Debug, Clone)]
pub struct Loader {
    node: Node,
    assignments: Arc<AssignmentIndex>,
}

impl Loader {
    pub fn new(node: Node, assignments: Arc<AssignmentIndex>) -> Self {
        Self { node, assignments }
    }

    /// The function node that defines this loader.
    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn assignments(&self) -> &AssignmentIndex {
        &self.assignments
    }

    /// The loader exactly as written in the input.
    pub fn source_text(&self) -> &str {
        self.node.source_text()
    }

    /// The loader reformatted for display, or the raw source if it cannot be reprinted.
    pub fn pretty(&self) -> String {
        pretty_print(self.source_text()).unwrap_or_else(|| self.source_text().to_string())
    }

    /// Candidate ids recovered from the loader's shape, in first-seen order.
    pub fn ids(&self) -> IndexSet<ChunkId> {
        extract_ids(&self.node)
    }

    /// Run the loader for each id and collect the file names it produces.
    pub fn resolve<'a, I>(&self, evaluator: &dyn Evaluator, ids: I) -> IndexSet<ChunkEntry>
    where
        I: IntoIterator<Item = &'a ChunkId>,
    {
        Resolver::new(evaluator).resolve(self, ids)
    }

    /// Shorthand for resolving every id from [`Loader::ids`].
    pub fn entries(&self, evaluator: &dyn Evaluator) -> IndexSet<ChunkEntry> {
        let ids = self.ids();
        self.resolve(evaluator, &ids)
    }
}
