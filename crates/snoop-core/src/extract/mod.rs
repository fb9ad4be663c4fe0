//! Chunk id extraction strategies.
//!
//! Each strategy recognizes one shape bundlers use to map ids to file names and recovers the ids
//! from it. All strategies are applied to every node of a loader during a single pre-order walk;
//! the results are merged into an insertion-ordered set keyed by id content.

mod array;
mod equality;
mod object;
mod switch;

use indexmap::IndexSet;

use crate::chunk::ChunkId;
use crate::syntax::{Literal, Node};
use crate::walk::walk;

pub use array::ArrayIndex;
pub use equality::Equality;
pub use object::ObjectMap;
pub use switch::SwitchCases;

/// A strategy that recovers chunk ids from one kind of node.
pub trait Extractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn can_handle(&self, node: &Node) -> bool;

    /// Ids contributed by `node`. Only called when [`Extractor::can_handle`] returned true.
    fn extract(&self, node: &Node) -> Vec<ChunkId>;
}

/// The built-in strategies, in the order they are applied to each node.
pub const DEFAULT_EXTRACTORS: [&dyn Extractor; 4] =
    [&Equality, &ArrayIndex, &ObjectMap, &SwitchCases];

/// Recover candidate ids from `root` with the built-in strategies.
pub fn extract_ids(root: &Node) -> IndexSet<ChunkId> {
    extract_with(root, &DEFAULT_EXTRACTORS)
}

/// Recover candidate ids from `root` with the given strategies.
///
/// When several nodes yield the same content, the first one visited decides the quoting.
pub fn extract_with(root: &Node, extractors: &[&dyn Extractor]) -> IndexSet<ChunkId> {
    let mut ids = IndexSet::new();
    for node in walk(root) {
        for extractor in extractors {
            if extractor.can_handle(node) {
                let found = extractor.extract(node);
                tracing::trace!(strategy = extractor.name(), count = found.len(), "extracted ids");
                ids.extend(found);
            }
        }
    }
    ids
}

/// The id a literal contributes, if any. `null` never names a chunk.
pub(crate) fn literal_id(literal: &Literal) -> Option<ChunkId> {
    match literal {
        Literal::Null => None,
        Literal::String(value) => Some(ChunkId::quoted(value.clone())),
        other => Some(ChunkId::bare(other.to_js_string())),
    }
}
