use crate::chunk::ChunkId;
use crate::extract::Extractor;
use crate::syntax::{Literal, Node, NodeKind};

/// Array lookups such as `["a.js", "b.js"][e]`.
///
/// Every element position is a candidate index. `null`, holes and spreads still occupy a
/// position but contribute nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayIndex;

impl Extractor for ArrayIndex {
    fn name(&self) -> &'static str {
        "array"
    }

    fn can_handle(&self, node: &Node) -> bool {
        matches!(node.kind(), NodeKind::Array { .. })
    }

    fn extract(&self, node: &Node) -> Vec<ChunkId> {
        let NodeKind::Array { elements } = node.kind() else {
            return Vec::new();
        };
        elements
            .iter()
            .enumerate()
            .filter(|(_, element)| match element.kind() {
                NodeKind::Literal(Literal::Null) | NodeKind::Hole | NodeKind::Spread { .. } => {
                    false
                }
                _ => true,
            })
            .map(|(index, _)| ChunkId::bare(index.to_string()))
            .collect()
    }
}
