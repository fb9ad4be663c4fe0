use crate::chunk::ChunkId;
use crate::extract::{Extractor, literal_id};
use crate::syntax::{Node, NodeKind};

/// Equality tests such as `e === 12 ? "a.js" : ...`.
///
/// A comparison contributes when exactly one side is a non-null literal and the other side is a
/// plain identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Equality;

impl Extractor for Equality {
    fn name(&self) -> &'static str {
        "equality"
    }

    fn can_handle(&self, node: &Node) -> bool {
        matches!(
            node.kind(),
            NodeKind::Binary {
                operator: "==" | "===",
                ..
            }
        )
    }

    fn extract(&self, node: &Node) -> Vec<ChunkId> {
        let NodeKind::Binary { left, right, .. } = node.kind() else {
            return Vec::new();
        };
        let literal = match (left.as_literal(), right.as_literal()) {
            (Some(literal), None) if right.as_identifier().is_some() => literal,
            (None, Some(literal)) if left.as_identifier().is_some() => literal,
            _ => return Vec::new(),
        };
        literal_id(literal).into_iter().collect()
    }
}
