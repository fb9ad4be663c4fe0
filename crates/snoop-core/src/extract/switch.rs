use crate::chunk::ChunkId;
use crate::extract::{Extractor, literal_id};
use crate::syntax::{Node, NodeKind};

/// Switch statements over the id, one case per chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchCases;

impl Extractor for SwitchCases {
    fn name(&self) -> &'static str {
        "switch"
    }

    fn can_handle(&self, node: &Node) -> bool {
        matches!(node.kind(), NodeKind::Switch { .. })
    }

    fn extract(&self, node: &Node) -> Vec<ChunkId> {
        let NodeKind::Switch { cases, .. } = node.kind() else {
            return Vec::new();
        };
        cases
            .iter()
            .filter_map(|case| match case.kind() {
                NodeKind::Case {
                    test: Some(test), ..
                } => test.as_literal().and_then(literal_id),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::{contents, first};
    use crate::syntax::NodeTag;

    #[test]
    fn test_cases_in_order_without_default() {
        let node = first(
            "function f(e) { switch (e) { case 3: return \"c.js\"; default: return \"d.js\"; case \"a\": case null: case x: return \"a.js\"; } }",
            NodeTag::Switch,
        );
        assert_eq!(
            contents(&SwitchCases.extract(&node)),
            vec![("3", false), ("a", true)]
        );
    }

    #[test]
    fn test_empty_switch() {
        let node = first("switch (e) {}", NodeTag::Switch);
        assert!(SwitchCases.extract(&node).is_empty());
    }
}
