use crate::chunk::ChunkId;
use crate::extract::{Extractor, literal_id};
use crate::syntax::{Node, NodeKind};

/// Object maps such as `{ 179: "5e6f", vendors: "9c8d" }[e]`.
///
/// Identifier keys are ids written without quotes in source but used as strings at runtime, so
/// they are reported quoted. Literal keys keep their own quoting. Other computed keys and
/// spreads are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectMap;

impl Extractor for ObjectMap {
    fn name(&self) -> &'static str {
        "object"
    }

    fn can_handle(&self, node: &Node) -> bool {
        matches!(node.kind(), NodeKind::Object { .. })
    }

    fn extract(&self, node: &Node) -> Vec<ChunkId> {
        let NodeKind::Object { properties } = node.kind() else {
            return Vec::new();
        };
        properties
            .iter()
            .filter_map(|prop| {
                let NodeKind::Property { key, computed, .. } = prop.kind() else {
                    return None;
                };
                match key.kind() {
                    NodeKind::Identifier { name } if !computed => Some(ChunkId::quoted(name.clone())),
                    NodeKind::Literal(literal) => literal_id(literal),
                    _ => None,
                }
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
    fn test_literal_and_identifier_keys() {
        let node = first("({ 1: \"x\", \"a\": \"y\" });", NodeTag::Object);
        assert_eq!(
            contents(&ObjectMap.extract(&node)),
            vec![("1", false), ("a", true)]
        );
    }

    #[test]
    fn test_identifier_keys_are_quoted() {
        let node = first("({ main: \"m\", vendors: \"v\" });", NodeTag::Object);
        assert_eq!(
            contents(&ObjectMap.extract(&node)),
            vec![("main", true), ("vendors", true)]
        );
    }

    #[test]
    fn test_skips_computed_and_spread() {
        let node = first("({ [k]: 1, ...rest, [2]: \"b\", 3: \"c\" });", NodeTag::Object);
        assert_eq!(
            contents(&ObjectMap.extract(&node)),
            vec![("2", false), ("3", false)]
        );
    }

    #[test]
    fn test_only_objects() {
        let node = first("[1];", NodeTag::Array);
        assert!(!ObjectMap.can_handle(&node));
    }
}
