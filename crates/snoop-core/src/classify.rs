//! Shape heuristic for recognizing chunk loader functions.
//!
//! A chunk loader maps one identifier to a file name: it takes a single parameter, computes
//! without looping or calling out, and mentions at least one bare `*.js` file name.

use crate::syntax::{Node, NodeKind};
use crate::walk::walk;

/// Whether `node` looks like a chunk loader.
///
/// True only for function declarations, function expressions and arrow functions that
/// - declare exactly one parameter (a rest parameter counts),
/// - contain no `for`, `for-of`, `while` or `do-while` loop and no call expression,
/// - contain a string literal ending in `.js` without any `/`.
pub fn is_candidate(node: &Node) -> bool {
    let NodeKind::Function { params, .. } = node.kind() else {
        return false;
    };
    if params.len() != 1 {
        return false;
    }

    let mut has_file_name = false;
    for descendant in walk(node) {
        match descendant.kind() {
            NodeKind::For { .. }
            | NodeKind::ForOf { .. }
            | NodeKind::While { .. }
            | NodeKind::DoWhile { .. }
            | NodeKind::Call { .. } => return false,
            NodeKind::Literal(literal) => {
                if let Some(value) = literal.as_str() {
                    has_file_name |= is_file_name(value);
                }
            }
            _ => {}
        }
    }
    has_file_name
}

fn is_file_name(value: &str) -> bool {
    value.ends_with(".js") && !value.contains('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Module, NodeTag};
    use crate::walk::walk_kind;

    fn first_function(source: &str) -> Node {
        let module = Module::parse(source).unwrap();
        walk_kind(module.root(), NodeTag::Function)
            .next()
            .cloned()
            .expect("no function in source")
    }

    #[test]
    fn test_arrow_lookup() {
        assert!(is_candidate(&first_function(
            "x = e => [\"a.js\", \"b.js\"][e];"
        )));
    }

    #[test]
    fn test_function_expression_and_declaration() {
        assert!(is_candidate(&first_function(
            "x = function (e) { return e + \".chunk.js\"; };"
        )));
        assert!(is_candidate(&first_function(
            "function load(e) { return \"\" + e + \".js\"; }"
        )));
    }

    #[test]
    fn test_parameter_count() {
        assert!(!is_candidate(&first_function("x = () => \"a.js\";")));
        assert!(!is_candidate(&first_function("x = (a, b) => \"a.js\";")));
        assert!(is_candidate(&first_function("x = (...a) => \"a.js\";")));
    }

    #[test]
    fn test_loops_and_calls_disqualify() {
        assert!(!is_candidate(&first_function(
            "x = e => { for (;;) {} return \"a.js\"; };"
        )));
        assert!(!is_candidate(&first_function(
            "x = e => { while (e) {} return \"a.js\"; };"
        )));
        assert!(!is_candidate(&first_function(
            "x = e => { do {} while (e); return \"a.js\"; };"
        )));
        assert!(!is_candidate(&first_function(
            "x = e => { for (const a of e) {} return \"a.js\"; };"
        )));
        assert!(!is_candidate(&first_function(
            "x = e => String(e) + \".js\";"
        )));
        assert!(!is_candidate(&first_function(
            "x = e => e.toString() + \".js\";"
        )));
    }

    #[test]
    fn test_for_in_is_allowed() {
        assert!(is_candidate(&first_function(
            "x = e => { for (var k in e) {} return \"a.js\"; };"
        )));
    }

    #[test]
    fn test_requires_bare_js_file_name() {
        assert!(!is_candidate(&first_function("x = e => \"static/a.js\";")));
        assert!(!is_candidate(&first_function("x = e => \"a.css\";")));
        assert!(!is_candidate(&first_function("x = e => a + e;")));
    }

    #[test]
    fn test_non_function_nodes() {
        let module = Module::parse("\"a.js\";").unwrap();
        assert!(walk(module.root()).all(|node| !is_candidate(node)));
    }

    #[test]
    fn test_nested_call_in_inner_function_disqualifies() {
        assert!(!is_candidate(&first_function(
            "x = e => { var f = () => g(); return \"a.js\"; };"
        )));
    }
}
