//! Owned syntax tree for bundled JavaScript.
//!
//! Source text is parsed with Oxc and immediately lowered into a small tagged union
//! ([`NodeKind`]) that owns its data. The lowered tree has no arena lifetime, so loaders can keep
//! references to their subtree after the parser allocator is gone, and the tree can be shared
//! across threads.
//!
//! Every node remembers its span in the original source; [`Node::source_text`] is the
//! deterministic re-serialization used for display and for building evaluable snippets.

mod lower;
mod pretty;

use std::fmt;
use std::sync::Arc;

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::{SourceType, Span};

use crate::error::{Result, SnoopError};

pub use pretty::pretty_print;

/// How source text should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// Try ES module grammar first, then fall back to sloppy script grammar.
    #[default]
    Auto,
    /// ES module grammar only.
    Module,
    /// Sloppy script grammar only.
    Script,
}

/// [`NodeKind::Opaque`] label of a rest parameter. Its only child is the bound name.
pub const REST_PARAMETER: &str = "rest parameter";

/// [`NodeKind::Opaque`] label of a binding with a default value. Children are the bound name and
/// the default expression.
pub const DEFAULT_BINDING: &str = "default binding";

/// Which syntactic form produced a function node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionFlavor {
    Declaration,
    Expression,
    Arrow,
}

/// Declaration keyword of a variable statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

/// A literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    /// Digits of a bigint literal, without the `n` suffix.
    BigInt(String),
    /// Source text of a regular expression literal.
    RegExp(String),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(value) => Some(value),
            _ => None,
        }
    }

    /// The literal's value converted to text the way JavaScript's `String(value)` would.
    pub fn to_js_string(&self) -> String {
        match self {
            Literal::String(value) => value.clone(),
            Literal::Number(value) => number_to_string(*value),
            Literal::Boolean(value) => value.to_string(),
            Literal::Null => "null".to_string(),
            Literal::BigInt(digits) => digits.clone(),
            Literal::RegExp(text) => text.clone(),
        }
    }
}

/// Format a number like `Number.prototype.toString()` with radix 10.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.abs() >= 1e21 {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }
    if value.fract() == 0.0 {
        return format!("{}", value as i128);
    }
    format!("{value}")
}

/// Variant payloads of a [`Node`].
///
/// Child nodes are stored in the variant that owns them; [`Node::children`] lists them in source
/// order.
#[derive(Debug)]
pub enum NodeKind {
    Program { body: Vec<Node> },

    // Statements
    Block { body: Vec<Node> },
    Empty,
    ExpressionStatement { expression: Node },
    Variable { kind: VariableKind, declarators: Vec<Node> },
    Declarator { target: Node, init: Option<Node> },
    Return { argument: Option<Node> },
    If { test: Node, consequent: Node, alternate: Option<Node> },
    Switch { discriminant: Node, cases: Vec<Node> },
    Case { test: Option<Node>, consequent: Vec<Node> },
    Throw { argument: Node },
    Break { label: Option<String> },
    Continue { label: Option<String> },
    While { test: Node, body: Node },
    DoWhile { body: Node, test: Node },
    For { init: Option<Node>, test: Option<Node>, update: Option<Node>, body: Node },
    ForIn { right: Node, body: Node },
    ForOf { right: Node, body: Node },

    /// Function declaration, function expression or arrow function.
    ///
    /// For arrows with an expression body, `body` holds that single expression and
    /// `expression_body` is set.
    Function {
        flavor: FunctionFlavor,
        name: Option<String>,
        params: Vec<Node>,
        body: Vec<Node>,
        expression_body: bool,
    },

    // Expressions
    Identifier { name: String },
    Literal(Literal),
    Template { quasis: Vec<String>, expressions: Vec<Node> },
    Array { elements: Vec<Node> },
    /// An elided array element (`[, a]`).
    Hole,
    Spread { argument: Node },
    Object { properties: Vec<Node> },
    Property { key: Node, value: Node, computed: bool, shorthand: bool },
    Member { object: Node, property: Node, computed: bool, optional: bool },
    Binary { operator: &'static str, left: Node, right: Node },
    Logical { operator: &'static str, left: Node, right: Node },
    Unary { operator: &'static str, argument: Node },
    Update { operator: &'static str, prefix: bool, argument: Node },
    Conditional { test: Node, consequent: Node, alternate: Node },
    Sequence { expressions: Vec<Node> },
    Assignment { operator: &'static str, target: Node, value: Node },
    Call { callee: Node, arguments: Vec<Node>, optional: bool },
    New { callee: Node, arguments: Vec<Node> },
    TaggedTemplate { tag: Node, quasi: Node },
    This,

    /// Syntax the lowering does not model in detail (classes, try, patterns, ...).
    ///
    /// Nested expressions and statements are still lowered so traversal sees them.
    Opaque { label: &'static str, children: Vec<Node> },
}

/// Field-less discriminator of [`NodeKind`], used for typed walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Program,
    Block,
    Empty,
    ExpressionStatement,
    Variable,
    Declarator,
    Return,
    If,
    Switch,
    Case,
    Throw,
    Break,
    Continue,
    While,
    DoWhile,
    For,
    ForIn,
    ForOf,
    Function,
    Identifier,
    Literal,
    Template,
    Array,
    Hole,
    Spread,
    Object,
    Property,
    Member,
    Binary,
    Logical,
    Unary,
    Update,
    Conditional,
    Sequence,
    Assignment,
    Call,
    New,
    TaggedTemplate,
    This,
    Opaque,
}

struct NodeData {
    kind: NodeKind,
    span: Span,
    source: Arc<str>,
}

// Drop iteratively: long operator chains nest deeper than the stack allows for a recursive drop.
impl Drop for NodeData {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_children(std::mem::replace(&mut self.kind, NodeKind::Empty), &mut pending);
        while let Some(node) = pending.pop() {
            if let Ok(mut data) = Arc::try_unwrap(node.0) {
                take_children(std::mem::replace(&mut data.kind, NodeKind::Empty), &mut pending);
            }
        }
    }
}

fn take_children(kind: NodeKind, out: &mut Vec<Node>) {
    match kind {
        NodeKind::Program { body: nodes }
        | NodeKind::Block { body: nodes }
        | NodeKind::Array { elements: nodes }
        | NodeKind::Object { properties: nodes }
        | NodeKind::Sequence { expressions: nodes }
        | NodeKind::Variable {
            declarators: nodes, ..
        }
        | NodeKind::Template {
            expressions: nodes, ..
        }
        | NodeKind::Opaque {
            children: nodes, ..
        } => out.extend(nodes),
        NodeKind::Function { params, body, .. } => {
            out.extend(params);
            out.extend(body);
        }
        NodeKind::ExpressionStatement { expression: node }
        | NodeKind::Throw { argument: node }
        | NodeKind::Spread { argument: node }
        | NodeKind::Unary { argument: node, .. }
        | NodeKind::Update { argument: node, .. } => out.push(node),
        NodeKind::Return { argument: node } => out.extend(node),
        NodeKind::Declarator { target, init } => {
            out.push(target);
            out.extend(init);
        }
        NodeKind::If {
            test,
            consequent,
            alternate,
        } => {
            out.push(test);
            out.push(consequent);
            out.extend(alternate);
        }
        NodeKind::Switch {
            discriminant,
            cases,
        } => {
            out.push(discriminant);
            out.extend(cases);
        }
        NodeKind::Case { test, consequent } => {
            out.extend(test);
            out.extend(consequent);
        }
        NodeKind::While { test: a, body: b }
        | NodeKind::DoWhile { body: a, test: b }
        | NodeKind::ForIn { right: a, body: b }
        | NodeKind::ForOf { right: a, body: b }
        | NodeKind::Property {
            key: a, value: b, ..
        }
        | NodeKind::Member {
            object: a,
            property: b,
            ..
        }
        | NodeKind::Binary {
            left: a, right: b, ..
        }
        | NodeKind::Logical {
            left: a, right: b, ..
        }
        | NodeKind::Assignment {
            target: a,
            value: b,
            ..
        }
        | NodeKind::TaggedTemplate { tag: a, quasi: b } => {
            out.push(a);
            out.push(b);
        }
        NodeKind::For {
            init,
            test,
            update,
            body,
        } => {
            out.extend(init);
            out.extend(test);
            out.extend(update);
            out.push(body);
        }
        NodeKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            out.push(test);
            out.push(consequent);
            out.push(alternate);
        }
        NodeKind::Call {
            callee, arguments, ..
        }
        | NodeKind::New { callee, arguments } => {
            out.push(callee);
            out.extend(arguments);
        }
        NodeKind::Empty
        | NodeKind::Break { .. }
        | NodeKind::Continue { .. }
        | NodeKind::Identifier { .. }
        | NodeKind::Literal(_)
        | NodeKind::Hole
        | NodeKind::This => {}
    }
}

/// An immutable, cheaply clonable syntax tree node.
#[derive(Clone)]
pub struct Node(Arc<NodeData>);

impl Node {
    pub(crate) fn new(kind: NodeKind, span: Span, source: Arc<str>) -> Self {
        Self(Arc::new(NodeData { kind, span, source }))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.0.kind
    }

    pub fn span(&self) -> Span {
        self.0.span
    }

    pub fn tag(&self) -> NodeTag {
        match &self.0.kind {
            NodeKind::Program { .. } => NodeTag::Program,
            NodeKind::Block { .. } => NodeTag::Block,
            NodeKind::Empty => NodeTag::Empty,
            NodeKind::ExpressionStatement { .. } => NodeTag::ExpressionStatement,
            NodeKind::Variable { .. } => NodeTag::Variable,
            NodeKind::Declarator { .. } => NodeTag::Declarator,
            NodeKind::Return { .. } => NodeTag::Return,
            NodeKind::If { .. } => NodeTag::If,
            NodeKind::Switch { .. } => NodeTag::Switch,
            NodeKind::Case { .. } => NodeTag::Case,
            NodeKind::Throw { .. } => NodeTag::Throw,
            NodeKind::Break { .. } => NodeTag::Break,
            NodeKind::Continue { .. } => NodeTag::Continue,
            NodeKind::While { .. } => NodeTag::While,
            NodeKind::DoWhile { .. } => NodeTag::DoWhile,
            NodeKind::For { .. } => NodeTag::For,
            NodeKind::ForIn { .. } => NodeTag::ForIn,
            NodeKind::ForOf { .. } => NodeTag::ForOf,
            NodeKind::Function { .. } => NodeTag::Function,
            NodeKind::Identifier { .. } => NodeTag::Identifier,
            NodeKind::Literal(_) => NodeTag::Literal,
            NodeKind::Template { .. } => NodeTag::Template,
            NodeKind::Array { .. } => NodeTag::Array,
            NodeKind::Hole => NodeTag::Hole,
            NodeKind::Spread { .. } => NodeTag::Spread,
            NodeKind::Object { .. } => NodeTag::Object,
            NodeKind::Property { .. } => NodeTag::Property,
            NodeKind::Member { .. } => NodeTag::Member,
            NodeKind::Binary { .. } => NodeTag::Binary,
            NodeKind::Logical { .. } => NodeTag::Logical,
            NodeKind::Unary { .. } => NodeTag::Unary,
            NodeKind::Update { .. } => NodeTag::Update,
            NodeKind::Conditional { .. } => NodeTag::Conditional,
            NodeKind::Sequence { .. } => NodeTag::Sequence,
            NodeKind::Assignment { .. } => NodeTag::Assignment,
            NodeKind::Call { .. } => NodeTag::Call,
            NodeKind::New { .. } => NodeTag::New,
            NodeKind::TaggedTemplate { .. } => NodeTag::TaggedTemplate,
            NodeKind::This => NodeTag::This,
            NodeKind::Opaque { .. } => NodeTag::Opaque,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        match &self.0.kind {
            NodeKind::Program { body } | NodeKind::Block { body } => out.extend(body),
            NodeKind::Empty
            | NodeKind::Break { .. }
            | NodeKind::Continue { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::Literal(_)
            | NodeKind::Hole
            | NodeKind::This => {}
            NodeKind::ExpressionStatement { expression } => out.push(expression),
            NodeKind::Variable { declarators, .. } => out.extend(declarators),
            NodeKind::Declarator { target, init } => {
                out.push(target);
                out.extend(init);
            }
            NodeKind::Return { argument } => out.extend(argument),
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                out.push(test);
                out.push(consequent);
                out.extend(alternate);
            }
            NodeKind::Switch {
                discriminant,
                cases,
            } => {
                out.push(discriminant);
                out.extend(cases);
            }
            NodeKind::Case { test, consequent } => {
                out.extend(test);
                out.extend(consequent);
            }
            NodeKind::Throw { argument } | NodeKind::Spread { argument } => out.push(argument),
            NodeKind::While { test, body } => {
                out.push(test);
                out.push(body);
            }
            NodeKind::DoWhile { body, test } => {
                out.push(body);
                out.push(test);
            }
            NodeKind::For {
                init,
                test,
                update,
                body,
            } => {
                out.extend(init);
                out.extend(test);
                out.extend(update);
                out.push(body);
            }
            NodeKind::ForIn { right, body } | NodeKind::ForOf { right, body } => {
                out.push(right);
                out.push(body);
            }
            NodeKind::Function { params, body, .. } => {
                out.extend(params);
                out.extend(body);
            }
            NodeKind::Template { expressions, .. } => out.extend(expressions),
            NodeKind::Array { elements } => out.extend(elements),
            NodeKind::Object { properties } => out.extend(properties),
            NodeKind::Property { key, value, .. } => {
                out.push(key);
                out.push(value);
            }
            NodeKind::Member {
                object, property, ..
            } => {
                out.push(object);
                out.push(property);
            }
            NodeKind::Binary { left, right, .. } | NodeKind::Logical { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            NodeKind::Unary { argument, .. } | NodeKind::Update { argument, .. } => {
                out.push(argument)
            }
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                out.push(test);
                out.push(consequent);
                out.push(alternate);
            }
            NodeKind::Sequence { expressions } => out.extend(expressions),
            NodeKind::Assignment { target, value, .. } => {
                out.push(target);
                out.push(value);
            }
            NodeKind::Call {
                callee, arguments, ..
            }
            | NodeKind::New { callee, arguments } => {
                out.push(callee);
                out.extend(arguments);
            }
            NodeKind::TaggedTemplate { tag, quasi } => {
                out.push(tag);
                out.push(quasi);
            }
            NodeKind::Opaque { children, .. } => out.extend(children),
        }
        out
    }

    /// The exact source text this node was parsed from.
    pub fn source_text(&self) -> &str {
        let Span { start, end, .. } = self.0.span;
        self.0
            .source
            .get(start as usize..end as usize)
            .unwrap_or_default()
    }

    /// The name of an identifier node.
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.0.kind {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.0.kind {
            NodeKind::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.0.kind, NodeKind::Function { .. })
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("span", &(self.0.span.start..self.0.span.end))
            .field("kind", &self.0.kind)
            .finish()
    }
}

/// A parsed and lowered source file.
#[derive(Debug, Clone)]
pub struct Module {
    root: Node,
}

impl Module {
    /// Parse `source`, trying module grammar before script grammar.
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_with(source, SourceKind::Auto)
    }

    pub fn parse_with(source: &str, kind: SourceKind) -> Result<Self> {
        let root = match kind {
            SourceKind::Module => parse_program(source, SourceType::mjs())?,
            SourceKind::Script => parse_program(source, SourceType::cjs())?,
            SourceKind::Auto => match parse_program(source, SourceType::mjs()) {
                Ok(root) => root,
                Err(module_error) => {
                    tracing::trace!("module grammar rejected input, retrying as script");
                    parse_program(source, SourceType::cjs()).map_err(|_| module_error)?
                }
            },
        };
        Ok(Self { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }
}

/// Parse a whole source file.
pub fn parse_module(source: &str, kind: SourceKind) -> Result<Module> {
    Module::parse_with(source, kind)
}

/// Parse `source` with the given grammar and lower it into an owned [`Node`] tree.
fn parse_program(source: &str, source_type: SourceType) -> Result<Node> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, source_type).parse();

    if !parsed.errors.is_empty() || parsed.panicked {
        let message = parsed
            .errors
            .iter()
            .map(|error| error.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(SnoopError::Parse { message });
    }

    let lowerer = lower::Lowerer::new(Arc::from(source));
    Ok(lowerer.program(&parsed.program))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_statement(source: &str) -> Node {
        let module = Module::parse(source).expect("parse failed");
        match module.root().kind() {
            NodeKind::Program { body } => body[0].clone(),
            other => panic!("unexpected root {other:?}"),
        }
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(400.0), "400");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(1.5), "1.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(1e21), "1e+21");
    }

    #[test]
    fn test_literal_to_js_string() {
        assert_eq!(Literal::Number(16.0).to_js_string(), "16");
        assert_eq!(Literal::Boolean(true).to_js_string(), "true");
        assert_eq!(Literal::String("chunk".into()).to_js_string(), "chunk");
    }

    #[test]
    fn test_source_text_is_exact_slice() {
        let stmt = first_statement("var  a = { 1 : \"x.js\" };");
        assert_eq!(stmt.source_text(), "var  a = { 1 : \"x.js\" };");

        let NodeKind::Variable { declarators, .. } = stmt.kind() else {
            panic!("expected variable declaration");
        };
        let NodeKind::Declarator { init: Some(init), .. } = declarators[0].kind() else {
            panic!("expected initializer");
        };
        assert_eq!(init.tag(), NodeTag::Object);
        assert_eq!(init.source_text(), "{ 1 : \"x.js\" }");
    }

    #[test]
    fn test_parenthesized_expressions_are_transparent() {
        let stmt = first_statement("(a.b);");
        let NodeKind::ExpressionStatement { expression } = stmt.kind() else {
            panic!("expected expression statement");
        };
        assert_eq!(expression.tag(), NodeTag::Member);
        assert_eq!(expression.source_text(), "a.b");
    }

    #[test]
    fn test_operator_chains_nest_to_the_left() {
        let stmt = first_statement("(a + b) - c || d;");
        let NodeKind::ExpressionStatement { expression } = stmt.kind() else {
            panic!("expected expression statement");
        };
        let NodeKind::Logical { operator, left, .. } = expression.kind() else {
            panic!("expected logical expression");
        };
        assert_eq!(*operator, "||");
        let NodeKind::Binary {
            operator,
            left,
            right,
        } = left.kind()
        else {
            panic!("expected subtraction");
        };
        assert_eq!(*operator, "-");
        assert_eq!(right.source_text(), "c");
        assert_eq!(left.tag(), NodeTag::Binary);
        assert_eq!(left.source_text(), "a + b");
    }

    #[test]
    fn test_arrow_expression_body() {
        let stmt = first_statement("x = e => e + \".js\";");
        let NodeKind::ExpressionStatement { expression } = stmt.kind() else {
            panic!("expected expression statement");
        };
        let NodeKind::Assignment { value, .. } = expression.kind() else {
            panic!("expected assignment");
        };
        let NodeKind::Function {
            flavor,
            params,
            body,
            expression_body,
            ..
        } = value.kind()
        else {
            panic!("expected function");
        };
        assert_eq!(*flavor, FunctionFlavor::Arrow);
        assert_eq!(params.len(), 1);
        assert!(*expression_body);
        assert_eq!(body[0].tag(), NodeTag::Binary);
    }

    #[test]
    fn test_script_fallback() {
        // `with` is rejected by module grammar but valid in sloppy scripts.
        let module = Module::parse("with (a) { b = 1; }").expect("script fallback");
        assert_eq!(module.root().tag(), NodeTag::Program);
        assert!(Module::parse_with("with (a) { b = 1; }", SourceKind::Module).is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = Module::parse("function (").unwrap_err();
        assert!(matches!(err, SnoopError::Parse { .. }));
    }
}
