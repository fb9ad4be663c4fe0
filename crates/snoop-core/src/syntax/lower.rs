//! Lowering from the Oxc arena AST into owned [`Node`] trees.

use std::sync::Arc;

use oxc_ast::ast::{
    self, Argument, ArrayExpressionElement, AssignmentTarget, BindingPatternKind, ChainElement,
    ClassElement, Declaration, ExportDefaultDeclarationKind, Expression, ForStatementInit,
    ObjectPropertyKind, PropertyKey, SimpleAssignmentTarget, Statement, VariableDeclarationKind,
};
use oxc_span::{GetSpan, Span};

use super::{
    DEFAULT_BINDING, FunctionFlavor, Literal, Node, NodeKind, REST_PARAMETER, VariableKind,
};

pub(super) struct Lowerer {
    source: Arc<str>,
}

impl Lowerer {
    pub(super) fn new(source: Arc<str>) -> Self {
        Self { source }
    }

    fn node(&self, span: Span, kind: NodeKind) -> Node {
        Node::new(kind, span, Arc::clone(&self.source))
    }

    fn opaque(&self, span: Span, label: &'static str, children: Vec<Node>) -> Node {
        self.node(span, NodeKind::Opaque { label, children })
    }

    fn text(&self, span: Span) -> &str {
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }

    pub(super) fn program(&self, program: &ast::Program<'_>) -> Node {
        let body = self.statements(&program.body);
        self.node(program.span, NodeKind::Program { body })
    }

    fn statements(&self, statements: &[Statement<'_>]) -> Vec<Node> {
        statements.iter().map(|stmt| self.statement(stmt)).collect()
    }

    fn block(&self, block: &ast::BlockStatement<'_>) -> Node {
        let body = self.statements(&block.body);
        self.node(block.span, NodeKind::Block { body })
    }

    fn statement(&self, stmt: &Statement<'_>) -> Node {
        let kind = match stmt {
            Statement::BlockStatement(block) => return self.block(block),
            Statement::EmptyStatement(_) | Statement::DebuggerStatement(_) => NodeKind::Empty,
            Statement::ExpressionStatement(stmt) => NodeKind::ExpressionStatement {
                expression: self.expression(&stmt.expression),
            },
            Statement::VariableDeclaration(decl) => return self.variable_declaration(decl),
            Statement::FunctionDeclaration(func) => {
                return self.function(func, FunctionFlavor::Declaration);
            }
            Statement::ClassDeclaration(class) => return self.class(class),
            Statement::ReturnStatement(stmt) => NodeKind::Return {
                argument: stmt.argument.as_ref().map(|arg| self.expression(arg)),
            },
            Statement::IfStatement(stmt) => NodeKind::If {
                test: self.expression(&stmt.test),
                consequent: self.statement(&stmt.consequent),
                alternate: stmt.alternate.as_ref().map(|alt| self.statement(alt)),
            },
            Statement::SwitchStatement(stmt) => NodeKind::Switch {
                discriminant: self.expression(&stmt.discriminant),
                cases: stmt.cases.iter().map(|case| self.switch_case(case)).collect(),
            },
            Statement::ThrowStatement(stmt) => NodeKind::Throw {
                argument: self.expression(&stmt.argument),
            },
            Statement::BreakStatement(stmt) => NodeKind::Break {
                label: stmt.label.as_ref().map(|label| label.name.to_string()),
            },
            Statement::ContinueStatement(stmt) => NodeKind::Continue {
                label: stmt.label.as_ref().map(|label| label.name.to_string()),
            },
            Statement::WhileStatement(stmt) => NodeKind::While {
                test: self.expression(&stmt.test),
                body: self.statement(&stmt.body),
            },
            Statement::DoWhileStatement(stmt) => NodeKind::DoWhile {
                body: self.statement(&stmt.body),
                test: self.expression(&stmt.test),
            },
            Statement::ForStatement(stmt) => NodeKind::For {
                init: stmt.init.as_ref().map(|init| self.for_init(init)),
                test: stmt.test.as_ref().map(|test| self.expression(test)),
                update: stmt.update.as_ref().map(|update| self.expression(update)),
                body: self.statement(&stmt.body),
            },
            Statement::ForInStatement(stmt) => NodeKind::ForIn {
                right: self.expression(&stmt.right),
                body: self.statement(&stmt.body),
            },
            Statement::ForOfStatement(stmt) => NodeKind::ForOf {
                right: self.expression(&stmt.right),
                body: self.statement(&stmt.body),
            },
            Statement::LabeledStatement(stmt) => NodeKind::Opaque {
                label: "labeled statement",
                children: vec![self.statement(&stmt.body)],
            },
            Statement::TryStatement(stmt) => {
                let mut children = vec![self.block(&stmt.block)];
                if let Some(handler) = &stmt.handler {
                    children.push(self.block(&handler.body));
                }
                if let Some(finalizer) = &stmt.finalizer {
                    children.push(self.block(finalizer));
                }
                NodeKind::Opaque {
                    label: "try statement",
                    children,
                }
            }
            Statement::WithStatement(stmt) => NodeKind::Opaque {
                label: "with statement",
                children: vec![self.expression(&stmt.object), self.statement(&stmt.body)],
            },
            Statement::ExportNamedDeclaration(export) => NodeKind::Opaque {
                label: "export declaration",
                children: export
                    .declaration
                    .iter()
                    .map(|decl| self.declaration(decl))
                    .collect(),
            },
            Statement::ExportDefaultDeclaration(export) => NodeKind::Opaque {
                label: "export default declaration",
                children: vec![self.export_default(&export.declaration)],
            },
            _ => NodeKind::Opaque {
                label: "statement",
                children: Vec::new(),
            },
        };
        self.node(stmt.span(), kind)
    }

    fn declaration(&self, decl: &Declaration<'_>) -> Node {
        match decl {
            Declaration::VariableDeclaration(var) => self.variable_declaration(var),
            Declaration::FunctionDeclaration(func) => {
                self.function(func, FunctionFlavor::Declaration)
            }
            Declaration::ClassDeclaration(class) => self.class(class),
            _ => self.opaque(decl.span(), "declaration", Vec::new()),
        }
    }

    fn export_default(&self, decl: &ExportDefaultDeclarationKind<'_>) -> Node {
        match decl {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                self.function(func, FunctionFlavor::Declaration)
            }
            ExportDefaultDeclarationKind::ClassDeclaration(class) => self.class(class),
            other => match other.as_expression() {
                Some(expr) => self.expression(expr),
                None => self.opaque(other.span(), "export default", Vec::new()),
            },
        }
    }

    fn variable_declaration(&self, decl: &ast::VariableDeclaration<'_>) -> Node {
        let kind = match decl.kind {
            VariableDeclarationKind::Var => VariableKind::Var,
            VariableDeclarationKind::Let => VariableKind::Let,
            _ => VariableKind::Const,
        };
        let declarators = decl
            .declarations
            .iter()
            .map(|declarator| {
                self.node(
                    declarator.span,
                    NodeKind::Declarator {
                        target: self.binding(&declarator.id),
                        init: declarator.init.as_ref().map(|init| self.expression(init)),
                    },
                )
            })
            .collect();
        self.node(decl.span, NodeKind::Variable { kind, declarators })
    }

    fn for_init(&self, init: &ForStatementInit<'_>) -> Node {
        match init {
            ForStatementInit::VariableDeclaration(decl) => self.variable_declaration(decl),
            other => match other.as_expression() {
                Some(expr) => self.expression(expr),
                None => self.opaque(other.span(), "for initializer", Vec::new()),
            },
        }
    }

    fn switch_case(&self, case: &ast::SwitchCase<'_>) -> Node {
        self.node(
            case.span,
            NodeKind::Case {
                test: case.test.as_ref().map(|test| self.expression(test)),
                consequent: self.statements(&case.consequent),
            },
        )
    }

    fn class(&self, class: &ast::Class<'_>) -> Node {
        let mut children = Vec::new();
        if let Some(super_class) = &class.super_class {
            children.push(self.expression(super_class));
        }
        for element in class.body.body.iter() {
            match element {
                ClassElement::MethodDefinition(method) => {
                    children.push(self.function(&method.value, FunctionFlavor::Expression));
                }
                ClassElement::PropertyDefinition(prop) => {
                    if let Some(value) = &prop.value {
                        children.push(self.expression(value));
                    }
                }
                ClassElement::StaticBlock(block) => {
                    children.extend(self.statements(&block.body));
                }
                _ => {}
            }
        }
        self.opaque(class.span, "class", children)
    }

    fn function(&self, func: &ast::Function<'_>, flavor: FunctionFlavor) -> Node {
        let body = func
            .body
            .as_ref()
            .map(|body| self.statements(&body.statements))
            .unwrap_or_default();
        self.node(
            func.span,
            NodeKind::Function {
                flavor,
                name: func.id.as_ref().map(|id| id.name.to_string()),
                params: self.params(&func.params),
                body,
                expression_body: false,
            },
        )
    }

    fn arrow(&self, arrow: &ast::ArrowFunctionExpression<'_>) -> Node {
        let body = if arrow.expression {
            arrow
                .body
                .statements
                .iter()
                .map(|stmt| match stmt {
                    Statement::ExpressionStatement(stmt) => self.expression(&stmt.expression),
                    other => self.statement(other),
                })
                .collect()
        } else {
            self.statements(&arrow.body.statements)
        };
        self.node(
            arrow.span,
            NodeKind::Function {
                flavor: FunctionFlavor::Arrow,
                name: None,
                params: self.params(&arrow.params),
                body,
                expression_body: arrow.expression,
            },
        )
    }

    fn params(&self, params: &ast::FormalParameters<'_>) -> Vec<Node> {
        let mut nodes: Vec<Node> = params
            .items
            .iter()
            .map(|param| self.binding(&param.pattern))
            .collect();
        if let Some(rest) = &params.rest {
            let argument = self.binding(&rest.argument);
            nodes.push(self.opaque(rest.span, REST_PARAMETER, vec![argument]));
        }
        nodes
    }

    fn binding(&self, pattern: &ast::BindingPattern<'_>) -> Node {
        match &pattern.kind {
            BindingPatternKind::BindingIdentifier(ident) => self.node(
                ident.span,
                NodeKind::Identifier {
                    name: ident.name.to_string(),
                },
            ),
            BindingPatternKind::AssignmentPattern(assign) => {
                let children = vec![self.binding(&assign.left), self.expression(&assign.right)];
                self.opaque(assign.span, DEFAULT_BINDING, children)
            }
            _ => self.opaque(pattern.span(), "destructuring pattern", Vec::new()),
        }
    }

    fn expression(&self, expr: &Expression<'_>) -> Node {
        let kind = match expr {
            Expression::BooleanLiteral(lit) => NodeKind::Literal(Literal::Boolean(lit.value)),
            Expression::NullLiteral(_) => NodeKind::Literal(Literal::Null),
            Expression::NumericLiteral(lit) => NodeKind::Literal(Literal::Number(lit.value)),
            Expression::StringLiteral(lit) => {
                NodeKind::Literal(Literal::String(lit.value.to_string()))
            }
            Expression::BigIntLiteral(lit) => NodeKind::Literal(Literal::BigInt(
                self.text(lit.span).trim_end_matches('n').to_string(),
            )),
            Expression::RegExpLiteral(lit) => {
                NodeKind::Literal(Literal::RegExp(self.text(lit.span).to_string()))
            }
            Expression::TemplateLiteral(template) => self.template(template),
            Expression::Identifier(ident) => NodeKind::Identifier {
                name: ident.name.to_string(),
            },
            Expression::ThisExpression(_) => NodeKind::This,
            Expression::ArrayExpression(array) => NodeKind::Array {
                elements: array
                    .elements
                    .iter()
                    .map(|element| self.array_element(element))
                    .collect(),
            },
            Expression::ObjectExpression(object) => NodeKind::Object {
                properties: object
                    .properties
                    .iter()
                    .map(|prop| self.object_property(prop))
                    .collect(),
            },
            Expression::FunctionExpression(func) => {
                return self.function(func, FunctionFlavor::Expression);
            }
            Expression::ArrowFunctionExpression(arrow) => return self.arrow(arrow),
            Expression::AssignmentExpression(assign) => NodeKind::Assignment {
                operator: assign.operator.as_str(),
                target: self.assignment_target(&assign.left),
                value: self.expression(&assign.right),
            },
            Expression::BinaryExpression(_) | Expression::LogicalExpression(_) => {
                return self.operator_chain(expr);
            }
            Expression::UnaryExpression(unary) => NodeKind::Unary {
                operator: unary.operator.as_str(),
                argument: self.expression(&unary.argument),
            },
            Expression::UpdateExpression(update) => NodeKind::Update {
                operator: update.operator.as_str(),
                prefix: update.prefix,
                argument: self.simple_target(&update.argument),
            },
            Expression::ConditionalExpression(cond) => NodeKind::Conditional {
                test: self.expression(&cond.test),
                consequent: self.expression(&cond.consequent),
                alternate: self.expression(&cond.alternate),
            },
            Expression::SequenceExpression(seq) => NodeKind::Sequence {
                expressions: seq
                    .expressions
                    .iter()
                    .map(|expr| self.expression(expr))
                    .collect(),
            },
            Expression::ParenthesizedExpression(paren) => {
                return self.expression(&paren.expression);
            }
            Expression::CallExpression(call) => return self.call(call),
            Expression::NewExpression(new) => NodeKind::New {
                callee: self.expression(&new.callee),
                arguments: self.arguments(&new.arguments),
            },
            Expression::ChainExpression(chain) => return self.chain_element(&chain.expression),
            Expression::StaticMemberExpression(member) => return self.static_member(member),
            Expression::ComputedMemberExpression(member) => {
                return self.computed_member(member);
            }
            Expression::PrivateFieldExpression(member) => NodeKind::Opaque {
                label: "private field access",
                children: vec![self.expression(&member.object)],
            },
            Expression::TaggedTemplateExpression(tagged) => NodeKind::TaggedTemplate {
                tag: self.expression(&tagged.tag),
                quasi: self.node(tagged.quasi.span, self.template(&tagged.quasi)),
            },
            Expression::AwaitExpression(expr) => NodeKind::Opaque {
                label: "await expression",
                children: vec![self.expression(&expr.argument)],
            },
            Expression::YieldExpression(expr) => NodeKind::Opaque {
                label: "yield expression",
                children: expr.argument.iter().map(|arg| self.expression(arg)).collect(),
            },
            Expression::ClassExpression(class) => return self.class(class),
            Expression::TSAsExpression(expr) => return self.expression(&expr.expression),
            Expression::TSSatisfiesExpression(expr) => return self.expression(&expr.expression),
            Expression::TSNonNullExpression(expr) => return self.expression(&expr.expression),
            Expression::TSTypeAssertion(expr) => return self.expression(&expr.expression),
            _ => NodeKind::Opaque {
                label: "expression",
                children: Vec::new(),
            },
        };
        self.node(expr.span(), kind)
    }

    /// Lower a left-nested run of binary and logical operators in a loop, so long `a + b + c`
    /// chains do not grow the stack.
    fn operator_chain(&self, expr: &Expression<'_>) -> Node {
        let mut pending = Vec::new();
        let mut leftmost = expr;
        loop {
            match leftmost {
                Expression::BinaryExpression(binary) => {
                    pending.push((binary.span, binary.operator.as_str(), true, &binary.right));
                    leftmost = &binary.left;
                }
                Expression::LogicalExpression(logical) => {
                    pending.push((logical.span, logical.operator.as_str(), false, &logical.right));
                    leftmost = &logical.left;
                }
                Expression::ParenthesizedExpression(paren) => leftmost = &paren.expression,
                _ => break,
            }
        }

        let mut node = self.expression(leftmost);
        while let Some((span, operator, binary, right)) = pending.pop() {
            let left = node;
            let right = self.expression(right);
            let kind = if binary {
                NodeKind::Binary {
                    operator,
                    left,
                    right,
                }
            } else {
                NodeKind::Logical {
                    operator,
                    left,
                    right,
                }
            };
            node = self.node(span, kind);
        }
        node
    }

    fn template(&self, template: &ast::TemplateLiteral<'_>) -> NodeKind {
        NodeKind::Template {
            quasis: template
                .quasis
                .iter()
                .map(|quasi| match &quasi.value.cooked {
                    Some(cooked) => cooked.to_string(),
                    None => quasi.value.raw.to_string(),
                })
                .collect(),
            expressions: template
                .expressions
                .iter()
                .map(|expr| self.expression(expr))
                .collect(),
        }
    }

    fn array_element(&self, element: &ArrayExpressionElement<'_>) -> Node {
        match element {
            ArrayExpressionElement::SpreadElement(spread) => self.spread(spread),
            ArrayExpressionElement::Elision(elision) => self.node(elision.span, NodeKind::Hole),
            other => match other.as_expression() {
                Some(expr) => self.expression(expr),
                None => self.opaque(other.span(), "array element", Vec::new()),
            },
        }
    }

    fn object_property(&self, prop: &ObjectPropertyKind<'_>) -> Node {
        match prop {
            ObjectPropertyKind::ObjectProperty(prop) => {
                let key = match &prop.key {
                    PropertyKey::StaticIdentifier(ident) => self.node(
                        ident.span,
                        NodeKind::Identifier {
                            name: ident.name.to_string(),
                        },
                    ),
                    PropertyKey::PrivateIdentifier(ident) => {
                        self.opaque(ident.span, "private name", Vec::new())
                    }
                    other => match other.as_expression() {
                        Some(expr) => self.expression(expr),
                        None => self.opaque(other.span(), "property key", Vec::new()),
                    },
                };
                self.node(
                    prop.span,
                    NodeKind::Property {
                        key,
                        value: self.expression(&prop.value),
                        computed: prop.computed,
                        shorthand: prop.shorthand,
                    },
                )
            }
            ObjectPropertyKind::SpreadProperty(spread) => self.spread(spread),
        }
    }

    fn spread(&self, spread: &ast::SpreadElement<'_>) -> Node {
        self.node(
            spread.span,
            NodeKind::Spread {
                argument: self.expression(&spread.argument),
            },
        )
    }

    fn arguments(&self, arguments: &[Argument<'_>]) -> Vec<Node> {
        arguments
            .iter()
            .map(|arg| match arg {
                Argument::SpreadElement(spread) => self.spread(spread),
                other => match other.as_expression() {
                    Some(expr) => self.expression(expr),
                    None => self.opaque(other.span(), "argument", Vec::new()),
                },
            })
            .collect()
    }

    fn call(&self, call: &ast::CallExpression<'_>) -> Node {
        self.node(
            call.span,
            NodeKind::Call {
                callee: self.expression(&call.callee),
                arguments: self.arguments(&call.arguments),
                optional: call.optional,
            },
        )
    }

    fn chain_element(&self, element: &ChainElement<'_>) -> Node {
        match element {
            ChainElement::CallExpression(call) => self.call(call),
            ChainElement::StaticMemberExpression(member) => self.static_member(member),
            ChainElement::ComputedMemberExpression(member) => self.computed_member(member),
            other => self.opaque(other.span(), "optional chain", Vec::new()),
        }
    }

    fn static_member(&self, member: &ast::StaticMemberExpression<'_>) -> Node {
        let property = self.node(
            member.property.span,
            NodeKind::Identifier {
                name: member.property.name.to_string(),
            },
        );
        self.node(
            member.span,
            NodeKind::Member {
                object: self.expression(&member.object),
                property,
                computed: false,
                optional: member.optional,
            },
        )
    }

    fn computed_member(&self, member: &ast::ComputedMemberExpression<'_>) -> Node {
        self.node(
            member.span,
            NodeKind::Member {
                object: self.expression(&member.object),
                property: self.expression(&member.expression),
                computed: true,
                optional: member.optional,
            },
        )
    }

    fn assignment_target(&self, target: &AssignmentTarget<'_>) -> Node {
        match target {
            AssignmentTarget::AssignmentTargetIdentifier(ident) => self.node(
                ident.span,
                NodeKind::Identifier {
                    name: ident.name.to_string(),
                },
            ),
            AssignmentTarget::StaticMemberExpression(member) => self.static_member(member),
            AssignmentTarget::ComputedMemberExpression(member) => self.computed_member(member),
            other => self.opaque(other.span(), "assignment target", Vec::new()),
        }
    }

    fn simple_target(&self, target: &SimpleAssignmentTarget<'_>) -> Node {
        match target {
            SimpleAssignmentTarget::AssignmentTargetIdentifier(ident) => self.node(
                ident.span,
                NodeKind::Identifier {
                    name: ident.name.to_string(),
                },
            ),
            SimpleAssignmentTarget::StaticMemberExpression(member) => self.static_member(member),
            SimpleAssignmentTarget::ComputedMemberExpression(member) => {
                self.computed_member(member)
            }
            other => self.opaque(other.span(), "assignment target", Vec::new()),
        }
    }
}
