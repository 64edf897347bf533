//! The node model
//!
//!     A [Node] is a [NodeKind] plus an optional source [Range]. `NodeKind` is a closed set:
//!     each variant names its children the way ESTree does (`test`, `consequent`,
//!     `alternate`, `left`, `right`, ...). Children are owned, so a tree can never contain
//!     a cycle.
//!
//!     Constructs the parser does not model in detail (object literals, template literals,
//!     class bodies, module declarations) become [NodeKind::Opaque], which keeps their
//!     verbatim text. That text is all the comparator has to go on for them.
//!
//!     The constructor helpers below exist mostly for hosts and tests that assemble trees by
//!     hand; they produce nodes without ranges, attach one with [Node::at].

use super::operators::{
    AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator,
};
use super::range::Range;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: Option<Range>,
}

/// Literal values. Numbers keep the value, not the spelling, so `1` and `1.0` are the same
/// literal while `1` and `"1"` are not.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    /// Spelling without the trailing `n`
    BigInt(String),
    RegExp {
        pattern: String,
        flags: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Statements
    Program {
        body: Vec<Node>,
    },
    Block {
        body: Vec<Node>,
    },
    Empty,
    ExpressionStatement {
        expression: Box<Node>,
    },
    If {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    While {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoWhile {
        body: Box<Node>,
        test: Box<Node>,
    },
    For {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    ForIn {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    ForOf {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    Return {
        argument: Option<Box<Node>>,
    },
    Break {
        label: Option<Box<Node>>,
    },
    Continue {
        label: Option<Box<Node>>,
    },
    Throw {
        argument: Box<Node>,
    },
    Try {
        block: Box<Node>,
        handler: Option<Box<Node>>,
        finalizer: Option<Box<Node>>,
    },
    CatchClause {
        param: Option<Box<Node>>,
        body: Box<Node>,
    },
    Switch {
        discriminant: Box<Node>,
        cases: Vec<Node>,
    },
    /// `test` is `None` for `default:`
    SwitchCase {
        test: Option<Box<Node>>,
        consequent: Vec<Node>,
    },
    Labeled {
        label: Box<Node>,
        body: Box<Node>,
    },
    VariableDeclaration {
        kind: DeclarationKind,
        declarations: Vec<Node>,
    },
    VariableDeclarator {
        id: Box<Node>,
        init: Option<Box<Node>>,
    },
    /// Function declaration or function expression. A parameter with a default value is
    /// an `=` [NodeKind::Assignment], a rest parameter a [NodeKind::Spread].
    Function {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
        is_async: bool,
    },
    /// `body` is a block or a single expression
    ArrowFunction {
        params: Vec<Node>,
        body: Box<Node>,
        is_async: bool,
    },

    // Expressions
    Identifier {
        name: String,
    },
    Literal(Literal),
    This,
    /// `None` elements are holes, as in `[a, , b]`
    Array {
        elements: Vec<Option<Node>>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Logical {
        operator: LogicalOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        operator: UnaryOperator,
        argument: Box<Node>,
    },
    Update {
        operator: UpdateOperator,
        prefix: bool,
        argument: Box<Node>,
    },
    Assignment {
        operator: AssignmentOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// The ternary `test ? consequent : alternate`
    Conditional {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        arguments: Vec<Node>,
        optional: bool,
    },
    New {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    Member {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
        optional: bool,
    },
    Sequence {
        expressions: Vec<Node>,
    },
    /// `...argument` in calls, arrays and parameter lists
    Spread {
        argument: Box<Node>,
    },
    Await {
        argument: Box<Node>,
    },
    /// Verbatim text of a construct without a fielded model
    Opaque {
        text: String,
    },
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, range: None }
    }

    /// Attach a source range
    pub fn at(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Identifier { name: name.into() })
    }

    pub fn number(value: f64) -> Self {
        Self::new(NodeKind::Literal(Literal::Number(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Literal(Literal::String(value.into())))
    }

    pub fn binary(operator: BinaryOperator, left: Node, right: Node) -> Self {
        Self::new(NodeKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn logical(operator: LogicalOperator, left: Node, right: Node) -> Self {
        Self::new(NodeKind::Logical {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(operator: UnaryOperator, argument: Node) -> Self {
        Self::new(NodeKind::Unary {
            operator,
            argument: Box::new(argument),
        })
    }

    pub fn call(callee: Node, arguments: Vec<Node>) -> Self {
        Self::new(NodeKind::Call {
            callee: Box::new(callee),
            arguments,
            optional: false,
        })
    }

    pub fn member(object: Node, property: &str) -> Self {
        Self::new(NodeKind::Member {
            object: Box::new(object),
            property: Box::new(Node::identifier(property)),
            computed: false,
            optional: false,
        })
    }

    pub fn block(body: Vec<Node>) -> Self {
        Self::new(NodeKind::Block { body })
    }

    pub fn if_statement(test: Node, consequent: Node, alternate: Option<Node>) -> Self {
        Self::new(NodeKind::If {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: alternate.map(Box::new),
        })
    }

    /// ESTree name of the node kind, used in logs and parser errors
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Program { .. } => "Program",
            NodeKind::Block { .. } => "BlockStatement",
            NodeKind::Empty => "EmptyStatement",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::If { .. } => "IfStatement",
            NodeKind::While { .. } => "WhileStatement",
            NodeKind::DoWhile { .. } => "DoWhileStatement",
            NodeKind::For { .. } => "ForStatement",
            NodeKind::ForIn { .. } => "ForInStatement",
            NodeKind::ForOf { .. } => "ForOfStatement",
            NodeKind::Return { .. } => "ReturnStatement",
            NodeKind::Break { .. } => "BreakStatement",
            NodeKind::Continue { .. } => "ContinueStatement",
            NodeKind::Throw { .. } => "ThrowStatement",
            NodeKind::Try { .. } => "TryStatement",
            NodeKind::CatchClause { .. } => "CatchClause",
            NodeKind::Switch { .. } => "SwitchStatement",
            NodeKind::SwitchCase { .. } => "SwitchCase",
            NodeKind::Labeled { .. } => "LabeledStatement",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::VariableDeclarator { .. } => "VariableDeclarator",
            NodeKind::Function { .. } => "Function",
            NodeKind::ArrowFunction { .. } => "ArrowFunctionExpression",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Literal(_) => "Literal",
            NodeKind::This => "ThisExpression",
            NodeKind::Array { .. } => "ArrayExpression",
            NodeKind::Binary { .. } => "BinaryExpression",
            NodeKind::Logical { .. } => "LogicalExpression",
            NodeKind::Unary { .. } => "UnaryExpression",
            NodeKind::Update { .. } => "UpdateExpression",
            NodeKind::Assignment { .. } => "AssignmentExpression",
            NodeKind::Conditional { .. } => "ConditionalExpression",
            NodeKind::Call { .. } => "CallExpression",
            NodeKind::New { .. } => "NewExpression",
            NodeKind::Member { .. } => "MemberExpression",
            NodeKind::Sequence { .. } => "SequenceExpression",
            NodeKind::Spread { .. } => "SpreadElement",
            NodeKind::Await { .. } => "AwaitExpression",
            NodeKind::Opaque { .. } => "Opaque",
        }
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Program { body } | NodeKind::Block { body } => body.iter().collect(),
            NodeKind::ExpressionStatement { expression } => vec![expression.as_ref()],
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                let mut children = vec![test.as_ref(), consequent.as_ref()];
                children.extend(alternate.as_deref());
                children
            }
            NodeKind::While { test, body } => vec![test.as_ref(), body.as_ref()],
            NodeKind::DoWhile { body, test } => vec![body.as_ref(), test.as_ref()],
            NodeKind::For {
                init,
                test,
                update,
                body,
            } => init
                .as_deref()
                .into_iter()
                .chain(test.as_deref())
                .chain(update.as_deref())
                .chain(std::iter::once(body.as_ref()))
                .collect(),
            NodeKind::ForIn { left, right, body } | NodeKind::ForOf { left, right, body } => {
                vec![left.as_ref(), right.as_ref(), body.as_ref()]
            }
            NodeKind::Return { argument } => argument.as_deref().into_iter().collect(),
            NodeKind::Break { label } | NodeKind::Continue { label } => {
                label.as_deref().into_iter().collect()
            }
            NodeKind::Throw { argument }
            | NodeKind::Spread { argument }
            | NodeKind::Await { argument } => vec![argument.as_ref()],
            NodeKind::Try {
                block,
                handler,
                finalizer,
            } => std::iter::once(block.as_ref())
                .chain(handler.as_deref())
                .chain(finalizer.as_deref())
                .collect(),
            NodeKind::CatchClause { param, body } => param
                .as_deref()
                .into_iter()
                .chain(std::iter::once(body.as_ref()))
                .collect(),
            NodeKind::Switch {
                discriminant,
                cases,
            } => std::iter::once(discriminant.as_ref())
                .chain(cases.iter())
                .collect(),
            NodeKind::SwitchCase { test, consequent } => test
                .as_deref()
                .into_iter()
                .chain(consequent.iter())
                .collect(),
            NodeKind::Labeled { label, body } => vec![label.as_ref(), body.as_ref()],
            NodeKind::VariableDeclaration { declarations, .. } => declarations.iter().collect(),
            NodeKind::VariableDeclarator { id, init } => {
                let mut children = vec![id.as_ref()];
                children.extend(init.as_deref());
                children
            }
            NodeKind::Function {
                id, params, body, ..
            } => id
                .as_deref()
                .into_iter()
                .chain(params.iter())
                .chain(std::iter::once(body.as_ref()))
                .collect(),
            NodeKind::ArrowFunction { params, body, .. } => params
                .iter()
                .chain(std::iter::once(body.as_ref()))
                .collect(),
            NodeKind::Array { elements } => elements.iter().flatten().collect(),
            NodeKind::Binary { left, right, .. }
            | NodeKind::Logical { left, right, .. }
            | NodeKind::Assignment { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            NodeKind::Unary { argument, .. } | NodeKind::Update { argument, .. } => {
                vec![argument.as_ref()]
            }
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => vec![test.as_ref(), consequent.as_ref(), alternate.as_ref()],
            NodeKind::Call {
                callee, arguments, ..
            }
            | NodeKind::New { callee, arguments } => std::iter::once(callee.as_ref())
                .chain(arguments.iter())
                .collect(),
            NodeKind::Member {
                object, property, ..
            } => vec![object.as_ref(), property.as_ref()],
            NodeKind::Sequence { expressions } => expressions.iter().collect(),
            NodeKind::Empty
            | NodeKind::Identifier { .. }
            | NodeKind::Literal(_)
            | NodeKind::This
            | NodeKind::Opaque { .. } => Vec::new(),
        }
    }
}
