use std::fmt::{Display, Formatter};

use super::Type;

/// Where a node came from in the source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperation {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl Display for BinaryOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperation::Add => "+",
            BinaryOperation::Sub => "-",
            BinaryOperation::Mul => "*",
            BinaryOperation::Div => "/",
            BinaryOperation::Mod => "%",
            BinaryOperation::Pow => "^",
            BinaryOperation::Concat => "..",
            BinaryOperation::Eq => "==",
            BinaryOperation::Ne => "~=",
            BinaryOperation::Lt => "<",
            BinaryOperation::Le => "<=",
            BinaryOperation::Gt => ">",
            BinaryOperation::Ge => ">=",
            BinaryOperation::And => "and",
            BinaryOperation::Or => "or",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperation {
    Negate,
    Not,
    Length,
}

impl Display for UnaryOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            UnaryOperation::Negate => "-",
            UnaryOperation::Not => "not",
            UnaryOperation::Length => "#",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // literals
    Integer(f64),
    Str(String),
    Boolean(bool),
    Nil,

    Identifier(String),

    BinaryOperation {
        operation: BinaryOperation,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryOperation {
        operation: UnaryOperation,
        expression: Box<Node>,
    },
    ExpressionList(Vec<Node>),
    /// `prefix(args)` or `prefix:name(args)`; `args` is always an
    /// expression list
    Call {
        prefix: Box<Node>,
        args: Box<Node>,
        self_call: bool,
    },
    ExpressionGroup(Box<Node>),
    ExpressionStatement(Box<Node>),
    Block(Vec<Node>),

    /// `local name: annotation = value`
    Local {
        name: String,
        annotation: Option<Type>,
        value: Option<Box<Node>>,
    },
    ArrayConstructor(Vec<Node>),
    TableConstructor(Vec<(Node, Node)>),
    Index {
        target: Box<Node>,
        key: Box<Node>,
    },
}

/// An AST node. Children are owned, so a tree can never contain a cycle.
/// `ty` starts empty and is filled in by the type checker.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub location: Location,
    pub ty: Option<Type>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            location: Location::default(),
            ty: None,
        }
    }

    /// Same node, moved to `location`
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.location = Location { line, column };
        self
    }

    /****************\
    |* Constructors *|
    \****************/
    pub fn integer(value: f64) -> Self {
        Node::new(NodeKind::Integer(value))
    }

    pub fn string(value: &str) -> Self {
        Node::new(NodeKind::Str(value.to_string()))
    }

    pub fn boolean(value: bool) -> Self {
        Node::new(NodeKind::Boolean(value))
    }

    pub fn nil() -> Self {
        Node::new(NodeKind::Nil)
    }

    pub fn identifier(name: &str) -> Self {
        Node::new(NodeKind::Identifier(name.to_string()))
    }

    pub fn binary(operation: BinaryOperation, left: Node, right: Node) -> Self {
        Node::new(NodeKind::BinaryOperation {
            operation,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(operation: UnaryOperation, expression: Node) -> Self {
        Node::new(NodeKind::UnaryOperation {
            operation,
            expression: Box::new(expression),
        })
    }

    pub fn expression_list(expressions: Vec<Node>) -> Self {
        Node::new(NodeKind::ExpressionList(expressions))
    }

    pub fn call(prefix: Node, args: Vec<Node>) -> Self {
        Node::new(NodeKind::Call {
            prefix: Box::new(prefix),
            args: Box::new(Node::expression_list(args)),
            self_call: false,
        })
    }

    /// `prefix:name(args)`; the receiver is passed implicitly
    pub fn method_call(prefix: Node, args: Vec<Node>) -> Self {
        Node::new(NodeKind::Call {
            prefix: Box::new(prefix),
            args: Box::new(Node::expression_list(args)),
            self_call: true,
        })
    }

    pub fn group(expression: Node) -> Self {
        Node::new(NodeKind::ExpressionGroup(Box::new(expression)))
    }

    pub fn statement(expression: Node) -> Self {
        Node::new(NodeKind::ExpressionStatement(Box::new(expression)))
    }

    pub fn block(statements: Vec<Node>) -> Self {
        Node::new(NodeKind::Block(statements))
    }

    pub fn local(name: &str, annotation: Option<Type>, value: Option<Node>) -> Self {
        Node::new(NodeKind::Local {
            name: name.to_string(),
            annotation,
            value: value.map(Box::new),
        })
    }

    pub fn array(elements: Vec<Node>) -> Self {
        Node::new(NodeKind::ArrayConstructor(elements))
    }

    pub fn table(pairs: Vec<(Node, Node)>) -> Self {
        Node::new(NodeKind::TableConstructor(pairs))
    }

    pub fn index(target: Node, key: Node) -> Self {
        Node::new(NodeKind::Index {
            target: Box::new(target),
            key: Box::new(key),
        })
    }
}
