use std::fmt::{Display, Formatter};

use itertools::Itertools;

/// The basic data types every other type is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Number,
    String,
    Boolean,
    Nil,
    Any, // compatible with every other primitive, in both directions
}

impl Display for Primitive {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Primitive::Number => "Number",
            Primitive::String => "String",
            Primitive::Boolean => "Boolean",
            Primitive::Nil => "Nil",
            Primitive::Any => "Any",
        };
        f.write_str(name)
    }
}

/// A static type. Composite types own their components; two types are
/// "the same" when they are structurally compatible, never by identity.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(Primitive),
    Array(Box<Type>),
    Table { key: Box<Type>, value: Box<Type> },
    Function { params: Vec<Type>, ret: Box<Type> },
    Custom(String),
}

impl Type {
    pub fn primitive(kind: Primitive) -> Self {
        Type::Primitive(kind)
    }

    pub fn number() -> Self {
        Type::Primitive(Primitive::Number)
    }

    pub fn string() -> Self {
        Type::Primitive(Primitive::String)
    }

    pub fn boolean() -> Self {
        Type::Primitive(Primitive::Boolean)
    }

    pub fn nil() -> Self {
        Type::Primitive(Primitive::Nil)
    }

    pub fn any() -> Self {
        Type::Primitive(Primitive::Any)
    }

    /// `Array<element>`
    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    /// `Table<key, value>`
    pub fn table(key: Type, value: Type) -> Self {
        Type::Table {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Type::Function {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn custom(name: &str) -> Self {
        Type::Custom(name.to_string())
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Any))
    }

    /// Structural compatibility.
    ///
    /// `Any` only absorbs other primitives: `Array<Any>` is compatible with
    /// `Array<Number>` through recursion, but `Any` itself is not compatible
    /// with `Array<Number>`.
    pub fn is(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Primitive(a), Type::Primitive(b)) => {
                a == b || *a == Primitive::Any || *b == Primitive::Any
            },
            (Type::Array(a), Type::Array(b)) => a.is(b),
            (
                Type::Table { key: k1, value: v1 },
                Type::Table { key: k2, value: v2 },
            ) => k1.is(k2) && v1.is(v2),
            (
                Type::Function { params: p1, ret: r1 },
                Type::Function { params: p2, ret: r2 },
            ) => {
                p1.len() == p2.len()
                    && p1
                        .iter()
                        .zip(p2.iter())
                        .all(|(a, b)| a.is(b))
                    && r1.is(r2)
            },
            (Type::Custom(a), Type::Custom(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Primitive(kind) => kind.fmt(f),
            Type::Array(element) => write!(f, "Array<{element}>"),
            Type::Table { key, value } => write!(f, "Table<{key}, {value}>"),
            Type::Function { params, ret } => {
                write!(f, "Function({}) -> {ret}", params.iter().join(", "))
            },
            Type::Custom(name) => f.write_str(name),
        }
    }
}

impl From<Primitive> for Type {
    fn from(kind: Primitive) -> Self {
        Type::Primitive(kind)
    }
}
