mod context;
mod operators;

pub use context::*;
pub use operators::*;
use tracing::debug;

use crate::ast::{Node, NodeKind, Type, TypeError};

/// Type-check the tree rooted at `node` against `context`.
/// See [`TypeChecker::check`].
pub fn check(context: &mut TypeContext, node: &mut Node) -> Type {
    TypeChecker::new(context).check(node)
}

/// Compatibility as the checker enforces it. `Any` on either side stands
/// for "unknown" (an unresolved name, a node that already failed) and
/// passes, so one error is never reported twice.
fn accepts(expected: &Type, actual: &Type) -> bool {
    expected.is_any() || actual.is_any() || expected.is(actual)
}

/// Walks an AST depth first, annotating every node with its type.
///
/// Mismatches never stop the walk: each one is recorded on the context and
/// the offending node is given `Any`, so one bad subexpression doesn't set
/// off errors all the way up the tree. Callers look at
/// `context.error_count()` afterwards to decide whether the pass succeeded.
#[derive(Debug)]
pub struct TypeChecker<'a> {
    context: &'a mut TypeContext,
    operators: OperatorTable,
}

impl<'a> TypeChecker<'a> {
    pub fn new(context: &'a mut TypeContext) -> Self {
        Self::with_operators(context, OperatorTable::default())
    }

    pub fn with_operators(
        context: &'a mut TypeContext,
        operators: OperatorTable,
    ) -> Self {
        TypeChecker { context, operators }
    }

    /// Infer the type of `node`, store it in `node.ty`, and return it
    pub fn check(&mut self, node: &mut Node) -> Type {
        let ty = self.infer(node);
        node.ty = Some(ty.clone());
        ty
    }

    fn infer(&mut self, node: &mut Node) -> Type {
        match &mut node.kind {
            NodeKind::Integer(_) => Type::number(),
            NodeKind::Str(_) => Type::string(),
            NodeKind::Boolean(_) => Type::boolean(),
            NodeKind::Nil => Type::nil(),

            NodeKind::Identifier(name) => self.identifier(name),

            NodeKind::BinaryOperation {
                operation,
                left,
                right,
            } => {
                let left = self.check(left);
                let right = self.check(right);
                let operation = *operation;

                self.operators
                    .binary(operation)
                    .and_then(|rule| rule.apply(&left, &right))
                    .unwrap_or_else(|| {
                        self.operator_error(&operation, format!("{left} and {right}"))
                    })
            },

            NodeKind::UnaryOperation {
                operation,
                expression,
            } => {
                let operand = self.check(expression);
                let operation = *operation;

                self.operators
                    .unary(operation)
                    .and_then(|rule| rule.apply(&operand))
                    .unwrap_or_else(|| {
                        self.operator_error(&operation, operand.to_string())
                    })
            },

            NodeKind::ExpressionList(expressions) | NodeKind::Block(expressions) => {
                for expression in expressions.iter_mut() {
                    self.check(expression);
                }
                Type::nil()
            },

            NodeKind::Call {
                prefix,
                args,
                self_call,
            } => {
                let callee = self.check(prefix);
                let arg_types = self.arguments(args);
                self.call(&callee, &arg_types, *self_call)
            },

            NodeKind::ExpressionGroup(expression) => self.check(expression),

            NodeKind::ExpressionStatement(expression) => {
                self.check(expression);
                Type::nil()
            },

            NodeKind::Local {
                name,
                annotation,
                value,
            } => {
                let value_ty = value.as_mut().map(|v| self.check(v));
                let annotation = annotation
                    .as_ref()
                    .map(|a| self.context.resolve(a));
                let declared = match (annotation, value_ty) {
                    (Some(expected), Some(actual)) => {
                        if !accepts(&expected, &actual) {
                            self.mismatch(&expected, &actual);
                        }
                        expected
                    },
                    (Some(expected), None) => expected,
                    (None, Some(actual)) => actual,
                    (None, None) => Type::any(),
                };
                self.declare(name, declared);
                Type::nil()
            },

            NodeKind::ArrayConstructor(elements) => {
                let element = self.uniform(elements.iter_mut());
                Type::array(element)
            },

            NodeKind::TableConstructor(pairs) => {
                let key = self.uniform(pairs.iter_mut().map(|(k, _)| k));
                let value = self.uniform(pairs.iter_mut().map(|(_, v)| v));
                Type::table(key, value)
            },

            NodeKind::Index { target, key } => {
                let target = self.check(target);
                let key = self.check(key);
                self.index(&target, &key)
            },
        }
    }

    /***********\
    |* Helpers *|
    \***********/
    fn identifier(&mut self, name: &str) -> Type {
        match self.context.lookup(name) {
            Some(ty) => self.context.resolve(ty),
            None => {
                if self.context.is_strict() {
                    self.context
                        .record_error(TypeError::Unresolved(name.to_string()));
                }
                Type::any()
            },
        }
    }

    fn declare(&mut self, name: &str, ty: Type) {
        if let Some(previous) = self.context.lookup(name) {
            if self.context.is_strict() {
                let error = TypeError::Redeclared {
                    name: name.to_string(),
                    previous: previous.to_string(),
                    current: ty.to_string(),
                };
                self.context.record_error(error);
            } else {
                debug!(%name, "shadowing {previous} with {ty}");
            }
        }
        self.context.declare(name, ty);
    }

    /// Checks every node in a call's argument list
    fn arguments(&mut self, args: &mut Node) -> Vec<Type> {
        if let NodeKind::ExpressionList(expressions) = &mut args.kind {
            let types = expressions
                .iter_mut()
                .map(|e| self.check(e))
                .collect();
            args.ty = Some(Type::nil());
            types
        } else {
            // a bare expression is a list of one
            vec![self.check(args)]
        }
    }

    fn call(&mut self, callee: &Type, args: &[Type], self_call: bool) -> Type {
        match callee {
            Type::Function { params, ret } => {
                // the receiver of `a:f()` is passed implicitly
                let params = if self_call {
                    params.get(1..).unwrap_or_default()
                } else {
                    &params[..]
                };
                if params.len() != args.len() {
                    self.context.record_error(TypeError::Arity {
                        expected: params.len(),
                        actual: args.len(),
                    });
                }
                for (expected, actual) in params.iter().zip(args) {
                    if !accepts(expected, actual) {
                        self.mismatch(expected, actual);
                    }
                }
                ret.as_ref().clone()
            },
            ty if ty.is_any() => Type::any(),
            ty => {
                self.context
                    .record_error(TypeError::NotCallable(ty.to_string()));
                Type::any()
            },
        }
    }

    fn index(&mut self, target: &Type, key: &Type) -> Type {
        match target {
            Type::Table { key: expected, value } => {
                if !accepts(expected, key) {
                    self.mismatch(expected, key);
                }
                value.as_ref().clone()
            },
            Type::Array(element) => {
                if !accepts(&Type::number(), key) {
                    self.mismatch(&Type::number(), key);
                }
                element.as_ref().clone()
            },
            ty if ty.is_any() => Type::any(),
            ty => {
                self.context
                    .record_error(TypeError::NotIndexable(ty.to_string()));
                Type::any()
            },
        }
    }

    /// The common type of a constructor's elements: the first element's
    /// type, which every later element must be compatible with. `Any` if
    /// there are no elements.
    fn uniform<'n>(&mut self, nodes: impl Iterator<Item = &'n mut Node>) -> Type {
        let mut first: Option<Type> = None;
        for node in nodes {
            let ty = self.check(node);
            match &first {
                None => first = Some(ty),
                Some(expected) => {
                    if !accepts(expected, &ty) {
                        self.mismatch(expected, &ty);
                    }
                },
            }
        }
        first.unwrap_or_else(Type::any)
    }

    fn mismatch(&mut self, expected: &Type, actual: &Type) {
        self.context.record_error(TypeError::Mismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }

    fn operator_error(&mut self, operator: &impl ToString, operand: String) -> Type {
        self.context.record_error(TypeError::Operator {
            operator: operator.to_string(),
            operand,
        });
        Type::any()
    }
}
