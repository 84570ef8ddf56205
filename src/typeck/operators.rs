use std::collections::HashMap;

use lazy_static::lazy_static;

use super::accepts;
use crate::ast::{BinaryOperation, Type, UnaryOperation};

/// How a binary operator constrains its operands
#[derive(Debug, Clone, PartialEq)]
pub enum BinaryRule {
    /// both operands must be compatible with `operand`; result is `result`
    Uniform { operand: Type, result: Type },
    /// operands must be compatible with each other; result is `result`
    Mutual { result: Type },
}

/// How a unary operator constrains its operand
#[derive(Debug, Clone, PartialEq)]
pub enum UnaryRule {
    Uniform { operand: Type, result: Type },
    /// `#` and friends: strings, arrays and tables all have a length
    Length { result: Type },
}

impl BinaryRule {
    /// The result type, or `None` when the operands break the rule
    pub fn apply(&self, left: &Type, right: &Type) -> Option<Type> {
        match self {
            BinaryRule::Uniform { operand, result } => {
                (accepts(operand, left) && accepts(operand, right))
                    .then(|| result.clone())
            },
            BinaryRule::Mutual { result } => {
                accepts(left, right).then(|| result.clone())
            },
        }
    }
}

impl UnaryRule {
    pub fn apply(&self, operand_ty: &Type) -> Option<Type> {
        match self {
            UnaryRule::Uniform { operand, result } => {
                accepts(operand, operand_ty).then(|| result.clone())
            },
            UnaryRule::Length { result } => {
                let has_length = matches!(operand_ty, Type::Array(_) | Type::Table { .. })
                    || accepts(&Type::string(), operand_ty);
                has_length.then(|| result.clone())
            },
        }
    }
}

/// Operator -> rule lookup, handed to the checker
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorTable {
    binary: HashMap<BinaryOperation, BinaryRule>,
    unary: HashMap<UnaryOperation, UnaryRule>,
}

impl OperatorTable {
    /// A table with no rules at all; every operator use is an error
    pub fn empty() -> Self {
        OperatorTable {
            binary: HashMap::new(),
            unary: HashMap::new(),
        }
    }

    pub fn set_binary(&mut self, operation: BinaryOperation, rule: BinaryRule) {
        self.binary.insert(operation, rule);
    }

    pub fn set_unary(&mut self, operation: UnaryOperation, rule: UnaryRule) {
        self.unary.insert(operation, rule);
    }

    pub fn binary(&self, operation: BinaryOperation) -> Option<&BinaryRule> {
        self.binary.get(&operation)
    }

    pub fn unary(&self, operation: UnaryOperation) -> Option<&UnaryRule> {
        self.unary.get(&operation)
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        DEFAULT_OPERATORS.clone()
    }
}

/**********************\
|* The built-in rules *|
\**********************/
lazy_static! {
    static ref DEFAULT_OPERATORS: OperatorTable = {
        use BinaryOperation::*;

        let mut table = OperatorTable::empty();

        let arithmetic = BinaryRule::Uniform {
            operand: Type::number(),
            result: Type::number(),
        };
        for op in [Add, Sub, Mul, Div, Mod, Pow] {
            table.set_binary(op, arithmetic.clone());
        }

        table.set_binary(
            Concat,
            BinaryRule::Uniform {
                operand: Type::string(),
                result: Type::string(),
            },
        );

        let ordering = BinaryRule::Uniform {
            operand: Type::number(),
            result: Type::boolean(),
        };
        for op in [Lt, Le, Gt, Ge] {
            table.set_binary(op, ordering.clone());
        }

        for op in [Eq, Ne] {
            table.set_binary(op, BinaryRule::Mutual { result: Type::boolean() });
        }

        let logical = BinaryRule::Uniform {
            operand: Type::boolean(),
            result: Type::boolean(),
        };
        for op in [And, Or] {
            table.set_binary(op, logical.clone());
        }

        table.set_unary(
            UnaryOperation::Negate,
            UnaryRule::Uniform {
                operand: Type::number(),
                result: Type::number(),
            },
        );
        table.set_unary(
            UnaryOperation::Not,
            UnaryRule::Uniform {
                operand: Type::boolean(),
                result: Type::boolean(),
            },
        );
        table.set_unary(
            UnaryOperation::Length,
            UnaryRule::Length { result: Type::number() },
        );

        table
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_covers_every_operator() {
        use BinaryOperation::*;

        let table = OperatorTable::default();
        for op in [
            Add, Sub, Mul, Div, Mod, Pow, Concat, Eq, Ne, Lt, Le, Gt, Ge, And, Or,
        ] {
            assert!(table.binary(op).is_some(), "no rule for {op}");
        }
        for op in [
            UnaryOperation::Negate,
            UnaryOperation::Not,
            UnaryOperation::Length,
        ] {
            assert!(table.unary(op).is_some(), "no rule for {op}");
        }
    }

    #[test]
    fn test_arithmetic_rule() {
        let table = OperatorTable::default();
        let add = table.binary(BinaryOperation::Add).unwrap();
        assert_eq!(add.apply(&Type::number(), &Type::number()), Some(Type::number()));
        assert_eq!(add.apply(&Type::any(), &Type::number()), Some(Type::number()));
        assert_eq!(add.apply(&Type::number(), &Type::string()), None);
    }

    #[test]
    fn test_equality_rule() {
        let table = OperatorTable::default();
        let eq = table.binary(BinaryOperation::Eq).unwrap();
        assert_eq!(eq.apply(&Type::string(), &Type::string()), Some(Type::boolean()));
        assert_eq!(
            eq.apply(&Type::array(Type::nil()), &Type::array(Type::nil())),
            Some(Type::boolean())
        );
        assert_eq!(eq.apply(&Type::string(), &Type::nil()), None);
    }

    #[test]
    fn test_any_operand_meets_composites() {
        let table = OperatorTable::default();
        let eq = table.binary(BinaryOperation::Eq).unwrap();
        let numbers = Type::array(Type::number());
        assert_eq!(eq.apply(&Type::any(), &numbers), Some(Type::boolean()));
        assert_eq!(eq.apply(&numbers, &Type::any()), Some(Type::boolean()));

        let mut custom = OperatorTable::empty();
        custom.set_binary(
            BinaryOperation::Concat,
            BinaryRule::Uniform {
                operand: numbers.clone(),
                result: numbers.clone(),
            },
        );
        let concat = custom.binary(BinaryOperation::Concat).unwrap();
        assert_eq!(concat.apply(&Type::any(), &numbers), Some(numbers.clone()));
        assert_eq!(concat.apply(&Type::string(), &numbers), None);
    }

    #[test]
    fn test_length_rule() {
        let table = OperatorTable::default();
        let len = table.unary(UnaryOperation::Length).unwrap();
        assert_eq!(len.apply(&Type::string()), Some(Type::number()));
        assert_eq!(len.apply(&Type::array(Type::boolean())), Some(Type::number()));
        assert_eq!(
            len.apply(&Type::table(Type::string(), Type::string())),
            Some(Type::number())
        );
        assert_eq!(len.apply(&Type::boolean()), None);
    }
}
