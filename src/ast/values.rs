use std::fmt::{Display, Formatter};

use super::{ConversionError, Primitive};

/// A runtime datum. Strings own their bytes; everything else is plain data.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

impl Value {
    /// Runtime equality. Tags must match; numbers compare with plain `==`
    /// (so `NaN` is never equal to anything and `0.0 == -0.0`), strings
    /// compare byte for byte.
    pub fn is(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a.as_bytes() == b.as_bytes(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            _ => false,
        }
    }

    /// Where this value sits on the static lattice
    pub fn kind(&self) -> Primitive {
        match self {
            Value::Number(_) => Primitive::Number,
            Value::Str(_) => Primitive::String,
            Value::Bool(_) => Primitive::Boolean,
            Value::Nil => Primitive::Nil,
        }
    }

    pub fn type_str(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Str(_) => "String",
            Value::Bool(_) => "Boolean",
            Value::Nil => "Nil",
        }
    }

    /// Release the value. Taking `self` means a value can't be destroyed
    /// twice.
    pub fn destroy(self) {
        drop(self)
    }

    /// Release a value that may not be there. `None` is a no-op.
    pub fn destroy_opt(value: Option<Value>) {
        if let Some(value) = value {
            value.destroy();
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(x) => x.fmt(f),
            Value::Str(x) => x.fmt(f),
            Value::Bool(x) => x.fmt(f),
            Value::Nil => write!(f, "nil"),
        }
    }
}

/******************************\
|* Rust types <-> Value types *|
\******************************/
// `From<rust_type> for Value` is infallible: each rust type maps onto
// exactly one variant. Going the other way can fail, so those are `TryFrom`.
macro_rules! impl_value_conversions {
    ($($t:ty, $v:ident);* $(;)?) => {
        $(
            impl TryFrom<Value> for $t {
                type Error = ConversionError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    let builtin_type = value.type_str();
                    if let Value::$v(native_val) = value {
                        Ok(native_val)
                    } else {
                        Err(ConversionError {
                            builtin_type: builtin_type.to_string(),
                            rust_type: stringify!($t).to_string(),
                        })
                    }
                }
            }

            impl From<$t> for Value {
                fn from(val: $t) -> Self {
                    Value::$v(val)
                }
            }
        )*
    };
}

// The first element is the rust type, the second is the Value variant.
impl_value_conversions! {
    String, Str;
    f64, Number;
    bool, Bool;
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Str(val.to_string())
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = ConversionError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        if let Value::Str(native_s) = value {
            Ok(native_s)
        } else {
            Err(ConversionError {
                builtin_type: value.type_str().to_string(),
                rust_type: "&str".to_string(),
            })
        }
    }
}
