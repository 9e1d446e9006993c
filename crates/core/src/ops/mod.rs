//! Ordering and arithmetic over [`Value`]s.
//!
//! Both families require the operands to carry the same tag. A tag mismatch
//! is reported as [`MultitypeError::TypeMismatch`]; an operator that is not
//! defined for the shared tag is reported as [`MultitypeError::Unsupported`].
//!
//! Booleans take part in arithmetic as `0`/`1` and the integer result is
//! turned back into a boolean (nonzero is `true`). Integers wrap on overflow
//! and fail on division by zero. Doubles follow IEEE-754, so dividing by
//! zero yields an infinity or NaN instead of an error. Strings only support
//! `+` (concatenation). Lists, maps and `None` support no arithmetic at all;
//! in particular `+` on lists does not concatenate.

use std::{cmp::Ordering, fmt, str::FromStr};

use crate::{MultitypeError, Result, Tag, Value};

/// Binary operators understood by [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Eq => "==",
        }
    }

    /// Applies the operator. Comparisons produce a boolean value.
    pub fn apply(self, lhs: &Value, rhs: &Value) -> Result<Value> {
        match self {
            Operator::Add | Operator::Sub | Operator::Mul | Operator::Div => {
                arithmetic(self, lhs, rhs)
            }
            Operator::Lt => lhs.lt(rhs).map(Value::Boolean),
            Operator::Le => lhs.le(rhs).map(Value::Boolean),
            Operator::Gt => lhs.gt(rhs).map(Value::Boolean),
            Operator::Ge => lhs.ge(rhs).map(Value::Boolean),
            Operator::Eq => Ok(Value::Boolean(lhs == rhs)),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = MultitypeError;

    fn from_str(s: &str) -> Result<Self> {
        let op = match s.trim() {
            "+" => Operator::Add,
            "-" => Operator::Sub,
            "*" => Operator::Mul,
            "/" => Operator::Div,
            "<" => Operator::Lt,
            "<=" => Operator::Le,
            ">" => Operator::Gt,
            ">=" => Operator::Ge,
            "==" => Operator::Eq,
            other => return Err(MultitypeError::msg(format!("unknown operator `{other}`"))),
        };
        Ok(op)
    }
}

impl Value {
    /// Strict less-than. Defined for booleans (`false < true`), integers,
    /// doubles and strings of the same tag.
    pub fn lt(&self, other: &Value) -> Result<bool> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a < b),
            (Value::Int(a), Value::Int(b)) => Ok(a < b),
            (Value::Double(a), Value::Double(b)) => Ok(a < b),
            (Value::String(a), Value::String(b)) => Ok(a < b),
            (Value::List(_), Value::List(_))
            | (Value::Map(_), Value::Map(_))
            | (Value::None, Value::None) => Err(MultitypeError::Unsupported {
                op: Operator::Lt,
                tag: self.tag(),
            }),
            _ => Err(mismatch(Operator::Lt, self, other)),
        }
    }

    /// `self < other || self == other`.
    pub fn le(&self, other: &Value) -> Result<bool> {
        Ok(self.lt(other)? || self == other)
    }

    /// `!(self <= other)`. Errors are the ones raised by [`Value::lt`].
    pub fn gt(&self, other: &Value) -> Result<bool> {
        Ok(!self.le(other)?)
    }

    /// `!(self < other)`. Errors are the ones raised by [`Value::lt`].
    pub fn ge(&self, other: &Value) -> Result<bool> {
        Ok(!self.lt(other)?)
    }

    /// Three-way comparison built from [`Value::lt`] and equality.
    pub fn try_cmp(&self, other: &Value) -> Result<Ordering> {
        if self.lt(other)? {
            Ok(Ordering::Less)
        } else if self == other {
            Ok(Ordering::Equal)
        } else {
            Ok(Ordering::Greater)
        }
    }

    pub fn try_add(&self, rhs: &Value) -> Result<Value> {
        arithmetic(Operator::Add, self, rhs)
    }

    pub fn try_sub(&self, rhs: &Value) -> Result<Value> {
        arithmetic(Operator::Sub, self, rhs)
    }

    pub fn try_mul(&self, rhs: &Value) -> Result<Value> {
        arithmetic(Operator::Mul, self, rhs)
    }

    pub fn try_div(&self, rhs: &Value) -> Result<Value> {
        arithmetic(Operator::Div, self, rhs)
    }

    /// In-place `+=`. The receiver is untouched when an error is returned.
    pub fn add_assign(&mut self, rhs: &Value) -> Result<&mut Value> {
        *self = self.try_add(rhs)?;
        Ok(self)
    }

    pub fn sub_assign(&mut self, rhs: &Value) -> Result<&mut Value> {
        *self = self.try_sub(rhs)?;
        Ok(self)
    }

    pub fn mul_assign(&mut self, rhs: &Value) -> Result<&mut Value> {
        *self = self.try_mul(rhs)?;
        Ok(self)
    }

    pub fn div_assign(&mut self, rhs: &Value) -> Result<&mut Value> {
        *self = self.try_div(rhs)?;
        Ok(self)
    }
}

fn mismatch(op: Operator, lhs: &Value, rhs: &Value) -> MultitypeError {
    MultitypeError::TypeMismatch {
        op,
        lhs: lhs.tag(),
        rhs: rhs.tag(),
    }
}

fn arithmetic(op: Operator, lhs: &Value, rhs: &Value) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => integer_op(op, *a, *b, Tag::Int).map(Value::Int),
        (Value::Boolean(a), Value::Boolean(b)) => {
            integer_op(op, i64::from(*a), i64::from(*b), Tag::Boolean)
                .map(|result| Value::Boolean(result != 0))
        }
        (Value::Double(a), Value::Double(b)) => float_op(op, *a, *b).map(Value::Double),
        (Value::String(a), Value::String(b)) => match op {
            Operator::Add => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Ok(Value::String(joined))
            }
            _ => Err(MultitypeError::Unsupported {
                op,
                tag: Tag::String,
            }),
        },
        (Value::List(_), Value::List(_))
        | (Value::Map(_), Value::Map(_))
        | (Value::None, Value::None) => Err(MultitypeError::Unsupported {
            op,
            tag: lhs.tag(),
        }),
        _ => Err(mismatch(op, lhs, rhs)),
    }
}

fn integer_op(op: Operator, a: i64, b: i64, tag: Tag) -> Result<i64> {
    match op {
        Operator::Add => Ok(a.wrapping_add(b)),
        Operator::Sub => Ok(a.wrapping_sub(b)),
        Operator::Mul => Ok(a.wrapping_mul(b)),
        Operator::Div if b == 0 => Err(MultitypeError::DivisionByZero { tag }),
        Operator::Div => Ok(a.wrapping_div(b)),
        _ => Err(MultitypeError::Unsupported { op, tag }),
    }
}

fn float_op(op: Operator, a: f64, b: f64) -> Result<f64> {
    match op {
        Operator::Add => Ok(a + b),
        Operator::Sub => Ok(a - b),
        Operator::Mul => Ok(a * b),
        Operator::Div => Ok(a / b),
        _ => Err(MultitypeError::Unsupported {
            op,
            tag: Tag::Double,
        }),
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl std::ops::$trait<&Value> for &Value {
            type Output = Result<Value>;

            fn $method(self, rhs: &Value) -> Result<Value> {
                self.$inner(rhs)
            }
        }

        impl std::ops::$trait for Value {
            type Output = Result<Value>;

            fn $method(self, rhs: Value) -> Result<Value> {
                self.$inner(&rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, try_add);
impl_binary_op!(Sub, sub, try_sub);
impl_binary_op!(Mul, mul, try_mul);
impl_binary_op!(Div, div, try_div);
