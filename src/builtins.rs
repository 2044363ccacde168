//! Built-in math functions for Parseon
//!
//! A fixed registry of functions callable only in expression position.
//! Builtins take and return numbers; arity is fixed per name.

use crate::error::{ErrorKind, ParseonError, Result};
use crate::value::Value;

/// The built-in functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sqrt,
    Pow,
    Abs,
    Floor,
}

impl Builtin {
    /// Look up a builtin by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sqrt" => Some(Builtin::Sqrt),
            "pow" => Some(Builtin::Pow),
            "abs" => Some(Builtin::Abs),
            "floor" => Some(Builtin::Floor),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Sqrt => "sqrt",
            Builtin::Pow => "pow",
            Builtin::Abs => "abs",
            Builtin::Floor => "floor",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Builtin::Pow => 2,
            Builtin::Sqrt | Builtin::Abs | Builtin::Floor => 1,
        }
    }

    /// Apply the builtin to already-evaluated arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        if args.len() != self.arity() {
            return Err(ParseonError::new(
                ErrorKind::WrongArity(self.name().to_string(), self.arity(), args.len()),
                None,
            ));
        }

        let mut nums = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                Value::Number(n) => nums.push(*n),
                other => {
                    return Err(ParseonError::new(
                        ErrorKind::TypeMismatch(
                            "number".to_string(),
                            other.type_name().to_string(),
                        ),
                        None,
                    ));
                }
            }
        }

        let result = match self {
            Builtin::Sqrt => {
                if nums[0] < 0.0 {
                    return Err(ParseonError::new(
                        ErrorKind::DomainError("sqrt".to_string()),
                        None,
                    ));
                }
                nums[0].sqrt()
            }
            Builtin::Pow => nums[0].powf(nums[1]),
            Builtin::Abs => nums[0].abs(),
            Builtin::Floor => nums[0].floor(),
        };

        Ok(Value::Number(result))
    }
}
