//! Variable environment for Parseon
//!
//! One flat mapping from name to binding for the whole program. The language
//! has no lexical scoping beyond loop-variable rebinding, so there is no
//! parent chain: loop variables and inner-block variables stay visible after
//! the enclosing construct ends.

use std::collections::HashMap;

use crate::ast::Mutability;
use crate::error::{ErrorKind, ParseonError, Result};
use crate::value::Value;

/// A binding in the environment
#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    mutability: Mutability,
}

/// The runtime variable store
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Binding>,
}

impl Environment {
    /// Create a new empty environment
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Declare a variable, replacing any prior binding of the same name.
    /// Replacing an immutable binding is an error regardless of the new value.
    pub fn declare(&mut self, name: &str, value: Value, mutability: Mutability) -> Result<()> {
        if let Some(existing) = self.values.get(name) {
            if existing.mutability == Mutability::Immutable {
                return Err(ParseonError::new(
                    ErrorKind::RedeclareImmutable(name.to_string()),
                    None,
                ));
            }
        }
        self.values.insert(name.to_string(), Binding { value, mutability });
        Ok(())
    }

    /// Assign to an existing binding, keeping its mutability.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        match self.values.get_mut(name) {
            Some(binding) if binding.mutability == Mutability::Mutable => {
                binding.value = value;
                Ok(())
            }
            Some(_) => Err(ParseonError::new(
                ErrorKind::AssignImmutable(name.to_string()),
                None,
            )),
            None => Err(ParseonError::new(
                ErrorKind::UndefinedVariable(name.to_string()),
                None,
            )),
        }
    }

    /// Get a variable's value
    pub fn get(&self, name: &str) -> Result<Value> {
        match self.values.get(name) {
            Some(binding) => Ok(binding.value.clone()),
            None => Err(ParseonError::new(
                ErrorKind::UndefinedVariable(name.to_string()),
                None,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_get() {
        let mut env = Environment::new();
        env.declare("x", Value::Number(5.0), Mutability::Mutable).unwrap();
        assert_eq!(env.get("x").unwrap(), Value::Number(5.0));
    }

    #[test]
    fn test_redeclare_mutable_replaces() {
        let mut env = Environment::new();
        env.declare("x", Value::Number(5.0), Mutability::Mutable).unwrap();
        env.declare("x", Value::Text("now text".to_string()), Mutability::Mutable).unwrap();
        assert_eq!(env.get("x").unwrap(), Value::Text("now text".to_string()));
    }

    #[test]
    fn test_redeclare_immutable_fails() {
        let mut env = Environment::new();
        env.declare("x", Value::Number(5.0), Mutability::Immutable).unwrap();
        // Same value or not, a second declaration is an error
        let err = env.declare("x", Value::Number(5.0), Mutability::Mutable).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RedeclareImmutable("x".to_string()));
    }

    #[test]
    fn test_assign_immutable_fails() {
        let mut env = Environment::new();
        env.declare("x", Value::Number(5.0), Mutability::Immutable).unwrap();
        let err = env.assign("x", Value::Number(6.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AssignImmutable("x".to_string()));
    }

    #[test]
    fn test_assign_undefined_fails() {
        let mut env = Environment::new();
        let err = env.assign("ghost", Value::Number(1.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedVariable("ghost".to_string()));
    }

    #[test]
    fn test_assign_keeps_mutability() {
        let mut env = Environment::new();
        env.declare("x", Value::Number(1.0), Mutability::Mutable).unwrap();
        env.assign("x", Value::Number(2.0)).unwrap();
        env.assign("x", Value::Number(3.0)).unwrap();
        assert_eq!(env.get("x").unwrap(), Value::Number(3.0));
    }
}
