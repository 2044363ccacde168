//! Runtime value types for Parseon

use std::fmt;

/// Runtime values in Parseon. Values are immutable; assignment copies.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numeric value
    Number(f64),

    /// Text value
    Text(String),

    /// Boolean value
    Bool(bool),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Bool(_) => "boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64 Display renders integral values without a decimal point
            // and non-integral values in their minimal decimal form.
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_number_renders_without_point() {
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Number(0.0).to_string(), "0");
        assert_eq!(Value::Number(-42.0).to_string(), "-42");
    }

    #[test]
    fn test_fractional_number_renders_minimal() {
        assert_eq!(Value::Number(3.14).to_string(), "3.14");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_text_renders_raw() {
        assert_eq!(Value::Text("hello world".to_string()).to_string(), "hello world");
    }

    #[test]
    fn test_bool_renders_lowercase() {
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }
}
