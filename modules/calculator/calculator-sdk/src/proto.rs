//! Wire messages and gRPC stubs for `calculator.v1.CalculatorService`.
//!
//! ```text
//! enum Operation { ADD = 0; SUBTRACT = 1; MULTIPLY = 2; DIVIDE = 3; }
//! message CalculationRequest { double a = 1; double b = 2; Operation operation = 3; }
//! message CalculationResponse { double result = 1; string error = 2; }
//! service CalculatorService { rpc Calculate(CalculationRequest) returns (CalculationResponse); }
//! ```

use std::fmt;
use std::str::FromStr;

/// Arithmetic operation selector.
///
/// Stored as a raw `i32` inside [`CalculationRequest`] so that codes unknown
/// to this build still round-trip and can be reported by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Operation {
    Add = 0,
    Subtract = 1,
    Multiply = 2,
    Divide = 3,
}

impl Operation {
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Protobuf enum value name.
    #[must_use]
    pub fn as_str_name(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Subtract => "SUBTRACT",
            Self::Multiply => "MULTIPLY",
            Self::Divide => "DIVIDE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown operation '{0}' (expected add, sub, mul, div or + - * /)")]
pub struct ParseOperationError(pub String);

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "+" | "plus" => Ok(Self::Add),
            "sub" | "subtract" | "-" | "minus" => Ok(Self::Subtract),
            "mul" | "multiply" | "*" | "x" | "times" => Ok(Self::Multiply),
            "div" | "divide" | "/" => Ok(Self::Divide),
            _ => Err(ParseOperationError(s.to_owned())),
        }
    }
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct CalculationRequest {
    #[prost(double, tag = "1")]
    pub a: f64,
    #[prost(double, tag = "2")]
    pub b: f64,
    #[prost(enumeration = "Operation", tag = "3")]
    pub operation: i32,
}

impl CalculationRequest {
    #[must_use]
    pub fn new(a: f64, b: f64, operation: Operation) -> Self {
        Self {
            a,
            b,
            operation: operation.into(),
        }
    }

    /// Request carrying an arbitrary operation code, known or not.
    #[must_use]
    pub fn with_raw_operation(a: f64, b: f64, operation: i32) -> Self {
        Self { a, b, operation }
    }

    /// The operation if the code is known to this build.
    #[must_use]
    pub fn known_operation(&self) -> Option<Operation> {
        Operation::try_from(self.operation).ok()
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CalculationResponse {
    #[prost(double, tag = "1")]
    pub result: f64,
    /// Empty on success.
    #[prost(string, tag = "2")]
    pub error: String,
}

impl CalculationResponse {
    #[must_use]
    pub fn success(result: f64) -> Self {
        Self {
            result,
            error: String::new(),
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            result: 0.0,
            error: error.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }

    /// `Ok(result)` on success, otherwise the error text.
    ///
    /// # Errors
    /// Returns the server-reported message when `error` is non-empty.
    pub fn into_result(self) -> Result<f64, String> {
        if self.error.is_empty() {
            Ok(self.result)
        } else {
            Err(self.error)
        }
    }
}

#[allow(clippy::pedantic, clippy::nursery, clippy::all, missing_docs)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/calculator.v1.CalculatorService.rs"));
}

pub use generated::{calculator_service_client, calculator_service_server};

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn request_survives_encoding() {
        let original = CalculationRequest::new(10.5, 20.7, Operation::Multiply);

        let bytes = original.encode_to_vec();
        let decoded = CalculationRequest::decode(bytes.as_slice()).unwrap();

        assert_eq!(decoded, original);
        assert_eq!(decoded.operation(), Operation::Multiply);
    }

    #[test]
    fn unknown_operation_code_is_preserved() {
        let original = CalculationRequest::with_raw_operation(1.0, 1.0, 999);

        let decoded = CalculationRequest::decode(original.encode_to_vec().as_slice()).unwrap();

        assert_eq!(decoded.operation, 999);
        assert_eq!(decoded.known_operation(), None);
    }

    #[test]
    fn default_request_is_empty_on_the_wire() {
        assert!(CalculationRequest::default().encode_to_vec().is_empty());
        assert_eq!(
            CalculationRequest::default().known_operation(),
            Some(Operation::Add)
        );
    }

    #[test]
    fn response_error_survives_encoding() {
        let original = CalculationResponse::failure("Division by zero is not allowed");

        let decoded = CalculationResponse::decode(original.encode_to_vec().as_slice()).unwrap();

        assert!(!decoded.is_success());
        assert_eq!(
            decoded.into_result(),
            Err("Division by zero is not allowed".to_owned())
        );
    }

    #[test]
    fn truncated_bytes_fail_to_decode() {
        let mut bytes = CalculationRequest::new(1.5, 2.5, Operation::Add).encode_to_vec();
        bytes.truncate(bytes.len() - 3);
        assert!(CalculationRequest::decode(bytes.as_slice()).is_err());
    }

    #[test]
    fn operation_parsing() {
        assert_eq!("add".parse(), Ok(Operation::Add));
        assert_eq!("-".parse(), Ok(Operation::Subtract));
        assert_eq!(" MUL ".parse(), Ok(Operation::Multiply));
        assert_eq!("/".parse(), Ok(Operation::Divide));
        assert!("pow".parse::<Operation>().is_err());
    }

    #[test]
    fn operation_codes_match_wire_values() {
        let codes: Vec<i32> = Operation::ALL.iter().map(|op| i32::from(*op)).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
    }
}
