use thiserror::Error;

/// Failures of the arithmetic engine.
///
/// The display strings are part of the wire contract: they are returned
/// verbatim in `CalculationResponse.error`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Addition would cause overflow")]
    AdditionOverflow,

    #[error("Subtraction would cause overflow")]
    SubtractionOverflow,

    #[error("Multiplication would cause overflow")]
    MultiplicationOverflow,

    #[error("Division by zero is not allowed")]
    DivisionByZero,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Unknown operation")]
    UnknownOperation { code: i32 },

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}
