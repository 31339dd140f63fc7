//! Calculator client trait and error type.

use async_trait::async_trait;

use crate::proto::Operation;

/// Client-side calculator API.
///
/// Implemented over gRPC by `CalculatorGrpcClient` and in-process by the
/// calculator module's `LocalCalculatorClient`.
#[async_trait]
pub trait CalculatorClient: Send + Sync {
    /// Apply `operation` to `a` and `b`.
    async fn calculate(&self, a: f64, b: f64, operation: Operation) -> Result<f64, CalculatorError>;

    async fn add(&self, a: f64, b: f64) -> Result<f64, CalculatorError> {
        self.calculate(a, b, Operation::Add).await
    }

    async fn subtract(&self, a: f64, b: f64) -> Result<f64, CalculatorError> {
        self.calculate(a, b, Operation::Subtract).await
    }

    async fn multiply(&self, a: f64, b: f64) -> Result<f64, CalculatorError> {
        self.calculate(a, b, Operation::Multiply).await
    }

    async fn divide(&self, a: f64, b: f64) -> Result<f64, CalculatorError> {
        self.calculate(a, b, Operation::Divide).await
    }
}

/// Error type for calculator client operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    /// The service evaluated the request and reported an error,
    /// e.g. "Division by zero is not allowed".
    #[error("{0}")]
    Rejected(String),

    /// Transient failure; the service could not be reached or is shutting down.
    #[error("calculator service unavailable: {0}")]
    Unavailable(String),

    #[error("gRPC transport error: {0}")]
    Transport(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<tonic::Status> for CalculatorError {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::Unavailable | tonic::Code::DeadlineExceeded => {
                Self::Unavailable(status.message().to_owned())
            }
            tonic::Code::Internal => Self::Internal(status.message().to_owned()),
            code => Self::Transport(format!("{code:?}: {}", status.message())),
        }
    }
}
