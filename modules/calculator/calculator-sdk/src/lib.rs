//! Calculator SDK
//!
//! Everything needed to talk to the calculator service:
//! - wire messages and gRPC stubs ([`proto`])
//! - client trait ([`CalculatorClient`]) and error type ([`CalculatorError`])
//! - gRPC client ([`CalculatorGrpcClient`])
//!
//! ## Usage
//!
//! ```ignore
//! use calculator_sdk::{CalculatorClient, CalculatorGrpcClient};
//!
//! let client = CalculatorGrpcClient::connect("http://127.0.0.1:50051").await?;
//! let sum = client.add(10.5, 20.7).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

macro_rules! service_name {
    () => {
        "calculator.v1.CalculatorService"
    };
}

// === API TRAIT AND TYPES ===
mod api;
pub use api::{CalculatorClient, CalculatorError};

// === GRPC CLIENT ===
mod client;
pub use client::CalculatorGrpcClient;

// === WIRE MESSAGES AND STUBS ===
pub mod proto;

pub use proto::calculator_service_server::{CalculatorService, CalculatorServiceServer};
pub use proto::{CalculationRequest, CalculationResponse, Operation, ParseOperationError};

/// Fully qualified gRPC service name.
pub const SERVICE_NAME: &str = service_name!();
