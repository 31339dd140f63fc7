//! Calculator Module
//!
//! Floating-point calculator exposed as a gRPC service.
//!
//! ## Architecture
//!
//! - `domain/engine.rs` - arithmetic with overflow and division-by-zero checks
//! - `domain/service.rs` - maps wire requests to engine calls and responses
//! - `server.rs` - lifecycle (start/stop) and the background worker queue
//! - `api/grpc/server.rs` - tonic service implementation and `serve`
//! - `local_client.rs` - in-process `CalculatorClient`
//!
//! Remote consumers should use the `calculator-sdk` crate.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod domain;

mod local_client;
mod server;

pub use domain::{ArithmeticError, Calculator, Service, ServiceError};
pub use local_client::LocalCalculatorClient;
pub use server::{CalculatorServer, DEFAULT_QUEUE_CAPACITY, ServerError};
