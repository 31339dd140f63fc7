//! gRPC API layer for calculator

pub mod server;

pub use server::{CalculatorServiceImpl, bind, serve};
