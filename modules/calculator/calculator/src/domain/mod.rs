//! Domain layer for the calculator module

pub mod engine;
pub mod error;
pub mod service;

pub use engine::Calculator;
pub use error::{ArithmeticError, ServiceError};
pub use service::Service;
