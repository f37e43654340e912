//! # Quorum Core
//!
//! The domain layer of the Quorum backend.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod scoring;

pub use error::DomainError;
