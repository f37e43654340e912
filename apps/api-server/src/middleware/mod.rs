//! Error mapping for HTTP responses.

pub mod error;
