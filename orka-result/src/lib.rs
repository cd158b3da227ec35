//! Error types and result definitions for the orka ordered-row access layer.
//!
//! This crate provides the unified error type ([`Error`]) and result type alias
//! ([`Result<T>`]) used throughout all orka crates. All operations that could fail
//! return `Result<T>`, where the error variant carries enough information to
//! classify the failure precisely.
//!
//! # Error Philosophy
//!
//! orka uses a single error enum rather than crate-specific error types. This
//! keeps error handling uniform across crate boundaries, lets errors propagate
//! naturally with the `?` operator, and gives callers stable variants to match
//! on. None of the errors are retried internally: the access layer's job is
//! precise classification and clean resource teardown before propagating.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
