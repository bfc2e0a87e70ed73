//! # DomainError
//!
//! Centralized error taxonomy for the circleshare core. Every variant is a
//! user-input or authorization condition surfaced directly to the caller;
//! nothing here is retried.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Referenced user/content/comment/request absent.
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    /// Bad field values or duplicate unique fields.
    #[error("validation error: {0}")]
    Validation(String),

    /// An `active` friend request already exists for this ordered pair.
    #[error("an active friend request for this pair already exists")]
    DuplicateRequest,

    /// Authenticated, but lacking friendship/ownership/admin status.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// No or invalid credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Store-level uniqueness or state conflict. Services normally translate
    /// this into `Validation` or `Forbidden` before it reaches a caller.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (store unavailable, poisoned lock).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;
