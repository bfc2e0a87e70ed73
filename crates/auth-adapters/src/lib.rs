//! # auth-adapters
//!
//! Credential hashing and bearer-token issuance behind the `domains` auth
//! ports. Argon2 is always compiled; the JWT authority sits behind the
//! `auth-jwt` feature.

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use password::Argon2Hasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtAuthority;
