//! # storage-adapters
//!
//! Implementations of the `domains` storage ports: an in-memory store for
//! tests and development, and a Postgres store behind the `db-postgres`
//! feature.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;
