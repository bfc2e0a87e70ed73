//! # api-adapters
//!
//! The web boundary: axum routing, actor extraction, error→status mapping
//! and request metrics, all behind the `web-axum` feature.

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod metrics;
#[cfg(feature = "web-axum")]
pub mod payloads;
#[cfg(feature = "web-axum")]
pub mod router;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use error::ApiError;
#[cfg(feature = "web-axum")]
pub use extract::CurrentUser;
#[cfg(feature = "web-axum")]
pub use metrics::Metrics;
#[cfg(feature = "web-axum")]
pub use router::router;
#[cfg(feature = "web-axum")]
pub use state::AppState;
