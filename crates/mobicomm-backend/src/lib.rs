//! # mobicomm-backend
//!
//! HTTP integration for the MobiComm recharge flow.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mobicomm_backend::{BackendConfig, HttpBackend};
//!
//! let backend = HttpBackend::new(BackendConfig::from_env())?;
//! let categories = backend.categories().await?;
//! ```

pub mod config;
pub mod http;

pub use config::BackendConfig;
pub use http::HttpBackend;

// Re-export core types for convenience
pub use mobicomm_core::{RechargeBackend, RechargeError, Result};
