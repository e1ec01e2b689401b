//! Roster Server Library
//!
//! HTTP service exposing CRUD for users over MySQL, plus a diagnostics
//! endpoint reporting host and cloud identity.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod router;
pub mod services;
pub mod shutdown;
pub mod startup;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use router::create_router;
pub use services::{InstanceIdentity, InstanceMetadataClient};
pub use state::AppState;
