//! Optional transport backend.

mod client;
mod error;

pub use client::{BackendConfig, DEFAULT_STOP_RADIUS_M, TransportBackendClient};
pub use error::BackendError;
