//! Web layer for the trip planner.
//!
//! JSON endpoints for the session, destination search and notifications,
//! plus server-rendered HTML fragments for clients that ask for them.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, LiveSession};
pub use templates::*;
