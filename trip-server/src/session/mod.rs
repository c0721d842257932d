//! A user's trip session.
//!
//! [`TripStore`] holds the observable search state; [`TripSession`] drives
//! it from location updates, queries and destination choices, and owns the
//! tasks that deliver options and monitor them.

mod config;
mod controller;
mod state;


pub use config::SessionConfig;
pub use controller::{SearchStart, SessionError, TripSession, TripSessionBuilder};
pub use state::{TripSearchState, TripStore};
