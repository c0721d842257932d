//! Sri Lanka trip planner server.
//!
//! A web application that answers: "How do I get from here to there by bus
//! or train, and is my option still running on time?"

pub mod backend;
pub mod config;
pub mod debounce;
pub mod domain;
pub mod geocode;
pub mod location;
pub mod notify;
pub mod places;
pub mod resolver;
pub mod session;
pub mod simulation;
pub mod web;
