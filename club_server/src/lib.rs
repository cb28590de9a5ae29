//! REST API server for the chess club website.
//!
//! The domain logic lives in the `chess_club` crate; this crate wires
//! it to HTTP: router construction, configuration, and logging. The
//! router is built from injected repository trait objects, so
//! integration tests drive it against in-memory stores without a
//! database.

pub mod api;
pub mod config;
pub mod logging;
