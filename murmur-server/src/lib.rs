//! murmur-server: HTTP API for the murmur posting service
//!
//! Accounts, cookie-backed sessions, and short posts over a Postgres
//! store. The axum surface lives in [`http`], persistence in [`db`],
//! and credential/session primitives in [`auth`].

pub mod auth;
pub mod db;
pub mod http;
pub mod state;

pub use http::server::{run_server, ServerError};
pub use state::AppState;
