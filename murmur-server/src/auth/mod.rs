//! Credential and session primitives
//!
//! Password hashing, session token generation, and the session cookie
//! format shared by the sign-in/sign-out handlers and the extractors.

pub mod cookie;
pub mod service;

pub use cookie::{clear_session_cookie, session_cookie, session_token, SESSION_COOKIE};
pub use service::{generate_session_token, hash_password, verify_password};
