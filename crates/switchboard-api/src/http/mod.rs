//! HTTP/REST API layer for Switchboard.
//!
//! Axum-based REST API at `/api/v1/` that chat platform adapters call with
//! `(user_id, text)` pairs. Envelope response format and CORS support; no
//! authentication, so bind it to a private interface.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
