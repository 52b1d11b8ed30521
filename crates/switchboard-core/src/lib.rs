//! Intent routing, dispatch, and handler logic for Switchboard.
//!
//! This crate defines the "ports" (store, text-model, and service traits)
//! that the infrastructure layer implements. It depends only on
//! `switchboard-types` -- never on `switchboard-infra` or any HTTP/database
//! crate.

pub mod command;
pub mod conversation;
pub mod dispatch;
pub mod extract;
pub mod fallback;
pub mod handler;
pub mod intent;
pub mod llm;
pub mod router;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;
