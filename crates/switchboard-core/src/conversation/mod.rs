//! Per-user conversation history: the store port, an in-memory store, and
//! the per-user request lock.

pub mod lock;
pub mod memory;
pub mod store;
