//! Shared domain types for Switchboard.
//!
//! This crate contains the core domain types used across the Switchboard
//! assistant: conversation records, intents, handler payloads for news,
//! music and reminders, LLM request shapes, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod intent;
pub mod llm;
pub mod music;
pub mod news;
pub mod reminder;
