//! Infrastructure layer for Switchboard.
//!
//! Contains implementations of the ports defined in `switchboard-core`:
//! the SQLite conversation store, text-model providers (Ollama and
//! OpenAI-compatible), and HTTP adapters for NewsAPI, Spotify, Last.fm and
//! Google Calendar. Also owns config file loading and credential lookup.

pub mod calendar;
pub mod config;
pub mod http;
pub mod llm;
pub mod music;
pub mod news;
pub mod oauth;
pub mod secret;
pub mod sqlite;
