//! News search adapters.

pub mod newsapi;

pub use newsapi::NewsApiClient;
