//! News article type returned by the news search adapter.

use serde::{Deserialize, Serialize};

/// A single news search hit, already reduced to what the reply shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    /// Publisher name.
    pub source: String,
    /// Publication date as `YYYY-MM-DD`.
    pub published: String,
}
