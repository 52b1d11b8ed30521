//! Intent labels.
//!
//! The set of intents is closed: every variant has exactly one handler.
//! Configuration decides which labels the classifier may answer with and
//! which one is used as the fallback.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Which handler should process a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    News,
    Music,
    Reminder,
    Qa,
}

impl Intent {
    /// Every intent, in the order labels are presented to the classifier.
    pub const ALL: [Intent; 4] = [Intent::News, Intent::Music, Intent::Reminder, Intent::Qa];

    /// The wire label for this intent.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::News => "news",
            Intent::Music => "music",
            Intent::Reminder => "reminder",
            Intent::Qa => "qa",
        }
    }
}

impl Default for Intent {
    fn default() -> Self {
        Intent::Qa
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "news" => Ok(Intent::News),
            "music" => Ok(Intent::Music),
            "reminder" => Ok(Intent::Reminder),
            "qa" => Ok(Intent::Qa),
            other => Err(format!("invalid intent: '{other}'")),
        }
    }
}
