//! Intent classification: which handler family receives a message.

pub mod classifier;

pub use classifier::{IntentClassifier, IntentSet};
