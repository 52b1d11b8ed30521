//! Logging and tracing setup for Switchboard binaries.

pub mod tracing_setup;

pub use tracing_setup::{Verbosity, init_tracing, shutdown_tracing};
