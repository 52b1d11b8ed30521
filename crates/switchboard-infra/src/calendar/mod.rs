//! Calendar adapters.

pub mod google;

pub use google::GoogleCalendarClient;
