//! Secret lookup for service credentials.
//!
//! Credentials come from environment variables only and are wrapped in
//! `secrecy::SecretString` as soon as they are read.

pub mod env;

pub use env::EnvSecretProvider;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const NEWS_API_KEY: &str = "NEWS_API_KEY";
pub const LASTFM_API_KEY: &str = "LASTFM_API_KEY";
pub const SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const SPOTIFY_REFRESH_TOKEN: &str = "SPOTIFY_REFRESH_TOKEN";
pub const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const GOOGLE_REFRESH_TOKEN: &str = "GOOGLE_REFRESH_TOKEN";

/// Every key Switchboard looks up, for status output.
pub const ALL_KEYS: [&str; 9] = [
    OPENAI_API_KEY,
    NEWS_API_KEY,
    LASTFM_API_KEY,
    SPOTIFY_CLIENT_ID,
    SPOTIFY_CLIENT_SECRET,
    SPOTIFY_REFRESH_TOKEN,
    GOOGLE_CLIENT_ID,
    GOOGLE_CLIENT_SECRET,
    GOOGLE_REFRESH_TOKEN,
];
