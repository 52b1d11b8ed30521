//! Music adapters: Spotify for search and playback, Last.fm for mood and
//! tag based track suggestions.

pub mod lastfm;
pub mod spotify;

pub use lastfm::LastFmClient;
pub use spotify::SpotifyClient;
