//! Music request and media types.
//!
//! A free-text music request is reduced to a [`MusicRequest`] (what kind of
//! thing to play and its name), which the music handler resolves against
//! the streaming service catalog.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// What a music request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicKind {
    Track,
    Artist,
    Album,
    Playlist,
    /// Mood, genre, or tag based selection.
    Mood,
}

impl fmt::Display for MusicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MusicKind::Track => write!(f, "track"),
            MusicKind::Artist => write!(f, "artist"),
            MusicKind::Album => write!(f, "album"),
            MusicKind::Playlist => write!(f, "playlist"),
            MusicKind::Mood => write!(f, "mood"),
        }
    }
}

impl FromStr for MusicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "track" | "song" => Ok(MusicKind::Track),
            "artist" => Ok(MusicKind::Artist),
            "album" => Ok(MusicKind::Album),
            "playlist" => Ok(MusicKind::Playlist),
            "mood" | "genre" | "tag" => Ok(MusicKind::Mood),
            other => Err(format!("invalid music kind: '{other}'")),
        }
    }
}

/// A structured music request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicRequest {
    #[serde(rename = "type")]
    pub kind: MusicKind,
    pub value: String,
}

impl MusicRequest {
    pub fn new(kind: MusicKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A catalog item resolved on the streaming service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Service URI, e.g. `spotify:track:...`.
    pub uri: String,
    /// Public web link, when the service returns one.
    pub url: Option<String>,
    pub name: String,
}

impl MediaItem {
    /// The trailing id segment of the URI (`spotify:album:ID` -> `ID`).
    pub fn id(&self) -> &str {
        self.uri.rsplit(':').next().unwrap_or(&self.uri)
    }
}

/// A track suggestion from a recommendation catalog (name + artist only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSuggestion {
    pub name: String,
    pub artist: String,
}

impl TrackSuggestion {
    /// Search query used to find this suggestion on the streaming service.
    pub fn search_query(&self) -> String {
        format!("{} {}", self.name, self.artist)
    }
}

/// Player transport controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackControl {
    Next,
    Pause,
    Resume,
}

impl fmt::Display for PlaybackControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackControl::Next => write!(f, "next"),
            PlaybackControl::Pause => write!(f, "pause"),
            PlaybackControl::Resume => write!(f, "resume"),
        }
    }
}
