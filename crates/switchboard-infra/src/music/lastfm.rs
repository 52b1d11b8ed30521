//! Last.fm tag charts, implementing [`TrackCatalog`].

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

pub use switchboard_core::handler::music::LASTFM;
use switchboard_core::handler::music::TrackCatalog;
use switchboard_types::error::ServiceError;
use switchboard_types::music::TrackSuggestion;

use crate::http::{json_body, status_error, transport_error};

pub const LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Last.fm answers API errors with HTTP 200 and an `error` body, so the
/// payload is decoded as either shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagResponse {
    Error { error: u32, message: String },
    Tracks { tracks: TrackList },
}

#[derive(Debug, Deserialize)]
struct TrackList {
    #[serde(default)]
    track: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    name: String,
    artist: RawArtist,
}

/// `tag.gettoptracks` nests the artist; search endpoints give a bare name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawArtist {
    Named { name: String },
    Plain(String),
}

impl From<RawTrack> for TrackSuggestion {
    fn from(raw: RawTrack) -> Self {
        let artist = match raw.artist {
            RawArtist::Named { name } | RawArtist::Plain(name) => name,
        };
        TrackSuggestion {
            name: raw.name,
            artist,
        }
    }
}

fn into_suggestions(response: TagResponse, limit: u32) -> Result<Vec<TrackSuggestion>, ServiceError> {
    match response {
        // 10: invalid key, 26: suspended key.
        TagResponse::Error { error: 10 | 26, .. } => Err(ServiceError::AuthenticationFailed),
        TagResponse::Error { error, message } => Err(ServiceError::Status {
            status: 200,
            body: format!("Last.fm error {error}: {message}"),
        }),
        TagResponse::Tracks { tracks } => Ok(tracks
            .track
            .into_iter()
            .take(limit as usize)
            .map(TrackSuggestion::from)
            .collect()),
    }
}

/// Last.fm client. Does NOT derive Debug: holds the API key.
pub struct LastFmClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl LastFmClient {
    pub fn new(client: reqwest::Client, api_key: Option<SecretString>) -> Self {
        Self {
            client,
            api_key,
            base_url: LASTFM_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl TrackCatalog for LastFmClient {
    #[tracing::instrument(skip_all, fields(tag = %tag, limit = limit))]
    async fn top_tracks_for_tag(
        &self,
        tag: &str,
        limit: u32,
    ) -> Result<Vec<TrackSuggestion>, ServiceError> {
        let key = self
            .api_key
            .as_ref()
            .ok_or(ServiceError::NotConfigured(LASTFM))?;
        let limit_param = limit.to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("method", "tag.gettoptracks"),
                ("tag", tag),
                ("api_key", key.expose_secret()),
                ("format", "json"),
                ("limit", limit_param.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: TagResponse = json_body(response).await?;
        into_suggestions(body, limit)
    }
}
