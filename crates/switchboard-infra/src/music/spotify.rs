//! Spotify Web API client, implementing [`MusicService`].
//!
//! Access tokens come from the refresh-token grant and are cached in a
//! [`TokenCache`]; a 401 from the API drops the cached token so the next
//! call refreshes.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use switchboard_core::handler::music::{MusicService, SPOTIFY};
use switchboard_core::token::TokenCache;
use switchboard_types::config::MusicConfig;
use switchboard_types::error::ServiceError;
use switchboard_types::music::{MediaItem, MusicKind, PlaybackControl};

use crate::http::{join_url, json_body, status_error, transport_error};
use crate::oauth::{ClientAuth, RefreshCredentials, refresh_access_token};
use crate::secret::{
    EnvSecretProvider, SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET, SPOTIFY_REFRESH_TOKEN,
};

pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

// -- wire types --------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawItem {
    uri: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    #[serde(default)]
    spotify: Option<String>,
}

impl From<RawItem> for MediaItem {
    fn from(raw: RawItem) -> Self {
        MediaItem {
            uri: raw.uri,
            url: raw.external_urls.spotify,
            name: raw.name,
        }
    }
}

/// Spotify returns `null` entries in some pages (removed playlists, local
/// files), so every list is a list of options.
#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<Option<T>>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: Option<Page<RawItem>>,
    #[serde(default)]
    albums: Option<Page<RawItem>>,
    #[serde(default)]
    artists: Option<Page<RawItem>>,
    #[serde(default)]
    playlists: Option<Page<RawItem>>,
}

impl SearchResponse {
    fn first(self, kind: MusicKind) -> Option<MediaItem> {
        let page = match kind {
            MusicKind::Track | MusicKind::Mood => self.tracks,
            MusicKind::Album => self.albums,
            MusicKind::Artist => self.artists,
            MusicKind::Playlist => self.playlists,
        }?;
        page.items.into_iter().flatten().next().map(MediaItem::from)
    }
}

#[derive(Debug, Deserialize)]
struct TopTracks {
    #[serde(default)]
    tracks: Vec<Option<RawItem>>,
}

#[derive(Debug, Deserialize)]
struct PlaylistEntry {
    #[serde(default)]
    track: Option<RawItem>,
}

/// `type` parameter for `/search`.
fn search_type(kind: MusicKind) -> &'static str {
    match kind {
        MusicKind::Track | MusicKind::Mood => "track",
        MusicKind::Album => "album",
        MusicKind::Artist => "artist",
        MusicKind::Playlist => "playlist",
    }
}

fn collect_items(items: Vec<Option<RawItem>>) -> Vec<MediaItem> {
    items.into_iter().flatten().map(MediaItem::from).collect()
}

// -- client ------------------------------------------------------------------

/// Spotify client. Does NOT derive Debug: holds OAuth credentials.
pub struct SpotifyClient {
    client: reqwest::Client,
    credentials: Option<RefreshCredentials>,
    tokens: TokenCache,
    api_url: String,
    token_url: String,
    market: String,
}

impl SpotifyClient {
    pub fn new(
        client: reqwest::Client,
        credentials: Option<RefreshCredentials>,
        config: &MusicConfig,
    ) -> Self {
        Self {
            client,
            credentials,
            tokens: TokenCache::new(),
            api_url: SPOTIFY_API_URL.to_string(),
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            market: config.market.clone(),
        }
    }

    /// Credentials from `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and
    /// `SPOTIFY_REFRESH_TOKEN`; `None` unless all three are set.
    pub fn credentials_from(secrets: &EnvSecretProvider) -> Option<RefreshCredentials> {
        Some(RefreshCredentials {
            client_id: secrets.get(SPOTIFY_CLIENT_ID)?.expose_secret().to_string(),
            client_secret: secrets.get(SPOTIFY_CLIENT_SECRET)?,
            refresh_token: secrets.get(SPOTIFY_REFRESH_TOKEN)?,
        })
    }

    /// Override the API and token endpoints (tests, proxies).
    pub fn with_base_urls(mut self, api_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.token_url = token_url.into();
        self
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.api_url, path)
    }

    async fn access_token(&self) -> Result<SecretString, ServiceError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ServiceError::NotConfigured(SPOTIFY))?;
        self.tokens
            .get_or_refresh(|| {
                refresh_access_token(&self.client, &self.token_url, credentials, ClientAuth::Basic)
            })
            .await
    }

    /// Send an authorized request. 401 drops the cached token.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ServiceError> {
        let token = self.access_token().await?;
        let response = request
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;
        if response.status().as_u16() == 401 {
            self.tokens.invalidate().await;
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        let response = self.send(self.client.get(self.url(path)).query(query)).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        json_body(response).await
    }
}

impl MusicService for SpotifyClient {
    async fn authorize(&self) -> Result<(), ServiceError> {
        self.access_token().await.map(|_| ())
    }

    #[tracing::instrument(skip_all, fields(kind = %kind, query = %query))]
    async fn search(&self, query: &str, kind: MusicKind) -> Result<Option<MediaItem>, ServiceError> {
        let response: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("q", query),
                    ("type", search_type(kind)),
                    ("market", self.market.as_str()),
                    ("limit", "1"),
                ],
            )
            .await?;
        Ok(response.first(kind))
    }

    async fn album_tracks(&self, album_id: &str) -> Result<Vec<MediaItem>, ServiceError> {
        let page: Page<RawItem> = self
            .get_json(&format!("albums/{album_id}/tracks"), &[("market", self.market.as_str())])
            .await?;
        Ok(collect_items(page.items))
    }

    async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<MediaItem>, ServiceError> {
        let top: TopTracks = self
            .get_json(&format!("artists/{artist_id}/top-tracks"), &[("market", self.market.as_str())])
            .await?;
        Ok(collect_items(top.tracks))
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<MediaItem>, ServiceError> {
        let page: Page<PlaylistEntry> = self
            .get_json(
                &format!("playlists/{playlist_id}/tracks"),
                &[("market", self.market.as_str()), ("limit", "50")],
            )
            .await?;
        Ok(collect_items(
            page.items.into_iter().flatten().map(|e| e.track).collect(),
        ))
    }

    #[tracing::instrument(skip_all, fields(uri = %uri))]
    async fn queue(&self, uri: &str) -> Result<bool, ServiceError> {
        let request = self
            .client
            .post(self.url("me/player/queue"))
            .query(&[("uri", uri)])
            .header(reqwest::header::CONTENT_LENGTH, 0);
        let response = self.send(request).await?;

        let status = response.status().as_u16();
        match status {
            200..=299 => Ok(true),
            401 | 403 | 404 | 429 => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status, body = %body, "player refused queue request");
                Ok(false)
            }
            _ => Err(status_error(response).await),
        }
    }

    async fn control(&self, control: PlaybackControl) -> Result<(), ServiceError> {
        let request = match control {
            PlaybackControl::Next => self.client.post(self.url("me/player/next")),
            PlaybackControl::Pause => self.client.put(self.url("me/player/pause")),
            PlaybackControl::Resume => self.client.put(self.url("me/player/play")),
        }
        .header(reqwest::header::CONTENT_LENGTH, 0);

        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }
}
