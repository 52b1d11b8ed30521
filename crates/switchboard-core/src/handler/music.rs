//! Music handler: request classification, catalog resolution, queueing,
//! playback controls, and per-user replay.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use futures_util::future::join_all;
use serde::Deserialize;

use switchboard_types::error::{ExtractionError, HandlerError, ServiceError};
use switchboard_types::llm::CompletionRequest;
use switchboard_types::music::{
    MediaItem, MusicKind, MusicRequest, PlaybackControl, TrackSuggestion,
};

use super::{Directive, Handler, HandlerRequest};
use crate::extract::extract_json;
use crate::fallback::or_default;
use crate::llm::box_provider::BoxLlmProvider;

/// Service name used in authentication failure replies.
pub const SPOTIFY: &str = "Spotify";

/// Service name of the mood catalog.
pub const LASTFM: &str = "Last.fm";

/// Default number of catalog suggestions fetched for a mood request.
pub const DEFAULT_MOOD_TRACK_LIMIT: u32 = 50;

const NOTHING_TO_REPLAY: &str = "🤷 Nothing to replay yet. Ask me to play something first.";
const NO_MOOD_TRACKS: &str = "❌ I couldn't find any tracks for your query.";

/// Port for the streaming service (search, queue, player).
///
/// Implemented by `SpotifyClient` in infra. Lookups return `Ok(None)` or an
/// empty list when nothing matches.
pub trait MusicService: Send + Sync {
    /// Make sure a valid access token is available.
    fn authorize(&self) -> impl Future<Output = Result<(), ServiceError>> + Send;

    /// Best match for `query`. `MusicKind::Mood` searches tracks.
    fn search(
        &self,
        query: &str,
        kind: MusicKind,
    ) -> impl Future<Output = Result<Option<MediaItem>, ServiceError>> + Send;

    fn album_tracks(
        &self,
        album_id: &str,
    ) -> impl Future<Output = Result<Vec<MediaItem>, ServiceError>> + Send;

    fn artist_top_tracks(
        &self,
        artist_id: &str,
    ) -> impl Future<Output = Result<Vec<MediaItem>, ServiceError>> + Send;

    fn playlist_tracks(
        &self,
        playlist_id: &str,
    ) -> impl Future<Output = Result<Vec<MediaItem>, ServiceError>> + Send;

    /// Add a track to the player queue. `Ok(false)` when the player refused
    /// (no active device, premium required, ...).
    fn queue(&self, uri: &str) -> impl Future<Output = Result<bool, ServiceError>> + Send;

    fn control(
        &self,
        control: PlaybackControl,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Port for a tag/mood based track catalog. Implemented by `LastFmClient`.
pub trait TrackCatalog: Send + Sync {
    fn top_tracks_for_tag(
        &self,
        tag: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<TrackSuggestion>, ServiceError>> + Send;
}

/// Loose shape of the classifier output; `type` is validated separately so
/// aliases like `genre` are accepted.
#[derive(Deserialize)]
struct RawMusicRequest {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

fn parse_music_request(output: &str) -> Result<MusicRequest, ExtractionError> {
    let raw: RawMusicRequest = extract_json(output)?;
    let kind = raw
        .kind
        .parse::<MusicKind>()
        .map_err(|reason| ExtractionError::InvalidField {
            field: "type",
            reason,
        })?;
    let value = raw.value.trim();
    if value.is_empty() {
        return Err(ExtractionError::InvalidField {
            field: "value",
            reason: "empty".to_string(),
        });
    }
    Ok(MusicRequest::new(kind, value))
}

/// Result of resolving and queueing one request.
struct Played {
    reply: String,
    queued: usize,
}

impl Played {
    fn failed(reply: String) -> Self {
        Self { reply, queued: 0 }
    }
}

/// Reply wording for the collection kinds (album, artist, playlist).
struct CollectionWording {
    noun: &'static str,
    empty: &'static str,
    added: &'static str,
    queue_target: &'static str,
}

fn collection_wording(kind: MusicKind) -> CollectionWording {
    match kind {
        MusicKind::Artist => CollectionWording {
            noun: "artist",
            empty: "No tracks found for artist",
            added: "Added top tracks by",
            queue_target: "artist tracks",
        },
        MusicKind::Playlist => CollectionWording {
            noun: "playlist",
            empty: "No tracks found in playlist",
            added: "Added playlist",
            queue_target: "playlist",
        },
        _ => CollectionWording {
            noun: "album",
            empty: "No tracks found in album",
            added: "Added album",
            queue_target: "album",
        },
    }
}

fn not_active(target: &str) -> String {
    format!("❌ Could not queue {target}. Please make sure Spotify is open and active.")
}

fn control_reply(control: PlaybackControl) -> &'static str {
    match control {
        PlaybackControl::Next => "⏭️ Skipped to the next track.",
        PlaybackControl::Pause => "⏸️ Playback paused.",
        PlaybackControl::Resume => "▶️ Playback resumed.",
    }
}

fn control_verb(control: PlaybackControl) -> &'static str {
    match control {
        PlaybackControl::Next => "skip",
        PlaybackControl::Pause => "pause",
        PlaybackControl::Resume => "resume",
    }
}

pub struct MusicHandler<S, C> {
    llm: Arc<BoxLlmProvider>,
    service: S,
    catalog: C,
    mood_track_limit: u32,
    /// Last successfully queued request per user.
    selections: DashMap<String, MusicRequest>,
}

impl<S: MusicService, C: TrackCatalog> MusicHandler<S, C> {
    pub fn new(llm: Arc<BoxLlmProvider>, service: S, catalog: C) -> Self {
        Self {
            llm,
            service,
            catalog,
            mood_track_limit: DEFAULT_MOOD_TRACK_LIMIT,
            selections: DashMap::new(),
        }
    }

    pub fn with_mood_track_limit(mut self, limit: u32) -> Self {
        self.mood_track_limit = limit;
        self
    }

    pub fn last_selection(&self, user_id: &str) -> Option<MusicRequest> {
        self.selections.get(user_id).map(|r| r.value().clone())
    }

    /// Reduce free text to a `{type, value}` request; `{track, text}` on failure.
    async fn classify(&self, text: &str) -> MusicRequest {
        let prompt = format!(
            "You are a music assistant.\n\
             Given a user message, extract the music intent in JSON format like:\n\
             {{ \"type\": \"mood|artist|genre|track|album|playlist\", \"value\": \"extracted info\" }}\n\
             For album requests, identify as 'album' type.\n\
             For artist requests, identify as 'artist' type.\n\
             For playlist requests, identify as 'playlist' type.\n\
             For specific songs, identify as 'track' type.\n\
             For moods/genres, identify as 'mood' type.\n\
             User: {text}\n\
             Intent:"
        );
        let request = CompletionRequest::prompt(prompt, 100).with_temperature(0.0);

        let parsed = self
            .llm
            .complete(&request)
            .await
            .map_err(ExtractionError::from)
            .and_then(|response| parse_music_request(&response.content));
        or_default("music classification", parsed, || {
            MusicRequest::new(MusicKind::Track, text.trim())
        })
    }

    async fn authorize(&self) -> Result<(), HandlerError> {
        self.service
            .authorize()
            .await
            .map_err(|e| HandlerError::from_service(SPOTIFY, e))
    }

    async fn search_one(&self, query: &str, kind: MusicKind) -> Option<MediaItem> {
        or_default("music search", self.service.search(query, kind).await, || None)
    }

    /// Queue items in order; returns how many the player accepted.
    async fn queue_all(&self, items: &[MediaItem]) -> usize {
        let mut queued = 0;
        for item in items {
            if or_default("queue track", self.service.queue(&item.uri).await, || false) {
                queued += 1;
            }
        }
        queued
    }

    async fn play_track(&self, value: &str) -> Played {
        let Some(track) = self.search_one(value, MusicKind::Track).await else {
            return Played::failed(format!("❌ Could not find track: {value}"));
        };
        if self.queue_all(std::slice::from_ref(&track)).await == 0 {
            return Played::failed(not_active("track"));
        }
        Played {
            reply: format!("🎧 Now playing: {value}"),
            queued: 1,
        }
    }

    async fn play_collection(&self, kind: MusicKind, value: &str) -> Played {
        let wording = collection_wording(kind);
        let Some(item) = self.search_one(value, kind).await else {
            return Played::failed(format!("❌ Could not find {}: {value}", wording.noun));
        };

        let tracks = match kind {
            MusicKind::Artist => self.service.artist_top_tracks(item.id()).await,
            MusicKind::Playlist => self.service.playlist_tracks(item.id()).await,
            _ => self.service.album_tracks(item.id()).await,
        };
        let tracks = or_default("collection tracks", tracks, Vec::new);
        if tracks.is_empty() {
            return Played::failed(format!("❌ {}: {value}", wording.empty));
        }

        let queued = self.queue_all(&tracks).await;
        if queued == 0 {
            return Played::failed(not_active(wording.queue_target));
        }
        Played {
            reply: format!("🎧 {}: {value}", wording.added),
            queued,
        }
    }

    async fn play_mood(&self, value: &str) -> Result<Played, HandlerError> {
        let suggestions = match self
            .catalog
            .top_tracks_for_tag(value, self.mood_track_limit)
            .await
        {
            Err(e @ (ServiceError::AuthenticationFailed | ServiceError::NotConfigured(_))) => {
                return Err(HandlerError::from_service(LASTFM, e));
            }
            result => or_default("track catalog", result, Vec::new),
        };
        if suggestions.is_empty() {
            return Ok(Played::failed(NO_MOOD_TRACKS.to_string()));
        }

        // Resolve concurrently, then queue in the catalog's order.
        let lookups = suggestions.iter().map(|s| {
            let query = s.search_query();
            async move { self.search_one(&query, MusicKind::Track).await }
        });
        let found: Vec<MediaItem> = join_all(lookups).await.into_iter().flatten().collect();

        let queued = self.queue_all(&found).await;
        if queued == 0 {
            return Ok(Played::failed(not_active("tracks")));
        }
        Ok(Played {
            reply: format!("🎧 Added {queued} tracks for: {value}"),
            queued,
        })
    }

    async fn play(&self, user_id: &str, request: &MusicRequest) -> Result<String, HandlerError> {
        tracing::info!(kind = %request.kind, value = %request.value, "resolving music request");
        let played = match request.kind {
            MusicKind::Track => self.play_track(&request.value).await,
            MusicKind::Mood => self.play_mood(&request.value).await?,
            kind @ (MusicKind::Album | MusicKind::Artist | MusicKind::Playlist) => {
                self.play_collection(kind, &request.value).await
            }
        };
        if played.queued > 0 {
            self.selections.insert(user_id.to_string(), request.clone());
        }
        Ok(played.reply)
    }

    async fn control(&self, control: PlaybackControl) -> Result<String, HandlerError> {
        match self.service.control(control).await {
            Ok(()) => Ok(control_reply(control).to_string()),
            Err(e @ (ServiceError::AuthenticationFailed | ServiceError::NotConfigured(_))) => {
                Err(HandlerError::from_service(SPOTIFY, e))
            }
            Err(e) => {
                tracing::warn!(%control, error = %e, "playback control failed");
                Ok(format!(
                    "❌ Could not {} playback. Please make sure Spotify is open and active.",
                    control_verb(control)
                ))
            }
        }
    }
}

impl<S: MusicService, C: TrackCatalog> Handler for MusicHandler<S, C> {
    fn name(&self) -> &'static str {
        "music"
    }

    #[tracing::instrument(name = "music_handler", skip_all, fields(user_id = %request.user_id))]
    async fn handle(&self, request: &HandlerRequest) -> Result<String, HandlerError> {
        match request.directive {
            Some(Directive::Playback(control)) => self.control(control).await,
            Some(Directive::Replay) => {
                let Some(selection) = self.last_selection(&request.user_id) else {
                    return Ok(NOTHING_TO_REPLAY.to_string());
                };
                self.authorize().await?;
                self.play(&request.user_id, &selection).await
            }
            None => {
                let selection = self.classify(&request.text).await;
                self.authorize().await?;
                self.play(&request.user_id, &selection).await
            }
        }
    }

    fn forget(&self, user_id: &str) {
        self.selections.remove(user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::testing::StubLlm;

    fn item(kind: &str, id: &str, name: &str) -> MediaItem {
        MediaItem {
            uri: format!("spotify:{kind}:{id}"),
            url: None,
            name: name.to_string(),
        }
    }

    #[derive(Default)]
    struct StubSpotify {
        auth_error: bool,
        /// (kind, lower-cased query) -> item
        catalog: HashMap<(MusicKind, String), MediaItem>,
        /// collection id -> tracks
        collections: HashMap<String, Vec<MediaItem>>,
        player_inactive: bool,
        queued: Arc<Mutex<Vec<String>>>,
        controls: Arc<Mutex<Vec<PlaybackControl>>>,
    }

    impl StubSpotify {
        fn with(mut self, kind: MusicKind, query: &str, found: MediaItem) -> Self {
            self.catalog.insert((kind, query.to_lowercase()), found);
            self
        }

        fn with_tracks(mut self, id: &str, tracks: Vec<MediaItem>) -> Self {
            self.collections.insert(id.to_string(), tracks);
            self
        }

        fn tracks_of(&self, id: &str) -> Result<Vec<MediaItem>, ServiceError> {
            Ok(self.collections.get(id).cloned().unwrap_or_default())
        }
    }

    impl MusicService for StubSpotify {
        async fn authorize(&self) -> Result<(), ServiceError> {
            if self.auth_error {
                Err(ServiceError::AuthenticationFailed)
            } else {
                Ok(())
            }
        }

        async fn search(
            &self,
            query: &str,
            kind: MusicKind,
        ) -> Result<Option<MediaItem>, ServiceError> {
            let kind = if kind == MusicKind::Mood { MusicKind::Track } else { kind };
            Ok(self.catalog.get(&(kind, query.to_lowercase())).cloned())
        }

        async fn album_tracks(&self, album_id: &str) -> Result<Vec<MediaItem>, ServiceError> {
            self.tracks_of(album_id)
        }

        async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<MediaItem>, ServiceError> {
            self.tracks_of(artist_id)
        }

        async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<MediaItem>, ServiceError> {
            self.tracks_of(playlist_id)
        }

        async fn queue(&self, uri: &str) -> Result<bool, ServiceError> {
            if self.player_inactive {
                return Ok(false);
            }
            self.queued.lock().unwrap().push(uri.to_string());
            Ok(true)
        }

        async fn control(&self, control: PlaybackControl) -> Result<(), ServiceError> {
            if self.player_inactive {
                return Err(ServiceError::Status {
                    status: 404,
                    body: "NO_ACTIVE_DEVICE".to_string(),
                });
            }
            self.controls.lock().unwrap().push(control);
            Ok(())
        }
    }

    #[derive(Default)]
    struct StubLastFm {
        tracks: Vec<TrackSuggestion>,
        limits: Arc<Mutex<Vec<u32>>>,
        unconfigured: bool,
    }

    impl TrackCatalog for StubLastFm {
        async fn top_tracks_for_tag(
            &self,
            _tag: &str,
            limit: u32,
        ) -> Result<Vec<TrackSuggestion>, ServiceError> {
            self.limits.lock().unwrap().push(limit);
            if self.unconfigured {
                return Err(ServiceError::NotConfigured(LASTFM));
            }
            Ok(self.tracks.clone())
        }
    }

    fn suggestion(name: &str, artist: &str) -> TrackSuggestion {
        TrackSuggestion {
            name: name.to_string(),
            artist: artist.to_string(),
        }
    }

    fn llm_answering(json: &str) -> Arc<BoxLlmProvider> {
        StubLlm::new().reply("music assistant", json).boxed()
    }

    #[test]
    fn test_parse_music_request_aliases() {
        let req = parse_music_request(r#"Intent: {"type": "Genre", "value": " lofi "}"#).unwrap();
        assert_eq!(req, MusicRequest::new(MusicKind::Mood, "lofi"));
    }

    #[test]
    fn test_parse_music_request_rejects_unknown_type() {
        let err = parse_music_request(r#"{"type": "podcast", "value": "x"}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidField { field: "type", .. }));
    }

    #[tokio::test]
    async fn test_shape_of_you() {
        let spotify = StubSpotify::default().with(
            MusicKind::Track,
            "Shape of You",
            item("track", "t1", "Shape of You"),
        );
        let queued = Arc::clone(&spotify.queued);
        let handler = MusicHandler::new(
            llm_answering(r#"{"type": "track", "value": "Shape of You"}"#),
            spotify,
            StubLastFm::default(),
        );

        let reply = handler
            .handle(&HandlerRequest::new("u1", "play Shape of You"))
            .await
            .unwrap();

        assert_eq!(reply, "🎧 Now playing: Shape of You");
        assert_eq!(*queued.lock().unwrap(), vec!["spotify:track:t1"]);
        assert_eq!(
            handler.last_selection("u1"),
            Some(MusicRequest::new(MusicKind::Track, "Shape of You"))
        );
    }

    #[tokio::test]
    async fn test_classification_failure_searches_raw_text() {
        let spotify = StubSpotify::default().with(
            MusicKind::Track,
            "bohemian rhapsody",
            item("track", "q1", "Bohemian Rhapsody"),
        );
        let handler = MusicHandler::new(
            StubLlm::new().reply("music assistant", "no idea").boxed(),
            spotify,
            StubLastFm::default(),
        );

        let reply = handler
            .handle(&HandlerRequest::new("u1", "Bohemian Rhapsody"))
            .await
            .unwrap();
        assert_eq!(reply, "🎧 Now playing: Bohemian Rhapsody");
    }

    #[tokio::test]
    async fn test_track_not_found() {
        let handler = MusicHandler::new(
            llm_answering(r#"{"type": "track", "value": "Nonexistent"}"#),
            StubSpotify::default(),
            StubLastFm::default(),
        );
        let reply = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap();
        assert_eq!(reply, "❌ Could not find track: Nonexistent");
        assert_eq!(handler.last_selection("u1"), None);
    }

    #[tokio::test]
    async fn test_album_queues_every_track() {
        let spotify = StubSpotify::default()
            .with(MusicKind::Album, "Divide", item("album", "a1", "Divide"))
            .with_tracks(
                "a1",
                vec![item("track", "1", "Eraser"), item("track", "2", "Castle on the Hill")],
            );
        let queued = Arc::clone(&spotify.queued);
        let handler = MusicHandler::new(
            llm_answering(r#"{"type": "album", "value": "Divide"}"#),
            spotify,
            StubLastFm::default(),
        );

        let reply = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap();
        assert_eq!(reply, "🎧 Added album: Divide");
        assert_eq!(queued.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_artist_without_tracks() {
        let spotify =
            StubSpotify::default().with(MusicKind::Artist, "Queen", item("artist", "q", "Queen"));
        let handler = MusicHandler::new(
            llm_answering(r#"{"type": "artist", "value": "Queen"}"#),
            spotify,
            StubLastFm::default(),
        );
        let reply = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap();
        assert_eq!(reply, "❌ No tracks found for artist: Queen");
    }

    #[tokio::test]
    async fn test_playlist_player_inactive() {
        let mut spotify = StubSpotify::default()
            .with(MusicKind::Playlist, "Chill", item("playlist", "p1", "Chill"))
            .with_tracks("p1", vec![item("track", "1", "a")]);
        spotify.player_inactive = true;
        let handler = MusicHandler::new(
            llm_answering(r#"{"type": "playlist", "value": "Chill"}"#),
            spotify,
            StubLastFm::default(),
        );
        let reply = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap();
        assert_eq!(
            reply,
            "❌ Could not queue playlist. Please make sure Spotify is open and active."
        );
    }

    #[tokio::test]
    async fn test_mood_queues_found_tracks_in_order() {
        let spotify = StubSpotify::default()
            .with(MusicKind::Track, "Weightless Marconi Union", item("track", "w", "Weightless"))
            .with(MusicKind::Track, "Sunset Lover Petit Biscuit", item("track", "s", "Sunset Lover"));
        let queued = Arc::clone(&spotify.queued);
        let lastfm = StubLastFm {
            tracks: vec![
                suggestion("Weightless", "Marconi Union"),
                suggestion("Unknown", "Nobody"),
                suggestion("Sunset Lover", "Petit Biscuit"),
            ],
            ..Default::default()
        };
        let limits = Arc::clone(&lastfm.limits);
        let handler = MusicHandler::new(
            llm_answering(r#"{"type": "mood", "value": "chill"}"#),
            spotify,
            lastfm,
        )
        .with_mood_track_limit(10);

        let reply = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap();
        assert_eq!(reply, "🎧 Added 2 tracks for: chill");
        assert_eq!(
            *queued.lock().unwrap(),
            vec!["spotify:track:w", "spotify:track:s"]
        );
        assert_eq!(*limits.lock().unwrap(), vec![10]);
    }

    #[tokio::test]
    async fn test_mood_without_suggestions() {
        let handler = MusicHandler::new(
            llm_answering(r#"{"type": "mood", "value": "sad"}"#),
            StubSpotify::default(),
            StubLastFm::default(),
        );
        let reply = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap();
        assert_eq!(reply, NO_MOOD_TRACKS);
    }

    #[tokio::test]
    async fn test_mood_without_catalog_key_is_an_auth_failure() {
        let catalog = StubLastFm {
            unconfigured: true,
            ..Default::default()
        };
        let handler = MusicHandler::new(
            llm_answering(r#"{"type": "mood", "value": "chill"}"#),
            StubSpotify::default(),
            catalog,
        );
        let err = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap_err();
        assert!(matches!(
            err,
            HandlerError::AuthenticationFailed { service: LASTFM }
        ));
    }

    #[tokio::test]
    async fn test_auth_failure_is_an_error() {
        let spotify = StubSpotify {
            auth_error: true,
            ..Default::default()
        };
        let handler = MusicHandler::new(
            llm_answering(r#"{"type": "track", "value": "x"}"#),
            spotify,
            StubLastFm::default(),
        );
        let err = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap_err();
        assert!(matches!(err, HandlerError::AuthenticationFailed { service: "Spotify" }));
    }

    #[tokio::test]
    async fn test_playback_controls() {
        let spotify = StubSpotify::default();
        let controls = Arc::clone(&spotify.controls);
        let handler = MusicHandler::new(StubLlm::new().boxed(), spotify, StubLastFm::default());

        let request = HandlerRequest::new("u1", "")
            .with_directive(Directive::Playback(PlaybackControl::Pause));
        let reply = handler.handle(&request).await.unwrap();
        assert_eq!(reply, "⏸️ Playback paused.");
        assert_eq!(*controls.lock().unwrap(), vec![PlaybackControl::Pause]);
    }

    #[tokio::test]
    async fn test_playback_control_without_device() {
        let spotify = StubSpotify {
            player_inactive: true,
            ..Default::default()
        };
        let handler = MusicHandler::new(StubLlm::new().boxed(), spotify, StubLastFm::default());
        let request = HandlerRequest::new("u1", "")
            .with_directive(Directive::Playback(PlaybackControl::Next));
        let reply = handler.handle(&request).await.unwrap();
        assert!(reply.starts_with("❌ Could not skip playback"));
    }

    #[tokio::test]
    async fn test_replay_and_forget() {
        let spotify = StubSpotify::default().with(
            MusicKind::Track,
            "Yellow",
            item("track", "y", "Yellow"),
        );
        let queued = Arc::clone(&spotify.queued);
        let handler = MusicHandler::new(
            llm_answering(r#"{"type": "track", "value": "Yellow"}"#),
            spotify,
            StubLastFm::default(),
        );
        let replay = HandlerRequest::new("u1", "more").with_directive(Directive::Replay);

        assert_eq!(handler.handle(&replay).await.unwrap(), NOTHING_TO_REPLAY);

        handler.handle(&HandlerRequest::new("u1", "play Yellow")).await.unwrap();
        let reply = handler.handle(&replay).await.unwrap();
        assert_eq!(reply, "🎧 Now playing: Yellow");
        assert_eq!(queued.lock().unwrap().len(), 2);

        handler.forget("u1");
        assert_eq!(handler.handle(&replay).await.unwrap(), NOTHING_TO_REPLAY);
    }
}
