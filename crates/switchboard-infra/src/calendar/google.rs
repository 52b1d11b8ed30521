//! Google Calendar v3 client, implementing [`Calendar`].

use chrono::NaiveDateTime;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use switchboard_core::handler::reminder::{Calendar, GOOGLE_CALENDAR};
use switchboard_core::token::TokenCache;
use switchboard_types::config::CalendarConfig;
use switchboard_types::error::ServiceError;
use switchboard_types::reminder::CalendarEvent;

use crate::http::{json_body, status_error, transport_error};
use crate::oauth::{ClientAuth, RefreshCredentials, refresh_access_token};
use crate::secret::{
    EnvSecretProvider, GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET, GOOGLE_REFRESH_TOKEN,
};

pub const GOOGLE_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Local wall-clock time plus zone name, as the events API expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
struct EventBody<'a> {
    summary: &'a str,
    start: EventTime<'a>,
    end: EventTime<'a>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedEvent {
    #[serde(default)]
    id: String,
    #[serde(default)]
    html_link: Option<String>,
}

fn event_time(at: NaiveDateTime, time_zone: &str) -> EventTime<'_> {
    EventTime {
        date_time: at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        time_zone,
    }
}

fn event_body(event: &CalendarEvent) -> EventBody<'_> {
    EventBody {
        summary: &event.summary,
        start: event_time(event.start, &event.time_zone),
        end: event_time(event.end, &event.time_zone),
    }
}

/// Google Calendar client. Does NOT derive Debug: holds OAuth credentials.
pub struct GoogleCalendarClient {
    client: reqwest::Client,
    credentials: Option<RefreshCredentials>,
    tokens: TokenCache,
    api_url: String,
    token_url: String,
    calendar_id: String,
}

impl GoogleCalendarClient {
    pub fn new(
        client: reqwest::Client,
        credentials: Option<RefreshCredentials>,
        config: &CalendarConfig,
    ) -> Self {
        Self {
            client,
            credentials,
            tokens: TokenCache::new(),
            api_url: GOOGLE_CALENDAR_API_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            calendar_id: config.calendar_id.clone(),
        }
    }

    /// Credentials from the three `GOOGLE_*` variables; `None` unless all are set.
    pub fn credentials_from(secrets: &EnvSecretProvider) -> Option<RefreshCredentials> {
        Some(RefreshCredentials {
            client_id: secrets.get(GOOGLE_CLIENT_ID)?.expose_secret().to_string(),
            client_secret: secrets.get(GOOGLE_CLIENT_SECRET)?,
            refresh_token: secrets.get(GOOGLE_REFRESH_TOKEN)?,
        })
    }

    pub fn with_base_urls(mut self, api_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.token_url = token_url.into();
        self
    }

    /// `{api}/calendars/{id}/events` with the calendar id percent-encoded.
    fn events_url(&self) -> Result<reqwest::Url, ServiceError> {
        let mut url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| ServiceError::Http(format!("invalid calendar API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ServiceError::Http("calendar API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }
}

impl Calendar for GoogleCalendarClient {
    #[tracing::instrument(skip_all, fields(calendar_id = %self.calendar_id, start = %event.start))]
    async fn create_event(&self, event: &CalendarEvent) -> Result<(), ServiceError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ServiceError::NotConfigured(GOOGLE_CALENDAR))?;
        let token = self
            .tokens
            .get_or_refresh(|| {
                refresh_access_token(&self.client, &self.token_url, credentials, ClientAuth::Form)
            })
            .await?;

        let response = self
            .client
            .post(self.events_url()?)
            .bearer_auth(token.expose_secret())
            .json(&event_body(event))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().as_u16() == 401 {
            self.tokens.invalidate().await;
        }
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let created: CreatedEvent = json_body(response).await?;
        tracing::info!(
            event_id = %created.id,
            link = created.html_link.as_deref().unwrap_or(""),
            "calendar event created"
        );
        Ok(())
    }
}
