//! Reminder handler: extract `{summary, start}` with the text model, then
//! create a calendar event.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use switchboard_types::error::{ExtractionError, HandlerError, ServiceError};
use switchboard_types::llm::CompletionRequest;
use switchboard_types::reminder::{
    CalendarEvent, DEFAULT_REMINDER_HOUR, REMINDER_DURATION_MINUTES, ReminderDraft,
};

use super::{Handler, HandlerRequest};
use crate::extract::extract_json;
use crate::llm::box_provider::BoxLlmProvider;

/// Service name used in authentication failure replies.
pub const GOOGLE_CALENDAR: &str = "Google Calendar";

/// Time zone used when none is configured.
pub const DEFAULT_TIME_ZONE: &str = "Asia/Kolkata";

const UNCLEAR_TIME: &str = "⚠️ Could not understand the reminder time. Please specify a time.";
const CREATE_FAILED: &str = "⚠️ Could not create the reminder. Try a simpler description.";

/// Port for a calendar backend. Implemented by `GoogleCalendarClient`.
pub trait Calendar: Send + Sync {
    fn create_event(
        &self,
        event: &CalendarEvent,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Parse `YYYY-MM-DD HH:MM` (seconds and a `T` separator tolerated), or a
/// bare `YYYY-MM-DD` at the default hour.
pub fn parse_start(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let time = NaiveTime::from_hms_opt(DEFAULT_REMINDER_HOUR, 0, 0)?;
    Some(date.and_time(time))
}

/// A fixed-length event starting at `start`.
pub fn build_event(summary: &str, start: NaiveDateTime, time_zone: &str) -> CalendarEvent {
    CalendarEvent {
        summary: summary.to_string(),
        start,
        end: start + Duration::minutes(REMINDER_DURATION_MINUTES),
        time_zone: time_zone.to_string(),
    }
}

fn validate_draft(draft: ReminderDraft) -> Result<(String, NaiveDateTime), ExtractionError> {
    let summary = draft.summary.trim();
    if summary.is_empty() {
        return Err(ExtractionError::InvalidField {
            field: "summary",
            reason: "empty".to_string(),
        });
    }
    let start = parse_start(&draft.start).ok_or_else(|| ExtractionError::InvalidField {
        field: "start",
        reason: format!("unrecognized time '{}'", draft.start),
    })?;
    Ok((summary.to_string(), start))
}

/// Parse an IANA zone name, warning when it is unknown.
fn resolve_zone(name: &str) -> Option<Tz> {
    match name.parse::<Tz>() {
        Ok(zone) => Some(zone),
        Err(e) => {
            tracing::warn!(time_zone = %name, error = %e, "unknown time zone, using host clock");
            None
        }
    }
}

pub struct ReminderHandler<C> {
    llm: Arc<BoxLlmProvider>,
    calendar: C,
    time_zone: String,
    /// `time_zone` resolved; `None` falls back to the host's local time.
    zone: Option<Tz>,
    now: fn() -> DateTime<Utc>,
}

impl<C: Calendar> ReminderHandler<C> {
    pub fn new(llm: Arc<BoxLlmProvider>, calendar: C) -> Self {
        Self {
            llm,
            calendar,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            zone: resolve_zone(DEFAULT_TIME_ZONE),
            now: Utc::now,
        }
    }

    /// Zone for created events and for "today" in the extraction prompt.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self.zone = resolve_zone(&self.time_zone);
        self
    }

    /// Override the clock used for "today" in the extraction prompt.
    pub fn with_clock(mut self, now: fn() -> DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Wall-clock time in the reminder's time zone.
    fn local_now(&self) -> NaiveDateTime {
        let now = (self.now)();
        match self.zone {
            Some(zone) => now.with_timezone(&zone).naive_local(),
            None => now.with_timezone(&Local).naive_local(),
        }
    }

    async fn extract(&self, text: &str) -> Result<(String, NaiveDateTime), ExtractionError> {
        let now = self.local_now();
        let prompt = format!(
            "Extract reminder details from this text and return JSON like:\n\
             {{ \"summary\": \"title\", \"start\": \"YYYY-MM-DD HH:MM\" }}\n\n\
             Today's date is {} and the current time is {}.\n\
             Reminder: \"{text}\"\n\
             Response:",
            now.format("%Y-%m-%d"),
            now.format("%H:%M:%S"),
        );
        let request = CompletionRequest::prompt(prompt, 150).with_temperature(0.0);

        let response = self.llm.complete(&request).await?;
        validate_draft(extract_json::<ReminderDraft>(&response.content)?)
    }
}

impl<C: Calendar> Handler for ReminderHandler<C> {
    fn name(&self) -> &'static str {
        "reminder"
    }

    #[tracing::instrument(name = "reminder_handler", skip_all, fields(user_id = %request.user_id))]
    async fn handle(&self, request: &HandlerRequest) -> Result<String, HandlerError> {
        let (summary, start) = match self.extract(&request.text).await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "could not extract reminder");
                return Ok(UNCLEAR_TIME.to_string());
            }
        };

        let event = build_event(&summary, start, &self.time_zone);
        match self.calendar.create_event(&event).await {
            Ok(()) => {
                tracing::info!(%start, "reminder created");
                Ok(format!(
                    "✅ Reminder '{summary}' set for {}.",
                    start.format("%Y-%m-%d %H:%M")
                ))
            }
            Err(e @ (ServiceError::AuthenticationFailed | ServiceError::NotConfigured(_))) => {
                Err(HandlerError::from_service(GOOGLE_CALENDAR, e))
            }
            Err(e) => {
                tracing::warn!(error = %e, "calendar insert failed");
                Ok(CREATE_FAILED.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::testing::StubLlm;

    #[derive(Default)]
    struct StubCalendar {
        events: Arc<Mutex<Vec<CalendarEvent>>>,
        failure: Option<fn() -> ServiceError>,
    }

    impl Calendar for StubCalendar {
        async fn create_event(&self, event: &CalendarEvent) -> Result<(), ServiceError> {
            if let Some(failure) = self.failure {
                return Err(failure());
            }
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    /// 18:30 in Asia/Kolkata.
    fn fixed_now() -> DateTime<Utc> {
        at("2024-06-01 13:00").and_utc()
    }

    /// Late evening in UTC, already the next day in Asia/Kolkata.
    fn late_utc_evening() -> DateTime<Utc> {
        at("2024-06-01 20:00").and_utc()
    }

    #[test]
    fn test_parse_start_formats() {
        assert_eq!(parse_start("2024-06-02 14:15"), Some(at("2024-06-02 14:15")));
        assert_eq!(parse_start(" 2024-06-02T14:15:00 "), Some(at("2024-06-02 14:15")));
        assert_eq!(parse_start("2024-06-02"), Some(at("2024-06-02 09:00")));
        assert_eq!(parse_start("tomorrow at noon"), None);
        assert_eq!(parse_start("2024-13-40"), None);
    }

    #[test]
    fn test_build_event_lasts_thirty_minutes() {
        let event = build_event("stand-up", at("2024-06-02 23:45"), "UTC");
        assert_eq!(event.end, at("2024-06-03 00:15"));
        assert_eq!(event.time_zone, "UTC");
    }

    #[tokio::test]
    async fn test_call_mom_tomorrow() {
        let calendar = StubCalendar::default();
        let events = Arc::clone(&calendar.events);
        let llm = StubLlm::new().reply(
            "Extract reminder details",
            r#"{"summary": "call mom", "start": "2024-06-02"}"#,
        );
        let prompts = llm.prompts();
        let handler = ReminderHandler::new(llm.boxed(), calendar).with_clock(fixed_now);

        let reply = handler
            .handle(&HandlerRequest::new("u1", "remind me to call mom tomorrow"))
            .await
            .unwrap();

        assert_eq!(reply, "✅ Reminder 'call mom' set for 2024-06-02 09:00.");
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, at("2024-06-02 09:00"));
        assert_eq!(events[0].end, at("2024-06-02 09:30"));
        assert_eq!(events[0].time_zone, DEFAULT_TIME_ZONE);

        let prompt = prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Today's date is 2024-06-01 and the current time is 18:30:00."));
    }

    #[tokio::test]
    async fn test_today_follows_configured_zone() {
        let llm = StubLlm::new().reply(
            "Extract reminder details",
            r#"{"summary": "stand-up", "start": "2024-06-02 10:00"}"#,
        );
        let prompts = llm.prompts();
        let handler = ReminderHandler::new(llm.boxed(), StubCalendar::default())
            .with_clock(late_utc_evening);
        handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap();
        let prompt = prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Today's date is 2024-06-02 and the current time is 01:30:00."));

        let llm = StubLlm::new().reply(
            "Extract reminder details",
            r#"{"summary": "stand-up", "start": "2024-06-02 10:00"}"#,
        );
        let prompts = llm.prompts();
        let handler = ReminderHandler::new(llm.boxed(), StubCalendar::default())
            .with_time_zone("Europe/Berlin")
            .with_clock(late_utc_evening);
        handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap();
        let prompt = prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Today's date is 2024-06-01 and the current time is 22:00:00."));
    }

    #[test]
    fn test_unknown_zone_is_not_resolved() {
        assert_eq!(resolve_zone("Asia/Kolkata"), Some(Tz::Asia__Kolkata));
        assert_eq!(resolve_zone("Mars/Olympus"), None);
    }

    #[tokio::test]
    async fn test_model_failure_keeps_its_cause() {
        let handler = ReminderHandler::new(
            StubLlm::new().fail("Extract reminder details").boxed(),
            StubCalendar::default(),
        );
        let err = handler.extract("call mom").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Model(_)));
    }

    #[tokio::test]
    async fn test_unparseable_time() {
        let handler = ReminderHandler::new(
            StubLlm::new()
                .reply("Extract reminder details", r#"{"summary": "x", "start": "soon"}"#)
                .boxed(),
            StubCalendar::default(),
        );
        let reply = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap();
        assert_eq!(reply, UNCLEAR_TIME);
    }

    #[tokio::test]
    async fn test_model_failure_is_unclear_time() {
        let handler = ReminderHandler::new(
            StubLlm::new().fail("Extract reminder details").boxed(),
            StubCalendar::default(),
        );
        let reply = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap();
        assert_eq!(reply, UNCLEAR_TIME);
    }

    #[tokio::test]
    async fn test_calendar_failure() {
        let calendar = StubCalendar {
            failure: Some(|| ServiceError::Status {
                status: 400,
                body: "bad request".to_string(),
            }),
            ..Default::default()
        };
        let handler = ReminderHandler::new(
            StubLlm::new()
                .reply(
                    "Extract reminder details",
                    r#"{"summary": "dentist", "start": "2024-06-03 10:00"}"#,
                )
                .boxed(),
            calendar,
        )
        .with_time_zone("Europe/Berlin");
        let reply = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap();
        assert_eq!(reply, CREATE_FAILED);
    }

    #[tokio::test]
    async fn test_calendar_auth_failure_is_an_error() {
        let calendar = StubCalendar {
            failure: Some(|| ServiceError::NotConfigured("Google Calendar")),
            ..Default::default()
        };
        let handler = ReminderHandler::new(
            StubLlm::new()
                .reply(
                    "Extract reminder details",
                    r#"{"summary": "dentist", "start": "2024-06-03 10:00"}"#,
                )
                .boxed(),
            calendar,
        );
        let err = handler.handle(&HandlerRequest::new("u1", "x")).await.unwrap_err();
        assert!(matches!(
            err,
            HandlerError::AuthenticationFailed { service: GOOGLE_CALENDAR }
        ));
    }
}
