//! Prefixed command parsing (`!play ...`, `!next`, `!forget`, ...).
//!
//! Commands bypass the intent classifier. Anything without the prefix is a
//! free-text message.

use switchboard_types::intent::Intent;
use switchboard_types::music::PlaybackControl;

use crate::handler::Directive;

/// Parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    News(String),
    Play(String),
    Remind(String),
    Ask(String),
    Playback(PlaybackControl),
    /// Queue the last music selection again.
    Replay,
    /// Purge the user's conversation history.
    Forget,
    Help,
    /// Unknown command or missing argument; carries the user-facing reason.
    Unknown(String),
}

impl Command {
    /// The intent, payload, and directive this command routes to, if it
    /// reaches a handler at all.
    pub fn route(&self) -> Option<(Intent, &str, Option<Directive>)> {
        match self {
            Command::News(q) => Some((Intent::News, q.as_str(), None)),
            Command::Play(q) => Some((Intent::Music, q.as_str(), None)),
            Command::Remind(q) => Some((Intent::Reminder, q.as_str(), None)),
            Command::Ask(q) => Some((Intent::Qa, q.as_str(), None)),
            Command::Playback(c) => Some((Intent::Music, "", Some(Directive::Playback(*c)))),
            Command::Replay => Some((Intent::Music, "", Some(Directive::Replay))),
            Command::Forget | Command::Help | Command::Unknown(_) => None,
        }
    }
}

/// Parse `input` as a command introduced by `prefix`.
///
/// Returns `None` for ordinary messages. With an empty prefix only known
/// command words count, so plain chat is never reported as unknown.
pub fn parse(input: &str, prefix: &str) -> Option<Command> {
    let trimmed = input.trim();
    let body = trimmed.strip_prefix(prefix)?;
    if body.is_empty() || body.starts_with(char::is_whitespace) {
        return None;
    }

    let mut parts = body.splitn(2, char::is_whitespace);
    let word = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or_default().to_string();

    let required = |name: &str, make: fn(String) -> Command| {
        if arg.is_empty() {
            Command::Unknown(format!("{prefix}{name} needs something to work with"))
        } else {
            make(arg.clone())
        }
    };

    let command = match word.as_str() {
        "news" => Command::News(arg.clone()),
        "play" => required("play", Command::Play),
        "remind" => required("remind", Command::Remind),
        "ask" => required("ask", Command::Ask),
        "next" | "skip" => Command::Playback(PlaybackControl::Next),
        "pause" => Command::Playback(PlaybackControl::Pause),
        "resume" => Command::Playback(PlaybackControl::Resume),
        "more" | "replay" => Command::Replay,
        "forget" => Command::Forget,
        "help" | "?" => Command::Help,
        _ if prefix.is_empty() => return None,
        other => Command::Unknown(format!("unknown command '{prefix}{other}'")),
    };
    Some(command)
}

/// Help text listing every command with `prefix`.
pub fn help_text(prefix: &str) -> String {
    let rows = [
        ("news <topic>", "Top headlines for a topic"),
        ("play <request>", "Queue a track, album, artist, playlist, or mood"),
        ("next | pause | resume", "Control playback"),
        ("more", "Queue your last music request again"),
        ("remind <text>", "Create a calendar reminder"),
        ("ask <question>", "Ask the assistant directly"),
        ("forget", "Delete your conversation history"),
        ("help", "Show this message"),
    ];
    let mut text = String::from("Available commands:\n");
    for (usage, description) in rows {
        text.push_str(&format!("  {prefix}{usage} - {description}\n"));
    }
    text.push_str("Anything else is routed automatically.");
    text
}
