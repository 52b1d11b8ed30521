//! Async readline input handling for the chat loop.
//!
//! Wraps `rustyline_async::Readline` to provide async line reading with
//! proper handling of EOF (Ctrl+D) and interrupt (Ctrl+C) signals.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// User submitted a message.
    Message(String),
    /// Terminal-only command handled by the loop itself.
    Local(LocalCommand),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand {
    Quit,
    Clear,
}

/// Recognize `/quit`, `/exit` and `/clear`; everything else is a message.
pub fn classify_line(line: &str) -> InputEvent {
    let trimmed = line.trim();
    match trimmed {
        "/quit" | "/exit" => InputEvent::Local(LocalCommand::Quit),
        "/clear" => InputEvent::Local(LocalCommand::Clear),
        _ => InputEvent::Message(trimmed.to_string()),
    }
}

/// Async input handler wrapping rustyline_async.
pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Create a new chat input handler with the given prompt.
    ///
    /// Returns the input handler and a `SharedWriter` that can be used to
    /// print output without interfering with the readline prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    /// Read a line of input.
    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let event = classify_line(&line);
                if matches!(&event, InputEvent::Message(text) if !text.is_empty()) {
                    self.rl.add_history_entry(line);
                }
                event
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal before exiting.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_commands() {
        assert_eq!(classify_line("/quit"), InputEvent::Local(LocalCommand::Quit));
        assert_eq!(classify_line(" /exit "), InputEvent::Local(LocalCommand::Quit));
        assert_eq!(classify_line("/clear"), InputEvent::Local(LocalCommand::Clear));
    }

    #[test]
    fn test_everything_else_is_a_message() {
        assert_eq!(
            classify_line("  !news rust  "),
            InputEvent::Message("!news rust".to_string())
        );
        assert_eq!(classify_line("/help"), InputEvent::Message("/help".to_string()));
    }
}
