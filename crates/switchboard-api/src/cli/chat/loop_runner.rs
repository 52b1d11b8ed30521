//! Main chat loop orchestration.

use std::io::Write;
use std::time::Instant;

use console::style;

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::input::{ChatInput, InputEvent, LocalCommand};

/// Run the interactive chat loop as `user_id` until EOF or `/quit`.
pub async fn run_chat_loop(state: &AppState, user_id: &str) -> anyhow::Result<()> {
    print_welcome_banner(
        user_id,
        &state.provider_name,
        &state.config.llm.model,
        state.router.command_prefix(),
    );

    let prompt = format!("{} ", style("you ›").green().bold());
    let (mut input, mut stdout) = ChatInput::new(prompt)?;
    let mut turns = 0usize;

    loop {
        let text = match input.read_line().await {
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
            InputEvent::Local(LocalCommand::Clear) => {
                input.clear();
                continue;
            }
            InputEvent::Local(LocalCommand::Quit) | InputEvent::Eof => break,
            InputEvent::Interrupted => {
                writeln!(stdout, "{}", style("(Ctrl+D or /quit to exit)").dim())?;
                continue;
            }
        };

        let started = Instant::now();
        let spinner = crate::cli::spinner("thinking...");
        let reply = state.router.handle_message(user_id, &text).await;
        spinner.finish_and_clear();
        turns += 1;

        writeln!(stdout, "{} {}", style("bot ›").cyan().bold(), reply)?;
        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "reply rendered"
        );
    }

    input.flush();
    drop(stdout);
    println!();
    println!(
        "  {} {} messages this session. Bye!",
        style("👋").bold(),
        turns
    );
    Ok(())
}
