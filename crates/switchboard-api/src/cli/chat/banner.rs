//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(user_id: &str, provider: &str, model: &str, command_prefix: &str) {
    println!();
    println!("  📡 {}", style("Switchboard").cyan().bold());
    println!(
        "  {}",
        style("News, music, reminders and questions in one chat").dim()
    );
    println!();
    println!("  {}  {}", style("User:").bold(), style(user_id).dim());
    println!(
        "  {}  {}",
        style("Model:").bold(),
        style(format!("{model} via {provider}")).dim()
    );
    println!();
    println!(
        "  {}",
        style(format!(
            "Type {command_prefix}help for commands, /quit or Ctrl+D to exit"
        ))
        .dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
