//! One-shot conversation commands: send, history, forget.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use switchboard_types::conversation::Role;

use crate::state::AppState;

/// Send one message through the router and print the reply.
pub async fn send_message(state: &AppState, user_id: &str, text: &str, json: bool) -> Result<()> {
    let spinner = (!json).then(|| super::spinner("thinking..."));
    let reply = state.router.handle_message(user_id, text).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        let out = serde_json::json!({ "user_id": user_id, "reply": reply });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{reply}");
    }
    Ok(())
}

/// Print the last `limit` records for a user.
pub async fn show_history(state: &AppState, user_id: &str, limit: usize, json: bool) -> Result<()> {
    let records = state.router.history(user_id, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!(
            "  No conversation history for {}.",
            style(user_id).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("When").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for record in &records {
        let role = match record.role {
            Role::User => Cell::new("user").fg(Color::Cyan),
            Role::Assistant => Cell::new("assistant").fg(Color::Green),
        };
        table.add_row(vec![
            Cell::new(record.sequence).fg(Color::DarkGrey),
            Cell::new(record.created_at.format("%Y-%m-%d %H:%M:%S")).fg(Color::DarkGrey),
            role,
            Cell::new(&record.text),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Delete a user's history, asking first unless `force` or `json`.
pub async fn forget_user(state: &AppState, user_id: &str, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete the conversation history of '{}'?",
                style(user_id).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = state.router.forget(user_id).await?;

    if json {
        let out = serde_json::json!({ "user_id": user_id, "removed": removed });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "  {} Removed {} records for {}",
            style("✓").green().bold(),
            removed,
            style(user_id).cyan()
        );
    }
    Ok(())
}
