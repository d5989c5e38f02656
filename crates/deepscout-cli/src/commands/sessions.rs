use anyhow::{Result, bail};
use colored::Colorize;
use comfy_table::{Cell, Table};
use deepscout_core::{ResearchSystem, SessionRecord};

use crate::cli::{OutputFormat, SessionCommands};
use crate::commands::utils::{format_timestamp, preview_text};
use crate::output::json::print_json;
use crate::output::table::print_table;

pub fn run(
    system: &ResearchSystem,
    command: SessionCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        SessionCommands::List { limit } => list_sessions(system, limit, format),
        SessionCommands::Show { id } => show_session(system, &id, format),
    }
}

fn list_sessions(system: &ResearchSystem, limit: usize, format: OutputFormat) -> Result<()> {
    let sessions = system.recent_sessions(limit)?;

    if format.is_json() {
        return print_json(&sessions);
    }

    if sessions.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    render_sessions_table(&sessions)
}

fn show_session(system: &ResearchSystem, id: &str, format: OutputFormat) -> Result<()> {
    let Some(session) = system.session(id)? else {
        bail!("Session not found: {id}");
    };

    if format.is_json() {
        return print_json(&session);
    }

    println!("{} {}", "Session:".green().bold(), session.id);
    println!("{} {}", "Created:".green().bold(), format_timestamp(session.created_at_ms));
    println!("{} {}", "Query:".green().bold(), session.query);
    println!("{} {}", "Objective:".green().bold(), session.objective);
    println!();
    println!("{}", session.report);

    Ok(())
}

fn render_sessions_table(sessions: &[SessionRecord]) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Created", "Query", "Report"]);

    for session in sessions {
        table.add_row(vec![
            Cell::new(session.id.clone()),
            Cell::new(format_timestamp(session.created_at_ms)),
            Cell::new(preview_text(&session.query, 40)),
            Cell::new(preview_text(&session.report, 60)),
        ]);
    }

    print_table(table)
}
