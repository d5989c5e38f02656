use anyhow::Result;
use deepscout_core::ResearchSystem;
use serde_json::json;

use crate::cli::{MemoryCommands, OutputFormat};
use crate::output::json::print_json;

pub fn run(
    system: &mut ResearchSystem,
    command: MemoryCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        MemoryCommands::Show => show_memory(system, format),
        MemoryCommands::Clear => clear_memory(system, format),
    }
}

fn show_memory(system: &ResearchSystem, format: OutputFormat) -> Result<()> {
    let context = system.memory_context();

    if format.is_json() {
        return print_json(&json!({ "context": context }));
    }

    if context.is_empty() {
        println!("Memory is empty.");
    } else {
        println!("{context}");
    }

    Ok(())
}

fn clear_memory(system: &mut ResearchSystem, format: OutputFormat) -> Result<()> {
    system.clear_memory();

    if format.is_json() {
        return print_json(&json!({ "cleared": true }));
    }

    println!("Memory cleared.");
    Ok(())
}
