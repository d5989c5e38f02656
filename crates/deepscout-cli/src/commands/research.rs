use anyhow::Result;
use colored::Colorize;
use deepscout_core::ResearchSystem;

use crate::cli::{OutputFormat, ResearchArgs};
use crate::output::json::print_json;

pub async fn run(
    system: &mut ResearchSystem,
    args: &ResearchArgs,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    if !format.is_json() {
        println!("{} {}", "Researching:".cyan().bold(), args.query);
    }

    let outcome = system.research(&args.query).await?;

    if format.is_json() {
        return print_json(&outcome);
    }

    println!();
    println!("{}", "Objective".green().bold());
    println!("  {}", outcome.plan.objective);
    println!();
    println!("{}", outcome.report);

    if verbose {
        println!();
        println!("{}", "Run stats".dimmed());
        println!("  Session:    {}", outcome.session_id);
        println!("  Iterations: {}", outcome.iterations);
        println!("  Tool calls: {}", outcome.tool_calls);
        println!("  Tokens:     {}", outcome.usage.total_tokens);
    }

    Ok(())
}
