use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err);

    let msg = err.to_string().to_lowercase();

    if msg.contains("api key not configured") || msg.contains("api key") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Set your API key in the environment:");
        eprintln!("  {} export OPENAI_API_KEY=<value>", "$".dimmed());
        eprintln!("  or add it to ~/.config/deepscout/config.toml under [api_keys]");
    }

    if msg.contains("unsupported provider") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Supported providers: openai, anthropic");
    }

    if msg.contains("connection refused") || msg.contains("network") || msg.contains("timed out") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Check your internet connection and try again.");
    }

    std::process::exit(1);
}
