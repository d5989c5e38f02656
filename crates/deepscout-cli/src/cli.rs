use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for CLI commands
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

#[derive(Parser)]
#[command(name = "deepscout")]
#[command(version, about = "DeepScout - agentic deep research from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (defaults to ~/.deepscout/deepscout.db)
    #[arg(long, global = true, env = "DEEPSCOUT_DB_PATH")]
    pub db_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a research session for a query
    Research(ResearchArgs),

    /// Memory operations
    Memory {
        #[command(subcommand)]
        command: MemoryCommands,
    },

    /// Persisted research sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Args)]
pub struct ResearchArgs {
    /// The research query
    pub query: String,

    /// LLM provider (openai or anthropic)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model override for the chosen provider
    #[arg(short, long)]
    pub model: Option<String>,

    /// Maximum research agent iterations
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Disable the RAG document index
    #[arg(long)]
    pub no_rag: bool,

    /// Disable session memory
    #[arg(long)]
    pub no_memory: bool,
}

#[derive(Subcommand)]
pub enum MemoryCommands {
    /// Show the current memory context
    Show,

    /// Clear working and short-term memory
    Clear,
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// List persisted sessions
    List {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show a session's report
    Show {
        /// Session ID
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_research_command() {
        let cli = Cli::try_parse_from([
            "deepscout",
            "research",
            "what is rust?",
            "--provider",
            "anthropic",
            "--max-iterations",
            "3",
            "--no-rag",
        ])
        .expect("parse research");

        match cli.command {
            Commands::Research(args) => {
                assert_eq!(args.query, "what is rust?");
                assert_eq!(args.provider.as_deref(), Some("anthropic"));
                assert_eq!(args.max_iterations, Some(3));
                assert!(args.no_rag);
                assert!(!args.no_memory);
            }
            _ => panic!("expected research command"),
        }
    }

    #[test]
    fn parses_memory_clear() {
        let cli = Cli::try_parse_from(["deepscout", "memory", "clear"]).expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Memory {
                command: MemoryCommands::Clear
            }
        ));
    }

    #[test]
    fn parses_sessions_list_with_limit() {
        let cli = Cli::try_parse_from(["deepscout", "sessions", "list", "--limit", "5"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Sessions {
                command: SessionCommands::List { limit: 5 }
            }
        ));
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from(["deepscout", "research", "q", "--format", "json", "-v"])
            .expect("parse");
        assert!(cli.format.is_json());
        assert!(cli.verbose);
    }
}
