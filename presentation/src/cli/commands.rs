//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for deepcast
#[derive(Parser, Debug)]
#[command(name = "deepcast")]
#[command(author, version, about = "Tool-calling research agent with quality-gated briefs")]
#[command(long_about = r#"
deepcast researches a task by letting a planning model call web tools until it
has enough material, then asks a final model for a single synthesized answer.

Research briefs track a topic through pending -> in_progress -> completed.
A brief only completes once its recorded queries, sources and claims clear the
configured quality thresholds (or when --force is given).

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./deepcast.toml     Project-level config (or ./.deepcast.toml)
3. ~/.config/deepcast/config.toml   Global config
Environment variables prefixed DEEPCAST_ override all files
(e.g. DEEPCAST_LOOP__MAX_ITERATIONS=10).

Secrets are read from OPENAI_API_KEY and BRAVE_API_KEY.

Example:
  deepcast research "Who was Ada Lovelace?"
  deepcast brief create --topic "Ada Lovelace" --angle "early computing"
  deepcast brief cycle 1 quick
  deepcast brief advance 1
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostics to a daily-rotated file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the planning loop on a task and print the synthesized answer
    Research(ResearchArgs),

    /// Manage research briefs
    #[command(subcommand)]
    Brief(BriefCommand),

    /// Record research activity against a brief
    #[command(subcommand)]
    Record(RecordCommand),
}

#[derive(Args, Debug)]
pub struct ResearchArgs {
    /// The task to research
    pub task: String,

    /// Maximum number of planning calls (overrides config)
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Wall-clock limit for the whole run in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Append the conversation transcript to this JSONL file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum BriefCommand {
    /// Create a new brief in the pending phase
    Create(CreateBriefArgs),

    /// Show progress, quality metrics and recent events
    Status {
        /// Brief id
        id: i64,
    },

    /// Move the brief to its next phase if its quality allows it
    Advance {
        /// Brief id
        id: i64,

        /// Skip quality thresholds for in_progress -> completed
        #[arg(long)]
        force: bool,
    },

    /// Mark the brief as failed
    Fail {
        /// Brief id
        id: i64,

        /// Why the brief is abandoned
        reason: String,
    },

    /// Plan a research cycle (quick, comprehensive or targeted)
    Cycle {
        /// Brief id
        id: i64,

        /// Cycle type
        cycle_type: String,
    },

    /// Extract factual claims from the brief's sources and verify them
    CheckClaims {
        /// Brief id
        id: i64,

        /// How many claims to verify: quick (5), standard (10) or thorough (20)
        #[arg(long, default_value = "standard")]
        depth: String,

        /// Check this text instead of the recorded sources
        #[arg(long)]
        content: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct CreateBriefArgs {
    /// Subject of the research
    #[arg(long)]
    pub topic: String,

    /// Perspective to take on the topic
    #[arg(long)]
    pub angle: Option<String>,

    /// Tone of the final piece
    #[arg(long, default_value = "informative")]
    pub tone: String,

    /// Target length in minutes (5-180)
    #[arg(long, default_value_t = 30)]
    pub target_length: i64,

    /// Free-form instructions for the researchers
    #[arg(long)]
    pub instructions: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum RecordCommand {
    /// Record a search query
    Query {
        /// Brief id
        brief_id: i64,

        /// Query text
        text: String,

        /// Query category (e.g. core_facts, timeline)
        #[arg(long)]
        category: Option<String>,
    },

    /// Mark a recorded query as completed
    CompleteQuery {
        /// Query id returned by `record query`
        query_id: i64,

        /// Number of search results the query returned
        #[arg(long, default_value_t = 0)]
        results: u32,
    },

    /// Record a source found while researching
    Item(RecordItemArgs),

    /// Record a factual claim
    Claim {
        /// Brief id
        brief_id: i64,

        /// Claim text
        text: String,

        /// Veracity score in [0, 1]
        #[arg(long, default_value_t = 0.5)]
        score: f64,

        /// Claim category
        #[arg(long)]
        category: Option<String>,

        /// The claim has been verified
        #[arg(long)]
        verified: bool,
    },
}

#[derive(Args, Debug)]
pub struct RecordItemArgs {
    /// Brief id
    pub brief_id: i64,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub url: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Extracted text content
    #[arg(long)]
    pub content: Option<String>,

    /// Source credibility in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    pub credibility: f64,

    /// The source has been verified
    #[arg(long)]
    pub verified: bool,
}
