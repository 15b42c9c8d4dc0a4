//! Presentation layer for deepcast
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    BriefCommand, Cli, Command, CreateBriefArgs, OutputFormat, RecordCommand, RecordItemArgs,
    ResearchArgs,
};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
