//! CLI entrypoint for deepcast
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use deepcast_application::{
    BriefManager, ClaimChecker, CreateBriefInput, LoopProgressNotifier, NoLoopProgress,
    RunResearchInput, RunResearchUseCase,
};
use deepcast_domain::{LoopOutcome, NewClaim, NewResearchItem, VerificationDepth};
use deepcast_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiGateway, Severity,
    SqliteBriefRepository, StrictFunctionSchema, research_tools,
};
use deepcast_presentation::{
    BriefCommand, Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter, RecordCommand,
    ResearchArgs, SimpleProgress,
};
use serde::Serialize;
use serde_json::json;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    info!("Starting deepcast");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    check_config(&config)?;

    let output = cli.output;
    let Some(command) = cli.command else {
        bail!("No command given. Run `deepcast --help` for usage.");
    };

    match command {
        Command::Research(args) => research(&config, args, output, cli.quiet).await,
        Command::Brief(command) => brief(&config, command, output).await,
        Command::Record(command) => record(&config, command, output),
    }
}

fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "deepcast.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(EnvFilter::new(level))
                .with(console)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(EnvFilter::new(level))
                .with(console)
                .init();
            None
        }
    }
}

/// Print config warnings and refuse to run on errors.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Warning => warn!("Config: {}", issue.message),
            Severity::Error => eprintln!("Config error: {}", issue.message),
        }
    }
    if config.has_errors() {
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }
    Ok(())
}

async fn research(
    config: &FileConfig,
    args: ResearchArgs,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let mut params = config.loop_params();
    if let Some(max) = args.max_iterations {
        if max == 0 {
            bail!("--max-iterations must be greater than 0");
        }
        params = params.with_max_iterations(max);
    }
    if let Some(seconds) = args.timeout {
        params = params.with_timeout_seconds(seconds);
    }

    // === Dependency Injection ===
    let gateway = Arc::new(OpenAiGateway::from_env(config.model_tiers())?);
    let brave_api_key = std::env::var("BRAVE_API_KEY").ok();
    let tools = Arc::new(research_tools(&config.tools, brave_api_key.as_deref())?);
    info!("Registered {} research tools", tools.len());

    let mut use_case = RunResearchUseCase::new(gateway, tools, Arc::new(StrictFunctionSchema));

    let log_path = args
        .conversation_log
        .or_else(|| config.logging.conversation_log.clone());
    if let Some(path) = log_path {
        match JsonlConversationLogger::new(&path) {
            Some(logger) => {
                info!(
                    "Logging conversation to {} (run {})",
                    logger.path().display(),
                    logger.run_id()
                );
                use_case = use_case.with_conversation_logger(Arc::new(logger));
            }
            None => warn!("Could not open conversation log at {}", path.display()),
        }
    }

    let cancellation = CancellationToken::new();
    let ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping after the current step");
            ctrl_c.cancel();
        }
    });
    use_case = use_case.with_cancellation(cancellation);

    let progress: Box<dyn LoopProgressNotifier> = if quiet || output == OutputFormat::Json {
        Box::new(NoLoopProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let input = RunResearchInput::new(args.task.clone(), params);
    let outcome = use_case.execute(input, progress.as_ref()).await?;

    let rendered = match output {
        OutputFormat::Text => ConsoleFormatter::format_outcome(&args.task, &outcome),
        OutputFormat::Json => ConsoleFormatter::format_outcome_json(&args.task, &outcome),
    };
    println!("{}", rendered);

    if let LoopOutcome::Aborted { reason, .. } = &outcome {
        bail!("Research aborted: {}", reason);
    }
    Ok(())
}

fn brief_repository(config: &FileConfig) -> Result<Arc<SqliteBriefRepository>> {
    let repository = SqliteBriefRepository::open(&config.storage.database)?;
    info!("Using brief database {}", config.storage.database.display());
    Ok(Arc::new(repository))
}

fn brief_manager(config: &FileConfig) -> Result<BriefManager> {
    Ok(BriefManager::new(
        brief_repository(config)?,
        config.research_params(),
    ))
}

async fn brief(config: &FileConfig, command: BriefCommand, output: OutputFormat) -> Result<()> {
    let repository = brief_repository(config)?;
    let manager = BriefManager::new(repository.clone(), config.research_params());

    match command {
        BriefCommand::Create(args) => {
            let brief = manager.create(CreateBriefInput {
                topic: args.topic,
                angle: args.angle,
                tone: args.tone,
                target_length_min: args.target_length,
                additional_instructions: args.instructions,
            })?;
            emit(output, &brief, ConsoleFormatter::format_brief);
        }
        BriefCommand::Status { id } => {
            let status = manager.status(id)?;
            emit(output, &status, ConsoleFormatter::format_status);
        }
        BriefCommand::Advance { id, force } => {
            let result = manager.phase_controller().advance(id, force)?;
            emit(output, &result, ConsoleFormatter::format_advance);
        }
        BriefCommand::Fail { id, reason } => {
            let transition = manager.phase_controller().fail(id, &reason)?;
            emit(output, &transition, ConsoleFormatter::format_transition);
        }
        BriefCommand::Cycle { id, cycle_type } => {
            let start = manager.start_cycle(id, &cycle_type)?;
            emit(output, &start, ConsoleFormatter::format_cycle);
        }
        BriefCommand::CheckClaims { id, depth, content } => {
            let depth: VerificationDepth = depth.parse()?;
            let gateway = Arc::new(OpenAiGateway::from_env(config.model_tiers())?);
            let report = ClaimChecker::new(gateway, repository)
                .check(id, depth, content)
                .await?;
            emit(output, &report, ConsoleFormatter::format_claim_check);
        }
    }
    Ok(())
}

fn record(config: &FileConfig, command: RecordCommand, output: OutputFormat) -> Result<()> {
    let manager = brief_manager(config)?;

    let (kind, id) = match command {
        RecordCommand::Query {
            brief_id,
            text,
            category,
        } => (
            "query",
            manager.record_query(brief_id, &text, category.as_deref())?,
        ),
        RecordCommand::CompleteQuery { query_id, results } => {
            manager.complete_query(query_id, results)?;
            ("completed query", query_id)
        }
        RecordCommand::Item(args) => {
            let mut item = NewResearchItem::new(args.title, args.url)
                .with_credibility(args.credibility);
            item.description = args.description;
            if let Some(content) = args.content {
                item = item.with_content(content);
            }
            if args.verified {
                item = item.verified();
            }
            ("item", manager.record_item(args.brief_id, &item)?)
        }
        RecordCommand::Claim {
            brief_id,
            text,
            score,
            category,
            verified,
        } => {
            let mut claim = NewClaim::new(text, score);
            if let Some(category) = category {
                claim = claim.with_category(category);
            }
            if verified {
                claim = claim.verified();
            }
            ("claim", manager.record_claim(brief_id, &claim)?)
        }
    };

    emit(output, &json!({ "recorded": kind, "id": id }), |_| {
        format!("v Recorded {} #{}\n", kind, id)
    });
    Ok(())
}

fn emit<T: Serialize>(output: OutputFormat, value: &T, text: impl FnOnce(&T) -> String) {
    match output {
        OutputFormat::Text => print!("{}", text(value)),
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(value)),
    }
}
