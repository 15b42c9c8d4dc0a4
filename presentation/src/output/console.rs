//! Console output formatter for research runs and briefs

use colored::Colorize;
use deepcast_application::{AdvanceResult, BriefStatus, ClaimCheckReport, CycleStart};
use deepcast_domain::research::{QualityMetrics, QueryPerformance};
use deepcast_domain::{BriefPhase, LoopOutcome, Message, PhaseTransition, ResearchBrief};
use serde::Serialize;
use serde_json::json;

/// Formats use case results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a finished research run
    pub fn format_outcome(task: &str, outcome: &LoopOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Research Results"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Task:".cyan().bold(), task));

        let transcript = outcome.transcript();
        output.push_str(&format!(
            "{} {} tool calls, {} messages\n",
            "Activity:".cyan().bold(),
            transcript.tool_call_count(),
            transcript.len()
        ));

        let tools = Self::tools_used(outcome);
        if !tools.is_empty() {
            output.push_str(&format!("{} {}\n", "Tools:".cyan().bold(), tools.join(", ")));
        }

        match outcome {
            LoopOutcome::Completed { answer, .. } => {
                output.push_str(&Self::section_header("Answer"));
                output.push_str(&format!("\n{}\n", answer));
            }
            LoopOutcome::BoundExceeded { answer, .. } => {
                output.push_str(&Self::section_header("Answer (partial)"));
                output.push_str(&format!(
                    "{}\n\n{}\n",
                    "Iteration limit reached; answer is based on the research gathered so far."
                        .yellow(),
                    answer
                ));
            }
            LoopOutcome::Aborted { reason, .. } => {
                output.push_str(&Self::section_header("Aborted"));
                output.push_str(&format!("\n{} {}\n", "x".red(), reason));
                if let Some(text) = transcript.last_assistant_text() {
                    output.push_str(&format!(
                        "\n{}\n{}\n",
                        "Last model output:".dimmed(),
                        Self::indent(text, "  ")
                    ));
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format a finished research run as JSON
    pub fn format_outcome_json(task: &str, outcome: &LoopOutcome) -> String {
        let abort_reason = match outcome {
            LoopOutcome::Aborted { reason, .. } => Some(reason.to_string()),
            _ => None,
        };
        let value = json!({
            "task": task,
            "phase": outcome.phase().as_str(),
            "bound_exceeded": outcome.bound_exceeded(),
            "answer": outcome.answer(),
            "abort_reason": abort_reason,
            "tool_calls": outcome.transcript().tool_call_count(),
            "transcript": outcome.transcript().messages(),
        });
        Self::format_json(&value)
    }

    /// Format a newly created brief
    pub fn format_brief(brief: &ResearchBrief) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} Created brief {} for {}\n",
            "v".green(),
            format!("#{}", brief.id).bold(),
            brief.topic.bold()
        ));
        if let Some(angle) = &brief.angle {
            output.push_str(&format!("  {} {}\n", "Angle:".dimmed(), angle));
        }
        output.push_str(&format!(
            "  {} {}, {} min\n",
            "Tone:".dimmed(),
            brief.tone,
            brief.target_length_min
        ));
        output.push_str(&format!("  {} {}\n", "Status:".dimmed(), Self::phase(brief.status)));
        output
    }

    /// Format a brief status report
    pub fn format_status(status: &BriefStatus) -> String {
        let brief = &status.brief;
        let progress = &status.progress;
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Brief #{}", brief.id)));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), brief.topic));
        if let Some(angle) = &brief.angle {
            output.push_str(&format!("{} {}\n", "Angle:".cyan().bold(), angle));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            Self::phase(brief.status)
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Updated:".cyan().bold(),
            brief.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&Self::section_header("Progress"));
        output.push_str(&format!(
            "  Queries: {}/{} completed\n",
            progress.completed_queries, progress.total_queries
        ));
        output.push_str(&format!(
            "  Items:   {}/{} verified\n",
            progress.verified_items, progress.total_items
        ));
        output.push_str(&format!(
            "  Claims:  {}/{} verified\n",
            progress.verified_claims, progress.total_claims
        ));

        output.push_str(&Self::section_header("Quality"));
        output.push_str(&Self::metrics(&status.metrics));

        let coverage = &status.coverage;
        output.push_str(&Self::section_header("Query Coverage"));
        output.push_str(&format!(
            "  Score: {:.1}% ({})\n",
            coverage.coverage_score, coverage.balance
        ));
        for (category, count) in &coverage.category_distribution {
            output.push_str(&format!("  * {}: {}\n", category, count));
        }

        output.push_str(&Self::section_header("Query Performance"));
        output.push_str(&Self::performance(&status.performance));

        if !status.recent_events.is_empty() {
            output.push_str(&Self::section_header("Recent Events"));
            for event in &status.recent_events {
                output.push_str(&format!(
                    "  {} {} {}\n",
                    event.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
                    event.event_type.yellow(),
                    event.message
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format the result of a phase advance attempt
    pub fn format_advance(result: &AdvanceResult) -> String {
        let mut output = String::new();
        match result {
            AdvanceResult::Advanced {
                brief_id,
                old_phase,
                new_phase,
                requirements_met,
                next_actions,
                metrics,
            } => {
                output.push_str(&format!(
                    "{} Brief #{} advanced: {} -> {}\n",
                    "v".green(),
                    brief_id,
                    Self::phase(*old_phase),
                    Self::phase(*new_phase)
                ));
                for requirement in requirements_met {
                    output.push_str(&format!("  {} {}\n", "v".green(), requirement));
                }
                if !next_actions.is_empty() {
                    output.push_str(&format!("\n{}\n", "Next Actions:".cyan().bold()));
                    for action in next_actions {
                        output.push_str(&format!("  * {}\n", action));
                    }
                }
                output.push_str(&format!("\n{}\n", "Quality:".cyan().bold()));
                output.push_str(&Self::metrics(metrics));
            }
            AdvanceResult::NotReady {
                brief_id,
                current_phase,
                requirements_met,
                metrics,
                ..
            } => {
                if current_phase.is_terminal() {
                    output.push_str(&format!(
                        "{} Brief #{} is {}; nothing to advance\n",
                        "-".dimmed(),
                        brief_id,
                        Self::phase(*current_phase)
                    ));
                } else {
                    output.push_str(&format!(
                        "{} Brief #{} stays {}\n",
                        "x".yellow(),
                        brief_id,
                        Self::phase(*current_phase)
                    ));
                    for requirement in requirements_met {
                        output.push_str(&format!("  {} {}\n", "x".red(), requirement));
                    }
                }
                output.push_str(&format!("\n{}\n", "Quality:".cyan().bold()));
                output.push_str(&Self::metrics(metrics));
            }
        }
        output
    }

    /// Format an externally driven phase change (e.g. a failure)
    pub fn format_transition(transition: &PhaseTransition) -> String {
        let mut output = format!(
            "{} Brief #{} moved: {} -> {}\n",
            "x".red(),
            transition.brief_id,
            Self::phase(transition.old_phase),
            Self::phase(transition.new_phase)
        );
        if let Some(reason) = &transition.reason {
            output.push_str(&format!("  {} {}\n", "Reason:".dimmed(), reason));
        }
        output
    }

    /// Format a planned research cycle
    pub fn format_cycle(start: &CycleStart) -> String {
        let plan = &start.plan;
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} cycle for brief #{} ({} depth, ~{} min)\n",
            "->".cyan(),
            plan.cycle_type.as_str().bold(),
            plan.brief_id,
            plan.config.depth,
            plan.estimated_duration_min
        ));
        for (i, step) in plan.steps.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, step));
        }
        if let Some(change) = &start.phase_change
            && change.phase_changed()
        {
            output.push_str(&format!(
                "\n{} Brief moved to {}\n",
                "v".green(),
                Self::phase(change.phase())
            ));
        }
        output
    }

    /// Format a fact-check report
    pub fn format_claim_check(report: &ClaimCheckReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Fact Check: Brief #{}", report.brief_id)));
        output.push('\n');
        output.push_str(&format!(
            "{} {} extracted, {} checked ({} depth)\n",
            "Claims:".cyan().bold(),
            report.extracted,
            report.verdicts.len(),
            report.depth
        ));
        output.push_str(&format!(
            "{} {} verified, {} disputed, {} unverified, {} high-risk\n",
            "Verdicts:".cyan().bold(),
            report.verified,
            report.disputed,
            report.unverified,
            report.high_risk
        ));
        output.push_str(&format!(
            "{} {:.2}\n",
            "Confidence:".cyan().bold(),
            report.average_confidence
        ));

        if !report.verdicts.is_empty() {
            output.push_str(&Self::section_header("Claims"));
            for verdict in &report.verdicts {
                let mark = if verdict.is_verified() {
                    "v".green()
                } else if verdict.is_high_risk() {
                    "x".red()
                } else {
                    "?".yellow()
                };
                output.push_str(&format!(
                    "  {} {} {}\n",
                    mark,
                    verdict.claim.claim,
                    format!("({}, {:.2})", verdict.verification_status, verdict.confidence_score)
                        .dimmed()
                ));
            }
        }

        if !report.recommendations.is_empty() {
            output.push_str(&Self::section_header("Recommendations"));
            for recommendation in &report.recommendations {
                output.push_str(&format!("  * {}\n", recommendation));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format any serializable result as pretty JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn tools_used(outcome: &LoopOutcome) -> Vec<&str> {
        let mut names: Vec<&str> = outcome
            .transcript()
            .messages()
            .iter()
            .filter_map(|message| match message {
                Message::ToolCallRequest(call) => Some(call.tool_name.as_str()),
                _ => None,
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    fn metrics(metrics: &QualityMetrics) -> String {
        format!(
            "  Completion:  {:.1}%\n  Verified:    {} items, {}/{} claims\n  Confidence:  {:.2}\n  Credibility: {:.2}\n  Reliability: {}\n  Quality:     {}\n",
            metrics.completion_percentage,
            metrics.verified_items,
            metrics.verified_claims,
            metrics.total_claims,
            metrics.average_confidence,
            metrics.average_credibility,
            metrics.content_reliability,
            metrics.research_quality
        )
    }

    fn performance(performance: &QueryPerformance) -> String {
        let mut output = format!(
            "  Results: {} over {} completed queries (avg {:.1})\n",
            performance.total_results, performance.completed_queries, performance.average_results
        );
        for recommendation in &performance.recommendations {
            output.push_str(&format!("  * {}\n", recommendation));
        }
        output
    }

    fn phase(phase: BriefPhase) -> String {
        let name = phase.display_name();
        match phase {
            BriefPhase::Pending => name.dimmed().to_string(),
            BriefPhase::InProgress => name.yellow().to_string(),
            BriefPhase::Completed => name.green().bold().to_string(),
            BriefPhase::Failed => name.red().bold().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
