//! Progress reporting for research runs

use colored::Colorize;
use deepcast_application::LoopProgressNotifier;
use deepcast_domain::{LoopPhase, ToolCall};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress during a research run with indicatif bars
///
/// One bar tracks planning iterations against the loop bound; a spinner
/// below it shows the tool currently running.
pub struct ProgressReporter {
    multi: MultiProgress,
    loop_bar: Mutex<Option<ProgressBar>>,
    tool_spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            loop_bar: Mutex::new(None),
            tool_spinner: Mutex::new(None),
        }
    }

    fn loop_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("  {spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_loop_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.loop_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopProgressNotifier for ProgressReporter {
    fn on_planning_start(&self, iteration: usize, max_iterations: usize) {
        let Ok(mut guard) = self.loop_bar.lock() else {
            return;
        };
        let pb = guard.get_or_insert_with(|| {
            let pb = self.multi.add(ProgressBar::new(max_iterations as u64));
            pb.set_style(Self::loop_style());
            pb.set_prefix("Planning");
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });
        pb.set_position(iteration.saturating_sub(1) as u64);
        pb.set_message("thinking...");
    }

    fn on_planning_complete(&self, iteration: usize, tool_calls: usize) {
        self.with_loop_bar(|pb| {
            pb.set_position(iteration as u64);
            pb.set_message(format!("{} tool call(s) requested", tool_calls));
        });
    }

    fn on_tool_start(&self, call: &ToolCall) {
        let spinner = self.multi.add(ProgressBar::new_spinner());
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix(call.tool_name.clone());
        spinner.set_message("running...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        if let Ok(mut guard) = self.tool_spinner.lock() {
            *guard = Some(spinner);
        }
    }

    fn on_tool_complete(&self, call: &ToolCall, success: bool, duration_ms: u64) {
        let Some(spinner) = self.tool_spinner.lock().ok().and_then(|mut g| g.take()) else {
            return;
        };
        let status = if success {
            format!("{} {} ({}ms)", "v".green(), call.tool_name, duration_ms)
        } else {
            format!("{} {} ({}ms)", "x".red(), call.tool_name, duration_ms)
        };
        spinner.finish_and_clear();
        self.with_loop_bar(|pb| pb.set_message(status));
    }

    fn on_synthesis_start(&self) {
        self.with_loop_bar(|pb| pb.set_message("synthesizing answer..."));
    }

    fn on_finished(&self, phase: LoopPhase) {
        if let Some(pb) = self.loop_bar.lock().ok().and_then(|mut g| g.take()) {
            let message = match phase {
                LoopPhase::Done => "complete!".green().to_string(),
                LoopPhase::BoundExceeded => "iteration limit reached".yellow().to_string(),
                other => other.as_str().red().to_string(),
            };
            pb.finish_with_message(message);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl LoopProgressNotifier for SimpleProgress {
    fn on_planning_start(&self, iteration: usize, max_iterations: usize) {
        println!(
            "{} {} ({}/{})",
            "->".cyan(),
            "Planning".bold(),
            iteration,
            max_iterations
        );
    }

    fn on_tool_start(&self, call: &ToolCall) {
        println!("  {} {}", "->".cyan(), call.tool_name);
    }

    fn on_tool_complete(&self, call: &ToolCall, success: bool, duration_ms: u64) {
        if success {
            println!("  {} {} ({}ms)", "v".green(), call.tool_name, duration_ms);
        } else {
            println!("  {} {} (failed)", "x".red(), call.tool_name);
        }
    }

    fn on_synthesis_start(&self) {
        println!("{} {}", "->".cyan(), "Synthesizing answer".bold());
    }

    fn on_finished(&self, _phase: LoopPhase) {
        println!();
    }
}
