//! Terminal output for the record and interactive commands
//!
//! Status lines go to stderr. Stdout only ever carries the saved asset path
//! and `config get`/`config list` values.

use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::session::{SessionError, SessionPhase, SessionState};

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Writes session feedback to the terminal
pub struct Presenter {
    activity: Option<ProgressBar>,
}

impl Presenter {
    pub fn new() -> Self {
        Self { activity: None }
    }

    /// Show an open-ended activity such as playback
    pub fn begin_activity(&mut self, message: &str) {
        let style = ProgressStyle::default_spinner()
            .tick_chars(TICK_CHARS)
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        self.replace_activity(ProgressBar::new_spinner().with_style(style), message);
    }

    /// Show a bar that fills over a timed recording of `total_ms`
    pub fn begin_recording(&mut self, total_ms: u64) {
        let style = ProgressStyle::default_bar()
            .tick_chars(TICK_CHARS)
            .template("{spinner:.red} Recording [{bar:20.cyan/white}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█░ ");
        let bar = ProgressBar::new(total_ms).with_style(style);
        self.replace_activity(bar, &Self::format_seconds(0, total_ms));
    }

    /// Advance the recording bar
    pub fn recording_progress(&self, elapsed_ms: u64) {
        if let Some(bar) = &self.activity {
            let total_ms = bar.length().unwrap_or(elapsed_ms);
            let elapsed_ms = elapsed_ms.min(total_ms);
            bar.set_position(elapsed_ms);
            bar.set_message(Self::format_seconds(elapsed_ms, total_ms));
        }
    }

    /// Finish the current activity with a success mark
    pub fn activity_done(&mut self, message: &str) {
        if let Some(bar) = self.activity.take() {
            bar.finish_and_clear();
        }
        self.success(message);
    }

    /// Finish the current activity with a failure mark
    pub fn activity_failed(&mut self, message: &str) {
        if let Some(bar) = self.activity.take() {
            bar.finish_and_clear();
        }
        self.error(message);
    }

    /// Drop the current activity without a status line
    pub fn clear_activity(&mut self) {
        if let Some(bar) = self.activity.take() {
            bar.finish_and_clear();
        }
    }

    fn replace_activity(&mut self, bar: ProgressBar, message: &str) {
        self.clear_activity();
        bar.set_message(message.to_string());
        bar.enable_steady_tick(TICK_INTERVAL);
        self.activity = Some(bar);
    }

    fn format_seconds(elapsed_ms: u64, total_ms: u64) -> String {
        format!("{:>3}s / {}s", elapsed_ms / 1000, total_ms / 1000)
    }

    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Write a machine-usable line to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print the session phase and the latest error, if any
    pub fn session_status(&self, state: &SessionState, last_error: Option<&SessionError>) {
        eprintln!("{} {}", "●".cyan(), Self::format_phase(state.phase()));
        if let Some(error) = last_error {
            eprintln!("  {} {}", "✗".red(), error);
        }
    }

    fn format_phase(phase: SessionPhase) -> ColoredString {
        match phase {
            SessionPhase::Idle => "Idle".normal(),
            SessionPhase::Recording => "Recording".red().bold(),
            SessionPhase::Ready => "Ready".green(),
            SessionPhase::Playing => "Playing".cyan(),
        }
    }

    /// Print the interactive controls
    pub fn controls(&self) {
        eprintln!("{}", "Controls:".bold());
        eprintln!("  {}  start / stop recording", "r".cyan());
        eprintln!("  {}  play / stop playback", "p".cyan());
        eprintln!("  {}  share the recording", "s".cyan());
        eprintln!("  {}  show this help", "h".cyan());
        eprintln!("  {}  quit", "q".cyan());
    }

    /// Print a config entry
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
