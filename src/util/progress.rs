//! Progress reporting for long-running generation runs.
//!
//! Rendering is an observable side effect only; nothing here affects
//! generated data. Bars draw to stderr and hide themselves when stderr
//! is not an interactive terminal.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{IsTerminal, stderr};
use tracing::info;

/// Whether progress bars should be drawn at all.
#[must_use]
pub fn should_show_progress() -> bool {
    stderr().is_terminal()
}

/// Progress reporter for record generation: a determinate bar plus a
/// log line at every reporting interval.
pub struct RecordProgress {
    bar: ProgressBar,
    interval: usize,
    emitted: usize,
}

impl RecordProgress {
    /// Create a reporter for `total` records, logging every `interval`.
    ///
    /// # Panics
    ///
    /// Panics if the progress bar template is invalid (it is a fixed
    /// literal, so this cannot happen at runtime).
    #[must_use]
    pub fn new(total: usize, interval: usize, message: &str) -> Self {
        let bar = ProgressBar::new(total as u64);
        if should_show_progress() {
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .expect("valid template")
                    .progress_chars("=>-"),
            );
            bar.set_message(message.to_string());
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self {
            bar,
            interval,
            emitted: 0,
        }
    }

    /// Record that `generated` records exist so far.
    pub fn update(&mut self, generated: usize) {
        self.bar.set_position(generated as u64);
        while generated / self.interval > self.emitted {
            self.emitted += 1;
            info!(
                generated = self.emitted * self.interval,
                total = self.bar.length().unwrap_or(0),
                "generation progress"
            );
        }
    }

    /// Finish and clear the bar.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
