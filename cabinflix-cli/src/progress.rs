//! Progress bar for title-by-title passes.

use cabinflix_import::ReconcileProgress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::commands::truncate_str;

/// Widest title shown next to the bar.
const MESSAGE_WIDTH: usize = 40;

/// Drives an `indicatif` bar from [`ReconcileProgress`] callbacks.
///
/// Phase and completion messages are logged with the bar suspended so they
/// don't interleave with its redraws.
pub(crate) struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    /// When `quiet` is true, the bar is hidden.
    pub(crate) fn new(quiet: bool) -> Self {
        let bar = ProgressBar::new(0);
        if quiet {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(
            ProgressStyle::with_template("  {bar:30.cyan/blue} {pos:>4}/{len:4} {msg}")
                .expect("static pattern")
                .progress_chars("=> "),
        );
        Self { bar }
    }
}

impl ReconcileProgress for BarProgress {
    fn on_title(&self, current: usize, total: usize, title: &str) {
        if self.bar.length() != Some(total as u64) {
            self.bar.set_length(total as u64);
        }
        self.bar.set_position(current as u64);
        self.bar.set_message(truncate_str(title, MESSAGE_WIDTH));
    }

    fn on_phase(&self, message: &str) {
        self.bar.suspend(|| log::info!("{}", message));
    }

    fn on_complete(&self, message: &str) {
        self.bar.finish_and_clear();
        log::info!("{}", message);
    }
}
