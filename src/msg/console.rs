//! Progress bar binding for command line front ends.

use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use indicatif::{ProgressDrawTarget, ProgressStyle};

use super::ui::ProgressBar;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len}";
const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] working...";

/// A [`ProgressBar`] drawn on stderr with [`indicatif`].
///
/// It is hidden until [`show`](ProgressBar::show) is called. A `(0, 0)` range
/// turns it into a spinner.
pub struct ConsoleProgressBar {
    bar: indicatif::ProgressBar,
    min: AtomicI32,
}

impl ConsoleProgressBar {
    pub fn new() -> Self {
        let bar = indicatif::ProgressBar::hidden();
        bar.set_style(bar_style());
        bar.set_length(100);
        Self {
            bar,
            min: AtomicI32::new(0),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }
}

impl std::fmt::Debug for ConsoleProgressBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgressBar")
            .field("position", &self.position())
            .field("length", &self.length())
            .finish()
    }
}

impl Default for ConsoleProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template(SPINNER_TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_spinner())
}

impl ProgressBar for ConsoleProgressBar {
    fn show(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
    }

    fn hide(&self) {
        self.bar.disable_steady_tick();
        self.bar.set_draw_target(ProgressDrawTarget::hidden());
    }

    fn set_range(&self, min: i32, max: i32) {
        if min == 0 && max == 0 {
            self.bar.set_style(spinner_style());
            self.bar.enable_steady_tick(Duration::from_millis(100));
            return;
        }
        self.bar.disable_steady_tick();
        self.bar.set_style(bar_style());
        self.min.store(min, Ordering::SeqCst);
        self.bar.set_length(u64::try_from(max.saturating_sub(min)).unwrap_or(0));
    }

    fn set_value(&self, value: i32) {
        let min = self.min.load(Ordering::SeqCst);
        self.bar
            .set_position(u64::try_from(value.saturating_sub(min)).unwrap_or(0));
    }
}
