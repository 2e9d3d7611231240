//! Progress bar utilities using indicatif
//!
//! Reading a long run of rotated logs can take a moment on busy hosts; the
//! bar is drawn on stderr so stdout stays a clean report.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};

/// Progress bar wrapper for displaying read status
pub struct ProgressBar {
    bar: IndicatifBar,
}

impl ProgressBar {
    /// Create a new progress bar with known total (bytes)
    pub fn new(total: usize, label: &str) -> Self {
        let bar = IndicatifBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {percent:>3}% ({bytes}/{total_bytes}) {eta}")
        {
            bar.set_style(style.progress_chars("█░"));
        }
        bar.set_message(label.to_string());

        Self { bar }
    }

    /// Create a new progress bar with unknown total (spinner mode)
    pub fn new_spinner(label: &str) -> Self {
        let bar = IndicatifBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg} {spinner} {bytes}") {
            bar.set_style(style);
        }
        bar.set_message(label.to_string());

        Self { bar }
    }

    /// Update progress
    pub fn update(&self, current: usize) {
        self.bar.set_position(current as u64);
    }

    /// Finish with custom message
    pub fn finish_with_message(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}
