use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a request is in flight
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn spinner(description: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}") {
            bar.set_style(style);
        }
        bar.set_message(description.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        ProgressTracker { bar }
    }

    pub fn finish(&self, msg: &str) {
        self.bar.finish_with_message(msg.to_string());
    }

    pub fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}
