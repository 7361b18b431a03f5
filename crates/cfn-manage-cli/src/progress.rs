//! Progress display while waiting on CloudFormation

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown on stderr for the duration of a blocking wait
pub struct WaitSpinner {
    bar: ProgressBar,
}

impl WaitSpinner {
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn finish(self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn abandon(self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}
