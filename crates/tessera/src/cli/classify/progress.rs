//! Terminal progress bar as a dispatch progress sink.

use indicatif::{ProgressBar, ProgressStyle};
use tessera_core::ProgressSink;

/// Drives an `indicatif` bar from dispatcher progress signals.
pub struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    /// Create a visible bar, or a hidden one when `enabled` is false.
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##-"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for BarSink {
    fn reset(&self, total: usize, message: &str) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message(message.to_string());
    }

    fn advance(&self) {
        self.bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bar_tracks_position() {
        let sink = BarSink::new(false);
        sink.reset(3, "three");
        sink.advance();
        sink.advance();
        assert_eq!(sink.bar.length(), Some(3));
        assert_eq!(sink.bar.position(), 2);

        sink.reset(5, "five");
        assert_eq!(sink.bar.position(), 0);
    }
}
