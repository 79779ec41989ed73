use crate::importer::{ImportProgress, ImportSummary};
use crate::ui::theme;
use crate::ui::Icons;
use indicatif::{HumanDuration, ProgressBar};
use owo_colors::OwoColorize;
use std::thread;
use std::time::Duration;

/// Renders [`ImportProgress`] events from a background thread
pub struct ImportProgressBar {
    bar: ProgressBar,
    handle: Option<thread::JoinHandle<()>>,
}

impl ImportProgressBar {
    pub fn new() -> (Self, crossbeam::channel::Sender<ImportProgress>) {
        let (tx, rx) = crossbeam::channel::unbounded::<ImportProgress>();

        let bar = if console::Term::stdout().is_term() {
            ProgressBar::new_spinner().with_message("Importing cognate pairs")
        } else {
            ProgressBar::hidden()
        };

        let bar_clone = bar.clone();
        let handle = thread::spawn(move || {
            for msg in rx {
                match msg {
                    ImportProgress::Started => {
                        bar_clone.enable_steady_tick(Duration::from_millis(100));
                    }
                    ImportProgress::Committed(records) => {
                        bar_clone.set_message(format!("Imported {} pairs", records));
                    }
                    ImportProgress::Finished(summary) => {
                        bar_clone.finish_with_message(format!("Imported {} pairs", summary.records));
                    }
                }
            }
        });

        (
            Self {
                bar,
                handle: Some(handle),
            },
            tx,
        )
    }

    /// Wait for the renderer to drain (all senders must be dropped first)
    /// and print a summary line.
    pub fn finish_with_summary(mut self, duration: Duration, summary: &ImportSummary) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.bar.finish_and_clear();

        println!(
            "{} {}",
            Icons::CHECK.style(theme().success.clone()),
            format!("Complete in {}", HumanDuration(duration)).style(theme().success.clone())
        );
        println!(
            "  {} {} pairs  {} {} skipped",
            Icons::LINK.style(theme().info.clone()),
            summary.records,
            Icons::WARN.style(theme().info.clone()),
            summary.skipped
        );
    }
}

pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_message(message.to_string());
        if console::Term::stdout().is_term() {
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        Self { pb }
    }

    pub fn finish_with_message(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}
