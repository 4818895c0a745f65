// Toast notifications: transient success and error lines on the terminal.
// While a request spinner is ticking, toasts are printed with the spinner
// suspended so the two never share a line.

use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Sink for the one-line messages the screens raise.
pub trait Notifier {
    fn notify(&self, kind: ToastKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(ToastKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(ToastKind::Error, message);
    }
}

/// Prints toasts to stdout, between prompts, and owns the spinner shown
/// while a request is in flight.
#[derive(Default)]
pub struct TerminalNotifier {
    active: RefCell<Option<ProgressBar>>,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` behind a spinner labelled `message`.
    pub fn busy<T>(&self, message: &'static str, task: impl FnOnce() -> T) -> T {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.while_showing(pb, task)
    }

    fn while_showing<T>(&self, pb: ProgressBar, task: impl FnOnce() -> T) -> T {
        *self.active.borrow_mut() = Some(pb.clone());
        let out = task();
        *self.active.borrow_mut() = None;
        pb.finish_and_clear();
        out
    }
}

fn toast_line(kind: ToastKind, message: &str) -> String {
    match kind {
        ToastKind::Success => format!("{} {}", "✓".green().bold(), message.green()),
        ToastKind::Error => format!("{} {}", "✕".red().bold(), message.red()),
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, kind: ToastKind, message: &str) {
        let line = toast_line(kind, message);
        match self.active.borrow().as_ref() {
            Some(pb) => pb.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}
