use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::cell::Cell;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SpinnerOptions {
    /// Shown in place of the spinner once it stops. Cleared when `None`.
    pub final_message: Option<String>,
    pub tick_interval: Duration,
}

impl Default for SpinnerOptions {
    fn default() -> Self {
        Self {
            final_message: None,
            tick_interval: Duration::from_millis(80),
        }
    }
}

impl SpinnerOptions {
    pub fn with_final_message(mut self, message: impl Into<String>) -> Self {
        self.final_message = Some(message.into());
        self
    }
}

/// Progress feedback for a long-running step.
///
/// The animation is stopped by [`Spinner::stop`], at the end of [`Spinner::run`],
/// or on drop, whichever comes first. A no-op spinner accepts every call and draws nothing.
pub struct Spinner {
    bar: Option<ProgressBar>,
    options: SpinnerOptions,
    running: Cell<bool>,
}

impl Spinner {
    pub fn animated(message: &str, options: SpinnerOptions, target: ProgressDrawTarget) -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");

        let bar = ProgressBar::with_draw_target(None, target);
        bar.set_style(style);
        bar.set_message(message.to_string());

        Self {
            bar: Some(bar),
            options,
            running: Cell::new(false),
        }
    }

    pub fn noop() -> Self {
        Self {
            bar: None,
            options: SpinnerOptions::default(),
            running: Cell::new(false),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.bar.is_none()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn start(&self) {
        if self.running.replace(true) {
            return;
        }
        if let Some(bar) = &self.bar {
            bar.enable_steady_tick(self.options.tick_interval);
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let Some(bar) = &self.bar {
            match &self.options.final_message {
                Some(message) => bar.finish_with_message(message.clone()),
                None => bar.finish_and_clear(),
            }
        }
    }

    /// Run `f` with the spinner animating, stopping it afterwards.
    pub fn run<T>(self, f: impl FnOnce(&Spinner) -> T) -> T {
        self.start();
        let result = f(&self);
        self.stop();
        result
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}
