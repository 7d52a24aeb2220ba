//! Terminal UI: the single point of user interaction and output rendering.
//!
//! Commands never touch stdout, stderr, or the prompting library directly.
//! They receive a `&dyn Ui` and use its primitives:
//!
//! - [`Ui::input`], [`Ui::password`], [`Ui::select`], [`Ui::multi_select`]: prompts
//! - [`Ui::confirm`]: yes/no, short-circuited by auto-confirm
//! - [`Ui::print`]: format-aware log output
//! - [`Ui::spinner`]: progress feedback, a no-op in minimal mode
//!
//! [`TerminalUi`] is the production implementation. [`ScriptedUi`] replays
//! canned answers and captures output for tests.

mod ask;
mod output;
mod scripted;
mod spinner;
mod streams;
mod ui;

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::error::Result;

pub use self::ask::{InputOptions, MultiSelectOptions, PasswordOptions, SelectOptions};
pub use self::output::{Log, LogLevel, Message, RenderContext, Rendered};
pub use self::scripted::{Answer, PromptKind, PromptRecord, ScriptedUi};
pub use self::spinner::{Spinner, SpinnerOptions};
pub use self::streams::Streams;
pub use self::ui::TerminalUi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

/// Process-level UI settings, fixed for the lifetime of a UI instance.
#[derive(Debug, Clone, Default)]
pub struct UiConfig {
    pub auto_confirm: bool,
    pub disable_colors: bool,
    pub output_format: OutputFormat,
    pub output_target: Option<PathBuf>,
}

impl UiConfig {
    /// Minimal mode: no colors and no animation. Structured output must never carry ANSI codes.
    pub fn is_minimal(&self) -> bool {
        self.disable_colors || self.output_format == OutputFormat::Json
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            format: self.output_format,
            color: !self.is_minimal(),
        }
    }
}

/// Every interaction a command may have with the user.
pub trait Ui {
    fn auto_confirm(&self) -> bool;

    fn output_format(&self) -> OutputFormat;

    /// Single-line text prompt. The answer is written into `answer`.
    fn input(&self, answer: &mut String, options: &InputOptions) -> Result<()>;

    /// Masked prompt. Never displays a default.
    fn password(&self, answer: &mut String, options: &PasswordOptions) -> Result<()>;

    fn select(&self, answer: &mut String, options: &SelectOptions) -> Result<()>;

    fn multi_select(&self, answer: &mut Vec<String>, options: &MultiSelectOptions) -> Result<()>;

    /// Backend yes/no prompt, for implementors only. Commands call [`Ui::confirm`],
    /// which answers yes without reaching this when auto-confirm is set.
    #[doc(hidden)]
    fn ask_confirm(&self, message: &str) -> Result<bool>;

    fn confirm(&self, message: fmt::Arguments<'_>) -> Result<bool> {
        if self.auto_confirm() {
            return Ok(true);
        }
        self.ask_confirm(&message.to_string())
    }

    /// Render and write logs. Never fails; see the implementations for degradation rules.
    fn print(&self, logs: &[Log]);

    fn spinner(&self, message: &str, options: SpinnerOptions) -> Spinner;
}
