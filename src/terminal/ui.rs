use console::Term;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};
use indicatif::ProgressDrawTarget;
use std::cell::RefCell;
use std::io::Write;

use super::{
    InputOptions, Log, MultiSelectOptions, OutputFormat, PasswordOptions, SelectOptions, Spinner,
    SpinnerOptions, Streams, Ui, UiConfig,
};
use crate::error::{Error, Result};

/// The terminal-backed UI used by the binary.
///
/// Prompts draw on stderr and read from the controlling terminal. Normal logs go
/// to the output stream, error logs to the error stream.
pub struct TerminalUi {
    config: UiConfig,
    interactive: bool,
    out: RefCell<Box<dyn Write>>,
    err: RefCell<Box<dyn Write>>,
    fallback: Box<dyn Fn(&str)>,
}

impl TerminalUi {
    pub fn new(config: UiConfig, streams: Streams) -> Self {
        let interactive = streams.is_interactive();
        Self {
            config,
            interactive,
            out: RefCell::new(streams.out),
            err: RefCell::new(streams.err),
            fallback: Box::new(|text| log::error!("{}", text)),
        }
    }

    /// Replace the sink that receives output the streams failed to take.
    pub fn with_fallback(mut self, fallback: impl Fn(&str) + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn is_minimal(&self) -> bool {
        self.config.is_minimal()
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn ensure_interactive(&self, prompt: &str) -> Result<()> {
        if self.interactive {
            Ok(())
        } else {
            Err(Error::prompt_non_interactive(prompt))
        }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.is_minimal() {
            Box::new(SimpleTheme)
        } else {
            Box::new(ColorfulTheme::default())
        }
    }
}

fn prompt_error(prompt: &str) -> impl FnOnce(dialoguer::Error) -> Error + '_ {
    move |e| Error::prompt_failed(prompt, e.to_string())
}

impl Ui for TerminalUi {
    fn auto_confirm(&self) -> bool {
        self.config.auto_confirm
    }

    fn output_format(&self) -> OutputFormat {
        self.config.output_format
    }

    fn input(&self, answer: &mut String, options: &InputOptions) -> Result<()> {
        self.ensure_interactive(&options.message)?;
        let theme = self.theme();

        let mut prompt = Input::<String>::with_theme(theme.as_ref()).with_prompt(&options.message);
        if let Some(default) = &options.default {
            prompt = prompt.default(default.clone());
        }

        *answer = prompt
            .interact_text_on(&Term::stderr())
            .map_err(prompt_error(&options.message))?;
        Ok(())
    }

    fn password(&self, answer: &mut String, options: &PasswordOptions) -> Result<()> {
        self.ensure_interactive(&options.message)?;
        let theme = self.theme();

        *answer = Password::with_theme(theme.as_ref())
            .with_prompt(&options.message)
            .interact_on(&Term::stderr())
            .map_err(prompt_error(&options.message))?;
        Ok(())
    }

    fn select(&self, answer: &mut String, options: &SelectOptions) -> Result<()> {
        self.ensure_interactive(&options.message)?;
        let theme = self.theme();

        let mut prompt = Select::with_theme(theme.as_ref())
            .with_prompt(&options.message)
            .items(&options.options);
        if let Some(index) = options.default_index() {
            prompt = prompt.default(index);
        }

        let index = prompt
            .interact_on(&Term::stderr())
            .map_err(prompt_error(&options.message))?;
        *answer = options.options.get(index).cloned().ok_or_else(|| {
            Error::prompt_failed(&options.message, format!("no option at index {}", index))
        })?;
        Ok(())
    }

    fn multi_select(&self, answer: &mut Vec<String>, options: &MultiSelectOptions) -> Result<()> {
        self.ensure_interactive(&options.message)?;
        let theme = self.theme();

        let indices = MultiSelect::with_theme(theme.as_ref())
            .with_prompt(&options.message)
            .items(&options.options)
            .defaults(&options.checked())
            .interact_on(&Term::stderr())
            .map_err(prompt_error(&options.message))?;

        *answer = indices
            .into_iter()
            .filter_map(|i| options.options.get(i).cloned())
            .collect();
        Ok(())
    }

    fn ask_confirm(&self, message: &str) -> Result<bool> {
        self.ensure_interactive(message)?;
        let theme = self.theme();

        Confirm::with_theme(theme.as_ref())
            .with_prompt(message)
            .default(false)
            .interact_on(&Term::stderr())
            .map_err(prompt_error(message))
    }

    fn print(&self, logs: &[Log]) {
        let ctx = self.config.render_context();

        for log in logs {
            let rendered = log.render_for_print(&ctx);
            let stream = if rendered.level.is_error() {
                &self.err
            } else {
                &self.out
            };

            let mut stream = stream.borrow_mut();
            let written = writeln!(stream, "{}", rendered.text).and_then(|_| stream.flush());
            if written.is_err() {
                (self.fallback)(&console::strip_ansi_codes(&rendered.text));
            }
        }
    }

    fn spinner(&self, message: &str, options: SpinnerOptions) -> Spinner {
        if self.is_minimal() {
            return Spinner::noop();
        }

        let target = if self.interactive {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        Spinner::animated(message, options, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::LogLevel;
    use std::io;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Buffer(Rc<RefCell<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn ui(config: UiConfig) -> (TerminalUi, Buffer, Buffer) {
        let out = Buffer::default();
        let err = Buffer::default();
        let ui = TerminalUi::new(config, Streams::detached(out.clone(), err.clone()));
        (ui, out, err)
    }

    #[test]
    fn error_logs_go_to_the_error_stream() {
        let (ui, out, err) = ui(UiConfig::default());

        ui.print(&[Log::info("saved"), Log::error_text("failed")]);

        assert!(out.contents().contains("saved"));
        assert!(!out.contents().contains("failed"));
        assert!(err.contents().contains("failed"));
    }

    #[test]
    fn prompts_fail_without_a_terminal() {
        let (ui, _, _) = ui(UiConfig::default());
        let mut answer = String::new();

        let err = ui
            .input(&mut answer, &InputOptions::new("App Name"))
            .unwrap_err();

        assert_eq!(err.code.as_str(), "prompt.non_interactive");
        assert!(answer.is_empty());
    }

    #[test]
    fn auto_confirm_skips_the_terminal() {
        let (ui, _, _) = ui(UiConfig {
            auto_confirm: true,
            ..UiConfig::default()
        });

        assert!(ui.confirm(format_args!("Replace {}?", "session")).unwrap());
    }

    #[test]
    fn confirm_without_auto_confirm_needs_a_terminal() {
        let (ui, _, _) = ui(UiConfig::default());
        assert!(ui.confirm(format_args!("Continue?")).is_err());
    }

    #[test]
    fn write_failure_goes_to_fallback() {
        let captured = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = captured.clone();
        let ui = TerminalUi::new(UiConfig::default(), Streams::detached(Broken, Broken))
            .with_fallback(move |text| sink.borrow_mut().push(text.to_string()));

        ui.print(&[Log::info("one"), Log::warning("two")]);

        assert_eq!(*captured.borrow(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn fallback_receives_unstyled_error_text() {
        let captured = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = captured.clone();
        let out = Buffer::default();
        let ui = TerminalUi::new(UiConfig::default(), Streams::detached(out.clone(), Broken))
            .with_fallback(move |text| sink.borrow_mut().push(text.to_string()));

        ui.print(&[Log::warning("kept"), Log::error_text("lost stream")]);

        assert!(out.contents().contains('\u{1b}'));
        assert_eq!(*captured.borrow(), vec!["lost stream".to_string()]);
    }

    #[test]
    fn minimal_ui_returns_noop_spinner() {
        let (ui, _, _) = ui(UiConfig {
            output_format: OutputFormat::Json,
            ..UiConfig::default()
        });

        assert!(ui.spinner("Working", SpinnerOptions::default()).is_noop());
    }

    #[test]
    fn render_failure_prints_one_error_log() {
        struct Unrenderable;

        impl crate::terminal::Message for Unrenderable {
            fn text(&self, _ctx: &crate::terminal::RenderContext) -> Result<String> {
                Err(Error::internal_unexpected("cannot render"))
            }

            fn payload(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
                Err(Error::internal_unexpected("cannot render"))
            }
        }

        let (ui, out, err) = ui(UiConfig {
            disable_colors: true,
            ..UiConfig::default()
        });

        ui.print(&[Log::new(LogLevel::Info, Unrenderable), Log::info("after")]);

        assert_eq!(out.contents(), "after\n");
        assert_eq!(
            err.contents(),
            "Failed to render output: Unexpected error: cannot render\n"
        );
    }
}
