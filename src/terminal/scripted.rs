//! A UI driven by canned answers, for exercising commands without a terminal.

use std::cell::RefCell;
use std::collections::VecDeque;

use super::{
    InputOptions, Log, MultiSelectOptions, OutputFormat, PasswordOptions, Rendered, SelectOptions,
    Spinner, SpinnerOptions, Ui, UiConfig,
};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Input,
    Password,
    Select,
    MultiSelect,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    pub kind: PromptKind,
    pub message: String,
}

/// One queued reply. Answers are consumed in prompt order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Choices(Vec<String>),
    Confirm(bool),
    /// Make the next prompt fail as if the stream broke.
    Fail(String),
}

pub struct ScriptedUi {
    config: UiConfig,
    answers: RefCell<VecDeque<Answer>>,
    prompts: RefCell<Vec<PromptRecord>>,
    printed: RefCell<Vec<Rendered>>,
}

impl ScriptedUi {
    pub fn new(config: UiConfig) -> Self {
        Self {
            config,
            answers: RefCell::new(VecDeque::new()),
            prompts: RefCell::new(Vec::new()),
            printed: RefCell::new(Vec::new()),
        }
    }

    pub fn answer(self, answer: Answer) -> Self {
        self.answers.borrow_mut().push_back(answer);
        self
    }

    pub fn text(self, value: impl Into<String>) -> Self {
        self.answer(Answer::Text(value.into()))
    }

    pub fn prompts(&self) -> Vec<PromptRecord> {
        self.prompts.borrow().clone()
    }

    pub fn printed(&self) -> Vec<Rendered> {
        self.printed.borrow().clone()
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, kind: PromptKind, message: &str) -> Result<Answer> {
        self.prompts.borrow_mut().push(PromptRecord {
            kind,
            message: message.to_string(),
        });
        match self.answers.borrow_mut().pop_front() {
            Some(Answer::Fail(reason)) => Err(Error::prompt_failed(message, reason)),
            Some(answer) => Ok(answer),
            None => Err(Error::prompt_failed(message, "no scripted answer left")),
        }
    }

    fn next_text(&self, kind: PromptKind, message: &str) -> Result<String> {
        match self.next(kind, message)? {
            Answer::Text(value) => Ok(value),
            other => Err(mismatch(message, &other)),
        }
    }
}

fn mismatch(message: &str, answer: &Answer) -> Error {
    Error::prompt_failed(message, format!("scripted answer {:?} does not fit this prompt", answer))
}

impl Ui for ScriptedUi {
    fn auto_confirm(&self) -> bool {
        self.config.auto_confirm
    }

    fn output_format(&self) -> OutputFormat {
        self.config.output_format
    }

    fn input(&self, answer: &mut String, options: &InputOptions) -> Result<()> {
        let value = self.next_text(PromptKind::Input, &options.message)?;
        *answer = match (value.is_empty(), &options.default) {
            (true, Some(default)) => default.clone(),
            _ => value,
        };
        Ok(())
    }

    fn password(&self, answer: &mut String, options: &PasswordOptions) -> Result<()> {
        *answer = self.next_text(PromptKind::Password, &options.message)?;
        Ok(())
    }

    fn select(&self, answer: &mut String, options: &SelectOptions) -> Result<()> {
        let value = self.next_text(PromptKind::Select, &options.message)?;
        if !options.options.contains(&value) {
            return Err(Error::prompt_failed(
                &options.message,
                format!("'{}' is not one of the options", value),
            ));
        }
        *answer = value;
        Ok(())
    }

    fn multi_select(&self, answer: &mut Vec<String>, options: &MultiSelectOptions) -> Result<()> {
        let values = match self.next(PromptKind::MultiSelect, &options.message)? {
            Answer::Choices(values) => values,
            other => return Err(mismatch(&options.message, &other)),
        };
        if let Some(unknown) = values.iter().find(|v| !options.options.contains(*v)) {
            return Err(Error::prompt_failed(
                &options.message,
                format!("'{}' is not one of the options", unknown),
            ));
        }
        *answer = values;
        Ok(())
    }

    fn ask_confirm(&self, message: &str) -> Result<bool> {
        match self.next(PromptKind::Confirm, message)? {
            Answer::Confirm(value) => Ok(value),
            other => Err(mismatch(message, &other)),
        }
    }

    fn print(&self, logs: &[Log]) {
        let ctx = self.config.render_context();
        self.printed
            .borrow_mut()
            .extend(logs.iter().map(|log| log.render_for_print(&ctx)));
    }

    fn spinner(&self, _message: &str, _options: SpinnerOptions) -> Spinner {
        Spinner::noop()
    }
}
