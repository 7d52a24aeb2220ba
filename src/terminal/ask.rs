//! Prompt configuration, one type per prompt kind.
//!
//! Each type carries only the fields its prompt uses. Choice prompts reject an
//! empty option list at construction so a malformed prompt never reaches the terminal.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputOptions {
    pub message: String,
    pub default: Option<String>,
}

impl InputOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            default: None,
        }
    }

    /// Pre-fill the prompt. Empty defaults are ignored.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        let default = default.into();
        self.default = if default.is_empty() {
            None
        } else {
            Some(default)
        };
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordOptions {
    pub message: String,
}

impl PasswordOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOptions {
    pub message: String,
    pub options: Vec<String>,
    pub default: Option<String>,
}

impl SelectOptions {
    pub fn new(message: impl Into<String>, options: Vec<String>) -> Result<Self> {
        let message = message.into();
        if options.is_empty() {
            return Err(Error::validation_invalid_argument(
                "options",
                format!("select prompt '{}' has no options", message),
                None,
            ));
        }
        Ok(Self {
            message,
            options,
            default: None,
        })
    }

    /// Preselect `default`. A default that is not one of the options is ignored.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        let default = default.into();
        self.default = self.options.contains(&default).then_some(default);
        self
    }

    pub fn default_index(&self) -> Option<usize> {
        let default = self.default.as_ref()?;
        self.options.iter().position(|o| o == default)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelectOptions {
    pub message: String,
    pub options: Vec<String>,
    pub defaults: Vec<String>,
}

impl MultiSelectOptions {
    pub fn new(message: impl Into<String>, options: Vec<String>) -> Result<Self> {
        let message = message.into();
        if options.is_empty() {
            return Err(Error::validation_invalid_argument(
                "options",
                format!("multi-select prompt '{}' has no options", message),
                None,
            ));
        }
        Ok(Self {
            message,
            options,
            defaults: Vec::new(),
        })
    }

    /// Pre-check the given options. Values not among the options are dropped.
    pub fn with_defaults(mut self, defaults: Vec<String>) -> Self {
        self.defaults = defaults
            .into_iter()
            .filter(|d| self.options.contains(d))
            .collect();
        self
    }

    /// One flag per option, true where the option is pre-checked.
    pub fn checked(&self) -> Vec<bool> {
        self.options
            .iter()
            .map(|o| self.defaults.contains(o))
            .collect()
    }
}
