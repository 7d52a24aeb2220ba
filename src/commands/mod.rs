//! Commands and the input-resolution protocol they share.
//!
//! A command parses its flags into an inputs value, calls
//! [`InputResolver::resolve`] once, then executes with a fully populated value.
//! Resolution never writes profile state; only execution does.

use std::fmt;

use crate::error::Result;
use crate::profile::Profile;
use crate::terminal::Ui;

pub mod app_init;
pub mod login;
pub mod project;
pub mod secrets;

/// Fills the empty fields of a command's inputs from context or prompts.
///
/// Fields already holding a value are never prompted for or changed. The first
/// failure aborts resolution; fields set before it stay set.
pub trait InputResolver {
    /// Per-field precedence, in the order fields are visited.
    const FIELDS: &'static [FieldRule];

    fn resolve(&mut self, profile: &Profile, ui: &dyn Ui) -> Result<()>;
}

/// Where a field's value may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Given on the command line.
    Flag,
    /// Made irrelevant or implied by another field already resolved.
    Inferred,
    /// Stored in the user profile or a local project file.
    Profile,
    /// Static fallback value.
    Default,
    Prompt,
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldSource::Flag => "flag",
            FieldSource::Inferred => "inferred",
            FieldSource::Profile => "profile",
            FieldSource::Default => "default",
            FieldSource::Prompt => "prompt",
        })
    }
}

/// A field and its ordered list of sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub sources: &'static [FieldSource],
}

impl FieldRule {
    pub const fn new(field: &'static str, sources: &'static [FieldSource]) -> Self {
        Self { field, sources }
    }
}

pub(crate) fn resolved(command: &str, field: &str, source: FieldSource) {
    log::debug!("{}: {} resolved from {}", command, field, source);
}
