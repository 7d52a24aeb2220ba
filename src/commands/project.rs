use clap::Args;
use std::path::Path;

use super::{resolved, FieldRule, FieldSource, InputResolver};
use crate::error::Result;
use crate::local_app;
use crate::profile::Profile;
use crate::terminal::{InputOptions, Ui};

/// Project and app context shared by commands that act on an existing app.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectInputs {
    /// Project ID
    #[arg(long, default_value = "")]
    pub project: String,

    /// App ID or name. Defaults to the app in the current directory
    #[arg(long, short = 'a', default_value = "")]
    pub app: String,
}

impl ProjectInputs {
    /// Resolve against the app project containing `working_directory`.
    ///
    /// With `skip_app_prompt`, an app that cannot be inferred stays empty so the
    /// caller can pick it later (e.g. from a remote listing).
    pub fn resolve_in(
        &mut self,
        ui: &dyn Ui,
        working_directory: &Path,
        skip_app_prompt: bool,
    ) -> Result<()> {
        if !self.project.is_empty() {
            resolved("project", "project", FieldSource::Flag);
        }

        if !self.app.is_empty() {
            resolved("project", "app", FieldSource::Flag);
            return Ok(());
        }

        if let Some(app) = local_app::load(working_directory)? {
            if let Some(identifier) = app.identifier() {
                self.app = identifier.to_string();
                resolved("project", "app", FieldSource::Profile);
                return Ok(());
            }
        }

        if skip_app_prompt {
            return Ok(());
        }

        ui.input(&mut self.app, &InputOptions::new("App ID or Name"))?;
        resolved("project", "app", FieldSource::Prompt);
        Ok(())
    }
}

impl InputResolver for ProjectInputs {
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new("project", &[FieldSource::Flag]),
        FieldRule::new(
            "app",
            &[FieldSource::Flag, FieldSource::Profile, FieldSource::Prompt],
        ),
    ];

    fn resolve(&mut self, profile: &Profile, ui: &dyn Ui) -> Result<()> {
        self.resolve_in(ui, &profile.working_directory, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfigVersion;
    use crate::local_app::AppConfig;
    use crate::terminal::{ScriptedUi, UiConfig};
    use tempfile::TempDir;

    fn write_app(dir: &Path, name: &str, app_id: Option<&str>) {
        local_app::write(
            dir,
            &AppConfig {
                config_version: AppConfigVersion::DEFAULT,
                name: name.to_string(),
                app_id: app_id.map(str::to_string),
                location: None,
                deployment_model: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn app_is_inferred_from_local_project() {
        let dir = TempDir::new().unwrap();
        write_app(dir.path(), "todo", Some("todo-abcde"));
        let ui = ScriptedUi::new(UiConfig::default());
        let mut inputs = ProjectInputs::default();

        inputs.resolve_in(&ui, dir.path(), false).unwrap();

        assert_eq!(inputs.app, "todo-abcde");
        assert!(ui.prompts().is_empty());
    }

    #[test]
    fn app_is_prompted_outside_a_project() {
        let dir = TempDir::new().unwrap();
        let ui = ScriptedUi::new(UiConfig::default()).text("todo");
        let profile = Profile::new("default", dir.path());
        let mut inputs = ProjectInputs::default();

        inputs.resolve(&profile, &ui).unwrap();

        assert_eq!(inputs.app, "todo");
        assert_eq!(ui.prompts()[0].message, "App ID or Name");
    }

    #[test]
    fn skipped_app_prompt_leaves_app_empty() {
        let dir = TempDir::new().unwrap();
        let ui = ScriptedUi::new(UiConfig::default());
        let mut inputs = ProjectInputs::default();

        inputs.resolve_in(&ui, dir.path(), true).unwrap();

        assert!(inputs.app.is_empty());
        assert!(ui.prompts().is_empty());
    }

    #[test]
    fn app_flag_wins_over_local_project() {
        let dir = TempDir::new().unwrap();
        write_app(dir.path(), "todo", None);
        let ui = ScriptedUi::new(UiConfig::default());
        let mut inputs = ProjectInputs {
            project: "proj-1".to_string(),
            app: "other".to_string(),
        };

        inputs.resolve_in(&ui, dir.path(), false).unwrap();

        assert_eq!(inputs.app, "other");
        assert_eq!(inputs.project, "proj-1");
    }
}
