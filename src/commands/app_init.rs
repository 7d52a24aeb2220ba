use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::{resolved, FieldRule, FieldSource, InputResolver};
use crate::app::{AppConfigVersion, DeploymentModel, Location};
use crate::error::{Error, Result};
use crate::local_app::{self, AppConfig};
use crate::profile::Profile;
use crate::terminal::{InputOptions, Log, SpinnerOptions, Ui};

const COMMAND: &str = "app init";

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct AppInitInputs {
    /// Link to an existing remote app by ID or name instead of describing a new one
    #[arg(long = "remote", default_value = "")]
    pub remote_app: String,

    /// Name of the new app
    #[arg(long, short = 'n', default_value = "")]
    pub name: String,

    /// GLOBAL or LOCAL
    #[arg(long)]
    pub deployment_model: Option<DeploymentModel>,

    /// Region code, e.g. US-VA or IE
    #[arg(long)]
    pub location: Option<Location>,

    /// App config layout version
    #[arg(long)]
    pub config_version: Option<AppConfigVersion>,
}

impl InputResolver for AppInitInputs {
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new("remote_app", &[FieldSource::Flag]),
        FieldRule::new(
            "name",
            &[FieldSource::Flag, FieldSource::Inferred, FieldSource::Prompt],
        ),
        FieldRule::new(
            "deployment_model",
            &[FieldSource::Flag, FieldSource::Inferred, FieldSource::Default],
        ),
        FieldRule::new(
            "location",
            &[FieldSource::Flag, FieldSource::Inferred, FieldSource::Default],
        ),
        FieldRule::new(
            "config_version",
            &[FieldSource::Flag, FieldSource::Inferred, FieldSource::Default],
        ),
    ];

    fn resolve(&mut self, profile: &Profile, ui: &dyn Ui) -> Result<()> {
        if let Some(app) = local_app::load(&profile.working_directory)? {
            return Err(Error::project_exists(app.root_dir.display().to_string()));
        }

        if !self.remote_app.is_empty() {
            resolved(COMMAND, "remote_app", FieldSource::Flag);
            log::debug!("{}: linking remote app, new app settings are not needed", COMMAND);
            return Ok(());
        }

        if self.name.is_empty() {
            ui.input(&mut self.name, &InputOptions::new("App Name"))?;
            resolved(COMMAND, "name", FieldSource::Prompt);
        } else {
            resolved(COMMAND, "name", FieldSource::Flag);
        }

        if self.deployment_model.is_none() {
            self.deployment_model = Some(DeploymentModel::DEFAULT);
            resolved(COMMAND, "deployment_model", FieldSource::Default);
        }
        if self.location.is_none() {
            self.location = Some(Location::DEFAULT);
            resolved(COMMAND, "location", FieldSource::Default);
        }
        if self.config_version.is_none() {
            self.config_version = Some(AppConfigVersion::DEFAULT);
            resolved(COMMAND, "config_version", FieldSource::Default);
        }

        Ok(())
    }
}

impl AppInitInputs {
    /// The config to write for these (resolved) inputs.
    pub fn app_config(&self) -> AppConfig {
        let config_version = self.config_version.unwrap_or(AppConfigVersion::DEFAULT);
        if !self.remote_app.is_empty() {
            return AppConfig {
                config_version,
                name: String::new(),
                app_id: Some(self.remote_app.clone()),
                location: None,
                deployment_model: None,
            };
        }

        AppConfig {
            config_version,
            name: self.name.clone(),
            app_id: None,
            location: self.location,
            deployment_model: self.deployment_model,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInitOutput {
    pub path: PathBuf,
    pub config: AppConfig,
}

pub fn run(mut inputs: AppInitInputs, profile: &Profile, ui: &dyn Ui) -> Result<AppInitOutput> {
    inputs.resolve(profile, ui)?;

    let config = inputs.app_config();
    let path = ui
        .spinner(
            "Writing app config...",
            SpinnerOptions::default().with_final_message("App config written"),
        )
        .run(|_| local_app::write(&profile.working_directory, &config))?;

    let label = config
        .app_id
        .clone()
        .unwrap_or_else(|| config.name.clone());
    ui.print(&[Log::follow_up(
        format!("Successfully initialized app '{}' in {}", label, profile.working_directory.display()),
        vec![
            "stratus secrets create".to_string(),
            format!("cat {}", local_app::FILE_NAME),
        ],
    )]);

    Ok(AppInitOutput { path, config })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::{Answer, ScriptedUi, UiConfig};
    use tempfile::TempDir;

    #[test]
    fn defaults_fill_only_unset_fields() {
        let dir = TempDir::new().unwrap();
        let profile = Profile::new("default", dir.path());
        let ui = ScriptedUi::new(UiConfig::default());
        let mut inputs = AppInitInputs {
            name: "todo".to_string(),
            location: Some(Location::Ireland),
            ..AppInitInputs::default()
        };

        inputs.resolve(&profile, &ui).unwrap();

        assert_eq!(inputs.location, Some(Location::Ireland));
        assert_eq!(inputs.deployment_model, Some(DeploymentModel::Global));
        assert_eq!(inputs.config_version, Some(AppConfigVersion::DEFAULT));
        assert!(ui.prompts().is_empty());
    }

    #[test]
    fn remote_app_skips_name_and_defaults() {
        let dir = TempDir::new().unwrap();
        let profile = Profile::new("default", dir.path());
        let ui = ScriptedUi::new(UiConfig::default());
        let mut inputs = AppInitInputs {
            remote_app: "todo-abcde".to_string(),
            ..AppInitInputs::default()
        };

        inputs.resolve(&profile, &ui).unwrap();

        assert!(inputs.name.is_empty());
        assert_eq!(inputs.location, None);
        assert_eq!(inputs.app_config().app_id.as_deref(), Some("todo-abcde"));
    }

    #[test]
    fn prompt_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let profile = Profile::new("default", dir.path());
        let ui = ScriptedUi::new(UiConfig::default()).answer(Answer::Fail("eof".to_string()));
        let mut inputs = AppInitInputs::default();

        let err = inputs.resolve(&profile, &ui).unwrap_err();

        assert_eq!(err.code.as_str(), "prompt.failed");
        assert_eq!(inputs.deployment_model, None);
    }

    #[test]
    fn run_writes_config_and_reports_follow_up() {
        let dir = TempDir::new().unwrap();
        let profile = Profile::new("default", dir.path());
        let ui = ScriptedUi::new(UiConfig::default()).text("todo");

        let output = run(AppInitInputs::default(), &profile, &ui).unwrap();

        assert_eq!(output.path, dir.path().join(local_app::FILE_NAME));
        let app = local_app::load(dir.path()).unwrap().unwrap();
        assert_eq!(app.config.name, "todo");
        assert_eq!(app.config.location, Some(Location::Virginia));

        let printed = ui.printed();
        assert_eq!(printed.len(), 1);
        assert!(printed[0].text.contains("Successfully initialized app 'todo'"));
    }
}
