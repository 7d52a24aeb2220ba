use clap::Args;
use serde::{Serialize, Serializer};

use super::project::ProjectInputs;
use super::{resolved, FieldRule, FieldSource, InputResolver};
use crate::error::Result;
use crate::profile::Profile;
use crate::terminal::{InputOptions, Log, PasswordOptions, Ui};

const COMMAND: &str = "secrets create";

const REDACTED: &str = "<redacted>";

#[derive(Args, Clone, Default, PartialEq, Eq)]
pub struct SecretCreateInputs {
    #[command(flatten)]
    pub project_inputs: ProjectInputs,

    /// Name of the secret
    #[arg(long, short = 'n', default_value = "")]
    pub name: String,

    /// Value of the secret
    #[arg(long, default_value = "", hide_default_value = true)]
    pub value: String,
}

impl std::fmt::Debug for SecretCreateInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCreateInputs")
            .field("project_inputs", &self.project_inputs)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl InputResolver for SecretCreateInputs {
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new("project", &[FieldSource::Flag]),
        FieldRule::new("app", &[FieldSource::Flag, FieldSource::Profile]),
        FieldRule::new("name", &[FieldSource::Flag, FieldSource::Prompt]),
        FieldRule::new("value", &[FieldSource::Flag, FieldSource::Prompt]),
    ];

    fn resolve(&mut self, profile: &Profile, ui: &dyn Ui) -> Result<()> {
        self.project_inputs
            .resolve_in(ui, &profile.working_directory, true)?;

        if self.name.is_empty() {
            ui.input(&mut self.name, &InputOptions::new("Secret Name"))?;
            resolved(COMMAND, "name", FieldSource::Prompt);
        } else {
            resolved(COMMAND, "name", FieldSource::Flag);
        }

        if self.value.is_empty() {
            ui.password(&mut self.value, &PasswordOptions::new("Secret Value"))?;
            resolved(COMMAND, "value", FieldSource::Prompt);
        } else {
            resolved(COMMAND, "value", FieldSource::Flag);
        }

        Ok(())
    }
}

/// A resolved secret ready for submission. The value is redacted when printed or debugged.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub app: String,
    pub name: String,
    #[serde(serialize_with = "redact")]
    pub value: String,
}

fn redact<S: Serializer>(_value: &str, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(REDACTED)
}

impl std::fmt::Debug for SecretRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRequest")
            .field("project", &self.project)
            .field("app", &self.app)
            .field("name", &self.name)
            .field("value", &REDACTED)
            .finish()
    }
}

pub fn run(mut inputs: SecretCreateInputs, profile: &Profile, ui: &dyn Ui) -> Result<SecretRequest> {
    inputs.resolve(profile, ui)?;

    let request = SecretRequest {
        project: inputs.project_inputs.project,
        app: inputs.project_inputs.app,
        name: inputs.name,
        value: inputs.value,
    };
    ui.print(&[Log::json("Prepared secret request", &request)]);

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::{OutputFormat, PromptKind, ScriptedUi, UiConfig};
    use tempfile::TempDir;

    #[test]
    fn name_then_masked_value_are_prompted() {
        let dir = TempDir::new().unwrap();
        let profile = Profile::new("default", dir.path());
        let ui = ScriptedUi::new(UiConfig::default())
            .text("db_password")
            .text("hunter2");
        let mut inputs = SecretCreateInputs::default();

        inputs.resolve(&profile, &ui).unwrap();

        let kinds: Vec<PromptKind> = ui.prompts().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PromptKind::Input, PromptKind::Password]);
        assert_eq!(inputs.name, "db_password");
        assert_eq!(inputs.value, "hunter2");
        assert!(inputs.project_inputs.app.is_empty());
    }

    #[test]
    fn printed_request_never_contains_the_value() {
        let dir = TempDir::new().unwrap();
        let profile = Profile::new("default", dir.path());
        let ui = ScriptedUi::new(UiConfig {
            output_format: OutputFormat::Json,
            ..UiConfig::default()
        });
        let inputs = SecretCreateInputs {
            project_inputs: ProjectInputs {
                project: "proj-1".to_string(),
                app: "todo".to_string(),
            },
            name: "db_password".to_string(),
            value: "hunter2".to_string(),
        };

        let request = run(inputs, &profile, &ui).unwrap();

        assert_eq!(request.value, "hunter2");
        let printed = ui.printed();
        let doc: serde_json::Value = serde_json::from_str(&printed[0].text).unwrap();
        assert_eq!(doc["doc"]["name"], "db_password");
        assert_eq!(doc["doc"]["value"], REDACTED);
        assert_eq!(doc["doc"]["app"], "todo");
        assert!(!printed[0].text.contains("hunter2"));
    }

    #[test]
    fn prompted_value_reaches_the_request() {
        let dir = TempDir::new().unwrap();
        let profile = Profile::new("default", dir.path());
        let ui = ScriptedUi::new(UiConfig {
            disable_colors: true,
            ..UiConfig::default()
        })
        .text("db_password")
        .text("hunter2");

        let request = run(SecretCreateInputs::default(), &profile, &ui).unwrap();

        assert_eq!(request.name, "db_password");
        assert_eq!(request.value, "hunter2");
        assert!(!format!("{:?}", request).contains("hunter2"));
        assert!(ui.printed().iter().all(|r| !r.text.contains("hunter2")));
    }
}
