use clap::Args;
use serde::Serialize;

use super::{resolved, FieldRule, FieldSource, InputResolver};
use crate::error::Result;
use crate::profile::{Credentials, Profile};
use crate::terminal::{InputOptions, Log, PasswordOptions, Ui};

const COMMAND: &str = "login";

#[derive(Args, Clone, Default, PartialEq, Eq)]
pub struct LoginInputs {
    /// Public part of the programmatic API key
    #[arg(long = "api-key", default_value = "")]
    pub public_api_key: String,

    /// Private part of the programmatic API key
    #[arg(long = "private-api-key", default_value = "", hide_default_value = true)]
    pub private_api_key: String,
}

impl std::fmt::Debug for LoginInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginInputs")
            .field("public_api_key", &self.public_api_key)
            .finish_non_exhaustive()
    }
}

impl InputResolver for LoginInputs {
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new(
            "public_api_key",
            &[FieldSource::Flag, FieldSource::Profile, FieldSource::Prompt],
        ),
        FieldRule::new(
            "private_api_key",
            &[FieldSource::Flag, FieldSource::Profile, FieldSource::Prompt],
        ),
    ];

    fn resolve(&mut self, profile: &Profile, ui: &dyn Ui) -> Result<()> {
        let stored = profile.credentials();

        if !self.public_api_key.is_empty() {
            resolved(COMMAND, "public_api_key", FieldSource::Flag);
        } else if !stored.public_api_key.is_empty() {
            self.public_api_key = stored.public_api_key;
            resolved(COMMAND, "public_api_key", FieldSource::Profile);
        } else {
            ui.input(&mut self.public_api_key, &InputOptions::new("Public API Key"))?;
            resolved(COMMAND, "public_api_key", FieldSource::Prompt);
        }

        if !self.private_api_key.is_empty() {
            resolved(COMMAND, "private_api_key", FieldSource::Flag);
        } else if !stored.private_api_key.is_empty() {
            self.private_api_key = stored.private_api_key;
            resolved(COMMAND, "private_api_key", FieldSource::Profile);
        } else {
            ui.password(
                &mut self.private_api_key,
                &PasswordOptions::new("Private API Key"),
            )?;
            resolved(COMMAND, "private_api_key", FieldSource::Prompt);
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutput {
    pub profile: String,
    pub public_api_key: String,
    pub saved: bool,
}

pub fn run(mut inputs: LoginInputs, profile: &mut Profile, ui: &dyn Ui) -> Result<LoginOutput> {
    inputs.resolve(profile, ui)?;

    let stored = profile.credentials();
    if !stored.public_api_key.is_empty() && stored.public_api_key != inputs.public_api_key {
        let replace = ui.confirm(format_args!(
            "Profile '{}' is logged in with API key {}. Log out and continue?",
            profile.name, stored.public_api_key
        ))?;
        if !replace {
            ui.print(&[Log::info("Login cancelled")]);
            return Ok(LoginOutput {
                profile: profile.name.clone(),
                public_api_key: stored.public_api_key,
                saved: false,
            });
        }
    }

    profile.save_credentials(Credentials::new(
        inputs.public_api_key.clone(),
        inputs.private_api_key,
    ))?;
    ui.print(&[Log::info(format!(
        "Successfully logged in as {}",
        inputs.public_api_key
    ))]);

    Ok(LoginOutput {
        profile: profile.name.clone(),
        public_api_key: inputs.public_api_key,
        saved: true,
    })
}
