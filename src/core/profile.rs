//! User profile: persisted session defaults.
//!
//! A profile is consulted by input resolvers and never mutated by them. Only
//! command execution (e.g. `login`) writes credentials back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::keychain;
use crate::paths;
use crate::utils::io;

pub const DEFAULT_PROFILE: &str = "default";

const PRIVATE_API_KEY: &str = "private_api_key";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub public_api_key: String,
    pub private_api_key: String,
}

impl Credentials {
    pub fn new(public_api_key: impl Into<String>, private_api_key: impl Into<String>) -> Self {
        Self {
            public_api_key: public_api_key.into(),
            private_api_key: private_api_key.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.public_api_key.is_empty() && self.private_api_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let private = if self.private_api_key.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("Credentials")
            .field("public_api_key", &self.public_api_key)
            .field("private_api_key", &private)
            .finish()
    }
}

/// On-disk shape of a profile file. The private key is deliberately absent.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    public_api_key: String,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub working_directory: PathBuf,
    credentials: Credentials,
}

impl Profile {
    pub fn new(name: impl Into<String>, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            working_directory: working_directory.into(),
            credentials: Credentials::default(),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Load the named profile from the config directory.
    ///
    /// A missing profile file yields an empty profile. Keychain failures are
    /// logged and treated as "no private key stored".
    pub fn load(name: &str, working_directory: impl Into<PathBuf>) -> Result<Self> {
        let path = paths::profile(name)?;
        let record = read_record(&path)?;

        let private_api_key = match keychain::get(name, PRIVATE_API_KEY) {
            Ok(value) => value.unwrap_or_default(),
            Err(err) => {
                log::warn!("Could not read private API key for profile '{}': {}", name, err);
                String::new()
            }
        };

        Ok(Self::new(name, working_directory).with_credentials(Credentials {
            public_api_key: record.public_api_key,
            private_api_key,
        }))
    }

    pub fn credentials(&self) -> Credentials {
        self.credentials.clone()
    }

    /// Persist credentials: the public key to the profile file, the private key to the keychain.
    pub fn save_credentials(&mut self, credentials: Credentials) -> Result<()> {
        let path = paths::profile(&self.name)?;
        write_record(
            &path,
            &ProfileRecord {
                public_api_key: credentials.public_api_key.clone(),
            },
        )?;
        if credentials.private_api_key.is_empty() {
            keychain::delete(&self.name, PRIVATE_API_KEY)?;
        } else {
            keychain::store(&self.name, PRIVATE_API_KEY, &credentials.private_api_key)?;
        }

        log::debug!("Saved credentials for profile '{}'", self.name);
        self.credentials = credentials;
        Ok(())
    }
}

fn read_record(path: &Path) -> Result<ProfileRecord> {
    if !path.exists() {
        return Ok(ProfileRecord::default());
    }
    io::read_json(path, "read profile")
}

fn write_record(path: &Path, record: &ProfileRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::internal_io(e.to_string(), Some("create profiles directory".to_string()))
        })?;
    }
    let content = serde_json::to_string_pretty(record)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize profile".to_string())))?;
    io::write_file_atomic(path, &content, "write profile")
}
