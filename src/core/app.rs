//! Platform app settings shared by app commands and the local app config.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentModel {
    #[serde(rename = "GLOBAL")]
    Global,
    #[serde(rename = "LOCAL")]
    Local,
}

impl DeploymentModel {
    pub const DEFAULT: DeploymentModel = DeploymentModel::Global;

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentModel::Global => "GLOBAL",
            DeploymentModel::Local => "LOCAL",
        }
    }

    pub fn all() -> &'static [DeploymentModel] {
        &[DeploymentModel::Global, DeploymentModel::Local]
    }
}

impl fmt::Display for DeploymentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeploymentModel::all()
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "deployment_model",
                    format!("unknown deployment model '{}'", s),
                    Some(DeploymentModel::all().iter().map(|m| m.to_string()).collect()),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "US-VA")]
    Virginia,
    #[serde(rename = "US-OR")]
    Oregon,
    #[serde(rename = "DE-FF")]
    Frankfurt,
    #[serde(rename = "IE")]
    Ireland,
    #[serde(rename = "AU")]
    Sydney,
    #[serde(rename = "IN-MB")]
    Mumbai,
    #[serde(rename = "SG")]
    Singapore,
}

impl Location {
    pub const DEFAULT: Location = Location::Virginia;

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Virginia => "US-VA",
            Location::Oregon => "US-OR",
            Location::Frankfurt => "DE-FF",
            Location::Ireland => "IE",
            Location::Sydney => "AU",
            Location::Mumbai => "IN-MB",
            Location::Singapore => "SG",
        }
    }

    pub fn all() -> &'static [Location] {
        &[
            Location::Virginia,
            Location::Oregon,
            Location::Frankfurt,
            Location::Ireland,
            Location::Sydney,
            Location::Mumbai,
            Location::Singapore,
        ]
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::all()
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "location",
                    format!("unknown location '{}'", s),
                    Some(Location::all().iter().map(|l| l.to_string()).collect()),
                )
            })
    }
}

/// Version of the on-disk app config layout, written as a `YYYYMMDD` date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppConfigVersion(pub u32);

impl AppConfigVersion {
    pub const DEFAULT: AppConfigVersion = AppConfigVersion(20210101);
}

impl fmt::Display for AppConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AppConfigVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u32>() {
            Ok(0) | Err(_) => Err(Error::validation_invalid_argument(
                "config_version",
                format!("'{}' is not a config version", s),
                None,
            )),
            Ok(version) => Ok(AppConfigVersion(version)),
        }
    }
}
