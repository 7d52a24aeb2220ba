use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base stratus config directory (~/.config/stratus/ on Unix-like systems)
pub fn stratus() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("stratus"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("stratus"))
    }
}

/// Profiles directory
pub fn profiles() -> Result<PathBuf> {
    Ok(stratus()?.join("profiles"))
}

/// Profile file path
pub fn profile(name: &str) -> Result<PathBuf> {
    Ok(profiles()?.join(format!("{}.json", name)))
}
