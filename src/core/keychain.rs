//! Keychain storage for profile secrets.
//!
//! Private API keys never touch the profile file. They live in the system keychain
//! (macOS Keychain, Linux Secret Service, Windows Credential Manager).

use crate::{Error, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "stratus";

fn keyring_error(e: keyring::Error) -> Error {
    Error::internal_unexpected(format!("Keychain error: {}", e))
}

fn entry(profile: &str, variable_name: &str) -> Result<Entry> {
    let key = format!("{}:{}", profile, variable_name);
    Entry::new(SERVICE_NAME, &key).map_err(keyring_error)
}

/// Stores a value in the keychain for a profile variable.
///
/// Key format: `<profile>:<variable-name>`
pub fn store(profile: &str, variable_name: &str, value: &str) -> Result<()> {
    entry(profile, variable_name)?
        .set_password(value)
        .map_err(keyring_error)
}

/// Retrieves a value from the keychain. Returns `None` if the key doesn't exist.
pub fn get(profile: &str, variable_name: &str) -> Result<Option<String>> {
    match entry(profile, variable_name)?.get_password() {
        Ok(value) => Ok(Some(value)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(keyring_error(e)),
    }
}

/// Deletes a value from the keychain.
pub fn delete(profile: &str, variable_name: &str) -> Result<()> {
    match entry(profile, variable_name)?.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(keyring_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Requires keychain access and may prompt for permissions.
    // Run manually with: cargo test keychain -- --ignored

    #[test]
    #[ignore]
    fn test_store_and_get() {
        let profile = "stratus-test-profile";
        let var_name = "private_api_key";

        store(profile, var_name, "secret_value_123").unwrap();
        assert_eq!(
            get(profile, var_name).unwrap(),
            Some("secret_value_123".to_string())
        );

        delete(profile, var_name).unwrap();
        assert_eq!(get(profile, var_name).unwrap(), None);
    }
}
