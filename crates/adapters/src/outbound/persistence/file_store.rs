//! File-backed credential store.
//!
//! The durable projection of a session is one JSON document with two keys,
//! `auth_token` and `user_data`, stored under the platform config
//! directory. `user_data` holds the user record as a serialized string, so
//! the two values stay independently replaceable. Writes go through a
//! temporary file and a rename, so a crash cannot leave a torn pair. No
//! cross-process coordination: concurrent writers race last-write-wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use application::error::{ApplicationError, Result, ToInternal};
use application::ports::outbound::{CredentialStore, PersistedCredentials};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "docsearch";
const FILE_NAME: &str = "credentials.json";

/// On-disk document; both keys are only meaningful together.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_data: Option<String>,
}

/// [`CredentialStore`] backed by a JSON file.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store at the default location,
    /// `<config dir>/docsearch/credentials.json`.
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ApplicationError::Storage(
                "could not determine the platform config directory".into(),
            )
        })?;

        Ok(Self::with_path(config_dir.join(APP_DIR).join(FILE_NAME)))
    }

    /// Create a store at a custom location (used by tests and the config
    /// file override).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Option<StoreDocument>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(None);
            },
            Err(error) => {
                return Err(ApplicationError::Storage(format!(
                    "failed to read {}: {error}",
                    self.path.display()
                )));
            },
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|error| {
                ApplicationError::Storage(format!(
                    "credential file is not valid JSON: {error}"
                ))
            })
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<PersistedCredentials>> {
        let Some(document) = self.read_document()? else {
            return Ok(None);
        };

        // A half-present pair is treated as absent.
        let (Some(token), Some(user_data)) =
            (document.auth_token, document.user_data)
        else {
            return Ok(None);
        };

        let user = serde_json::from_str(&user_data).map_err(|error| {
            ApplicationError::Storage(format!(
                "stored user record is not valid JSON: {error}"
            ))
        })?;

        Ok(Some(PersistedCredentials { token, user }))
    }

    fn save(&self, credentials: &PersistedCredentials) -> Result<()> {
        let document = StoreDocument {
            auth_token: Some(credentials.token.clone()),
            user_data: Some(serde_json::to_string(&credentials.user).catch()?),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                ApplicationError::Storage(format!(
                    "failed to create {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let staged = self.path.with_extension("json.tmp");
        fs::write(&staged, serde_json::to_vec_pretty(&document).catch()?)
            .and_then(|()| fs::rename(&staged, &self.path))
            .map_err(|error| {
                ApplicationError::Storage(format!(
                    "failed to write {}: {error}",
                    self.path.display()
                ))
            })
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(ApplicationError::Storage(format!(
                "failed to delete {}: {error}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use domain::identity::User;
    use tempfile::TempDir;

    use super::*;

    fn store_in(dir: &TempDir) -> FileCredentialStore {
        FileCredentialStore::with_path(dir.path().join(FILE_NAME))
    }

    fn credentials(token: &str) -> PersistedCredentials {
        PersistedCredentials {
            token: token.into(),
            user: User {
                id: "1".into(),
                email: "a@b.com".into(),
                username: "a".into(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&credentials("tok123")).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded.token, "tok123");
        assert_eq!(loaded.user.id, "1");
    }

    #[test]
    fn test_missing_file_loads_as_absent() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[test]
    fn test_half_present_pair_loads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        fs::write(store.path(), r#"{"auth_token": "orphaned"}"#).unwrap();
        assert!(store.load().unwrap().is_none());

        fs::write(store.path(), r#"{"user_data": "{}"}"#).unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_err());

        fs::write(
            store.path(),
            r#"{"auth_token": "tok", "user_data": "{broken"}"#,
        )
        .unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_clear_removes_both_keys_and_tolerates_absence() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&credentials("tok123")).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Clearing an already-empty store is not an error.
        store.clear().unwrap();
    }

    #[test]
    fn test_save_replaces_previous_pair() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&credentials("old")).unwrap();
        store.save(&credentials("new")).unwrap();

        assert_eq!(store.load().unwrap().unwrap().token, "new");
    }
}
