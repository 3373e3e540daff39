use std::{fs, io::ErrorKind, path::PathBuf};

use crate::infra::error::AppError;

/// Durable home of the bearer credential.
///
/// The token lives in a single file under the session directory; it is
/// written on verified login, read once at startup, and removed on logout or
/// when the backend revokes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Option<String>, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim().to_owned();
                Ok((!token.is_empty()).then_some(token))
            }
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(AppError::TokenRead {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn save(&self, token: &str) -> Result<(), AppError> {
        fs::write(&self.path, token).map_err(|source| AppError::TokenWrite {
            path: self.path.clone(),
            source,
        })
    }

    /// Removes the token file. Returns whether a file existed; a missing
    /// file is not an error, so clearing stays idempotent.
    pub fn clear(&self) -> Result<bool, AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(AppError::TokenRemove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in_tempdir() -> (tempfile::TempDir, TokenStore) {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let store = TokenStore::new(dir.path().join("token"));
        (dir, store)
    }

    #[test]
    fn load_returns_none_when_no_file_exists() {
        let (_dir, store) = store_in_tempdir();

        assert_eq!(store.load().expect("load should succeed"), None);
    }

    #[test]
    fn save_then_load_round_trips_the_token() {
        let (_dir, store) = store_in_tempdir();

        store.save("bearer-token-value").expect("save should succeed");

        assert_eq!(
            store.load().expect("load should succeed"),
            Some("bearer-token-value".to_owned())
        );
    }

    #[test]
    fn load_treats_whitespace_only_file_as_absent() {
        let (_dir, store) = store_in_tempdir();

        store.save("  \n").expect("save should succeed");

        assert_eq!(store.load().expect("load should succeed"), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let (_dir, store) = store_in_tempdir();
        store.save("tok").expect("save should succeed");

        assert!(store.clear().expect("first clear should succeed"));
        assert!(!store.clear().expect("second clear should succeed"));
        assert_eq!(store.load().expect("load should succeed"), None);
    }
}
