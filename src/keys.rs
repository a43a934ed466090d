// SPDX-License-Identifier: MIT

//! SSH public key provider contract.
//!
//! Key material is produced by an external collaborator (first-use key
//! generation included); this crate only consumes public keys through the
//! [`KeyProvider`] seam and never sees or returns a private key.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::KeyError;

/// Source of a system user's public key.
pub trait KeyProvider {
    /// The user's public key line, e.g. `ssh-rsa AAAB... comment`.
    fn public_key(&self, user: &str) -> Result<String, KeyError>;
}

/// Split a public key line into `(type, key)` discarding any comment.
pub fn split_public_key(raw: &str, user: &str) -> Result<(String, String), KeyError> {
    let mut fields = raw.split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(key_type), Some(key)) => Ok((key_type.to_string(), key.to_string())),
        _ => Err(KeyError::Malformed {
            user: user.to_string(),
        }),
    }
}

/// Reads `<home_root>/<user>/.ssh/id_rsa.pub`. Generation of a missing pair
/// is left to the external key collaborator; a missing file surfaces as
/// [`KeyError::Missing`].
#[derive(Debug, Clone)]
pub struct FileKeyProvider {
    home_root: PathBuf,
}

impl FileKeyProvider {
    pub fn new(home_root: impl Into<PathBuf>) -> Self {
        FileKeyProvider {
            home_root: home_root.into(),
        }
    }
}

impl Default for FileKeyProvider {
    fn default() -> Self {
        FileKeyProvider::new("/home")
    }
}

impl KeyProvider for FileKeyProvider {
    fn public_key(&self, user: &str) -> Result<String, KeyError> {
        let path = self.home_root.join(user).join(".ssh").join("id_rsa.pub");
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content.trim_end().to_string()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(KeyError::Missing {
                user: user.to_string(),
            }),
            Err(source) => Err(KeyError::Io {
                user: user.to_string(),
                source,
            }),
        }
    }
}

/// Fixed key material, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct StaticKeys {
    keys: HashMap<String, String>,
}

impl StaticKeys {
    pub fn new() -> Self {
        StaticKeys::default()
    }

    pub fn with_key(mut self, user: &str, key: &str) -> Self {
        self.keys.insert(user.to_string(), key.to_string());
        self
    }
}

impl KeyProvider for StaticKeys {
    fn public_key(&self, user: &str) -> Result<String, KeyError> {
        self.keys
            .get(user)
            .cloned()
            .ok_or_else(|| KeyError::Missing {
                user: user.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_drops_the_comment() {
        let (key_type, key) =
            split_public_key("ssh-rsa AAABBBCCC postgres@psql.localhost", "postgres").unwrap();
        assert_eq!(key_type, "ssh-rsa");
        assert_eq!(key, "AAABBBCCC");
    }

    #[test]
    fn split_works_without_comment() {
        let (key_type, key) = split_public_key("ssh-ed25519 AAACCC", "postgres").unwrap();
        assert_eq!(key_type, "ssh-ed25519");
        assert_eq!(key, "AAACCC");
    }

    #[test]
    fn split_rejects_bare_material() {
        assert!(matches!(
            split_public_key("AAABBBCCC", "postgres"),
            Err(KeyError::Malformed { .. })
        ));
    }

    #[test]
    fn file_provider_reads_and_trims() {
        let dir = tempfile::tempdir().unwrap();
        let ssh_dir = dir.path().join("postgres").join(".ssh");
        std::fs::create_dir_all(&ssh_dir).unwrap();
        std::fs::write(ssh_dir.join("id_rsa.pub"), "ssh-rsa AAABBBCCC\n").unwrap();

        let provider = FileKeyProvider::new(dir.path());
        assert_eq!(provider.public_key("postgres").unwrap(), "ssh-rsa AAABBBCCC");
    }

    #[test]
    fn file_provider_reports_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileKeyProvider::new(dir.path());
        assert!(matches!(
            provider.public_key("postgres"),
            Err(KeyError::Missing { .. })
        ));
    }

    #[test]
    fn static_keys_serve_fixtures() {
        let keys = StaticKeys::new().with_key("postgres", "ssh-rsa AAABBBCCC");
        assert_eq!(keys.public_key("postgres").unwrap(), "ssh-rsa AAABBBCCC");
        assert!(keys.public_key("pgbackup").is_err());
    }
}
