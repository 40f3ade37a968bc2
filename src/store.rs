//! Access to the file-backed encrypted credential store.
//!
//! Encryption and on-disk layout belong to `pass`; this module only lists
//! entry paths and moves decrypted plaintext in and out.
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::exec::Executor;

/// File extension of encrypted entries.
const ENTRY_EXT: &str = "gpg";

/// Read/write access to credential entries by path.
pub trait CredentialStore: std::fmt::Debug {
    /// Every entry path, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Decrypted plaintext of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Show`] if the entry cannot be decrypted.
    fn show(&self, path: &str) -> Result<String, StoreError>;

    /// Write `content` to `path`, overwriting any existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Insert`] if the entry cannot be written.
    fn insert(&self, path: &str, content: &str) -> Result<(), StoreError>;

    /// Delete `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Remove`] if the entry cannot be removed.
    fn remove(&self, path: &str) -> Result<(), StoreError>;

    /// Whether `path` exists.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`CredentialStore::list`].
    fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.list()?.iter().any(|p| p == path))
    }
}

/// [`CredentialStore`] backed by the `pass` command.
#[derive(Debug)]
pub struct PassStore<'a> {
    dir: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> PassStore<'a> {
    /// Create a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: PathBuf, executor: &'a dyn Executor) -> Self {
        Self { dir, executor }
    }

    /// Default store directory: `$PASSWORD_STORE_DIR` or `~/.password-store`.
    #[must_use]
    pub fn default_dir() -> PathBuf {
        std::env::var_os("PASSWORD_STORE_DIR").map_or_else(
            || {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".password-store")
            },
            PathBuf::from,
        )
    }

    /// Store root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `pass` arguments prefixed with the store directory via `env`, so the
    /// executor does not need per-call environment support.
    fn pass_args<'b>(dir: &'b str, args: &[&'b str]) -> Vec<&'b str> {
        let mut out = vec![dir, "pass"];
        out.extend_from_slice(args);
        out
    }

    fn env_assignment(&self) -> String {
        format!("PASSWORD_STORE_DIR={}", self.dir.display())
    }
}

impl CredentialStore for PassStore<'_> {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.is_dir() {
            return Err(StoreError::Missing {
                path: self.dir.clone(),
            });
        }
        let mut entries = Vec::new();
        collect_entries(&self.dir, &self.dir, &mut entries)?;
        entries.sort();
        Ok(entries)
    }

    fn show(&self, path: &str) -> Result<String, StoreError> {
        let env = self.env_assignment();
        let result = self
            .executor
            .run_unchecked("env", &Self::pass_args(&env, &["show", path]))
            .map_err(|e| StoreError::Show {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        if !result.success {
            return Err(StoreError::Show {
                path: path.to_string(),
                reason: result.stderr.trim().to_string(),
            });
        }
        Ok(result.stdout)
    }

    fn insert(&self, path: &str, content: &str) -> Result<(), StoreError> {
        let env = self.env_assignment();
        let args = Self::pass_args(&env, &["insert", "--multiline", "--force", path]);
        let result = self
            .executor
            .run_unchecked_with_input("env", &args, content)
            .map_err(|e| StoreError::Insert {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        if !result.success {
            return Err(StoreError::Insert {
                path: path.to_string(),
                reason: result.stderr.trim().to_string(),
            });
        }
        tracing::debug!("inserted {path}");
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<(), StoreError> {
        let env = self.env_assignment();
        let result = self
            .executor
            .run_unchecked("env", &Self::pass_args(&env, &["rm", "--force", path]))
            .map_err(|e| StoreError::Remove {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        if !result.success {
            return Err(StoreError::Remove {
                path: path.to_string(),
                reason: result.stderr.trim().to_string(),
            });
        }
        tracing::debug!("removed {path}");
        Ok(())
    }

    fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.dir.join(format!("{path}.{ENTRY_EXT}")).is_file())
    }
}

/// Recursively collect `*.gpg` files below `dir` as store-relative paths,
/// skipping hidden directories such as `.git`.
fn collect_entries(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<(), StoreError> {
    let read = fs::read_dir(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for item in read {
        let item = item.map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = item.path();
        let hidden = item.file_name().to_string_lossy().starts_with('.');
        if path.is_dir() {
            if !hidden {
                collect_entries(root, &path, out)?;
            }
            continue;
        }
        if path.extension().is_some_and(|e| e == ENTRY_EXT)
            && let Ok(rel) = path.with_extension("").strip_prefix(root)
        {
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(parts.join("/"));
        }
    }
    Ok(())
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::MockExecutor;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn list_walks_nested_gpg_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "web/github/alice.gpg");
        touch(tmp.path(), "email.gpg");
        touch(tmp.path(), "web/notes.txt");
        touch(tmp.path(), ".git/objects/aa.gpg");
        touch(tmp.path(), ".gpg-id");
        let exec = MockExecutor::new();
        let store = PassStore::new(tmp.path().to_path_buf(), &exec);
        assert_eq!(store.list().unwrap(), vec!["email", "web/github/alice"]);
    }

    #[test]
    fn list_missing_dir_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = MockExecutor::new();
        let store = PassStore::new(tmp.path().join("nope"), &exec);
        assert!(matches!(store.list(), Err(StoreError::Missing { .. })));
    }

    #[test]
    fn exists_checks_file() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a/b.gpg");
        let exec = MockExecutor::new();
        let store = PassStore::new(tmp.path().to_path_buf(), &exec);
        assert!(store.exists("a/b").unwrap());
        assert!(!store.exists("a/c").unwrap());
    }

    #[test]
    fn show_runs_pass_show_with_store_dir() {
        let exec = MockExecutor::new().with_stdout("pw\nuser: bob\n");
        let store = PassStore::new(PathBuf::from("/s"), &exec);
        assert_eq!(store.show("web/x").unwrap(), "pw\nuser: bob\n");
        let calls = exec.calls_to("env");
        assert_eq!(
            calls[0].args,
            vec!["PASSWORD_STORE_DIR=/s", "pass", "show", "web/x"]
        );
    }

    #[test]
    fn show_failure_maps_to_show_error() {
        let exec = MockExecutor::new().with_failure();
        let store = PassStore::new(PathBuf::from("/s"), &exec);
        let err = store.show("web/x").unwrap_err();
        assert!(err.to_string().starts_with("failed to retrieve password for 'web/x'"));
    }

    #[test]
    fn insert_pipes_content_multiline() {
        let exec = MockExecutor::new();
        let store = PassStore::new(PathBuf::from("/s"), &exec);
        store.insert("new/entry", "pw\nuser: x\n").unwrap();
        let call = &exec.calls_to("env")[0];
        assert_eq!(
            call.args,
            vec![
                "PASSWORD_STORE_DIR=/s",
                "pass",
                "insert",
                "--multiline",
                "--force",
                "new/entry"
            ]
        );
        assert_eq!(call.input.as_deref(), Some("pw\nuser: x\n"));
    }

    #[test]
    fn remove_failure_is_error() {
        let exec = MockExecutor::new().with_failure();
        let store = PassStore::new(PathBuf::from("/s"), &exec);
        assert!(matches!(store.remove("a"), Err(StoreError::Remove { .. })));
    }
}
