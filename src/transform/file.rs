//! Filesystem side effects issued in apply mode.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A mutation planned by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    Write { path: PathBuf, contents: String },
    Rename { from: PathBuf, to: PathBuf },
}

impl FileOperation {
    /// Executes the file operation.
    ///
    /// A rename never replaces an existing entry: if `to` exists the call
    /// fails with [`io::ErrorKind::AlreadyExists`]. A failed write may leave
    /// the file truncated or partially written.
    pub fn execute(&self) -> io::Result<()> {
        match self {
            FileOperation::Write { path, contents } => fs::write(path, contents),
            FileOperation::Rename { from, to } => {
                if target_exists(to) {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("{} already exists", to.display()),
                    ));
                }
                fs::rename(from, to)
            }
        }
    }

    /// Returns a description of the operation.
    pub fn describe(&self) -> String {
        match self {
            FileOperation::Write { path, contents } => {
                format!("Write {} ({} bytes)", path.display(), contents.len())
            }
            FileOperation::Rename { from, to } => {
                format!("Rename {} -> {}", from.display(), to.display())
            }
        }
    }
}

/// True when anything, including a dangling symlink, occupies `path`.
pub(crate) fn target_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "old").unwrap();

        FileOperation::Write {
            path: path.clone(),
            contents: "new".to_string(),
        }
        .execute()
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_rename() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("ublock.js");
        let to = dir.path().join("ablock.js");
        fs::write(&from, "x").unwrap();

        FileOperation::Rename {
            from: from.clone(),
            to: to.clone(),
        }
        .execute()
        .unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "x");
    }

    #[test]
    fn test_rename_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("ublock.js");
        let to = dir.path().join("ablock.js");
        fs::write(&from, "mine").unwrap();
        fs::write(&to, "theirs").unwrap();

        let err = FileOperation::Rename {
            from: from.clone(),
            to: to.clone(),
        }
        .execute()
        .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&from).unwrap(), "mine");
        assert_eq!(fs::read_to_string(&to).unwrap(), "theirs");
    }

    #[test]
    fn test_describe() {
        let op = FileOperation::Rename {
            from: PathBuf::from("a"),
            to: PathBuf::from("b"),
        };
        assert_eq!(op.describe(), "Rename a -> b");
    }
}
