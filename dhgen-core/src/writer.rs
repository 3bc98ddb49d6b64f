//! Commits a [`KeyPairDocument`] to disk.
//!
//! The document is rendered as indented JSON, written to a temporary file in
//! the destination directory, synced, and renamed over the destination. A
//! failed run leaves the destination as it was; the temporary file is removed
//! when its handle drops, on every path.

use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::config::{OutputConfig, DEFAULT_INDENT};
use crate::document::KeyPairDocument;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to serialize key-pair document")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to create a temporary file next to {}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write key-pair document for {}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to commit key-pair document to {}", .path.display())]
    Commit {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Destination the failed write was aimed at, if known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            PersistenceError::Serialize(_) => None,
            PersistenceError::Create { path, .. }
            | PersistenceError::Write { path, .. }
            | PersistenceError::Commit { path, .. } => Some(path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyPairWriter {
    path: PathBuf,
    indent: usize,
}

impl KeyPairWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            indent: DEFAULT_INDENT,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.path.clone()).with_indent(config.indent)
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `doc` exactly as it will appear on disk.
    pub fn render(&self, doc: &KeyPairDocument) -> Result<Zeroizing<Vec<u8>>, PersistenceError> {
        let indent = vec![b' '; self.indent];
        let mut out = Zeroizing::new(Vec::with_capacity(256));
        {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
            let mut serializer = serde_json::Serializer::with_formatter(&mut *out, formatter);
            doc.serialize(&mut serializer)
                .map_err(PersistenceError::Serialize)?;
        }
        Ok(out)
    }

    /// Write `doc`, replacing anything already at the destination.
    pub fn write(&self, doc: &KeyPairDocument) -> Result<PathBuf, PersistenceError> {
        let bytes = self.render(doc)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = NamedTempFile::new_in(dir).map_err(|source| PersistenceError::Create {
            path: self.path.clone(),
            source,
        })?;
        debug!(staged = %staged.path().display(), "staging key-pair document");

        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };
        staged.write_all(&bytes).map_err(write_err)?;
        staged.flush().map_err(write_err)?;
        staged.as_file().sync_all().map_err(write_err)?;

        staged
            .persist(&self.path)
            .map_err(|e| PersistenceError::Commit {
                path: self.path.clone(),
                source: e.error,
            })?;

        info!(path = %self.path.display(), bytes = bytes.len(), "key-pair document written");
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
    use tempfile::TempDir;

    fn sample_doc() -> KeyPairDocument {
        KeyPairDocument::from_bytes(&[0xab; PRIVATE_KEY_SIZE], &[0x01; PUBLIC_KEY_SIZE])
    }

    #[test]
    fn test_render_uses_four_space_indent() {
        let rendered = KeyPairWriter::new("unused").render(&sample_doc()).unwrap();
        let text = std::str::from_utf8(&rendered).unwrap();

        let expected = format!(
            "{{\n    \"dhSecret\": \"{}\",\n    \"dhPublic\": \"{}\"\n}}",
            "ab".repeat(PRIVATE_KEY_SIZE),
            "01".repeat(PUBLIC_KEY_SIZE)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_custom_indent() {
        let rendered = KeyPairWriter::new("unused")
            .with_indent(2)
            .render(&sample_doc())
            .unwrap();
        let text = std::str::from_utf8(&rendered).unwrap();
        assert!(text.starts_with("{\n  \"dhSecret\""));
    }

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keypair.json");

        let written = KeyPairWriter::new(&path).write(&sample_doc()).unwrap();
        assert_eq!(written, path);

        let loaded = KeyPairDocument::load(&path).unwrap();
        assert_eq!(loaded, sample_doc());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keypair.json");
        std::fs::write(&path, "previous contents that are much longer than the new document ".repeat(20)).unwrap();

        KeyPairWriter::new(&path).write(&sample_doc()).unwrap();
        let loaded = KeyPairDocument::load(&path).unwrap();
        assert_eq!(loaded, sample_doc());
    }

    #[test]
    fn test_directory_destination_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();

        let err = KeyPairWriter::new(&target).write(&sample_doc()).unwrap_err();
        assert!(matches!(err, PersistenceError::Commit { .. }));
        assert_eq!(err.path(), Some(target.as_path()));

        // Nothing but the directory we made is left behind.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(target.is_dir());
    }

    #[test]
    fn test_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/keypair.json");

        match KeyPairWriter::new(&path).write(&sample_doc()) {
            Err(PersistenceError::Create { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Create error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keypair.json");
        KeyPairWriter::new(&path).write(&sample_doc()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_from_config() {
        let config = OutputConfig::new("pair.json").with_indent(3);
        let writer = KeyPairWriter::from_config(&config);
        assert_eq!(writer.path(), Path::new("pair.json"));
        let rendered = writer.render(&sample_doc()).unwrap();
        assert!(rendered.starts_with(b"{\n   \"dhSecret\""));
    }
}
