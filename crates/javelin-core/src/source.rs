//! Source files handed to the formatter and the analyzer

use crate::error::JavelinError;
use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A file identifier paired with its full text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a file from disk
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| JavelinError::io_failed(path, e))?;
        Ok(Self::new(path, text))
    }

    /// Write `text` back to this file's path
    pub fn write(&self, text: &str) -> Result<()> {
        fs::write(&self.path, text).map_err(|e| JavelinError::io_failed(&self.path, e))
    }

    /// Same file identifier, replaced text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(self.path.clone(), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_read_and_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, "class A {}\n").unwrap();

        let source = SourceFile::read(&path).unwrap();
        assert_eq!(source.text, "class A {}\n");

        let updated = source.with_text("class B {}\n");
        updated.write(&updated.text).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "class B {}\n");
    }

    #[test]
    fn test_missing_file_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceFile::read(dir.path().join("Missing.java")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("Missing.java"));
    }
}
