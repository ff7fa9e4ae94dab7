//! Java source discovery
//!
//! Directories are walked and filtered with the `files` include/exclude
//! globs, matched against paths relative to the walked directory. Explicit
//! file arguments are always taken; arguments containing `*` are expanded
//! with `glob`.

use anyhow::{Context, Result};
use glob::Pattern;
use javelin_core::FilesConfiguration;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Compiled include/exclude patterns
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

fn compile(patterns: &[String], kind: &str) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid {kind} pattern '{p}'")))
        .collect()
}

impl FileDiscovery {
    pub fn new(files: &FilesConfiguration) -> Result<Self> {
        let defaults = FilesConfiguration::default();
        let include = files
            .include
            .as_ref()
            .or(defaults.include.as_ref())
            .cloned()
            .unwrap_or_default();
        let exclude = files
            .exclude
            .as_ref()
            .or(defaults.exclude.as_ref())
            .cloned()
            .unwrap_or_default();
        Ok(Self {
            include: compile(&include, "include")?,
            exclude: compile(&exclude, "exclude")?,
        })
    }

    /// Check a path relative to the walked root against the patterns
    pub fn accepts(&self, relative: &Path) -> bool {
        let text = relative.to_string_lossy().replace('\\', "/");
        self.include.iter().any(|p| p.matches(&text))
            && !self.exclude.iter().any(|p| p.matches(&text))
    }

    /// Sorted, de-duplicated files for the given arguments
    pub fn discover(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();
        for path in paths {
            if path.is_file() {
                files.insert(path.clone());
            } else if path.is_dir() {
                files.extend(self.walk(path));
            } else if path.to_string_lossy().contains('*') {
                let pattern = path.to_string_lossy();
                let entries = glob::glob(&pattern)
                    .with_context(|| format!("Invalid path pattern '{pattern}'"))?;
                files.extend(entries.flatten().filter(|p| p.is_file()));
            } else {
                anyhow::bail!("Path does not exist: {}", path.display());
            }
        }
        debug!("Discovered {} Java files", files.len());
        Ok(files.into_iter().collect())
    }

    fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if self.accepts(relative) {
                files.push(entry.into_path());
            }
        }
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "class A {}\n").unwrap();
    }

    #[test]
    fn test_default_patterns() {
        let discovery = FileDiscovery::new(&FilesConfiguration::default()).unwrap();
        assert!(discovery.accepts(Path::new("A.java")));
        assert!(discovery.accepts(Path::new("src/main/java/A.java")));
        assert!(!discovery.accepts(Path::new("target/classes/A.java")));
        assert!(!discovery.accepts(Path::new("README.md")));
    }

    #[test]
    fn test_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/B.java");
        touch(dir.path(), "src/A.java");
        touch(dir.path(), "build/Gen.java");
        touch(dir.path(), "notes.txt");

        let discovery = FileDiscovery::new(&FilesConfiguration::default()).unwrap();
        let files = discovery.discover(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["src/A.java", "src/B.java"]);
    }

    #[test]
    fn test_custom_exclude() {
        let files = FilesConfiguration {
            include: None,
            exclude: Some(vec!["**/generated/**".to_string()]),
        };
        let discovery = FileDiscovery::new(&files).unwrap();
        assert!(!discovery.accepts(Path::new("src/generated/A.java")));
        assert!(discovery.accepts(Path::new("build/A.java")));
    }

    #[test]
    fn test_explicit_file_and_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Notes.txt");
        let discovery = FileDiscovery::new(&FilesConfiguration::default()).unwrap();

        let explicit = dir.path().join("Notes.txt");
        assert_eq!(discovery.discover(&[explicit.clone()]).unwrap(), vec![explicit]);
        assert!(discovery.discover(&[dir.path().join("Missing.java")]).is_err());
    }
}
