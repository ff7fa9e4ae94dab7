//! Configuration file discovery and loading

use super::JavelinConfig;
use crate::error::JavelinError;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// File names searched in each directory, in priority order
const CONFIG_FILE_NAMES: &[&str] = &[
    "javelin.toml",
    ".javelin.toml",
    "javelin.json",
    "javelin.yaml",
    "javelin.yml",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| JavelinError::io_failed(start_path, e))?;
        if current.is_file()
            && let Some(parent) = current.parent()
        {
            current = parent.to_path_buf();
        }

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<JavelinConfig> {
        JavelinConfig::load(path)
    }

    /// Load config from an explicit path, or discover one from `start_dir`
    ///
    /// An explicit path must exist. Without one, a missing config file
    /// means defaults.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<JavelinConfig> {
        if let Some(path) = custom_path {
            if !path.is_file() {
                return Err(JavelinError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(JavelinConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleLevel;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "javelin.json",
            r#"{ "formatter": { "lineWidth": 120 } }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.format_options().line_width, 120);
    }

    #[test]
    fn test_load_from_file_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "javelin.yml",
            "linter:\n  rules:\n    STYLE-NAMING-01: error\n  disabled:\n    - STYLE-IMPORT-01\n",
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        let linter = config.linter_config();
        assert_eq!(linter.rules.unwrap()["STYLE-NAMING-01"], RuleLevel::Error);
        assert_eq!(linter.disabled, Some(vec!["STYLE-IMPORT-01".to_string()]));
    }

    #[test]
    fn test_auto_discover_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/main/java");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), ".javelin.toml", "[formatter]\nindentWidth = 2\n");

        let found = ConfigLoader::auto_discover(&nested).unwrap().unwrap();
        assert!(found.ends_with(".javelin.toml"));

        let config = ConfigLoader::load(None, Some(&nested)).unwrap();
        assert_eq!(config.format_options().indent_width, 2);
    }

    #[test]
    fn test_priority_within_directory() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "javelin.yaml", "formatter:\n  lineWidth: 80\n");
        create_temp_config(temp_dir.path(), "javelin.toml", "[formatter]\nlineWidth = 90\n");

        let config = ConfigLoader::load(None, Some(temp_dir.path())).unwrap();
        assert_eq!(config.format_options().line_width, 90);
    }

    #[test]
    fn test_invalid_content_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "javelin.toml", "[formatter\n");
        let err = ConfigLoader::load_from_file(&config_path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.toml")), None);
        assert!(result.is_err());
    }
}
