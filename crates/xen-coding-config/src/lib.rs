use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid shortcut file pattern {pattern:?}: {source}")]
    ShortcutPatternError {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Failed to read shortcut file at {path}: {source}")]
    ShortcutReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse shortcut file at {path}: {source}")]
    ShortcutParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// User configuration for abbreviation expansion.
///
/// Every key is optional; unset options fall back to the engine defaults.
///
/// ```toml
/// shortcut_files = ["~/.config/xen-coding/shortcuts/*.toml"]
/// escape_prefixes = ["asp:", "sys:"]
/// indent = "  "
///
/// [shortcuts]
/// card = "local:Card"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glob patterns naming extra TOML files of `alias = "Element"` pairs.
    pub shortcut_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escape_prefixes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbatim_keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<String>,
    /// Alias → element name, layered over the built-in aliases.
    pub shortcuts: BTreeMap<String, String>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/xen-coding");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Alias overrides in precedence order: the inline `[shortcuts]` table
    /// first, then every file matched by `shortcut_files`, in sorted path
    /// order. Callers merge first-write-wins.
    pub fn shortcut_overrides(&self) -> Result<Vec<(String, String)>, ConfigError> {
        let mut overrides: Vec<(String, String)> = self
            .shortcuts
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for path in self.shortcut_file_paths()? {
            let content = std::fs::read_to_string(&path).map_err(|source| {
                ConfigError::ShortcutReadError {
                    path: path.clone(),
                    source,
                }
            })?;
            let table: BTreeMap<String, String> =
                toml::from_str(&content).map_err(|source| ConfigError::ShortcutParseError {
                    path: path.clone(),
                    source,
                })?;
            overrides.extend(table);
        }

        Ok(overrides)
    }

    fn shortcut_file_paths(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut paths = vec![];
        for pattern in &self.shortcut_files {
            let expanded = Self::expand_pattern(pattern);
            let matches =
                glob::glob(&expanded).map_err(|source| ConfigError::ShortcutPatternError {
                    pattern: pattern.clone(),
                    source,
                })?;
            // Unreadable directory entries are skipped, like a shell glob.
            paths.extend(matches.filter_map(Result::ok));
        }
        paths.sort();
        paths.dedup();
        Ok(paths)
    }

    fn expand_pattern(pattern: &str) -> String {
        match shellexpand::full(pattern) {
            Ok(expanded) => expanded.into_owned(),
            Err(_) => pattern.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/xen-coding/config.toml"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert!(config.escape_prefixes.is_none());
        assert!(config.shortcut_overrides().unwrap().is_empty());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            shortcuts: BTreeMap::from([pair("card", "local:Card")]),
            shortcut_files: vec!["/tmp/shortcuts/*.toml".to_string()],
            escape_prefixes: Some(vec!["asp:".to_string(), "sys:".to_string()]),
            verbatim_keywords: None,
            indent: Some("\t".to_string()),
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_expand_pattern_with_tilde() {
        let expanded = Config::expand_pattern("~/shortcuts/*.toml");

        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("shortcuts/*.toml"));
    }

    #[test]
    fn test_expand_pattern_with_env_var() {
        unsafe {
            env::set_var("XEN_SHORTCUT_DIR", "/test/env/path");
        }

        let expanded = Config::expand_pattern("$XEN_SHORTCUT_DIR/*.toml");
        assert_eq!(expanded, "/test/env/path/*.toml");

        unsafe {
            env::remove_var("XEN_SHORTCUT_DIR");
        }
    }

    #[test]
    fn test_expand_pattern_with_unknown_var_is_left_alone() {
        let pattern = "$XEN_SURELY_UNSET_VARIABLE/*.toml";
        assert_eq!(Config::expand_pattern(pattern), pattern);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "shortcuts = 3").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            shortcuts: BTreeMap::from([pair("card", "local:Card")]),
            indent: Some("  ".to_string()),
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_inline_shortcuts_come_before_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("b.toml"),
            "card = \"b:Card\"\nchip = \"b:Chip\"\n",
        )
        .unwrap();
        std::fs::write(temp_dir.path().join("a.toml"), "card = \"a:Card\"\n").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "not toml").unwrap();

        let config_content = format!(
            "shortcut_files = [\"{}/*.toml\"]\n\n[shortcuts]\ncard = \"local:Card\"\n",
            temp_dir.path().display()
        );
        let config: Config = toml::from_str(&config_content).unwrap();

        assert_eq!(
            config.shortcut_overrides().unwrap(),
            vec![
                pair("card", "local:Card"),
                pair("card", "a:Card"),
                pair("card", "b:Card"),
                pair("chip", "b:Chip"),
            ]
        );
    }

    #[test]
    fn test_unmatched_pattern_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            shortcut_files: vec![format!("{}/missing/*.toml", temp_dir.path().display())],
            ..Config::default()
        };

        assert!(config.shortcut_overrides().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let config = Config {
            shortcut_files: vec!["[".to_string()],
            ..Config::default()
        };

        let err = config.shortcut_overrides().unwrap_err();
        assert!(matches!(err, ConfigError::ShortcutPatternError { .. }));
    }

    #[test]
    fn test_unparseable_shortcut_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "card = [").unwrap();
        let config = Config {
            shortcut_files: vec![path.display().to_string()],
            ..Config::default()
        };

        let err = config.shortcut_overrides().unwrap_err();
        assert!(matches!(err, ConfigError::ShortcutParseError { .. }));
    }
}
