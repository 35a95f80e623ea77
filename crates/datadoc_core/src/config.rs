//! Configuration types for datadoc.
//!
//! [`Config`] stores user preferences for rendering and parsing. It is persisted as TOML
//! (typically at `~/.config/datadoc/config.toml` on Unix systems). Every field has a default,
//! so a partial or missing file is fine.
//!
//! # Example
//!
//! ```ignore
//! use datadoc_core::config::Config;
//!
//! let config = Config::load()?;
//! let options = config.parse_options();
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DatadocError, Result};
use crate::fs::FileSystem;
use crate::parser::ParseOptions;

/// When to colour terminal output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Colour when writing to a terminal
    #[default]
    Auto,
    /// Always colour
    Always,
    /// Never colour
    Never,
}

/// Default rendering for diffs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffFormat {
    /// Markdown tables
    #[default]
    Markdown,
    /// Pretty-printed JSON
    Json,
}

/// `Config` is the part of datadoc that the user can configure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Colour mode for diffs and status output
    pub color: ColorChoice,

    /// Format used by `diff` when none is requested
    pub diff_format: DiffFormat,

    /// Treat a facet whose declared row count disagrees with its rows as an error
    pub strict_counts: bool,
}

impl Config {
    /// Parser settings derived from this config.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            strict_counts: self.strict_counts,
        }
    }

    /// Load config from a specific path.
    pub fn load_from<FS: FileSystem>(fs: FS, path: &Path) -> Result<Self> {
        let contents = fs
            .read_to_string(path)
            .map_err(|e| DatadocError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to a specific path. The parent directory must exist.
    pub fn save_to<FS: FileSystem>(&self, fs: FS, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs.write_file(path, &contents)
            .map_err(|e| DatadocError::FileWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Config {
    /// Get the config file path (~/.config/datadoc/config.toml)
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("datadoc").join("config.toml"))
    }

    /// Load config from default location, or return default if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            return Self::load_from(crate::fs::RealFileSystem, &path);
        }

        Ok(Config::default())
    }

    /// Save config to default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(DatadocError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        self.save_to(crate::fs::RealFileSystem, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockFileSystem;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.color, ColorChoice::Auto);
        assert_eq!(config.diff_format, DiffFormat::Markdown);
        assert!(!config.strict_counts);
        assert!(!config.parse_options().strict_counts);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let fs = MockFileSystem::new().with_file("config.toml", "color = \"never\"\n");
        let config = Config::load_from(&fs, Path::new("config.toml")).unwrap();
        assert_eq!(config.color, ColorChoice::Never);
        assert_eq!(config.diff_format, DiffFormat::Markdown);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let fs = MockFileSystem::new();
        let config = Config {
            color: ColorChoice::Always,
            diff_format: DiffFormat::Json,
            strict_counts: true,
        };
        config.save_to(&fs, Path::new("config.toml")).unwrap();

        let saved = fs.get_content("config.toml").unwrap();
        assert!(saved.contains("diff_format = \"json\""));
        assert_eq!(
            Config::load_from(&fs, Path::new("config.toml")).unwrap(),
            config
        );
    }

    #[test]
    fn test_invalid_value_is_parse_error() {
        let fs = MockFileSystem::new().with_file("config.toml", "color = \"sometimes\"\n");
        assert!(matches!(
            Config::load_from(&fs, Path::new("config.toml")),
            Err(DatadocError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::load_from(MockFileSystem::new(), Path::new("config.toml")),
            Err(DatadocError::FileRead { .. })
        ));
    }
}
