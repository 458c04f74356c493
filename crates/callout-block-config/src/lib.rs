use callout_block_engine::{BlockConfig, Catalog, PasteSync, Styles};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
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
}

/// Host-wide style class tokens as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    pub block: String,
    pub input: String,
}

impl Default for StylesConfig {
    fn default() -> Self {
        let styles = Styles::default();
        Self {
            block: styles.block,
            input: styles.input,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub paste_sync: PasteSync,
    /// TOML file mapping translation keys to display text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations_path: Option<PathBuf>,
    pub styles: StylesConfig,
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

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the translations path
        config.translations_path = config
            .translations_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

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

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/callout-block");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The per-tool part of the config, as the block consumes it
    pub fn block_config(&self) -> BlockConfig {
        BlockConfig {
            placeholder: self.placeholder.clone(),
            emoji: self.emoji.clone(),
            paste_sync: self.paste_sync,
        }
    }

    pub fn styles(&self) -> Styles {
        Styles {
            block: self.styles.block.clone(),
            input: self.styles.input.clone(),
        }
    }

    /// Load the translation catalog; no configured path gives an empty one
    pub fn load_translations(&self) -> Result<Catalog, ConfigError> {
        let Some(path) = &self.translations_path else {
            return Ok(Catalog::default());
        };
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigReadError {
                config_path: path.clone(),
                source,
            })?;
        let entries: HashMap<String, String> =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: path.clone(),
                source,
            })?;
        Ok(Catalog::new(entries))
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callout_block_engine::I18n;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/callout-block/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.block_config(), BlockConfig::default());
        assert_eq!(config.styles(), Styles::default());
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = toml::from_str(
            r#"
placeholder = "Note"
emoji = "⚠️"
paste_sync = "state_only"

[styles]
block = "my-block"
"#,
        )
        .unwrap();

        let block_config = config.block_config();
        assert_eq!(block_config.placeholder.as_deref(), Some("Note"));
        assert_eq!(block_config.emoji.as_deref(), Some("⚠️"));
        assert_eq!(block_config.paste_sync, PasteSync::StateOnly);
        assert_eq!(config.styles().block, "my-block");
        assert_eq!(config.styles().input, "cdx-input");
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "paste_sync = \"sometimes\"").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let test_config = Config {
            placeholder: Some("Write here".to_string()),
            paste_sync: PasteSync::StateOnly,
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_translations_path_expands_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            temp_dir.path().join("fr.toml"),
            "\"Enter Your Callout!\" = \"Écrivez votre encadré\"\n",
        )
        .unwrap();
        std::fs::write(
            &config_file,
            "translations_path = \"$CALLOUT_TEST_LOCALES/fr.toml\"\n",
        )
        .unwrap();

        unsafe {
            env::set_var("CALLOUT_TEST_LOCALES", temp_dir.path());
        }
        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        unsafe {
            env::remove_var("CALLOUT_TEST_LOCALES");
        }

        assert_eq!(
            config.translations_path,
            Some(temp_dir.path().join("fr.toml"))
        );
        let catalog = config.load_translations().unwrap();
        assert_eq!(catalog.t("Enter Your Callout!"), "Écrivez votre encadré");
        assert_eq!(catalog.t("Callout"), "Callout");
    }

    #[test]
    fn test_missing_translations_file_is_a_read_error() {
        let config = Config {
            translations_path: Some(PathBuf::from("/nonexistent/callout/fr.toml")),
            ..Config::default()
        };

        assert!(matches!(
            config.load_translations(),
            Err(ConfigError::ConfigReadError { .. })
        ));
    }

    #[test]
    fn test_no_translations_path_gives_empty_catalog() {
        let catalog = Config::default().load_translations().unwrap();
        assert_eq!(catalog.t("key"), "key");
    }
}
