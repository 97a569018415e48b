//! Block configuration
//!
//! Configuration is built explicitly and handed to the registry. The `app`
//! namespace carries the setup flags; the `blocks` namespace lists the block
//! sources in the order they should be offered to editors.

use log::info;
use serde::Deserialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

use crate::core::block::Block;
use crate::core::registry::BlockSource;

/// File name of the block configuration inside the config directory
pub const BLOCKS_CONFIG_FILE: &str = "blocks.json";

/// Block configuration bundled with the crate, copied on first setup
pub const DEFAULT_BLOCKS_CONFIG: &str = include_str!("../config/blocks.json");

/// Application settings (`app.*`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// First-time setup; allows provisioning the default block configuration
    #[serde(default)]
    pub preflight: bool,
    /// Directory the host reads configuration files from
    #[serde(default)]
    pub config_dir: PathBuf,
}

/// Block settings (`blocks.*`)
#[derive(Debug, Default, Deserialize)]
pub struct BlocksConfig {
    /// Block sources in picker order
    #[serde(default)]
    pub blocks: Vec<BlockSource>,
}

impl BlocksConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Append a block type reference
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.blocks.push(BlockSource::Reference(reference.into()));
        self
    }

    /// Append a ready block instance
    pub fn instance<B: Block + 'static>(mut self, block: B) -> Self {
        self.blocks.push(BlockSource::instance(block));
        self
    }
}

/// Complete configuration passed to the registry
#[derive(Debug, Default)]
pub struct Config {
    pub app: AppConfig,
    /// `None` until a block configuration exists for the installation
    pub blocks: Option<BlocksConfig>,
}

impl Config {
    pub fn new(app: AppConfig) -> Self {
        Self { app, blocks: None }
    }

    pub fn with_blocks(mut self, blocks: BlocksConfig) -> Self {
        self.blocks = Some(blocks);
        self
    }

    /// Build configuration, reading `blocks.json` from the config directory if present
    pub fn load(app: AppConfig) -> Result<Self, ConfigError> {
        let mut config = Self::new(app);
        let path = config.blocks_path();

        match fs::read_to_string(&path) {
            Ok(contents) => {
                let blocks = BlocksConfig::from_json(&contents)
                    .map_err(|source| ConfigError::Parse { path, source })?;
                config.blocks = Some(blocks);
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        Ok(config)
    }

    /// Location of the block configuration file
    pub fn blocks_path(&self) -> PathBuf {
        self.app.config_dir.join(BLOCKS_CONFIG_FILE)
    }
}

/// Copy the bundled block configuration into the config directory
///
/// Only runs during first-time setup when no block configuration exists. The
/// contents are staged in a temporary file in the config directory and moved
/// into place once fully written. An existing file is never overwritten.
///
/// # Returns
/// `true` if the file was written
pub fn provision_default_config(config: &Config) -> Result<bool, ConfigError> {
    if config.blocks.is_some() || !config.app.preflight {
        return Ok(false);
    }

    fs::create_dir_all(&config.app.config_dir)?;
    let path = config.blocks_path();
    if path.exists() {
        return Ok(false);
    }

    let mut staged = NamedTempFile::new_in(&config.app.config_dir)?;
    staged.write_all(DEFAULT_BLOCKS_CONFIG.as_bytes())?;
    staged.as_file().sync_all()?;
    match staged.persist_noclobber(&path) {
        Ok(_) => {}
        Err(err) if err.error.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(err.error.into()),
    }

    info!("event=config_provisioned path={}", path.display());
    Ok(true)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid block configuration {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir, preflight: bool) -> AppConfig {
        AppConfig {
            preflight,
            config_dir: dir.path().join("config"),
        }
    }

    #[test]
    fn test_bundled_config_parses() {
        let blocks = BlocksConfig::from_json(DEFAULT_BLOCKS_CONFIG).unwrap();
        assert!(!blocks.blocks.is_empty());
    }

    #[test]
    fn test_load_without_file_has_no_blocks() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(app_in(&dir, false)).unwrap();
        assert!(config.blocks.is_none());
    }

    #[test]
    fn test_load_reads_ordered_references() {
        let dir = TempDir::new().unwrap();
        let app = app_in(&dir, false);
        fs::create_dir_all(&app.config_dir).unwrap();
        fs::write(
            app.config_dir.join(BLOCKS_CONFIG_FILE),
            r#"{ "blocks": ["Hero", "Testimonial", "CallToAction"] }"#,
        )
        .unwrap();

        let config = Config::load(app).unwrap();
        let references: Vec<_> = config
            .blocks
            .unwrap()
            .blocks
            .into_iter()
            .map(|source| match source {
                BlockSource::Reference(name) => name,
                BlockSource::Instance(_) => panic!("json only yields references"),
            })
            .collect();
        assert_eq!(references, vec!["Hero", "Testimonial", "CallToAction"]);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let app = app_in(&dir, false);
        fs::create_dir_all(&app.config_dir).unwrap();
        fs::write(app.config_dir.join(BLOCKS_CONFIG_FILE), "{ not json").unwrap();

        let result = Config::load(app);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_provision_requires_preflight() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(app_in(&dir, false));

        assert!(!provision_default_config(&config).unwrap());
        assert!(!config.blocks_path().exists());
    }

    #[test]
    fn test_provision_skips_when_blocks_configured() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(app_in(&dir, true)).with_blocks(BlocksConfig::new());

        assert!(!provision_default_config(&config).unwrap());
        assert!(!config.blocks_path().exists());
    }

    #[test]
    fn test_provision_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(app_in(&dir, true));
        fs::create_dir_all(&config.app.config_dir).unwrap();
        fs::write(config.blocks_path(), r#"{ "blocks": [] }"#).unwrap();

        assert!(!provision_default_config(&config).unwrap());
        assert_eq!(fs::read_to_string(config.blocks_path()).unwrap(), r#"{ "blocks": [] }"#);
    }

    #[test]
    fn test_provision_leaves_only_the_complete_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(app_in(&dir, true));

        assert!(provision_default_config(&config).unwrap());

        let entries: Vec<_> = fs::read_dir(&config.app.config_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from(BLOCKS_CONFIG_FILE)]);
        assert_eq!(fs::read_to_string(config.blocks_path()).unwrap(), DEFAULT_BLOCKS_CONFIG);
        assert!(Config::load(config.app.clone()).unwrap().blocks.is_some());
    }

    #[test]
    fn test_failed_provision_writes_nothing() {
        let dir = TempDir::new().unwrap();
        // A plain file where the config directory should be makes staging fail
        let blocker = dir.path().join("config");
        fs::write(&blocker, "").unwrap();
        let config = Config::new(app_in(&dir, true));

        assert!(matches!(provision_default_config(&config), Err(ConfigError::Io(_))));
        assert!(!config.blocks_path().exists());
    }
}
