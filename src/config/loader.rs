use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::UserDirs;

use super::Config;

const CONFIG_DIR: &str = ".tsuzuri";
const CONFIG_FILE: &str = "config.toml";

impl Config {
    /// Load `~/.tsuzuri/config.toml`, writing a default one on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_at(&home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn load_or_init_at(config_path: &Path) -> Result<Self> {
        if let Some(dir) = config_path.parent()
            && !dir.exists()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path = config_path.to_path_buf();
            config
        } else {
            let config = Self {
                config_path: config_path.to_path_buf(),
                ..Self::default()
            };
            config.save()?;
            tracing::info!(path = %config_path.display(), "wrote default config");
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let mut persisted = self.clone();
        // Keys supplied via the environment stay out of the file.
        if std::env::var("TSUZURI_API_KEY").is_ok() || std::env::var("ANTHROPIC_API_KEY").is_ok() {
            persisted.llm.api_key = None;
        }
        let toml_str = toml::to_string_pretty(&persisted).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    pub fn default_dir() -> Option<PathBuf> {
        UserDirs::new().map(|u| u.home_dir().join(CONFIG_DIR))
    }
}
