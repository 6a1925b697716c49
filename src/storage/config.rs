//! Configuration handling for loopsmith
//!
//! Configuration is stored in `.loopsmith/config.toml` (site) and
//! `~/.config/loopsmith/config.toml` (global). Set `LOOPSMITH_CONFIG_DIR` to
//! point the global lookup somewhere else.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::template::DEFAULT_EXTENSION;

/// Name of the per-site state directory
pub const SITE_DIR: &str = ".loopsmith";

/// Environment variable overriding the global config directory
pub const CONFIG_DIR_ENV: &str = "LOOPSMITH_CONFIG_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Loop options as persisted; absent keys fall back to compiled-in defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StoredOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_repeats: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_template: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppress_stickies: Option<bool>,
}

/// How template files are recognized
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateSettings {
    /// Template file extension, without the dot
    pub extension: String,

    /// Only accept files whose final extension matches, instead of any
    /// name containing the extension
    pub strict_matching: bool,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            strict_matching: false,
        }
    }
}

/// Site-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    /// Loop options
    pub options: StoredOptions,

    /// Template file settings
    pub templates: TemplateSettings,
}

impl SiteConfig {
    /// Validates values that would otherwise fail later in confusing ways
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extension = &self.templates.extension;
        if extension.is_empty() || extension.contains(['.', '/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "templates.extension must be a bare extension, got '{}'",
                extension
            )));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Directory holding the default loop templates for every site
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_templates_dir: Option<PathBuf>,
}

/// Combined configuration (global + site)
#[derive(Debug, Clone)]
pub struct Config {
    pub site: SiteConfig,
    pub global: GlobalConfig,
    pub site_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific site
    pub fn for_site(site_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let site = Self::load_site_config(site_root)?;

        Ok(Self {
            site,
            global,
            site_root: Some(site_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir));
        }
        ProjectDirs::from("dev", "loopsmith", "loopsmith")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads site configuration from a specific root
    fn load_site_config(site_root: &Path) -> Result<SiteConfig> {
        let config_path = Self::site_config_path(site_root);

        if !config_path.exists() {
            return Ok(SiteConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read site config: {}", config_path.display()))?;

        let config: SiteConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse site config")?;

        config.validate()?;
        Ok(config)
    }

    /// Path of the site config file under `site_root`
    pub fn site_config_path(site_root: &Path) -> PathBuf {
        site_root.join(SITE_DIR).join("config.toml")
    }

    /// Finds the site root by looking for `.loopsmith/` from the current directory up
    pub fn find_site_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_site_root_from(&current)
    }

    /// Finds the site root by looking for `.loopsmith/` from `start` up
    pub fn find_site_root_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(SITE_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns the site root, or an error if not in a site
    pub fn require_site_root(&self) -> Result<&Path> {
        self.site_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in a loopsmith site. Run 'loopsmith init' first."))
    }

    /// Saves the site configuration
    pub fn save_site(&self) -> Result<()> {
        let root = self.require_site_root()?;
        let config_path = Self::site_config_path(root);

        let content =
            toml::to_string_pretty(&self.site).context("Failed to serialize site config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write site config: {}", config_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = SiteConfig::default();

        assert_eq!(config.options, StoredOptions::default());
        assert_eq!(config.templates.extension, "php");
        assert!(!config.templates.strict_matching);
    }

    #[test]
    fn parse_site_config() {
        let toml = r#"
[options]
template_location = "themes/loops"
exclude_repeats = false

[templates]
strict_matching = true
"#;

        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.options.template_location.as_deref(),
            Some("themes/loops")
        );
        assert_eq!(config.options.exclude_repeats, Some(false));
        assert_eq!(config.options.default_template, None);
        assert!(config.templates.strict_matching);
        assert_eq!(config.templates.extension, "php");
    }

    #[test]
    fn parse_global_config() {
        let toml = r#"default_templates_dir = "/srv/loops""#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.default_templates_dir,
            Some(PathBuf::from("/srv/loops"))
        );
    }

    #[test]
    fn unset_options_are_not_written() {
        let mut config = SiteConfig::default();
        config.options.default_template = Some("zebra_list".to_string());

        let content = toml::to_string_pretty(&config).unwrap();
        assert!(content.contains("default_template = \"zebra_list\""));
        assert!(!content.contains("exclude_repeats"));
    }

    #[test]
    fn rejects_dotted_extension() {
        let mut config = SiteConfig::default();
        config.templates.extension = ".php".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn find_site_root_from_subdir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(SITE_DIR)).unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_site_root_from(&sub_dir);
        assert_eq!(root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn config_not_in_site() {
        let config = Config {
            site: SiteConfig::default(),
            global: GlobalConfig::default(),
            site_root: None,
        };

        assert!(config.require_site_root().is_err());
        assert!(config.save_site().is_err());
    }

    #[test]
    fn save_and_reload_site() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(SITE_DIR)).unwrap();

        let mut config = Config {
            site: SiteConfig::default(),
            global: GlobalConfig::default(),
            site_root: Some(dir.path().to_path_buf()),
        };
        config.site.options.suppress_stickies = Some(false);
        config.save_site().unwrap();

        let loaded = Config::load_site_config(dir.path()).unwrap();
        assert_eq!(loaded.options.suppress_stickies, Some(false));
    }
}
