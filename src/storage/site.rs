//! Site management
//!
//! Handles site initialization and provides access to options, templates
//! and posts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::debug;

use crate::template::{bundled, TemplateCatalog, TemplateMatcher, TemplateResolver};

use super::config::SITE_DIR;
use super::options::OptionName;
use super::{Config, Options, PostStore};

/// Default template directory, relative to the site state directory
pub const DEFAULT_TEMPLATES_DIR: &str = "default_loop_templates";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Not in a loopsmith site. Run 'loopsmith init' first.")]
    NotInSite,

    #[error("Template location must stay inside the site: '{0}'")]
    TemplateLocationOutsideSite(String),
}

/// A loopsmith site
#[derive(Debug)]
pub struct Site {
    root: PathBuf,
    config: Config,
}

impl Site {
    /// Opens an existing site at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(SITE_DIR).is_dir() {
            return Err(SiteError::NotInSite.into());
        }

        let config = Config::for_site(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the site at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_site_root().ok_or(SiteError::NotInSite)?;

        Self::open(root)
    }

    /// Initializes a new site at the given path
    ///
    /// Safe to run again: existing config, posts and templates are kept.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let site_dir = root.join(SITE_DIR);

        fs::create_dir_all(&site_dir).with_context(|| {
            format!("Failed to create {} directory: {}", SITE_DIR, site_dir.display())
        })?;

        let config_path = Config::site_config_path(&root);
        if !config_path.exists() {
            let default_config = r#"# loopsmith site configuration

[options]
# template_location = "loop_templates"
# exclude_repeats = true
# default_template = "simple_UL"
# suppress_stickies = true

[templates]
extension = "php"
strict_matching = false
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let posts_path = site_dir.join("posts.jsonl");
        if !posts_path.exists() {
            fs::write(&posts_path, "")
                .with_context(|| format!("Failed to create post store: {}", posts_path.display()))?;
        }

        let site = Self::open(root)?;

        let custom_dir = site.custom_template_dir()?;
        fs::create_dir_all(&custom_dir).with_context(|| {
            format!(
                "Failed to create template directory: {}",
                custom_dir.display()
            )
        })?;

        let resolver = site.resolver()?;
        let installed = bundled::install(resolver.default_dir(), resolver.extension())?;
        debug!(installed, dir = %resolver.default_dir().display(), "installed bundled templates");

        Ok(site)
    }

    /// Returns the site root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.loopsmith` directory path
    pub fn site_dir(&self) -> PathBuf {
        self.root.join(SITE_DIR)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Effective loop options
    pub fn options(&self) -> Options {
        Options::from_stored(&self.config.site.options)
    }

    /// Stores an option and saves the site config
    pub fn set_option(&mut self, name: OptionName, value: &str) -> Result<()> {
        let mut options = self.config.site.options.clone();
        options.set(name, value)?;

        if let Some(location) = &options.template_location {
            check_template_location(location)?;
        }

        self.config.site.options = options;
        self.config.save_site()
    }

    /// Template file extension configured for this site
    pub fn extension(&self) -> &str {
        &self.config.site.templates.extension
    }

    /// `{site}/{template_location}`
    pub fn custom_template_dir(&self) -> Result<PathBuf> {
        let options = self.options();
        let location = options.template_location();
        check_template_location(location)?;
        Ok(self.root.join(location))
    }

    /// The global override when configured, otherwise `.loopsmith/default_loop_templates`
    ///
    /// A relative override is taken relative to the site root.
    pub fn default_template_dir(&self) -> PathBuf {
        match &self.config.global.default_templates_dir {
            Some(dir) => self.root.join(dir),
            None => self.site_dir().join(DEFAULT_TEMPLATES_DIR),
        }
    }

    pub fn resolver(&self) -> Result<TemplateResolver> {
        Ok(
            TemplateResolver::new(self.custom_template_dir()?, self.default_template_dir())
                .with_extension(self.extension()),
        )
    }

    pub fn matcher(&self) -> TemplateMatcher {
        let extension = self.extension();
        if self.config.site.templates.strict_matching {
            TemplateMatcher::strict(extension)
        } else {
            TemplateMatcher::legacy(extension)
        }
    }

    /// Scans both template directories
    pub fn catalog(&self) -> Result<TemplateCatalog> {
        Ok(TemplateCatalog::build(&self.resolver()?, &self.matcher()))
    }

    pub fn posts(&self) -> PostStore {
        PostStore::for_site(&self.root)
    }
}

fn check_template_location(location: &str) -> Result<(), SiteError> {
    let path = Path::new(location);
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir));

    if location.is_empty() || escapes {
        return Err(SiteError::TemplateLocationOutsideSite(location.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Post;
    use crate::engine::PostSource;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let site = Site::init(dir.path()).unwrap();

        assert!(site.site_dir().join("config.toml").is_file());
        assert!(site.site_dir().join("posts.jsonl").is_file());
        assert!(dir.path().join("loop_templates").is_dir());
        assert!(site
            .default_template_dir()
            .join("simple_UL.php")
            .is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        let site = Site::init(dir.path()).unwrap();
        site.posts().append(&Post::new(1, "Keep me")).unwrap();
        Site::init(dir.path()).unwrap();

        assert_eq!(site.posts().read_all().unwrap().len(), 1);
    }

    #[test]
    fn open_non_site_fails() {
        let dir = TempDir::new().unwrap();
        let err = Site::open(dir.path()).unwrap_err();

        assert!(err.to_string().contains("loopsmith init"));
    }

    #[test]
    fn default_options_after_init() {
        let dir = TempDir::new().unwrap();
        let site = Site::init(dir.path()).unwrap();

        let options = site.options();
        assert_eq!(options.default_template(), "simple_UL");
        assert!(options.exclude_repeats());
    }

    #[test]
    fn set_option_persists() {
        let dir = TempDir::new().unwrap();
        let mut site = Site::init(dir.path()).unwrap();

        site.set_option(OptionName::TemplateLocation, "theme/loops")
            .unwrap();
        site.set_option(OptionName::ExcludeRepeats, "0").unwrap();

        let reopened = Site::open(dir.path()).unwrap();
        assert_eq!(
            reopened.custom_template_dir().unwrap(),
            dir.path().join("theme/loops")
        );
        assert!(!reopened.options().exclude_repeats());
    }

    #[test]
    fn template_location_must_stay_inside() {
        let dir = TempDir::new().unwrap();
        let mut site = Site::init(dir.path()).unwrap();

        assert!(site
            .set_option(OptionName::TemplateLocation, "../elsewhere")
            .is_err());
        assert!(site
            .set_option(OptionName::TemplateLocation, "/etc")
            .is_err());
        assert_eq!(site.options().template_location(), "loop_templates");
    }

    #[test]
    fn resolves_bundled_and_custom_templates() {
        let dir = TempDir::new().unwrap();
        let site = Site::init(dir.path()).unwrap();
        let resolver = site.resolver().unwrap();

        assert_eq!(
            resolver.resolve("simple_UL"),
            Some(site.default_template_dir().join("simple_UL.php"))
        );

        let custom = dir.path().join("loop_templates").join("simple_UL.php");
        fs::write(&custom, "custom").unwrap();
        assert_eq!(resolver.resolve("simple_UL"), Some(custom));
    }

    #[test]
    fn strict_matching_from_config() {
        let dir = TempDir::new().unwrap();
        let mut site = Site::init(dir.path()).unwrap();
        fs::write(dir.path().join("loop_templates").join("old.php.bak"), "").unwrap();

        assert!(site.catalog().unwrap().contains("old"));

        site.config_mut().site.templates.strict_matching = true;
        assert!(!site.catalog().unwrap().contains("old"));
    }

    #[test]
    fn posts_store_is_a_source() {
        let dir = TempDir::new().unwrap();
        let site = Site::init(dir.path()).unwrap();
        site.posts().append(&Post::new(1, "Hi").sticky()).unwrap();

        assert_eq!(site.posts().sticky_ids().unwrap(), vec![1]);
    }
}
