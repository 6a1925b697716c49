//! # Storage Layer
//!
//! Persistence for a loopsmith site, in plain files that diff well.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Options + template settings | TOML | `.loopsmith/config.toml` |
//! | Posts | JSONL (one JSON per line) | `.loopsmith/posts.jsonl` |
//! | Default templates | template files | `.loopsmith/default_loop_templates/` |
//! | Custom templates | template files | `{template_location}/` |
//!
//! ## Concurrency Safety
//!
//! - [`PostStore`] uses file locking (`fs2`) for concurrent access
//! - Full rewrites are atomic (temp file + rename)
//!
//! ## Site Structure
//!
//! ```text
//! site/
//! ├── loop_templates/             # Custom templates (template_location)
//! └── .loopsmith/
//!     ├── config.toml             # Options and template settings
//!     ├── posts.jsonl             # Posts
//!     └── default_loop_templates/ # Bundled templates
//! ```
//!
//! ## Key Types
//!
//! - [`Site`] - Entry point for accessing a site
//! - [`Options`] - Effective loop options
//! - [`PostStore`] - Read/write posts as JSONL; a [`PostSource`](crate::engine::PostSource)
//! - [`Config`] - Site and global configuration

mod config;
mod options;
mod posts;
mod site;

pub use config::{
    Config, ConfigError, GlobalConfig, SiteConfig, StoredOptions, TemplateSettings,
    CONFIG_DIR_ENV, SITE_DIR,
};
pub use options::{
    OptionName, OptionValue, Options, OptionsError, DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_LOCATION,
};
pub use posts::PostStore;
pub use site::{Site, SiteError, DEFAULT_TEMPLATES_DIR};
