//! # Loop Templates
//!
//! Finding, listing and executing the per-item templates a loop renders with.
//!
//! ## Directories
//!
//! | Directory | Location | Purpose |
//! |-----------|----------|---------|
//! | Custom | `{site}/{template_location}/` | Site-specific templates, checked first |
//! | Default | `{site}/.loopsmith/default_loop_templates/` | Bundled templates, checked last |
//!
//! ## Key Types
//!
//! - [`TemplateResolver`] - Maps a template name to a file path
//! - [`TemplateCatalog`] - Lists templates in both directories
//! - [`TemplateMatcher`] - Decides which files count as templates
//! - [`Renderer`] - Executes a template for one loop item

pub mod bundled;
mod catalog;
mod matcher;
mod render;
mod resolver;

pub use catalog::{humanize, scan_dir, TemplateCatalog, TemplateEntry, TemplateList};
pub use matcher::TemplateMatcher;
pub use render::{FnRenderer, HandlebarsRenderer, Renderer};
pub use resolver::TemplateResolver;

/// Template file extension, without the dot
pub const DEFAULT_EXTENSION: &str = "php";
