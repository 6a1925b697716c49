//! Template lookup by name
//!
//! A name resolves against two directories. Candidates, in order:
//! 1. `{custom}/{name}.php`
//! 2. `{custom}/{name}.PHP`
//! 3. `{default}/{name}.php`
//!
//! The uppercase variant is only tried in the custom directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::DEFAULT_EXTENSION;

/// Finds template files in the custom and default directories
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateResolver {
    custom_dir: PathBuf,
    default_dir: PathBuf,
    extension: String,
}

impl TemplateResolver {
    pub fn new(custom_dir: impl Into<PathBuf>, default_dir: impl Into<PathBuf>) -> Self {
        Self {
            custom_dir: custom_dir.into(),
            default_dir: default_dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Uses a different template extension (given without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension
            .into()
            .trim_start_matches('.')
            .to_ascii_lowercase();
        self
    }

    pub fn custom_dir(&self) -> &Path {
        &self.custom_dir
    }

    pub fn default_dir(&self) -> &Path {
        &self.default_dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The paths checked for `name`, in priority order
    pub fn candidates(&self, name: &str) -> [PathBuf; 3] {
        let lower = format!("{}.{}", name, self.extension);
        let upper = format!("{}.{}", name, self.extension.to_ascii_uppercase());

        [
            self.custom_dir.join(&lower),
            self.custom_dir.join(upper),
            self.default_dir.join(lower),
        ]
    }

    /// Returns the first existing candidate for `name`
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let found = self
            .candidates(name)
            .into_iter()
            .find(|candidate| candidate.exists());

        match &found {
            Some(path) => debug!(template = name, path = %path.display(), "resolved template"),
            None => debug!(template = name, "no template file found"),
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, TemplateResolver) {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("custom");
        let default = dir.path().join("default");
        fs::create_dir_all(&custom).unwrap();
        fs::create_dir_all(&default).unwrap();
        let resolver = TemplateResolver::new(custom, default);
        (dir, resolver)
    }

    #[test]
    fn default_only_template_resolves_to_default_dir() {
        let (_dir, resolver) = setup();
        let path = resolver.default_dir().join("simple_UL.php");
        fs::write(&path, "x").unwrap();

        assert_eq!(resolver.resolve("simple_UL"), Some(path));
    }

    #[test]
    fn custom_template_shadows_default() {
        let (_dir, resolver) = setup();
        let custom = resolver.custom_dir().join("list.php");
        fs::write(&custom, "custom").unwrap();
        fs::write(resolver.default_dir().join("list.php"), "default").unwrap();

        assert_eq!(resolver.resolve("list"), Some(custom));
    }

    #[test]
    fn uppercase_extension_in_custom_dir() {
        let (_dir, resolver) = setup();
        let path = resolver.custom_dir().join("shouty.PHP");
        fs::write(&path, "x").unwrap();

        let resolved = resolver.resolve("shouty").unwrap();
        assert!(resolved.starts_with(resolver.custom_dir()));
    }

    #[test]
    fn missing_template_is_not_found() {
        let (_dir, resolver) = setup();
        assert_eq!(resolver.resolve("ghost_template"), None);
    }

    #[test]
    fn missing_directories_are_not_errors() {
        let dir = TempDir::new().unwrap();
        let resolver = TemplateResolver::new(dir.path().join("nope"), dir.path().join("nada"));
        assert_eq!(resolver.resolve("anything"), None);
    }

    #[test]
    fn candidates_keep_uppercase_to_custom_dir() {
        let resolver = TemplateResolver::new("/c", "/d");
        let [first, second, third] = resolver.candidates("t");

        assert_eq!(first, PathBuf::from("/c/t.php"));
        assert_eq!(second, PathBuf::from("/c/t.PHP"));
        assert_eq!(third, PathBuf::from("/d/t.php"));
    }

    #[test]
    fn custom_extension() {
        let (_dir, resolver) = setup();
        let resolver = resolver.with_extension(".hbs");
        let path = resolver.default_dir().join("cards.hbs");
        fs::write(&path, "x").unwrap();

        assert_eq!(resolver.extension(), "hbs");
        assert_eq!(resolver.resolve("cards"), Some(path));
    }
}
