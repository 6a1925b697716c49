//! Template catalog
//!
//! Lists the templates available in the custom and default directories.
//! The two lists are kept apart; nothing here decides which one wins when an
//! identifier appears in both.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::matcher::TemplateMatcher;
use super::resolver::TemplateResolver;

/// One template file found in a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateEntry {
    /// File name without the template extension, e.g. `simple_UL`
    pub identifier: String,

    /// Raw file name, e.g. `simple_UL.php`
    pub filename: String,

    /// Full path to the file
    pub path: PathBuf,

    /// Human label, e.g. `Simple UL (simple_UL.php)`
    pub display: String,
}

impl TemplateEntry {
    fn from_file(dir: &Path, filename: &str, matcher: &TemplateMatcher) -> Option<Self> {
        if !matcher.matches(filename) {
            return None;
        }

        let identifier = matcher.identifier(filename);
        let display = format!("{} ({})", humanize(&identifier), filename);

        Some(Self {
            identifier,
            filename: filename.to_string(),
            path: dir.join(filename),
            display,
        })
    }
}

/// Sorted identifier → entry map for one directory
pub type TemplateList = BTreeMap<String, TemplateEntry>;

/// Templates grouped by where they came from
///
/// A `None` list means the directory could not be read, which is different
/// from a readable directory with no templates in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemplateCatalog {
    pub custom: Option<TemplateList>,
    pub default: Option<TemplateList>,
}

impl TemplateCatalog {
    /// Scans both directories of the resolver
    pub fn build(resolver: &TemplateResolver, matcher: &TemplateMatcher) -> Self {
        Self {
            custom: scan_dir(resolver.custom_dir(), matcher),
            default: scan_dir(resolver.default_dir(), matcher),
        }
    }

    /// Custom templates, sorted by identifier
    pub fn custom_entries(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.custom.iter().flat_map(|list| list.values())
    }

    /// Default templates, sorted by identifier
    pub fn default_entries(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.default.iter().flat_map(|list| list.values())
    }

    /// Returns true if either list has the identifier
    pub fn contains(&self, identifier: &str) -> bool {
        self.custom
            .as_ref()
            .is_some_and(|list| list.contains_key(identifier))
            || self
                .default
                .as_ref()
                .is_some_and(|list| list.contains_key(identifier))
    }

    /// Returns true if neither directory produced any template
    pub fn is_empty(&self) -> bool {
        self.custom_entries().next().is_none() && self.default_entries().next().is_none()
    }
}

/// Lists one directory; `None` if it cannot be opened
pub fn scan_dir(dir: &Path, matcher: &TemplateMatcher) -> Option<TemplateList> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), error = %err, "template directory unreadable");
            return None;
        }
    };

    let mut templates = TemplateList::new();

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };

        if let Some(template) = TemplateEntry::from_file(dir, name, matcher) {
            // First entry wins when two files share an identifier
            templates
                .entry(template.identifier.clone())
                .or_insert(template);
        }
    }

    debug!(dir = %dir.display(), count = templates.len(), "scanned template directory");
    Some(templates)
}

/// `simple_UL` → `Simple UL`: underscores become spaces and the first letter
/// of every word is uppercased; the rest of each word is left alone.
pub fn humanize(identifier: &str) -> String {
    let mut label = String::with_capacity(identifier.len());
    let mut at_word_start = true;

    for c in identifier.chars() {
        let c = if c == '_' { ' ' } else { c };
        if at_word_start {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        at_word_start = c.is_whitespace();
    }

    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn humanize_labels() {
        assert_eq!(humanize("simple_UL"), "Simple UL");
        assert_eq!(humanize("title_and_excerpt"), "Title And Excerpt");
        assert_eq!(humanize("cards"), "Cards");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn entry_display_includes_filename() {
        let entry =
            TemplateEntry::from_file(Path::new("/t"), "simple_UL.php", &TemplateMatcher::default())
                .unwrap();

        assert_eq!(entry.identifier, "simple_UL");
        assert_eq!(entry.display, "Simple UL (simple_UL.php)");
        assert_eq!(entry.path, PathBuf::from("/t/simple_UL.php"));
    }

    #[test]
    fn scan_filters_and_dedupes() {
        let dir = TempDir::new().unwrap();
        for name in ["foo.php", "foo.PHP", "bar.txt", "bar.php.bak"] {
            touch(dir.path(), name);
        }

        let list = scan_dir(dir.path(), &TemplateMatcher::default()).unwrap();
        let ids: Vec<_> = list.keys().map(String::as_str).collect();

        assert_eq!(ids, vec!["bar", "foo"]);
        assert_eq!(list["bar"].filename, "bar.php.bak");
        assert!(list["foo"].filename == "foo.php" || list["foo"].filename == "foo.PHP");
    }

    #[test]
    fn strict_matcher_skips_backup_files() {
        let dir = TempDir::new().unwrap();
        for name in ["foo.php", "bar.php.bak", "phpnotes"] {
            touch(dir.path(), name);
        }

        let list = scan_dir(dir.path(), &TemplateMatcher::strict("php")).unwrap();
        let ids: Vec<_> = list.keys().map(String::as_str).collect();

        assert_eq!(ids, vec!["foo"]);
    }

    #[test]
    fn missing_directory_is_absent_not_empty() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty");
        fs::create_dir_all(&empty).unwrap();

        let resolver = TemplateResolver::new(dir.path().join("missing"), &empty);
        let catalog = TemplateCatalog::build(&resolver, &TemplateMatcher::default());

        assert!(catalog.custom.is_none());
        assert_eq!(catalog.default, Some(TemplateList::new()));
        assert!(catalog.is_empty());
    }

    #[test]
    fn catalog_keeps_lists_separate() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("custom");
        let default = dir.path().join("default");
        fs::create_dir_all(&custom).unwrap();
        fs::create_dir_all(&default).unwrap();
        touch(&custom, "list.php");
        touch(&default, "list.php");
        touch(&default, "cards.php");

        let resolver = TemplateResolver::new(&custom, &default);
        let catalog = TemplateCatalog::build(&resolver, &TemplateMatcher::default());

        assert_eq!(catalog.custom_entries().count(), 1);
        let defaults: Vec<_> = catalog.default_entries().map(|e| e.identifier.as_str()).collect();
        assert_eq!(defaults, vec!["cards", "list"]);
        assert!(catalog.contains("cards"));
        assert!(!catalog.contains("ghost"));
    }
}
