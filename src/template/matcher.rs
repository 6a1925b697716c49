//! Template file matching
//!
//! Decides which directory entries count as templates and how an entry's
//! identifier is derived from its file name.

/// Rule for recognizing template files in a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateMatcher {
    /// Any name containing the extension text anywhere, case-insensitive.
    ///
    /// `list.php.bak` and `phpnotes` both pass. This is the historical
    /// behavior and stays the default so existing template folders list the
    /// same entries.
    Legacy { extension: String },

    /// Only names whose final extension equals the configured one
    Strict { extension: String },
}

impl TemplateMatcher {
    pub fn legacy(extension: impl Into<String>) -> Self {
        Self::Legacy {
            extension: normalize(extension.into()),
        }
    }

    pub fn strict(extension: impl Into<String>) -> Self {
        Self::Strict {
            extension: normalize(extension.into()),
        }
    }

    /// The extension this matcher is keyed on, lowercase and without a dot
    pub fn extension(&self) -> &str {
        match self {
            Self::Legacy { extension } | Self::Strict { extension } => extension,
        }
    }

    /// Returns true if the file name should be treated as a template
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Self::Legacy { extension } => file_name.to_ascii_lowercase().contains(extension.as_str()),
            Self::Strict { extension } => file_name
                .rsplit_once('.')
                .map(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case(extension))
                .unwrap_or(false),
        }
    }

    /// Derives the template identifier from a file name.
    ///
    /// Everything from the first `.{extension}` (case-insensitive) onward is
    /// dropped, so `bar.php.bak` becomes `bar`. Names without that suffix are
    /// returned unchanged.
    pub fn identifier(&self, file_name: &str) -> String {
        let suffix = format!(".{}", self.extension());
        match file_name.to_ascii_lowercase().find(&suffix) {
            Some(pos) => file_name[..pos].to_string(),
            None => file_name.to_string(),
        }
    }
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::legacy(super::DEFAULT_EXTENSION)
    }
}

fn normalize(extension: String) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}
