//! Loop options
//!
//! Four options steer every loop on a site:
//!
//! | Name | Type | Default |
//! |------|------|---------|
//! | `template_location` | text | `loop_templates` |
//! | `exclude_repeats` | flag | `true` |
//! | `default_template` | text | `simple_UL` |
//! | `suppress_stickies` | flag | `true` |
//!
//! [`Options`] is built once from the stored values and is read-only after
//! that. Every recognized name always has a value; anything else is unknown.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{parse_flag, ArgsError, LoopDefaults};

use super::config::StoredOptions;

pub const DEFAULT_TEMPLATE_LOCATION: &str = "loop_templates";
pub const DEFAULT_TEMPLATE: &str = "simple_UL";

#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("Unknown option: '{0}'")]
    Unknown(String),

    #[error("Option '{name}' cannot be empty")]
    Empty { name: String },

    #[error(transparent)]
    Value(#[from] ArgsError),
}

/// A recognized option name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionName {
    TemplateLocation,
    ExcludeRepeats,
    DefaultTemplate,
    SuppressStickies,
}

impl OptionName {
    pub const ALL: [OptionName; 4] = [
        OptionName::TemplateLocation,
        OptionName::ExcludeRepeats,
        OptionName::DefaultTemplate,
        OptionName::SuppressStickies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionName::TemplateLocation => "template_location",
            OptionName::ExcludeRepeats => "exclude_repeats",
            OptionName::DefaultTemplate => "default_template",
            OptionName::SuppressStickies => "suppress_stickies",
        }
    }
}

impl FromStr for OptionName {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| OptionsError::Unknown(s.to_string()))
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The value of one option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Flag(bool),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(text) => write!(f, "{}", text),
            OptionValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

/// Effective loop options: stored values over compiled-in defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Options {
    template_location: String,
    exclude_repeats: bool,
    default_template: String,
    suppress_stickies: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            template_location: DEFAULT_TEMPLATE_LOCATION.to_string(),
            exclude_repeats: true,
            default_template: DEFAULT_TEMPLATE.to_string(),
            suppress_stickies: true,
        }
    }
}

impl Options {
    /// Fills every unset stored value from the defaults
    pub fn from_stored(stored: &StoredOptions) -> Self {
        let defaults = Self::default();
        Self {
            template_location: stored
                .template_location
                .clone()
                .unwrap_or(defaults.template_location),
            exclude_repeats: stored.exclude_repeats.unwrap_or(defaults.exclude_repeats),
            default_template: stored
                .default_template
                .clone()
                .unwrap_or(defaults.default_template),
            suppress_stickies: stored
                .suppress_stickies
                .unwrap_or(defaults.suppress_stickies),
        }
    }

    /// Looks an option up by name; `None` for unrecognized names
    pub fn get(&self, name: &str) -> Option<OptionValue> {
        name.parse::<OptionName>().ok().map(|name| self.value(name))
    }

    pub fn value(&self, name: OptionName) -> OptionValue {
        match name {
            OptionName::TemplateLocation => OptionValue::Text(self.template_location.clone()),
            OptionName::ExcludeRepeats => OptionValue::Flag(self.exclude_repeats),
            OptionName::DefaultTemplate => OptionValue::Text(self.default_template.clone()),
            OptionName::SuppressStickies => OptionValue::Flag(self.suppress_stickies),
        }
    }

    pub fn template_location(&self) -> &str {
        &self.template_location
    }

    pub fn exclude_repeats(&self) -> bool {
        self.exclude_repeats
    }

    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    pub fn suppress_stickies(&self) -> bool {
        self.suppress_stickies
    }

    /// Defaults every loop call is merged against
    pub fn loop_defaults(&self) -> LoopDefaults {
        LoopDefaults {
            template: self.default_template.clone(),
            exclude_repeats: self.exclude_repeats,
            suppress_stickies: self.suppress_stickies,
        }
    }

    /// All options in display order
    pub fn entries(&self) -> Vec<(OptionName, OptionValue)> {
        OptionName::ALL
            .into_iter()
            .map(|name| (name, self.value(name)))
            .collect()
    }
}

impl StoredOptions {
    /// Stores `raw` for `name`, parsing flags the way option forms submit them
    pub fn set(&mut self, name: OptionName, raw: &str) -> Result<(), OptionsError> {
        let raw = raw.trim();
        match name {
            OptionName::TemplateLocation | OptionName::DefaultTemplate if raw.is_empty() => {
                return Err(OptionsError::Empty {
                    name: name.to_string(),
                });
            }
            OptionName::TemplateLocation => self.template_location = Some(raw.to_string()),
            OptionName::DefaultTemplate => self.default_template = Some(raw.to_string()),
            OptionName::ExcludeRepeats => {
                self.exclude_repeats = Some(parse_flag(name.as_str(), raw)?)
            }
            OptionName::SuppressStickies => {
                self.suppress_stickies = Some(parse_flag(name.as_str(), raw)?)
            }
        }
        Ok(())
    }
}
