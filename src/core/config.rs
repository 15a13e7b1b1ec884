use crate::core::moment::{CalendarDate, Moment};
use crate::core::parser::TextMomentParser;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    InvalidValue { picker: String, text: String },
    InvalidMinDate { picker: String, text: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Yaml(err) => write!(f, "invalid YAML config: {err}"),
            Self::Json(err) => write!(f, "invalid JSON config: {err}"),
            Self::InvalidValue { picker, text } => {
                write!(f, "picker '{picker}': cannot parse value {text:?}")
            }
            Self::InvalidMinDate { picker, text } => {
                write!(f, "picker '{picker}': min_date {text:?} is not YYYY-MM-DD")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Yaml(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

/// One picker as written in a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    pub label: String,
    /// Any text the picker itself accepts. Absent means "now".
    pub value: Option<String>,
    /// `YYYY-MM-DD`. Absent means "today".
    pub min_date: Option<String>,
    pub estimated_panel_height: Option<u16>,
}

impl PickerConfig {
    pub fn initial_value(&self) -> Result<Option<Moment>, ConfigError> {
        let Some(text) = self.value.as_deref() else {
            return Ok(None);
        };
        TextMomentParser::parse(text)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                picker: self.label.clone(),
                text: text.to_string(),
            })
    }

    pub fn min_date(&self) -> Result<Option<CalendarDate>, ConfigError> {
        let Some(text) = self.min_date.as_deref() else {
            return Ok(None);
        };
        CalendarDate::parse_iso(text)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidMinDate {
                picker: self.label.clone(),
                text: text.to_string(),
            })
    }
}

/// A page of pickers, keyed by name, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub pickers: IndexMap<String, PickerConfig>,
}

impl AppConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(ConfigError::Yaml)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Json)
    }

    /// `.json` files load as JSON, everything else as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut config = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        config.fill_labels();
        log::debug!("loaded {} picker(s) from {}", config.pickers.len(), path.display());
        Ok(config)
    }

    /// Pickers without a label use their key.
    pub fn fill_labels(&mut self) {
        for (name, picker) in self.pickers.iter_mut() {
            if picker.label.is_empty() {
                picker.label = name.clone();
            }
        }
    }
}
