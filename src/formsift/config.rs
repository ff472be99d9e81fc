use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "formsift.json";
const DEFAULT_COMPONENT: &str = "filter";
const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// What a canceled `filtered` notification skips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CancelPolicy {
    /// Skip both the visibility commit and the highlight rule.
    #[default]
    SkipAll,
    /// Skip the visibility commit but still install the highlight rule.
    KeepHighlight,
}

/// Filter configuration, stored in `formsift.json`.
///
/// The host-attribute options (`form`, `target`, `rows`, `hideblank`, and
/// `debounce` for `debounce_ms`) can also be changed at runtime through
/// [`FilterConfig::set_attribute`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    /// Names the `data-<component>-*` attributes, CSS variables and event.
    #[serde(default = "default_component")]
    pub component: String,

    /// Name of the form to read; the first form when unset or unknown.
    #[serde(default)]
    pub form: Option<String>,

    /// Id of the container whose items are filtered.
    #[serde(default)]
    pub target: Option<String>,

    /// Tag the candidate items must carry.
    #[serde(default)]
    pub rows: Option<String>,

    /// Hide every candidate while the form is blank.
    #[serde(default)]
    pub hideblank: bool,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default)]
    pub cancel_policy: CancelPolicy,

    /// Fallback for `--<component>-mark`.
    #[serde(default = "default_mark")]
    pub mark_fallback: String,

    /// Fallback for `--<component>-marktext`.
    #[serde(default = "default_mark_text")]
    pub mark_text_fallback: String,
}

fn default_component() -> String {
    DEFAULT_COMPONENT.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_mark() -> String {
    "Mark".to_string()
}

fn default_mark_text() -> String {
    "MarkText".to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            component: default_component(),
            form: None,
            target: None,
            rows: None,
            hideblank: false,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            cancel_policy: CancelPolicy::default(),
            mark_fallback: default_mark(),
            mark_text_fallback: default_mark_text(),
        }
    }
}

impl FilterConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: FilterConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Applies a host attribute change. An absent value removes the attribute.
    ///
    /// `hideblank` is a boolean attribute: present means on, whatever its value.
    /// `debounce` takes milliseconds; removing it restores the default.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        if name == "debounce" {
            self.debounce_ms = match value {
                Some(v) => v.trim().parse().map_err(|_| FilterError::InvalidAttribute {
                    name: name.to_string(),
                    value: v.to_string(),
                })?,
                None => DEFAULT_DEBOUNCE_MS,
            };
            return Ok(());
        }

        let value = value.map(str::to_string);
        match name {
            "form" => self.form = value.filter(|v| !v.is_empty()),
            "target" => self.target = value.filter(|v| !v.is_empty()),
            "rows" => self.rows = value.filter(|v| !v.is_empty()),
            "hideblank" => self.hideblank = value.is_some(),
            other => return Err(FilterError::UnknownAttribute(other.to_string())),
        }
        Ok(())
    }
}
