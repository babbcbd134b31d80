//! Pager configuration.
//!
//! Read from the `pager` section of a Figment. A missing section yields the
//! defaults. [`PagerConfig::load`] layers a YAML file under `PAGER_`-prefixed
//! environment variables (`PAGER_MAX_PAGE_SIZE=200`).

use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pager_core::DEFAULT_PAGE_SIZE;

pub const CONFIG_SECTION: &str = "pager";
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("invalid pager section: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid pager configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagerConfig {
    /// Page size of parameters created through `Pager::new_query`.
    pub default_page_size: i64,
    /// Larger requested page sizes are clamped down to this. `None` disables
    /// the limit.
    pub max_page_size: Option<i64>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: Some(DEFAULT_MAX_PAGE_SIZE),
        }
    }
}

impl PagerConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let all_data: serde_json::Value = figment.extract()?;

        let config = match all_data.get(CONFIG_SECTION) {
            Some(section) => serde_json::from_value(section.clone())?,
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let figment = Figment::new().merge(Yaml::file(path.as_ref())).merge(
            Env::prefixed("PAGER_").map(|key| format!("{CONFIG_SECTION}.{}", key.as_str()).into()),
        );
        Self::from_figment(&figment)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size <= 0 {
            return Err(ConfigError::Invalid(format!(
                "default_page_size must be greater than zero, got {}",
                self.default_page_size
            )));
        }
        if let Some(max) = self.max_page_size {
            if max <= 0 {
                return Err(ConfigError::Invalid(format!(
                    "max_page_size must be greater than zero, got {max}"
                )));
            }
            if self.default_page_size > max {
                return Err(ConfigError::Invalid(format!(
                    "default_page_size ({}) exceeds max_page_size ({max})",
                    self.default_page_size
                )));
            }
        }
        Ok(())
    }
}
