//! Configuration for storm selection and narrative rendering.

use serde::{Deserialize, Serialize};
use space_weather::StoreConfig;
use std::path::Path;

use crate::error::{DossierError, DossierResult};

/// Number of strongest storms the selector draws from.
pub const DEFAULT_TOP_K: usize = 6;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DossierConfig {
    pub selection: SelectionConfig,
    pub store: StoreConfig,
    pub narrative: NarrativeConfig,
}

impl DossierConfig {
    /// Parse a config from TOML. Missing keys keep their defaults.
    pub fn from_toml(text: &str) -> DossierResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> DossierResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            DossierError::Store(space_weather::StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        Self::from_toml(&text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// How many of the strongest storms of a year are eligible.
    pub top_k: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Fixed offsets, in hours, between anchor events and narrative beats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Routine worker: warning beat, before the cause event.
    pub warning_lead_hours: i64,
    /// Routine worker: outlook beat, after the storm event.
    pub outlook_delay_hours: i64,
    /// Mariner: calm-before-the-storm beat, before the storm event.
    pub calm_lead_hours: i64,
    /// Sky observer: forecast beat, before the storm event.
    pub forecast_lead_hours: i64,
    /// Sky observer: display beat, after the storm event.
    pub display_delay_hours: i64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            warning_lead_hours: 0,
            outlook_delay_hours: 24,
            calm_lead_hours: 6,
            forecast_lead_hours: 2,
            display_delay_hours: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DossierConfig::default();
        assert_eq!(config.selection.top_k, 6);
        assert_eq!(config.narrative.outlook_delay_hours, 24);
        assert_eq!(config.store.file_prefix, "nasa_");
    }

    #[test]
    fn test_partial_toml() {
        let config = DossierConfig::from_toml(
            r#"
[selection]
top_k = 3

[store]
cache_dir = "/srv/donki"

[narrative]
calm_lead_hours = 12
"#,
        )
        .unwrap();

        assert_eq!(config.selection.top_k, 3);
        assert_eq!(config.store.cache_dir, std::path::PathBuf::from("/srv/donki"));
        assert_eq!(config.narrative.calm_lead_hours, 12);
        assert_eq!(config.narrative.forecast_lead_hours, 2);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = DossierConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed = DossierConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.narrative, config.narrative);
        assert_eq!(parsed.selection.top_k, config.selection.top_k);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            DossierConfig::from_toml("[selection]\ntop_k = \"many\""),
            Err(DossierError::Config(_))
        ));
    }
}
