//! Configuration file support for Kalo.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/kalo/config.toml` and
//! holds the data directory plus the user's body profile. Profile values
//! are plausibility-checked at the boundary so the engine can trust them.

use crate::{Error, Result, UserProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub profile: UserProfile,

    /// Day key of account registration; days before it never accrue burn
    #[serde(default)]
    pub registration_day: Option<String>,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

// Accepted profile ranges
const HEIGHT_CM_RANGE: std::ops::RangeInclusive<f64> = 50.0..=250.0;
const WEIGHT_KG_RANGE: std::ops::RangeInclusive<f64> = 20.0..=300.0;
const AGE_YEARS_RANGE: std::ops::RangeInclusive<u32> = 1..=150;

/// Check a profile for plausible measurement values
///
/// Missing fields are fine (BMR simply stays unknown); present fields must
/// fall inside the accepted ranges.
pub fn validate_profile(profile: &UserProfile) -> Result<()> {
    if let Some(height) = profile.height_cm {
        if !HEIGHT_CM_RANGE.contains(&height) {
            return Err(Error::Config(format!(
                "height {height} cm outside accepted range 50-250"
            )));
        }
    }
    if let Some(weight) = profile.weight_kg {
        if !WEIGHT_KG_RANGE.contains(&weight) {
            return Err(Error::Config(format!(
                "weight {weight} kg outside accepted range 20-300"
            )));
        }
    }
    if let Some(age) = profile.age_years {
        if !AGE_YEARS_RANGE.contains(&age) {
            return Err(Error::Config(format!(
                "age {age} years outside accepted range 1-150"
            )));
        }
    }
    Ok(())
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("kalo")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        validate_profile(&config.profile)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("kalo").join("config.toml")
    }

    /// Replace the stored profile after validating it
    pub fn set_profile(&mut self, profile: UserProfile) -> Result<()> {
        validate_profile(&profile)?;
        self.profile = profile;
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.profile.height_cm.is_none());
        assert!(!config.data.data_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config
            .set_profile(UserProfile {
                height_cm: Some(180.0),
                weight_kg: Some(75.0),
                age_years: Some(30),
            })
            .unwrap();

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.profile, config.profile);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[profile]
weight_kg = 82.5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.profile.weight_kg, Some(82.5));
        assert_eq!(config.profile.height_cm, None);
        assert_eq!(config.data.data_dir, default_data_dir());
    }

    #[test]
    fn test_set_profile_rejects_implausible_values() {
        let mut config = Config::default();

        let too_heavy = UserProfile {
            height_cm: Some(180.0),
            weight_kg: Some(400.0),
            age_years: Some(30),
        };
        assert!(config.set_profile(too_heavy).is_err());

        let too_short = UserProfile {
            height_cm: Some(30.0),
            weight_kg: None,
            age_years: None,
        };
        assert!(config.set_profile(too_short).is_err());

        assert_eq!(config.profile, UserProfile::default());
    }

    #[test]
    fn test_load_from_rejects_implausible_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[profile]
age_years = 200
"#,
        )
        .unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
