//! Game settings
//!
//! An explicit value handed to the session controller. Persisted as JSON
//! (LocalStorage on web, a file path on native).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a settings value is rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("encounter period must be greater than zero")]
    ZeroEncounterPeriod,
    #[error("particle density must be finite and >= 0 (got {0})")]
    InvalidParticleDensity(f32),
    #[error("{field} must be finite and >= 0 (got {value})")]
    InvalidPostParameter { field: &'static str, value: f32 },
    #[error("{0} pool capacity must be greater than zero")]
    ZeroCapacity(&'static str),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
}

/// Runtime-mutable configuration read by the core each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Post-processing ===
    pub bloom_enabled: bool,
    pub vignette_enabled: bool,
    /// Bloom intensity outside photo mode
    pub bloom_intensity: f32,
    /// Bloom intensity while photo mode is on
    pub photo_bloom_intensity: f32,
    pub vignette_strength: f32,

    // === Decoration ===
    /// Scales decorative dust emission (0 disables it)
    pub particle_density: f32,

    // === Encounters ===
    pub encounter_period_ms: u64,

    // === Pools ===
    pub projectile_capacity: usize,
    pub enemy_capacity: usize,

    /// First sector seed; `None` picks an arbitrary one
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bloom_enabled: true,
            vignette_enabled: true,
            bloom_intensity: BLOOM_INTENSITY,
            photo_bloom_intensity: PHOTO_BLOOM_INTENSITY,
            vignette_strength: VIGNETTE_STRENGTH,

            particle_density: 1.0,

            encounter_period_ms: 15_000,

            projectile_capacity: 3,
            enemy_capacity: 30,

            seed: None,
        }
    }
}

impl Settings {
    /// Check every field that would make a session invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.encounter_period_ms == 0 {
            return Err(ConfigError::ZeroEncounterPeriod);
        }
        if !self.particle_density.is_finite() || self.particle_density < 0.0 {
            return Err(ConfigError::InvalidParticleDensity(self.particle_density));
        }
        for (field, value) in [
            ("bloom_intensity", self.bloom_intensity),
            ("photo_bloom_intensity", self.photo_bloom_intensity),
            ("vignette_strength", self.vignette_strength),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidPostParameter { field, value });
            }
        }
        if self.projectile_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("projectile"));
        }
        if self.enemy_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("enemy"));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Bloom intensity for the current photo-mode state
    pub fn effective_bloom_intensity(&self, photo_mode: bool) -> f32 {
        if photo_mode {
            self.photo_bloom_intensity
        } else {
            self.bloom_intensity
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sector_scout_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native: defaults (use `load_from` for a file)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.encounter_period_ms, 15_000);
        assert!(settings.bloom_enabled && settings.vignette_enabled);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "bloom_enabled": false, "seed": 1000 }"#).unwrap();
        assert!(!settings.bloom_enabled);
        assert_eq!(settings.seed, Some(1000));
        assert_eq!(settings.vignette_strength, VIGNETTE_STRENGTH);
    }

    #[test]
    fn test_rejects_zero_period() {
        let err = Settings::from_json(r#"{ "encounter_period_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroEncounterPeriod));
    }

    #[test]
    fn test_rejects_negative_density() {
        let settings = Settings {
            particle_density: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidParticleDensity(_))
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_photo_mode_raises_bloom() {
        let settings = Settings::default();
        assert_eq!(settings.effective_bloom_intensity(false), 0.6);
        assert_eq!(settings.effective_bloom_intensity(true), 1.2);
    }
}
