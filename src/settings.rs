//! Game settings and preferences
//!
//! Persisted separately from the high score, as a JSON blob in the
//! host-provided storage.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_VOLUME;
use crate::persistence::Storage;

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Sound volume in [0.0, 1.0]
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "neon_surge_settings";

    /// Set the volume, clamped into [0.0, 1.0]
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Load settings; missing or corrupt data falls back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        if let Some(json) = storage.get(Self::STORAGE_KEY) {
            if let Ok(settings) = serde_json::from_str::<Settings>(&json) {
                log::debug!("loaded settings");
                let mut settings = settings;
                settings.volume = settings.volume.clamp(0.0, 1.0);
                return settings;
            }
        }
        log::debug!("using default settings");
        Self::default()
    }

    /// Save settings as JSON
    pub fn save(&self, storage: &mut dyn Storage) {
        if let Ok(json) = serde_json::to_string(self) {
            storage.set(Self::STORAGE_KEY, &json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_default_volume() {
        assert_eq!(Settings::default().volume, DEFAULT_VOLUME);
    }

    #[test]
    fn test_volume_clamped() {
        let mut settings = Settings::default();
        settings.set_volume(1.7);
        assert_eq!(settings.volume, 1.0);
        settings.set_volume(-0.3);
        assert_eq!(settings.volume, 0.0);
    }

    #[test]
    fn test_round_trip() {
        let mut storage = MemoryStorage::new();
        let mut settings = Settings::default();
        settings.set_volume(0.55);
        settings.save(&mut storage);

        let loaded = Settings::load(&storage);
        assert_eq!(loaded.volume, 0.55);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut storage = MemoryStorage::new();
        storage.set("neon_surge_settings", "garbage");
        let loaded = Settings::load(&storage);
        assert_eq!(loaded.volume, DEFAULT_VOLUME);
    }
}
