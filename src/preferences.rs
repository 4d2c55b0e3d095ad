//! Player preferences
//!
//! Persisted in LocalStorage, separate from the session (which never is).

use serde::{Deserialize, Serialize};

/// Gain bus levels at full volume (quiet, normal, loud)
pub const VOLUME_LOW: f32 = 0.1 * 0.1;
pub const VOLUME_MEDIUM: f32 = 0.5 * 0.1;
pub const VOLUME_HIGH: f32 = 1.0 * 0.1;

/// Gain bus a sound is routed through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GainLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl GainLevel {
    /// Bus index as the host numbers them (0 quiet, 1 normal, 2 loud)
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(GainLevel::Low),
            1 => Some(GainLevel::Medium),
            2 => Some(GainLevel::High),
            _ => None,
        }
    }

    fn base(self) -> f32 {
        match self {
            GainLevel::Low => VOLUME_LOW,
            GainLevel::Medium => VOLUME_MEDIUM,
            GainLevel::High => VOLUME_HIGH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

impl Preferences {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "balloon_hop_preferences";

    /// Update the volume, clamped to 0..=1 (NaN mutes)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Gain value for one bus at the current volume
    pub fn gain(&self, level: GainLevel) -> f32 {
        level.base() * self.volume
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse stored preferences, clamping out-of-range values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut prefs: Self = serde_json::from_str(json)?;
        prefs.set_volume(prefs.volume);
        Ok(prefs)
    }

    /// Load preferences from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(prefs) => {
                        log::info!("Loaded preferences from LocalStorage");
                        return prefs;
                    }
                    Err(err) => log::warn!("Ignoring stored preferences: {}", err),
                }
            }
        }

        log::info!("Using default preferences");
        Self::default()
    }

    /// Save preferences to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Preferences saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No storage for {}, using defaults", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
