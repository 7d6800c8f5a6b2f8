//! Game settings and preferences
//!
//! Persisted in LocalStorage, separately from high scores.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Neon dots scattered along the tunnel walls
    pub fn neon_count(&self) -> usize {
        match self {
            QualityPreset::Low => 8,
            QualityPreset::Medium => 28,
            QualityPreset::High => 48,
        }
    }

    /// Glowing streaks on the shoulders
    pub fn streak_count(&self) -> usize {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 24,
            QualityPreset::High => 40,
        }
    }

    /// Whether glow/shadow blur is applied to decorations
    pub fn glow_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual effects ===
    /// Tunnel neon dots and shoulder streaks
    pub decorations: bool,
    /// Turn-indicator blinking on merging traffic
    pub blinkers: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (static decorations, no glow)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            decorations: true,
            blinkers: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective neon count (respects the decorations toggle)
    pub fn neon_count(&self) -> usize {
        if self.decorations {
            self.quality.neon_count()
        } else {
            0
        }
    }

    /// Effective streak count
    pub fn streak_count(&self) -> usize {
        if self.decorations {
            self.quality.streak_count()
        } else {
            0
        }
    }

    /// Effective glow (respects reduced_motion)
    pub fn effective_glow(&self) -> bool {
        self.quality.glow_enabled() && !self.reduced_motion
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "tunnel_racer_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
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

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
