//! Data-driven timing and hit-box balance
//!
//! Defaults reproduce the live game. The page may override any subset by
//! putting a JSON object in the surface element's `data-tuning` attribute;
//! missing keys keep their defaults and unknown keys are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Target motion ===
    /// Target animation period
    pub target_tick_ms: f64,
    /// Phase advance per target tick
    pub phase_step: f32,

    // === Firing ===
    /// Spawn cadence while armed
    pub fire_interval_ms: f64,
    /// Projectile step period (~60 Hz)
    pub projectile_tick_ms: f64,
    /// Hard lifetime of every projectile
    pub projectile_ttl_ms: f64,
    /// Pixels per projectile step
    pub projectile_speed: f32,
    /// Muzzle height above the bottom edge of the surface
    pub muzzle_offset: f32,
    /// Launcher pivot height above the bottom edge, for the rotation angle
    pub pivot_offset: f32,
    /// How long a projectile that struck something stays visible
    pub hit_fade_ms: f64,

    // === Hit zones ===
    /// Padding around the core box for the rect and ellipse tests
    pub core_padding: f32,
    /// Core radius as a fraction of the body's short side when the core box is missing
    pub fallback_core_fraction: f32,
    /// Core center height as a fraction of body height when the core box is missing
    pub fallback_core_height: f32,
    /// Lower bound for the cheek radius (px)
    pub cheek_min_radius: f32,
    /// Cheek radius as a fraction of the body's short side
    pub cheek_fraction: f32,

    // === Feedback ===
    pub spurt_count: u32,
    /// Animation delay between consecutive spurts (seconds, CSS)
    pub spurt_stagger_s: f32,
    pub spurt_ms: f64,
    pub drip_ms: f64,
    pub flash_ms: f64,
    pub shake_ms: f64,
    /// Confirmed hits per damage level step
    pub hits_per_damage_level: u32,
    pub max_damage_level: u8,
    pub pool_base_px: f32,
    pub pool_per_hit_px: f32,
    pub pool_max_px: f32,

    // === Audio ===
    pub hit_audio_src: String,
    pub hit_audio_volume: f64,

    // === Clock ===
    /// Longest wall-clock gap replayed by the scheduler; longer gaps are skipped
    pub max_catch_up_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_tick_ms: 50.0,
            phase_step: 0.1,

            fire_interval_ms: 150.0,
            projectile_tick_ms: 16.0,
            projectile_ttl_ms: 2000.0,
            projectile_speed: 15.0,
            muzzle_offset: 40.0,
            pivot_offset: 30.0,
            hit_fade_ms: 100.0,

            core_padding: 60.0,
            fallback_core_fraction: 0.2,
            fallback_core_height: 0.52,
            cheek_min_radius: 110.0,
            cheek_fraction: 0.5,

            spurt_count: 3,
            spurt_stagger_s: 0.08,
            spurt_ms: 600.0,
            drip_ms: 1200.0,
            flash_ms: 200.0,
            shake_ms: 300.0,
            hits_per_damage_level: 3,
            max_damage_level: 5,
            pool_base_px: 20.0,
            pool_per_hit_px: 8.0,
            pool_max_px: 180.0,

            hit_audio_src: "/audio/voice.wav".to_string(),
            hit_audio_volume: 0.8,

            max_catch_up_ms: 250.0,
        }
    }
}

impl Tuning {
    /// Parse overrides from a `data-tuning` attribute
    ///
    /// Absent or empty input means defaults. Bad JSON is logged and ignored.
    pub fn from_attribute(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };
        match serde_json::from_str(raw) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring invalid data-tuning ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Damage level shown on the target after `hits` confirmed hits
    pub fn damage_level(&self, hits: u32) -> u8 {
        let step = self.hits_per_damage_level.max(1);
        (hits / step).min(self.max_damage_level as u32) as u8
    }

    /// Width of the pool under the target after `hits` confirmed hits
    pub fn pool_width(&self, hits: u32) -> f32 {
        (self.pool_base_px + self.pool_per_hit_px * hits as f32).min(self.pool_max_px)
    }
}
