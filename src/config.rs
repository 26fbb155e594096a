//! Configuration for ImpactSonic

use crate::error::{ImpactSonicError, Result};

/// Which sound provider the dispatcher should drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// No provider; every play request is a no-op
    None,
    /// One clip per material, played through the voice pool
    Simple,
    /// A list of candidate clips per material, one picked at random per play
    #[default]
    ListBased,
    /// Delegates to an external audio middleware event system
    ExternalMiddleware,
}

/// Pitch randomization policy.
///
/// When enabled, each played sound gets a pitch drawn uniformly from
/// `[max(1 - extent, 0), 1 + extent]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchModulation {
    pub enabled: bool,
    /// Spread around unit pitch, in `[0, 2]`
    pub extent: f32,
}

impl PitchModulation {
    pub const MAX_EXTENT: f32 = 2.0;

    pub fn new(enabled: bool, extent: f32) -> Self {
        Self {
            enabled,
            extent: Self::clamp_extent(extent),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, 0.0)
    }

    /// Inclusive pitch range, or `None` when modulation is off.
    ///
    /// Out-of-range or NaN extents set directly on the fields are clamped, so
    /// the returned range always has `min <= max`.
    pub fn range(&self) -> Option<(f32, f32)> {
        if !self.enabled {
            return None;
        }
        let extent = Self::clamp_extent(self.extent);
        Some(((1.0 - extent).max(0.0), 1.0 + extent))
    }

    fn clamp_extent(extent: f32) -> f32 {
        if extent.is_nan() {
            0.0
        } else {
            extent.clamp(0.0, Self::MAX_EXTENT)
        }
    }
}

impl Default for PitchModulation {
    fn default() -> Self {
        Self::new(true, 0.5)
    }
}

/// Process-wide settings for collision sound dispatch.
#[derive(Debug, Clone)]
pub struct ImpactSonicSettings {
    /// Maximum number of sounds that can be playing at once through the voice pool
    pub sound_pool_size: usize,
    /// Randomize the pitch of collision sounds
    pub pitch_modulation_enabled: bool,
    /// Pitch spread in `[0, 2]`
    pub pitch_modulation_extent: f32,
    /// Impacts quieter than this are not played
    pub min_collision_volume: f32,
    /// Relative velocity that maps to full volume, unless an emitter overrides it
    pub max_collision_velocity: f32,
    /// Every material tag an emitter may carry
    pub materials: Vec<String>,
    /// Provider the dispatcher is built with
    pub provider: ProviderKind,
    /// Seed for clip and pitch selection (None seeds from entropy)
    pub rng_seed: Option<u64>,
}

impl Default for ImpactSonicSettings {
    fn default() -> Self {
        Self {
            sound_pool_size: 100,
            pitch_modulation_enabled: true,
            pitch_modulation_extent: 0.5,
            min_collision_volume: 0.1,
            max_collision_velocity: 5.0,
            materials: Vec::new(),
            provider: ProviderKind::ListBased,
            rng_seed: None,
        }
    }
}

impl ImpactSonicSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sound_pool_size(mut self, size: usize) -> Self {
        self.sound_pool_size = size;
        self
    }

    pub fn pitch_modulation(mut self, enabled: bool, extent: f32) -> Self {
        self.pitch_modulation_enabled = enabled;
        self.pitch_modulation_extent = extent;
        self
    }

    pub fn min_collision_volume(mut self, volume: f32) -> Self {
        self.min_collision_volume = volume;
        self
    }

    pub fn max_collision_velocity(mut self, velocity: f32) -> Self {
        self.max_collision_velocity = velocity;
        self
    }

    pub fn materials<I, S>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.materials = materials.into_iter().map(Into::into).collect();
        self
    }

    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Global pitch policy as a [`PitchModulation`].
    pub fn global_pitch_modulation(&self) -> PitchModulation {
        PitchModulation::new(self.pitch_modulation_enabled, self.pitch_modulation_extent)
    }

    pub fn has_material(&self, material: &str) -> bool {
        self.materials.iter().any(|m| m == material)
    }

    /// Checks every option against its documented range.
    pub fn validate(&self) -> Result<()> {
        if self.sound_pool_size == 0 {
            return Err(ImpactSonicError::Configuration(
                "sound_pool_size must be greater than 0".into(),
            ));
        }

        if !(0.0..=PitchModulation::MAX_EXTENT).contains(&self.pitch_modulation_extent) {
            return Err(ImpactSonicError::Configuration(format!(
                "pitch_modulation_extent must be between 0.0 and {}, got {}",
                PitchModulation::MAX_EXTENT,
                self.pitch_modulation_extent
            )));
        }

        if !self.min_collision_volume.is_finite() {
            return Err(ImpactSonicError::Configuration(
                "min_collision_volume must be finite".into(),
            ));
        }

        if !self.max_collision_velocity.is_finite() {
            return Err(ImpactSonicError::Configuration(
                "max_collision_velocity must be finite".into(),
            ));
        }

        if let Some(empty) = self.materials.iter().position(|m| m.is_empty()) {
            return Err(ImpactSonicError::Configuration(format!(
                "materials[{}] is empty",
                empty
            )));
        }

        Ok(())
    }
}
