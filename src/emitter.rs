use crate::config::{ImpactSonicSettings, PitchModulation};
use uuid::Uuid;

/// Identifier of a physical body (collider) as handed out by the physics engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BodyId({})", self.0)
    }
}

impl From<u64> for BodyId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Handle identifying a [`SoundEmitter`] independently of the bodies it owns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmitterId(Uuid);

impl EmitterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EmitterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EmitterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmitterId({})", self.0)
    }
}

/// An object that makes a sound when it collides with another emitter.
///
/// Emitters are tagged with a material; the pair of materials involved in a
/// collision selects which clips play. Per-emitter overrides take precedence
/// over [`ImpactSonicSettings`] for pitch modulation and the velocity that
/// maps to full volume.
///
/// # Example
///
/// ```
/// use impactsonic::{PitchModulation, SoundEmitter};
///
/// let crate_emitter = SoundEmitter::new("Wood")
///     .with_pitch_modulation(PitchModulation::new(true, 0.2))
///     .with_max_collision_velocity(8.0);
/// assert_eq!(crate_emitter.material(), "Wood");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEmitter {
    id: EmitterId,
    material: String,
    block_playback: bool,
    pitch_override: Option<PitchModulation>,
    max_velocity_override: Option<f32>,
}

impl SoundEmitter {
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            id: EmitterId::new(),
            material: material.into(),
            block_playback: false,
            pitch_override: None,
            max_velocity_override: None,
        }
    }

    pub fn with_block_playback(mut self, block: bool) -> Self {
        self.block_playback = block;
        self
    }

    pub fn with_pitch_modulation(mut self, pitch: PitchModulation) -> Self {
        self.pitch_override = Some(pitch);
        self
    }

    pub fn with_max_collision_velocity(mut self, velocity: f32) -> Self {
        self.max_velocity_override = Some(velocity);
        self
    }

    pub fn id(&self) -> EmitterId {
        self.id
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn set_material(&mut self, material: impl Into<String>) {
        self.material = material.into();
    }

    /// Emitters without a material never make a sound.
    pub fn is_playable(&self) -> bool {
        !self.material.is_empty()
    }

    pub fn block_playback(&self) -> bool {
        self.block_playback
    }

    pub fn set_block_playback(&mut self, block: bool) {
        self.block_playback = block;
    }

    pub fn pitch_override(&self) -> Option<PitchModulation> {
        self.pitch_override
    }

    pub fn set_pitch_override(&mut self, pitch: Option<PitchModulation>) {
        self.pitch_override = pitch;
    }

    pub fn max_velocity_override(&self) -> Option<f32> {
        self.max_velocity_override
    }

    pub fn set_max_velocity_override(&mut self, velocity: Option<f32>) {
        self.max_velocity_override = velocity;
    }

    /// Pitch policy for this emitter: its own override, else the global one.
    pub fn effective_pitch_modulation(&self, settings: &ImpactSonicSettings) -> PitchModulation {
        self.pitch_override
            .unwrap_or_else(|| settings.global_pitch_modulation())
    }

    /// Velocity that maps to full volume for impacts reported by this emitter.
    pub fn effective_max_velocity(&self, settings: &ImpactSonicSettings) -> f32 {
        self.max_velocity_override
            .unwrap_or(settings.max_collision_velocity)
    }
}
