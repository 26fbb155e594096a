use crate::backend::AudioBackend;
use crate::clips::ClipId;
use crate::config::{ImpactSonicSettings, PitchModulation};
use crate::error::Result;
use crate::math::Vec3;
use crate::voice::{VoiceHandle, VoicePool};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Voice pool, backend and random source shared by the built-in providers.
///
/// The pool is created by [`PooledPlayer::prepare`] with the configured pool
/// size and keeps that capacity for the rest of its life.
pub struct PooledPlayer<B: AudioBackend> {
    backend: B,
    pool: Option<VoicePool>,
    rng: StdRng,
    seeded: bool,
}

impl<B: AudioBackend> PooledPlayer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            pool: None,
            rng: StdRng::from_entropy(),
            seeded: false,
        }
    }

    /// Pre-warms the voice pool and applies the configured seed.
    pub fn prepare(&mut self, settings: &ImpactSonicSettings) -> Result<()> {
        if !self.seeded {
            if let Some(seed) = settings.rng_seed {
                self.rng = StdRng::seed_from_u64(seed);
            }
            self.seeded = true;
        }

        match &self.pool {
            Some(pool) if pool.capacity() != settings.sound_pool_size => {
                log::warn!(
                    "Voice pool is fixed at {} voices, ignoring new size {}",
                    pool.capacity(),
                    settings.sound_pool_size
                );
            }
            Some(_) => {}
            None => {
                self.pool = Some(VoicePool::new(settings.sound_pool_size)?);
                log::info!("Voice pool ready with {} voices", settings.sound_pool_size);
            }
        }
        Ok(())
    }

    pub fn is_prepared(&self) -> bool {
        self.pool.is_some()
    }

    pub fn pool(&self) -> Option<&VoicePool> {
        self.pool.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Picks a clip uniformly at random.
    pub fn choose_clip<'a>(&mut self, clips: &'a [ClipId]) -> Option<&'a ClipId> {
        clips.choose(&mut self.rng)
    }

    /// Pitch for one sound: exactly 1 when modulation is off, otherwise uniform
    /// over the modulation range.
    pub fn pitch(&mut self, modulation: PitchModulation) -> f32 {
        match modulation.range() {
            Some((min, max)) => self.rng.gen_range(min..=max),
            None => 1.0,
        }
    }

    /// Assigns the next voice and starts it on the backend.
    ///
    /// Returns `None` only if the pool has not been prepared.
    pub fn play(
        &mut self,
        clip: ClipId,
        position: Vec3,
        volume: f32,
        pitch: f32,
    ) -> Option<VoiceHandle> {
        let pool = self.pool.as_mut()?;
        let playback = pool.allocate().assign(clip, position, volume, pitch);
        log::debug!(
            "Playing {} on {} (volume {:.3}, pitch {:.3})",
            playback.clip,
            playback.voice,
            playback.volume,
            playback.pitch
        );
        self.backend.play(playback);
        Some(playback.voice)
    }
}
