use super::{
    PlayOutcome, PlayedSide, PooledPlayer, SoundProvider, ensure_ready, is_playable_pair,
};
use crate::backend::AudioBackend;
use crate::clips::ClipLibrary;
use crate::config::{ImpactSonicSettings, ProviderKind};
use crate::emitter::SoundEmitter;
use crate::error::{ImpactSonicError, Result};
use crate::math::Vec3;
use crate::voice::VoicePool;

/// Built-in provider that picks one of several clips per material at random.
///
/// Clip sets come from an explicit [`ClipLibrary`] plus any clip names queued
/// with [`ListBasedProvider::with_clip_names`], which are filed by material
/// during [`SoundProvider::setup`].
pub struct ListBasedProvider<B: AudioBackend> {
    library: ClipLibrary,
    pending_clip_names: Vec<String>,
    player: PooledPlayer<B>,
    ready: bool,
}

impl<B: AudioBackend> ListBasedProvider<B> {
    pub fn new(library: ClipLibrary, backend: B) -> Self {
        Self {
            library,
            pending_clip_names: Vec::new(),
            player: PooledPlayer::new(backend),
            ready: false,
        }
    }

    pub fn with_clip_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending_clip_names
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn library(&self) -> &ClipLibrary {
        &self.library
    }

    pub fn pool(&self) -> Option<&VoicePool> {
        self.player.pool()
    }

    pub fn backend(&self) -> &B {
        self.player.backend()
    }

    fn play_side(
        &mut self,
        emitter: &SoundEmitter,
        position: Vec3,
        impact_volume: f32,
        settings: &ImpactSonicSettings,
        outcome: &mut PlayOutcome,
    ) {
        let clip = match self.library.clips(emitter.material()) {
            Ok(clips) => self.player.choose_clip(clips).cloned(),
            Err(e) => {
                log::error!(
                    "Trying to play sound for material without a clip, add clips for '{}': {}",
                    emitter.material(),
                    e
                );
                outcome.errors.push(e);
                return;
            }
        };
        let Some(clip) = clip else {
            return;
        };

        let pitch = self
            .player
            .pitch(emitter.effective_pitch_modulation(settings));
        if let Some(voice) = self.player.play(clip, position, impact_volume, pitch) {
            outcome.played.push(PlayedSide {
                emitter: emitter.id(),
                material: emitter.material().to_string(),
                voice: Some(voice),
                pitch,
            });
        }
    }
}

impl<B: AudioBackend> SoundProvider for ListBasedProvider<B> {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ListBased
    }

    fn setup(&mut self, settings: &ImpactSonicSettings) -> Result<Vec<ImpactSonicError>> {
        if self.ready {
            return Ok(Vec::new());
        }

        let names = std::mem::take(&mut self.pending_clip_names);
        let problems = self.library.discover(names, &settings.materials);

        let missing = self.library.missing(&settings.materials);
        if !missing.is_empty() {
            log::warn!("Materials without collision clips: {:?}", missing);
        }

        self.player.prepare(settings)?;
        self.ready = true;
        log::info!(
            "List-based collision sound provider ready ({} materials)",
            self.library.len()
        );
        Ok(problems)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn play(
        &mut self,
        a: &SoundEmitter,
        b: &SoundEmitter,
        position: Vec3,
        impact_volume: f32,
        settings: &ImpactSonicSettings,
    ) -> PlayOutcome {
        let mut outcome = PlayOutcome::default();
        if !is_playable_pair(a, b) || !ensure_ready(self, settings, &mut outcome) {
            return outcome;
        }

        self.play_side(a, position, impact_volume, settings, &mut outcome);
        self.play_side(b, position, impact_volume, settings, &mut outcome);
        outcome
    }
}
