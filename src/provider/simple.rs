use super::{
    PlayOutcome, PlayedSide, PooledPlayer, SoundProvider, ensure_ready, is_playable_pair,
};
use crate::backend::AudioBackend;
use crate::clips::{ClipId, ClipLibrary};
use crate::config::{ImpactSonicSettings, ProviderKind};
use crate::emitter::SoundEmitter;
use crate::error::{ImpactSonicError, Result};
use crate::math::Vec3;
use crate::voice::VoicePool;
use std::collections::HashMap;

/// Built-in provider with exactly one clip per material.
///
/// Uses the same voice pool and pitch policy as [`ListBasedProvider`](super::ListBasedProvider)
/// but never randomizes the clip.
pub struct SimpleProvider<B: AudioBackend> {
    clips: HashMap<String, ClipId>,
    pending_clip_names: Vec<String>,
    player: PooledPlayer<B>,
    ready: bool,
}

impl<B: AudioBackend> SimpleProvider<B> {
    pub fn new(backend: B) -> Self {
        Self {
            clips: HashMap::new(),
            pending_clip_names: Vec::new(),
            player: PooledPlayer::new(backend),
            ready: false,
        }
    }

    /// Takes the first clip of every material in `library`.
    pub fn from_library(library: &ClipLibrary, backend: B) -> Self {
        let mut provider = Self::new(backend);
        for material in library.materials() {
            if let Some(clip) = library.clips(material).ok().and_then(|c| c.first()) {
                provider.clips.insert(material.to_string(), clip.clone());
            }
        }
        provider
    }

    pub fn with_clip(mut self, material: impl Into<String>, clip: impl Into<ClipId>) -> Self {
        self.clips.insert(material.into(), clip.into());
        self
    }

    /// Clip names filed by material during setup; the first one per material wins.
    pub fn with_clip_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending_clip_names
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn clip(&self, material: &str) -> Option<&ClipId> {
        self.clips.get(material)
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
        let Some(clip) = self.clips.get(emitter.material()).cloned() else {
            let e = ImpactSonicError::MissingClip(emitter.material().to_string());
            log::error!("{}", e);
            outcome.errors.push(e);
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

impl<B: AudioBackend> SoundProvider for SimpleProvider<B> {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Simple
    }

    fn setup(&mut self, settings: &ImpactSonicSettings) -> Result<Vec<ImpactSonicError>> {
        if self.ready {
            return Ok(Vec::new());
        }

        let mut discovered = ClipLibrary::new();
        for (material, clip) in &self.clips {
            discovered.add_clip(material.clone(), clip.clone());
        }
        let names = std::mem::take(&mut self.pending_clip_names);
        let problems = discovered.discover(names, &settings.materials);
        for material in discovered.materials() {
            if self.clips.contains_key(material) {
                continue;
            }
            if let Some(clip) = discovered.clips(material).ok().and_then(|c| c.first()) {
                self.clips.insert(material.to_string(), clip.clone());
            }
        }

        let missing: Vec<&str> = settings
            .materials
            .iter()
            .map(String::as_str)
            .filter(|m| !self.clips.contains_key(*m))
            .collect();
        if !missing.is_empty() {
            log::warn!("Materials without a collision clip: {:?}", missing);
        }

        self.player.prepare(settings)?;
        self.ready = true;
        log::info!(
            "Simple collision sound provider ready ({} materials)",
            self.clips.len()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ChannelBackend, PlaybackCommand};

    #[test]
    fn test_plays_the_single_clip() {
        let settings = ImpactSonicSettings::new()
            .materials(["Wood", "Stone"])
            .sound_pool_size(2)
            .pitch_modulation(false, 0.0);
        let mut provider = SimpleProvider::new(ChannelBackend::new())
            .with_clip("Wood", "wood_knock")
            .with_clip_names(["Stone__a", "Stone__b"]);
        let receiver = provider.backend().command_receiver();
        provider.setup(&settings).unwrap();

        assert_eq!(provider.clip("Stone"), Some(&ClipId::new("Stone__a")));

        let wood = SoundEmitter::new("Wood");
        let stone = SoundEmitter::new("Stone");
        for _ in 0..3 {
            let outcome = provider.play(&stone, &wood, Vec3::ZERO, 0.6, &settings);
            assert_eq!(outcome.played_count(), 2);
        }

        let clips: Vec<_> = receiver
            .try_iter()
            .map(|PlaybackCommand::Play(p)| (p.clip.to_string(), p.pitch))
            .collect();
        assert_eq!(clips.len(), 6);
        for pair in clips.chunks(2) {
            assert_eq!(pair[0], ("Stone__a".to_string(), 1.0));
            assert_eq!(pair[1], ("wood_knock".to_string(), 1.0));
        }
    }

    #[test]
    fn test_from_library_takes_first_clip() {
        let mut library = ClipLibrary::new();
        library.insert("Metal", ["clang_1", "clang_2"]);
        library.insert("Foam", Vec::<ClipId>::new());
        let provider = SimpleProvider::from_library(&library, ChannelBackend::new());

        assert_eq!(provider.clip("Metal"), Some(&ClipId::new("clang_1")));
        assert_eq!(provider.clip("Foam"), None);
    }

    #[test]
    fn test_unknown_material_reports_error() {
        let settings = ImpactSonicSettings::new().materials(["Wood"]);
        let mut provider =
            SimpleProvider::new(ChannelBackend::new()).with_clip("Wood", "wood_knock");
        provider.setup(&settings).unwrap();

        let wood = SoundEmitter::new("Wood");
        let ice = SoundEmitter::new("Ice");
        let outcome = provider.play(&wood, &ice, Vec3::ZERO, 1.0, &settings);

        assert!(outcome.did_play(wood.id()));
        assert!(!outcome.did_play(ice.id()));
        assert_eq!(
            outcome.errors,
            vec![ImpactSonicError::MissingClip("Ice".into())]
        );
    }
}
