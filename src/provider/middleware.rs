use super::{PlayOutcome, PlayedSide, SoundProvider, is_playable_pair};
use crate::config::{ImpactSonicSettings, ProviderKind};
use crate::emitter::SoundEmitter;
use crate::error::{ImpactSonicError, Result};
use crate::math::Vec3;
use crate::middleware::{AudioMiddleware, EventId, event_path};
use std::collections::HashMap;

/// Provider that hands playback to an external audio middleware.
///
/// Each material maps to the event `event:/Collisions/{material}`. Events for
/// listed materials are resolved during setup; other materials are resolved
/// the first time they are hit. Pitch is left to the middleware.
pub struct ExternalMiddlewareProvider<M: AudioMiddleware> {
    middleware: M,
    events: HashMap<String, EventId>,
    ready: bool,
}

impl<M: AudioMiddleware> ExternalMiddlewareProvider<M> {
    pub fn new(middleware: M) -> Self {
        Self {
            middleware,
            events: HashMap::new(),
            ready: false,
        }
    }

    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    pub fn event(&self, material: &str) -> Option<EventId> {
        self.events.get(material).copied()
    }

    fn resolve(&mut self, material: &str) -> Result<EventId> {
        if let Some(event) = self.events.get(material) {
            return Ok(*event);
        }
        let path = event_path(material);
        match self.middleware.resolve_event(&path) {
            Some(event) => {
                self.events.insert(material.to_string(), event);
                Ok(event)
            }
            None => Err(ImpactSonicError::MissingEvent {
                material: material.to_string(),
                path,
            }),
        }
    }

    fn play_side(
        &mut self,
        emitter: &SoundEmitter,
        position: Vec3,
        impact_volume: f32,
        outcome: &mut PlayOutcome,
    ) {
        match self.resolve(emitter.material()) {
            Ok(event) => {
                log::debug!(
                    "Triggering {} for {} (volume {:.3})",
                    event,
                    emitter.material(),
                    impact_volume
                );
                self.middleware.trigger(event, position, impact_volume);
                outcome.played.push(PlayedSide {
                    emitter: emitter.id(),
                    material: emitter.material().to_string(),
                    voice: None,
                    pitch: 1.0,
                });
            }
            Err(e) => {
                log::error!("{}", e);
                outcome.errors.push(e);
            }
        }
    }
}

impl<M: AudioMiddleware> SoundProvider for ExternalMiddlewareProvider<M> {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ExternalMiddleware
    }

    fn setup(&mut self, settings: &ImpactSonicSettings) -> Result<Vec<ImpactSonicError>> {
        if self.ready {
            return Ok(Vec::new());
        }

        let mut problems = Vec::new();
        for material in &settings.materials {
            if let Err(e) = self.resolve(material) {
                log::warn!("{}", e);
                problems.push(e);
            }
        }

        self.ready = true;
        log::info!(
            "Middleware collision sound provider ready ({} events)",
            self.events.len()
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
        _settings: &ImpactSonicSettings,
    ) -> PlayOutcome {
        let mut outcome = PlayOutcome::default();
        if !is_playable_pair(a, b) {
            return outcome;
        }

        self.play_side(a, position, impact_volume, &mut outcome);
        self.play_side(b, position, impact_volume, &mut outcome);
        outcome
    }
}
