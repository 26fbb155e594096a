//! Collision dispatch.
//!
//! [`CollisionDispatcher`] sits between the physics engine and the sound
//! provider. For every reported collision it computes the impact volume,
//! drops impacts that are too soft or involve a blocked emitter, orders the
//! two materials canonically and filters out repeats of the same pair within
//! the current simulation step before asking the provider to play.
//!
//! # Step protocol
//!
//! Call [`CollisionDispatcher::begin_step`] once at the start of every fixed
//! simulation step, before that step's collision callbacks are forwarded.

use crate::config::ImpactSonicSettings;
use crate::emitter::{BodyId, SoundEmitter};
use crate::error::Result;
use crate::events::ImpactSonicEvent;
use crate::impact::compute_volume;
use crate::math::Vec3;
use crate::pair::{MaterialPairKey, canonicalize_emitters};
use crate::provider::{PlayOutcome, ProviderBuilder, SoundProvider};
use crate::registry::MaterialRegistry;
use crossbeam_channel::{Receiver, Sender};
use std::collections::HashSet;
use std::sync::Arc;

/// Events kept for [`CollisionDispatcher::poll_events`] before new ones are dropped.
pub const EVENT_QUEUE_CAPACITY: usize = 1024;

/// What happened to a single collision report.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Forwarded to the provider
    Played {
        key: MaterialPairKey,
        outcome: PlayOutcome,
    },
    /// Impact volume below `min_collision_volume`
    BelowVolumeFloor { volume: f32 },
    /// One of the emitters has playback blocked
    Blocked,
    /// The same pair already played this step
    Duplicate,
    /// One of the bodies has no registered emitter
    Unresolved,
    /// No sound provider is configured
    NoProvider,
}

impl DispatchOutcome {
    pub fn is_played(&self) -> bool {
        matches!(self, Self::Played { .. })
    }
}

/// Per-step collision-to-sound coordinator.
///
/// # Example
///
/// ```
/// use impactsonic::provider::ProviderBuilder;
/// use impactsonic::*;
/// use std::sync::Arc;
///
/// let settings = ImpactSonicSettings::new().materials(["Metal", "Wood"]);
/// let mut library = ClipLibrary::new();
/// library.insert("Metal", ["Metal__01"]);
/// library.insert("Wood", ["Wood__01", "Wood__02"]);
///
/// let registry = Arc::new(MaterialRegistry::new());
/// registry.attach(&SoundEmitter::new("Wood"), [BodyId(1)]);
/// registry.attach(&SoundEmitter::new("Metal"), [BodyId(2)]);
///
/// let builder = ProviderBuilder::new()
///     .library(library)
///     .backend(ChannelBackend::new());
/// let mut dispatcher = CollisionDispatcher::from_settings(settings, registry, builder)?;
///
/// dispatcher.begin_step();
/// let velocity = Vec3::new(0.0, -2.5, 0.0);
/// let outcome = dispatcher.on_collision_enter(BodyId(1), BodyId(2), Vec3::ZERO, velocity);
/// assert!(outcome.is_played());
/// # Ok::<(), ImpactSonicError>(())
/// ```
pub struct CollisionDispatcher {
    settings: ImpactSonicSettings,
    registry: Arc<MaterialRegistry>,
    provider: Option<Box<dyn SoundProvider>>,
    played_this_step: HashSet<MaterialPairKey>,
    step: u64,
    event_sender: Sender<ImpactSonicEvent>,
    event_receiver: Receiver<ImpactSonicEvent>,
    dropped_events: u64,
}

impl CollisionDispatcher {
    /// Validates `settings` and sets up `provider` (if any).
    pub fn new(
        settings: ImpactSonicSettings,
        registry: Arc<MaterialRegistry>,
        provider: Option<Box<dyn SoundProvider>>,
    ) -> Result<Self> {
        settings.validate()?;
        let (event_sender, event_receiver) = crossbeam_channel::bounded(EVENT_QUEUE_CAPACITY);
        let mut dispatcher = Self {
            settings,
            registry,
            provider,
            played_this_step: HashSet::new(),
            step: 0,
            event_sender,
            event_receiver,
            dropped_events: 0,
        };

        match dispatcher.provider.as_mut() {
            Some(provider) => {
                let problems = provider.setup(&dispatcher.settings)?;
                log::info!(
                    "Collision dispatcher ready with {:?} provider",
                    provider.kind()
                );
                for error in problems {
                    dispatcher.emit(ImpactSonicEvent::ConfigurationError { error });
                }
            }
            None => {
                log::info!("Collision dispatcher has no sound provider, collisions are silent")
            }
        }
        Ok(dispatcher)
    }

    /// Builds the provider selected by `settings.provider` and a dispatcher around it.
    pub fn from_settings(
        settings: ImpactSonicSettings,
        registry: Arc<MaterialRegistry>,
        builder: ProviderBuilder,
    ) -> Result<Self> {
        settings.validate()?;
        let provider = builder.build(settings.provider)?;
        Self::new(settings, registry, provider)
    }

    pub fn settings(&self) -> &ImpactSonicSettings {
        &self.settings
    }

    /// Mutable settings. Thresholds and pitch policy apply from the next
    /// collision; the voice pool keeps the size it was set up with.
    pub fn settings_mut(&mut self) -> &mut ImpactSonicSettings {
        &mut self.settings
    }

    /// Replaces the settings after validating them. The pool size is kept.
    pub fn set_settings(&mut self, mut settings: ImpactSonicSettings) -> Result<()> {
        settings.validate()?;
        if settings.sound_pool_size != self.settings.sound_pool_size {
            log::warn!(
                "Sound pool size cannot change at runtime ({} -> {}), keeping {}",
                self.settings.sound_pool_size,
                settings.sound_pool_size,
                self.settings.sound_pool_size
            );
            settings.sound_pool_size = self.settings.sound_pool_size;
        }
        self.settings = settings;
        Ok(())
    }

    pub fn registry(&self) -> &Arc<MaterialRegistry> {
        &self.registry
    }

    pub fn provider(&self) -> Option<&dyn SoundProvider> {
        self.provider.as_deref()
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Number of the current simulation step (0 before the first `begin_step`).
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Distinct pairs played during the current step.
    pub fn played_this_step(&self) -> usize {
        self.played_this_step.len()
    }

    /// Starts a new simulation step, clearing the duplicate filter.
    pub fn begin_step(&mut self) {
        self.played_this_step.clear();
        self.step += 1;
    }

    /// Physics callback: `reporter_body` hit `other_body`.
    ///
    /// Both bodies must be registered; the reporter's emitter decides the
    /// velocity that maps to full volume.
    pub fn on_collision_enter(
        &mut self,
        reporter_body: BodyId,
        other_body: BodyId,
        contact_point: Vec3,
        relative_velocity: Vec3,
    ) -> DispatchOutcome {
        let (Some(reporter), Some(other)) = (
            self.registry.resolve(reporter_body),
            self.registry.resolve(other_body),
        ) else {
            return DispatchOutcome::Unresolved;
        };
        self.dispatch(&reporter, &other, contact_point, relative_velocity)
    }

    /// Computes the impact volume from `reporter`'s point of view and plays the pair.
    pub fn dispatch(
        &mut self,
        reporter: &SoundEmitter,
        other: &SoundEmitter,
        contact_point: Vec3,
        relative_velocity: Vec3,
    ) -> DispatchOutcome {
        let max_velocity = reporter.effective_max_velocity(&self.settings);
        let volume = compute_volume(relative_velocity.length(), max_velocity);
        if volume < self.settings.min_collision_volume {
            return DispatchOutcome::BelowVolumeFloor { volume };
        }
        self.play(reporter, other, contact_point, volume)
    }

    /// Plays a pair with an already computed impact volume.
    ///
    /// Applies blocking, canonical ordering and per-step deduplication.
    pub fn play(
        &mut self,
        a: &SoundEmitter,
        b: &SoundEmitter,
        position: Vec3,
        impact_volume: f32,
    ) -> DispatchOutcome {
        if self.provider.is_none() {
            return DispatchOutcome::NoProvider;
        }
        if a.block_playback() || b.block_playback() {
            return DispatchOutcome::Blocked;
        }

        let (first, second) = canonicalize_emitters(a, b);
        let key = MaterialPairKey::new(
            first.material(),
            second.material(),
            position,
            impact_volume,
        );
        if self.played_this_step.contains(&key) {
            return DispatchOutcome::Duplicate;
        }
        self.played_this_step.insert(key.clone());

        let Some(provider) = self.provider.as_mut() else {
            return DispatchOutcome::NoProvider;
        };
        let outcome = provider.play(first, second, position, impact_volume, &self.settings);

        for side in &outcome.played {
            self.emit(ImpactSonicEvent::EmitterPlayed {
                emitter_id: side.emitter,
                material: side.material.clone(),
                voice: side.voice,
            });
        }
        for error in &outcome.errors {
            self.emit(ImpactSonicEvent::ConfigurationError {
                error: error.clone(),
            });
        }

        DispatchOutcome::Played { key, outcome }
    }

    /// Drains pending events.
    ///
    /// At most [`EVENT_QUEUE_CAPACITY`] events are queued; anything emitted
    /// while the queue is full is dropped.
    pub fn poll_events(&self) -> Vec<ImpactSonicEvent> {
        self.event_receiver.try_iter().collect()
    }

    /// Receiver for consuming events from another thread.
    pub fn event_receiver(&self) -> Receiver<ImpactSonicEvent> {
        self.event_receiver.clone()
    }

    /// Events dropped since the queue last filled up.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    fn emit(&mut self, event: ImpactSonicEvent) {
        // the dispatcher holds a receiver, so the channel never disconnects
        match self.event_sender.try_send(event) {
            Ok(()) if self.dropped_events > 0 => {
                log::info!(
                    "Event queue drained, {} events were dropped",
                    self.dropped_events
                );
                self.dropped_events = 0;
            }
            Ok(()) => {}
            Err(_) => {
                if self.dropped_events == 0 {
                    log::warn!(
                        "Event queue full ({} events), dropping events until polled",
                        EVENT_QUEUE_CAPACITY
                    );
                }
                self.dropped_events += 1;
            }
        }
    }
}
