//! # ImpactSonic
//!
//! Collision sound dispatch for physics-driven games and simulations.
//!
//! Every object that should make a noise when hit is a [`SoundEmitter`]
//! tagged with a material ("Wood", "Metal", ...). When the physics engine
//! reports a collision between two registered bodies, ImpactSonic turns the
//! impact velocity into a volume, filters out impacts that are too soft,
//! blocked, or already played this step, and plays one sound per side through
//! a bounded, round-robin voice pool.
//!
//! ## Quick Start
//!
//! ```no_run
//! use impactsonic::provider::ProviderBuilder;
//! use impactsonic::*;
//! use std::sync::Arc;
//!
//! let settings = ImpactSonicSettings::new()
//!     .materials(["Metal", "Stone", "Wood"])
//!     .sound_pool_size(32);
//!
//! // Material tags for the bodies the physics engine knows about
//! let registry = Arc::new(MaterialRegistry::new());
//! let crate_id = registry.attach(&SoundEmitter::new("Wood"), [BodyId(1), BodyId(2)]);
//! registry.attach(&SoundEmitter::new("Stone"), [BodyId(100)]);
//!
//! // Clips named `Material__suffix` are filed under their material
//! let backend = ChannelBackend::new();
//! let commands = backend.command_receiver();
//! let builder = ProviderBuilder::new()
//!     .clip_names(["Wood__01", "Wood__02", "Stone__01", "Metal__01"])
//!     .backend(backend);
//!
//! let mut dispatcher = CollisionDispatcher::from_settings(settings, registry.clone(), builder)?;
//!
//! // Once per fixed physics step
//! dispatcher.begin_step();
//! dispatcher.on_collision_enter(BodyId(1), BodyId(100), Vec3::ZERO, Vec3::new(0.0, -3.0, 0.0));
//!
//! // The audio thread drains playback commands
//! for PlaybackCommand::Play(playback) in commands.try_iter() {
//!     println!("{} on {}", playback.clip, playback.voice);
//! }
//!
//! // Did-play notifications and configuration problems
//! for event in dispatcher.poll_events() {
//!     if let ImpactSonicEvent::EmitterPlayed { emitter_id, .. } = event {
//!         println!("{} played", emitter_id);
//!     }
//! }
//!
//! // Teardown
//! registry.detach(crate_id);
//! # Ok::<(), ImpactSonicError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`MaterialRegistry`]**: maps physics bodies to the emitters that own them
//! - **[`impact`]**: relative velocity to eased volume
//! - **[`VoicePool`]**: fixed-size round-robin pool of playback voices
//! - **[`SoundProvider`]**: simple, list-based and middleware playback strategies
//! - **[`CollisionDispatcher`]**: per-step ordering, deduplication and filtering
//!
//! ## Threading
//!
//! Collision dispatch is single-threaded: all callbacks of one step arrive on
//! the thread that owns the [`CollisionDispatcher`] before the next
//! [`begin_step`](CollisionDispatcher::begin_step). The registry is internally
//! synchronized and can be shared with object lifecycle code on other threads.
//! Playback commands and events travel over channels.

pub mod backend;
pub mod clips;
pub mod config;
pub mod dispatcher;
pub mod emitter;
pub mod error;
pub mod events;
pub mod impact;
pub mod math;
pub mod middleware;
pub mod pair;
pub mod provider;
pub mod registry;
pub mod voice;

pub use backend::{AudioBackend, ChannelBackend, NullBackend, PlaybackCommand};
pub use clips::{ClipId, ClipLibrary};
pub use config::{ImpactSonicSettings, PitchModulation, ProviderKind};
pub use dispatcher::{CollisionDispatcher, DispatchOutcome};
pub use emitter::{BodyId, EmitterId, SoundEmitter};
pub use error::ImpactSonicError;
pub use events::ImpactSonicEvent;
pub use math::Vec3;
pub use middleware::{AudioMiddleware, EventId};
pub use pair::MaterialPairKey;
pub use provider::{PlayOutcome, SoundProvider};
pub use registry::MaterialRegistry;
pub use voice::{VoiceHandle, VoicePlayback, VoicePool};
