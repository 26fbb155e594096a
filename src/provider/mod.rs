//! Sound providers.
//!
//! A provider turns a resolved pair of emitters into actual playback. Three
//! implementations exist, selected at startup through
//! [`ProviderKind`](crate::config::ProviderKind):
//!
//! - [`SimpleProvider`]: one clip per material, played through the voice pool
//! - [`ListBasedProvider`]: several candidate clips per material, one chosen at random
//! - [`ExternalMiddlewareProvider`]: one middleware event per material
//!
//! Every provider plays both sides of a collision independently. A side whose
//! material has nothing to play is reported as a configuration error and
//! skipped; an empty material on either side silently aborts the whole call.

mod list;
mod middleware;
mod pooled;
mod simple;

pub use list::ListBasedProvider;
pub use middleware::ExternalMiddlewareProvider;
pub use pooled::PooledPlayer;
pub use simple::SimpleProvider;

use crate::backend::AudioBackend;
use crate::clips::ClipLibrary;
use crate::config::{ImpactSonicSettings, ProviderKind};
use crate::emitter::{EmitterId, SoundEmitter};
use crate::error::{ImpactSonicError, Result};
use crate::math::Vec3;
use crate::middleware::AudioMiddleware;
use crate::voice::VoiceHandle;

/// One side of a collision that actually produced sound.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedSide {
    pub emitter: EmitterId,
    pub material: String,
    /// Pool voice used, `None` for middleware playback
    pub voice: Option<VoiceHandle>,
    pub pitch: f32,
}

/// What a single [`SoundProvider::play`] call did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayOutcome {
    /// Sides that played, in play order; each emitter appears at most once per side
    pub played: Vec<PlayedSide>,
    /// Configuration problems hit while playing
    pub errors: Vec<ImpactSonicError>,
}

impl PlayOutcome {
    pub fn did_play(&self, emitter: EmitterId) -> bool {
        self.played.iter().any(|side| side.emitter == emitter)
    }

    pub fn played_count(&self) -> usize {
        self.played.len()
    }

    pub fn is_silent(&self) -> bool {
        self.played.is_empty()
    }
}

/// Plays collision sounds for a pair of emitters.
pub trait SoundProvider: Send {
    fn kind(&self) -> ProviderKind;

    /// One-time initialization. Calling it again is a no-op.
    ///
    /// Returns the non-fatal configuration problems found (unlisted clips,
    /// unresolved events); fails only when the provider cannot work at all.
    fn setup(&mut self, settings: &ImpactSonicSettings) -> Result<Vec<ImpactSonicError>>;

    fn is_ready(&self) -> bool;

    /// Plays the sounds for `a` and `b` at `position`.
    fn play(
        &mut self,
        a: &SoundEmitter,
        b: &SoundEmitter,
        position: Vec3,
        impact_volume: f32,
        settings: &ImpactSonicSettings,
    ) -> PlayOutcome;
}

/// Both emitters carry a material; otherwise nothing plays at all.
pub(crate) fn is_playable_pair(a: &SoundEmitter, b: &SoundEmitter) -> bool {
    a.is_playable() && b.is_playable()
}

/// Runs setup if it has not happened yet, folding failures into `outcome`.
pub(crate) fn ensure_ready<P: SoundProvider + ?Sized>(
    provider: &mut P,
    settings: &ImpactSonicSettings,
    outcome: &mut PlayOutcome,
) -> bool {
    if provider.is_ready() {
        return true;
    }
    match provider.setup(settings) {
        Ok(problems) => {
            outcome.errors.extend(problems);
            true
        }
        Err(e) => {
            log::error!("Sound provider setup failed: {}", e);
            outcome.errors.push(e);
            false
        }
    }
}

/// Collects what each provider kind needs and builds the one selected.
///
/// # Example
///
/// ```
/// use impactsonic::provider::ProviderBuilder;
/// use impactsonic::{ChannelBackend, ClipLibrary, ProviderKind};
///
/// let mut library = ClipLibrary::new();
/// library.insert("Wood", ["Wood__01", "Wood__02"]);
///
/// let provider = ProviderBuilder::new()
///     .library(library)
///     .backend(ChannelBackend::new())
///     .build(ProviderKind::ListBased)?;
/// assert!(provider.is_some());
/// # Ok::<(), impactsonic::ImpactSonicError>(())
/// ```
#[derive(Default)]
pub struct ProviderBuilder {
    library: ClipLibrary,
    clip_names: Vec<String>,
    backend: Option<Box<dyn AudioBackend>>,
    middleware: Option<Box<dyn AudioMiddleware>>,
}

impl ProviderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit material-to-clip entries.
    pub fn library(mut self, library: ClipLibrary) -> Self {
        self.library = library;
        self
    }

    /// Clip names to file by material during setup.
    pub fn clip_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clip_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn backend<B: AudioBackend + 'static>(mut self, backend: B) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    pub fn middleware<M: AudioMiddleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware = Some(Box::new(middleware));
        self
    }

    /// Builds the provider for `kind`. `ProviderKind::None` yields `Ok(None)`.
    pub fn build(self, kind: ProviderKind) -> Result<Option<Box<dyn SoundProvider>>> {
        let provider: Box<dyn SoundProvider> = match kind {
            ProviderKind::None => return Ok(None),
            ProviderKind::Simple => {
                let backend = Self::require_backend(self.backend, kind)?;
                Box::new(
                    SimpleProvider::from_library(&self.library, backend)
                        .with_clip_names(self.clip_names),
                )
            }
            ProviderKind::ListBased => {
                let backend = Self::require_backend(self.backend, kind)?;
                Box::new(
                    ListBasedProvider::new(self.library, backend).with_clip_names(self.clip_names),
                )
            }
            ProviderKind::ExternalMiddleware => {
                let middleware = self.middleware.ok_or_else(|| {
                    ImpactSonicError::Configuration(
                        "ExternalMiddleware provider requires an audio middleware".into(),
                    )
                })?;
                Box::new(ExternalMiddlewareProvider::new(middleware))
            }
        };
        Ok(Some(provider))
    }

    fn require_backend(
        backend: Option<Box<dyn AudioBackend>>,
        kind: ProviderKind,
    ) -> Result<Box<dyn AudioBackend>> {
        backend.ok_or_else(|| {
            ImpactSonicError::Configuration(format!(
                "{:?} provider requires an audio backend",
                kind
            ))
        })
    }
}
