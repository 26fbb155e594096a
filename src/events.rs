//! Event types for ImpactSonic

use crate::emitter::EmitterId;
use crate::error::ImpactSonicError;
use crate::voice::VoiceHandle;

/// Notifications emitted by the dispatcher, drained with
/// [`CollisionDispatcher::poll_events`](crate::CollisionDispatcher::poll_events).
#[derive(Debug, Clone, PartialEq)]
pub enum ImpactSonicEvent {
    /// An emitter's material sound was played. Emitted once per played side.
    EmitterPlayed {
        emitter_id: EmitterId,
        material: String,
        voice: Option<VoiceHandle>,
    },
    /// A material had nothing to play, or a clip/event could not be mapped.
    ConfigurationError { error: ImpactSonicError },
}

impl ImpactSonicEvent {
    pub fn emitter_id(&self) -> Option<EmitterId> {
        match self {
            Self::EmitterPlayed { emitter_id, .. } => Some(*emitter_id),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::ConfigurationError { .. })
    }
}
