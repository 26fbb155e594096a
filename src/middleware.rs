//! External audio middleware seam.
//!
//! Middleware such as an event-based sound engine owns its own clips, voices
//! and pitch handling. ImpactSonic only resolves one event per material and
//! triggers it at the impact position with the impact volume.

use crate::math::Vec3;
use uuid::Uuid;

/// Prefix of the middleware event path for a material.
pub const COLLISION_EVENT_PREFIX: &str = "event:/Collisions/";

/// Event path the middleware is asked to resolve for `material`.
pub fn event_path(material: &str) -> String {
    format!("{}{}", COLLISION_EVENT_PREFIX, material)
}

/// Middleware-side identifier of a resolved event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventId({})", self.0)
    }
}

pub trait AudioMiddleware: Send {
    /// Looks up an event by path. `None` means the event does not exist.
    fn resolve_event(&self, path: &str) -> Option<EventId>;

    /// Creates a one-shot instance of `event`, places it, starts it and releases it.
    fn trigger(&mut self, event: EventId, position: Vec3, volume: f32);
}

impl<M: AudioMiddleware + ?Sized> AudioMiddleware for Box<M> {
    fn resolve_event(&self, path: &str) -> Option<EventId> {
        (**self).resolve_event(path)
    }

    fn trigger(&mut self, event: EventId, position: Vec3, volume: f32) {
        (**self).trigger(event, position, volume)
    }
}
