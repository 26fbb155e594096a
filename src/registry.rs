//! Body-to-emitter lookup.
//!
//! The physics engine only knows about bodies; the registry answers "which
//! sound emitter owns this body?" when a collision comes in. Several bodies
//! (the sub-colliders of a compound object) can map to the same emitter.

use crate::emitter::{BodyId, EmitterId, SoundEmitter};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct RegistryState {
    bodies: HashMap<BodyId, EmitterId>,
    emitters: HashMap<EmitterId, SoundEmitter>,
    owned: HashMap<EmitterId, HashSet<BodyId>>,
}

impl RegistryState {
    fn unlink(&mut self, body: BodyId) -> Option<EmitterId> {
        let emitter_id = self.bodies.remove(&body)?;
        if let Some(owned) = self.owned.get_mut(&emitter_id) {
            owned.remove(&body);
            if owned.is_empty() {
                self.owned.remove(&emitter_id);
                self.emitters.remove(&emitter_id);
            }
        }
        Some(emitter_id)
    }
}

/// Thread-safe map from physics bodies to the emitters that own them.
///
/// All methods take `&self`, so a registry can be shared behind an `Arc`
/// between object lifecycle hooks and the collision handler.
#[derive(Default)]
pub struct MaterialRegistry {
    state: Mutex<RegistryState>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Maps `body` to `emitter`, replacing any previous owner of that body.
    ///
    /// The emitter's stored state is refreshed from the value passed in.
    pub fn register(&self, body: BodyId, emitter: &SoundEmitter) {
        let mut state = self.state();
        if state.bodies.get(&body) != Some(&emitter.id()) {
            state.unlink(body);
        }
        state.bodies.insert(body, emitter.id());
        state.emitters.insert(emitter.id(), emitter.clone());
        state.owned.entry(emitter.id()).or_default().insert(body);
    }

    /// Registers every body of a compound object against one emitter.
    pub fn attach<I>(&self, emitter: &SoundEmitter, bodies: I) -> EmitterId
    where
        I: IntoIterator<Item = BodyId>,
    {
        let mut count = 0usize;
        for body in bodies {
            self.register(body, emitter);
            count += 1;
        }
        log::debug!(
            "Attached emitter {} ({}) to {} bodies",
            emitter.id(),
            emitter.material(),
            count
        );
        emitter.id()
    }

    /// Removes a single body mapping. Returns the emitter that owned it.
    ///
    /// The emitter itself is dropped once its last body is gone.
    pub fn unregister(&self, body: BodyId) -> Option<EmitterId> {
        self.state().unlink(body)
    }

    /// Removes the emitter and every body mapping it owns.
    ///
    /// Returns the removed emitter, or `None` if it was not registered.
    pub fn detach(&self, emitter_id: EmitterId) -> Option<SoundEmitter> {
        let mut state = self.state();
        if let Some(owned) = state.owned.remove(&emitter_id) {
            for body in owned {
                state.bodies.remove(&body);
            }
        }
        let removed = state.emitters.remove(&emitter_id);
        if removed.is_some() {
            log::debug!("Detached emitter {}", emitter_id);
        }
        removed
    }

    /// Looks up the emitter that owns `body`.
    pub fn resolve(&self, body: BodyId) -> Option<SoundEmitter> {
        let state = self.state();
        let emitter_id = state.bodies.get(&body)?;
        state.emitters.get(emitter_id).cloned()
    }

    pub fn emitter(&self, emitter_id: EmitterId) -> Option<SoundEmitter> {
        self.state().emitters.get(&emitter_id).cloned()
    }

    /// Applies `f` to a registered emitter. Returns `false` if it is not registered.
    pub fn update_emitter<F>(&self, emitter_id: EmitterId, f: F) -> bool
    where
        F: FnOnce(&mut SoundEmitter),
    {
        match self.state().emitters.get_mut(&emitter_id) {
            Some(emitter) => {
                f(emitter);
                true
            }
            None => false,
        }
    }

    pub fn set_block_playback(&self, emitter_id: EmitterId, block: bool) -> bool {
        self.update_emitter(emitter_id, |emitter| emitter.set_block_playback(block))
    }

    pub fn bodies_of(&self, emitter_id: EmitterId) -> Vec<BodyId> {
        let mut bodies: Vec<BodyId> = self
            .state()
            .owned
            .get(&emitter_id)
            .map(|owned| owned.iter().copied().collect())
            .unwrap_or_default();
        bodies.sort();
        bodies
    }

    pub fn contains_body(&self, body: BodyId) -> bool {
        self.state().bodies.contains_key(&body)
    }

    /// Number of registered bodies.
    pub fn len(&self) -> usize {
        self.state().bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().bodies.is_empty()
    }

    pub fn emitter_count(&self) -> usize {
        self.state().emitters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_many_to_one() {
        let registry = MaterialRegistry::new();
        let barrel = SoundEmitter::new("Metal");
        let id = registry.attach(&barrel, [BodyId(1), BodyId(2), BodyId(3)]);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.emitter_count(), 1);
        for body in [1, 2, 3] {
            assert_eq!(registry.resolve(BodyId(body)).map(|e| e.id()), Some(id));
        }
        assert_eq!(registry.bodies_of(id), vec![BodyId(1), BodyId(2), BodyId(3)]);
        assert!(registry.resolve(BodyId(4)).is_none());
    }

    #[test]
    fn test_detach_removes_all_mappings() {
        let registry = MaterialRegistry::new();
        let crate_emitter = SoundEmitter::new("Wood");
        let floor = SoundEmitter::new("Stone");
        let crate_id = registry.attach(&crate_emitter, [BodyId(10), BodyId(11)]);
        registry.attach(&floor, [BodyId(20)]);

        let removed = registry.detach(crate_id);
        assert_eq!(removed.map(|e| e.material().to_string()), Some("Wood".into()));
        assert!(!registry.contains_body(BodyId(10)));
        assert!(!registry.contains_body(BodyId(11)));
        assert!(registry.contains_body(BodyId(20)));
        assert!(registry.detach(crate_id).is_none());
    }

    #[test]
    fn test_unregister_last_body_drops_emitter() {
        let registry = MaterialRegistry::new();
        let emitter = SoundEmitter::new("Glass");
        let id = registry.attach(&emitter, [BodyId(1), BodyId(2)]);

        assert_eq!(registry.unregister(BodyId(1)), Some(id));
        assert!(registry.emitter(id).is_some());
        assert_eq!(registry.unregister(BodyId(2)), Some(id));
        assert!(registry.emitter(id).is_none());
        assert!(registry.is_empty());
        assert_eq!(registry.unregister(BodyId(2)), None);
    }

    #[test]
    fn test_reregister_moves_body() {
        let registry = MaterialRegistry::new();
        let a = SoundEmitter::new("Wood");
        let b = SoundEmitter::new("Metal");
        registry.register(BodyId(1), &a);
        registry.register(BodyId(1), &b);

        assert_eq!(registry.resolve(BodyId(1)).map(|e| e.id()), Some(b.id()));
        assert!(registry.emitter(a.id()).is_none());
        assert_eq!(registry.emitter_count(), 1);
    }

    #[test]
    fn test_block_playback_toggle() {
        let registry = MaterialRegistry::new();
        let emitter = SoundEmitter::new("Rubber");
        let id = registry.attach(&emitter, [BodyId(5)]);

        assert!(registry.set_block_playback(id, true));
        assert!(registry.resolve(BodyId(5)).unwrap().block_playback());
        assert!(registry.set_block_playback(id, false));
        assert!(!registry.resolve(BodyId(5)).unwrap().block_playback());
        assert!(!registry.set_block_playback(EmitterId::new(), true));
    }

    #[test]
    fn test_concurrent_lifecycle_and_resolve() {
        let registry = Arc::new(MaterialRegistry::new());
        let floor = SoundEmitter::new("Stone");
        registry.attach(&floor, [BodyId(0)]);

        let writers: Vec<_> = (0..4u64)
            .map(|t| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for i in 0..100u64 {
                        let body = BodyId(1 + t * 1000 + i);
                        let emitter = SoundEmitter::new("Wood");
                        let id = registry.attach(&emitter, [body]);
                        assert!(registry.resolve(body).is_some());
                        registry.detach(id);
                    }
                })
            })
            .collect();

        for _ in 0..100 {
            assert!(registry.resolve(BodyId(0)).is_some());
        }
        for writer in writers {
            writer.join().unwrap();
        }
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.emitter_count(), 1);
    }
}
