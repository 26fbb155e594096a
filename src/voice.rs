//! Fixed-size round-robin voice pool.
//!
//! The pool bounds how many collision sounds exist at once. Voices are never
//! released explicitly: allocation hands out the voice under the cursor and
//! advances it, so once the cursor wraps the oldest voice is retasked and
//! whatever it was playing gets cut off.

use crate::clips::ClipId;
use crate::error::{ImpactSonicError, Result};
use crate::math::Vec3;

/// Index of a voice inside its pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VoiceHandle(pub usize);

impl std::fmt::Display for VoiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Voice({})", self.0)
    }
}

/// Everything the audio backend needs to start one sound on one voice.
#[derive(Debug, Clone, PartialEq)]
pub struct VoicePlayback {
    pub voice: VoiceHandle,
    pub clip: ClipId,
    pub position: Vec3,
    /// Impact volume in `[0, 1]`
    pub volume: f32,
    /// Playback rate multiplier, 1.0 is unmodified
    pub pitch: f32,
}

/// One reusable playback slot.
#[derive(Debug, Clone)]
pub struct Voice {
    handle: VoiceHandle,
    current: Option<VoicePlayback>,
    assignments: u64,
}

impl Voice {
    fn new(index: usize) -> Self {
        Self {
            handle: VoiceHandle(index),
            current: None,
            assignments: 0,
        }
    }

    pub fn handle(&self) -> VoiceHandle {
        self.handle
    }

    /// The playback this voice was last given, if any.
    pub fn current(&self) -> Option<&VoicePlayback> {
        self.current.as_ref()
    }

    /// How many times this voice has been (re)assigned.
    pub fn assignments(&self) -> u64 {
        self.assignments
    }

    /// Retasks the voice, replacing whatever it was playing.
    pub fn assign(
        &mut self,
        clip: ClipId,
        position: Vec3,
        volume: f32,
        pitch: f32,
    ) -> &VoicePlayback {
        if let Some(previous) = &self.current {
            log::trace!("{} stealing {} for {}", self.handle, previous.clip, clip);
        }
        self.assignments += 1;
        self.current.insert(VoicePlayback {
            voice: self.handle,
            clip,
            position,
            volume,
            pitch,
        })
    }
}

#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: Vec<Voice>,
    cursor: usize,
}

impl VoicePool {
    /// Pre-allocates `capacity` voices. Capacity cannot change afterwards.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ImpactSonicError::Configuration(
                "voice pool capacity must be greater than 0".into(),
            ));
        }
        Ok(Self {
            voices: (0..capacity).map(Voice::new).collect(),
            cursor: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    /// Index of the voice the next allocation will return.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the voice under the cursor and advances the cursor. Never fails.
    pub fn allocate(&mut self) -> &mut Voice {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.voices.len();
        &mut self.voices[index]
    }

    pub fn voice(&self, handle: VoiceHandle) -> Option<&Voice> {
        self.voices.get(handle.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(VoicePool::new(0).is_err());
    }

    #[test]
    fn test_round_robin_wraps() {
        let mut pool = VoicePool::new(3).unwrap();
        let first = pool.allocate().handle();
        let second = pool.allocate().handle();
        let third = pool.allocate().handle();
        assert_eq!(
            [first, second, third],
            [VoiceHandle(0), VoiceHandle(1), VoiceHandle(2)]
        );
        assert_eq!(pool.cursor(), 0);
        assert_eq!(pool.allocate().handle(), first);
        assert_eq!(pool.cursor(), 1);
    }

    #[test]
    fn test_single_voice_pool() {
        let mut pool = VoicePool::new(1).unwrap();
        for _ in 0..5 {
            assert_eq!(pool.allocate().handle(), VoiceHandle(0));
            assert_eq!(pool.cursor(), 0);
        }
    }

    #[test]
    fn test_assign_steals_previous() {
        let mut pool = VoicePool::new(1).unwrap();
        pool.allocate()
            .assign(ClipId::new("Wood__01"), Vec3::ZERO, 0.5, 1.0);
        assert_eq!(pool.voice(VoiceHandle(0)).unwrap().assignments(), 1);
        let playback = pool
            .allocate()
            .assign(ClipId::new("Metal__01"), Vec3::X, 0.9, 1.2)
            .clone();

        let voice = pool.voice(VoiceHandle(0)).unwrap();
        assert_eq!(voice.assignments(), 2);
        assert_eq!(voice.current(), Some(&playback));
        assert_eq!(playback.clip.as_str(), "Metal__01");
        assert!(pool.voice(VoiceHandle(1)).is_none());
    }
}
