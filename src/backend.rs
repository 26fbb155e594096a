//! Audio output seam.
//!
//! Providers hand finished [`VoicePlayback`]s to an [`AudioBackend`]. Playback
//! is fire-and-forget: nothing the backend does flows back into dispatch.

use crate::voice::VoicePlayback;
use crossbeam_channel::{Receiver, Sender};

/// Plays sounds on behalf of a voice-pool provider.
pub trait AudioBackend: Send {
    /// Starts `playback` on its voice, replacing anything the voice was doing.
    fn play(&mut self, playback: &VoicePlayback);
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn play(&mut self, playback: &VoicePlayback) {
        (**self).play(playback)
    }
}

/// Commands sent from [`ChannelBackend`] to the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    /// Start a clip on a voice
    Play(VoicePlayback),
}

/// Commands buffered by [`ChannelBackend::new`] before playbacks are dropped.
pub const DEFAULT_COMMAND_CAPACITY: usize = 1024;

/// Backend that forwards playbacks to an audio thread over a channel.
///
/// The audio thread drains [`ChannelBackend::command_receiver`] at its own
/// pace; sends never block. Playbacks sent while the channel is full are
/// dropped with a warning.
pub struct ChannelBackend {
    command_sender: Sender<PlaybackCommand>,
    command_receiver: Receiver<PlaybackCommand>,
}

impl ChannelBackend {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_COMMAND_CAPACITY)
    }

    /// Channel holding up to `capacity` commands (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let (command_sender, command_receiver) = crossbeam_channel::bounded(capacity.max(1));
        Self {
            command_sender,
            command_receiver,
        }
    }

    /// Receiver the audio thread polls for playback commands.
    pub fn command_receiver(&self) -> Receiver<PlaybackCommand> {
        self.command_receiver.clone()
    }
}

impl Default for ChannelBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for ChannelBackend {
    fn play(&mut self, playback: &VoicePlayback) {
        if let Err(e) = self
            .command_sender
            .try_send(PlaybackCommand::Play(playback.clone()))
        {
            log::warn!("Dropping play command for {}: {}", playback.voice, e);
        }
    }
}

/// Backend that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play(&mut self, _playback: &VoicePlayback) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clips::ClipId;
    use crate::math::Vec3;
    use crate::voice::VoiceHandle;

    #[test]
    fn test_channel_backend_forwards() {
        let mut backend = ChannelBackend::new();
        let receiver = backend.command_receiver();
        let playback = VoicePlayback {
            voice: VoiceHandle(3),
            clip: ClipId::new("Stone__01"),
            position: Vec3::new(1.0, 0.0, -2.0),
            volume: 0.4,
            pitch: 0.9,
        };

        backend.play(&playback);

        assert_eq!(receiver.try_recv(), Ok(PlaybackCommand::Play(playback)));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_full_channel_drops_commands() {
        let mut backend = ChannelBackend::with_capacity(2);
        let receiver = backend.command_receiver();
        let playback = |voice| VoicePlayback {
            voice: VoiceHandle(voice),
            clip: ClipId::new("Wood__01"),
            position: Vec3::ZERO,
            volume: 1.0,
            pitch: 1.0,
        };

        for voice in 0..100 {
            backend.play(&playback(voice));
        }
        let voices: Vec<usize> = receiver
            .try_iter()
            .map(|PlaybackCommand::Play(p)| p.voice.0)
            .collect();
        assert_eq!(voices, vec![0, 1]);

        backend.play(&playback(7));
        assert_eq!(receiver.len(), 1);
    }
}
