use anyhow::Result;
use impactsonic::provider::ProviderBuilder;
use impactsonic::{
    BodyId, ChannelBackend, CollisionDispatcher, DispatchOutcome, ImpactSonicEvent,
    ImpactSonicSettings, MaterialRegistry, PitchModulation, PlaybackCommand, SoundEmitter, Vec3,
};
use std::sync::Arc;

pub const DEFAULT_STEPS: u32 = 240;

const FIXED_DT: f32 = 1.0 / 60.0;
const GRAVITY: f32 = -9.81;
const RESTITUTION: f32 = 0.55;
const FLOOR: BodyId = BodyId(0);

/// A falling body that bounces on the floor.
struct Body {
    id: BodyId,
    position: Vec3,
    velocity: Vec3,
}

/// Drops a few objects onto a stone floor and plays their impacts.
///
/// The floor and each falling body both report every contact, the way
/// physics engines fire a callback on each side, so every bounce shows up
/// twice and the dispatcher has to drop the repeat.
pub fn run_drop_test(steps: u32) -> Result<()> {
    let settings = ImpactSonicSettings::new()
        .materials(["Metal", "Stone", "Wood"])
        .sound_pool_size(8)
        .max_collision_velocity(6.0);

    let registry = Arc::new(MaterialRegistry::new());
    registry.attach(&SoundEmitter::new("Stone"), [FLOOR]);
    let crate_emitter = SoundEmitter::new("Wood");
    let crate_id = registry.attach(&crate_emitter, [BodyId(1), BodyId(2)]);
    registry.attach(
        &SoundEmitter::new("Metal").with_pitch_modulation(PitchModulation::new(true, 0.1)),
        [BodyId(3)],
    );

    let backend = ChannelBackend::new();
    let commands = backend.command_receiver();
    let builder = ProviderBuilder::new()
        .clip_names([
            "Wood__knock_01",
            "Wood__knock_02",
            "Stone__thud",
            "Metal__clang_01",
            "Metal__clang_02",
        ])
        .backend(backend);
    let mut dispatcher = CollisionDispatcher::from_settings(settings, registry.clone(), builder)?;

    let audio_thread = std::thread::spawn(move || {
        let mut played = 0usize;
        for PlaybackCommand::Play(playback) in commands.iter() {
            log::info!(
                "[audio] {} <- {} at ({:.2}, {:.2}, {:.2}) volume {:.2} pitch {:.2}",
                playback.voice,
                playback.clip,
                playback.position.x,
                playback.position.y,
                playback.position.z,
                playback.volume,
                playback.pitch
            );
            played += 1;
        }
        played
    });

    let mut bodies = vec![
        Body {
            id: BodyId(1),
            position: Vec3::new(-1.0, 2.0, 0.0),
            velocity: Vec3::ZERO,
        },
        Body {
            id: BodyId(2),
            position: Vec3::new(-0.6, 2.0, 0.0),
            velocity: Vec3::ZERO,
        },
        Body {
            id: BodyId(3),
            position: Vec3::new(1.0, 3.5, 0.0),
            velocity: Vec3::new(0.0, -1.0, 0.0),
        },
    ];

    let mut duplicates = 0usize;
    let mut too_soft = 0usize;
    for step in 0..steps {
        dispatcher.begin_step();

        for body in &mut bodies {
            body.velocity.y += GRAVITY * FIXED_DT;
            body.position += body.velocity * FIXED_DT;
            if body.position.y > 0.0 || body.velocity.y >= 0.0 {
                continue;
            }

            let contact = Vec3::new(body.position.x, 0.0, body.position.z);
            let relative_velocity = body.velocity;
            body.position.y = 0.0;
            body.velocity.y = -body.velocity.y * RESTITUTION;

            for (reporter, other) in [(body.id, FLOOR), (FLOOR, body.id)] {
                match dispatcher.on_collision_enter(reporter, other, contact, relative_velocity) {
                    DispatchOutcome::Duplicate => duplicates += 1,
                    DispatchOutcome::BelowVolumeFloor { .. } => too_soft += 1,
                    _ => {}
                }
            }
        }

        for event in dispatcher.poll_events() {
            match event {
                ImpactSonicEvent::EmitterPlayed { material, .. } => {
                    log::debug!("step {}: {} played", step, material);
                }
                ImpactSonicEvent::ConfigurationError { error } => {
                    log::warn!("step {}: {}", step, error);
                }
            }
        }
    }

    registry.detach(crate_id);
    log::info!(
        "Crate detached, {} bodies still registered",
        registry.len()
    );

    drop(dispatcher);
    let played = audio_thread
        .join()
        .map_err(|_| anyhow::anyhow!("audio thread panicked"))?;
    log::info!(
        "Simulated {} steps: {} sounds played, {} duplicate reports dropped, {} impacts too soft",
        steps,
        played,
        duplicates,
        too_soft
    );
    Ok(())
}
