use impactsonic::impact::compute_volume;
use impactsonic::pair::canonicalize;
use impactsonic::provider::ProviderBuilder;
use impactsonic::*;
use proptest::prelude::*;
use std::sync::Arc;

fn material() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,8}"
}

fn dispatcher() -> CollisionDispatcher {
    let builder = ProviderBuilder::new()
        .clip_names(["A", "B", "C", "D"])
        .backend(NullBackend);
    let settings = ImpactSonicSettings::new()
        .materials(["A", "B", "C", "D"])
        .rng_seed(99);
    CollisionDispatcher::from_settings(settings, Arc::new(MaterialRegistry::new()), builder)
        .unwrap()
}

proptest! {
    #[test]
    fn canonical_order_ignores_argument_order(a in material(), b in material()) {
        prop_assert_eq!(canonicalize(&a, &b), canonicalize(&b, &a));
        let (first, second) = canonicalize(&a, &b);
        prop_assert!(first <= second);
    }

    #[test]
    fn volume_is_monotone_and_clamped(
        v1 in 0.0f32..20.0,
        v2 in 0.0f32..20.0,
        max in 0.01f32..20.0,
    ) {
        let (lo, hi) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };
        let vlo = compute_volume(lo, max);
        let vhi = compute_volume(hi, max);
        prop_assert!(vlo <= vhi);
        prop_assert!((0.0..=1.0).contains(&vlo));
        prop_assert!((0.0..=1.0).contains(&vhi));
    }

    #[test]
    fn volume_endpoints(max in 0.01f32..100.0, over in 0.0f32..100.0) {
        prop_assert_eq!(compute_volume(0.0, max), 0.0);
        prop_assert_eq!(compute_volume(max + over, max), 1.0);
    }

    #[test]
    fn non_positive_ceiling_is_silent(v in 0.0f32..100.0, max in -10.0f32..=0.0) {
        prop_assert_eq!(compute_volume(v, max), 0.0);
    }

    #[test]
    fn one_playback_per_key_per_step(
        pairs in prop::collection::vec((0usize..4, 0usize..4, 0u8..3), 1..40),
    ) {
        const MATERIALS: [&str; 4] = ["A", "B", "C", "D"];
        let mut dispatcher = dispatcher();
        let emitters: Vec<SoundEmitter> =
            MATERIALS.iter().map(|m| SoundEmitter::new(*m)).collect();
        dispatcher.begin_step();

        let mut seen = std::collections::HashSet::new();
        for (a, b, x) in &pairs {
            let contact = Vec3::splat(*x as f32);
            let key = MaterialPairKey::new(MATERIALS[*a], MATERIALS[*b], contact, 0.5);
            let outcome = dispatcher.play(&emitters[*a], &emitters[*b], contact, 0.5);
            if seen.insert(key) {
                prop_assert!(outcome.is_played());
            } else {
                prop_assert_eq!(outcome, DispatchOutcome::Duplicate);
            }
        }
        prop_assert_eq!(dispatcher.played_this_step(), seen.len());

        dispatcher.begin_step();
        let (a, b, x) = pairs[0];
        let again = dispatcher.play(&emitters[b], &emitters[a], Vec3::splat(x as f32), 0.5);
        prop_assert!(again.is_played());
    }

    #[test]
    fn pool_wraps_after_capacity(capacity in 1usize..64) {
        let mut pool = VoicePool::new(capacity).unwrap();
        let first = pool.allocate().handle();
        for _ in 1..capacity {
            pool.allocate();
        }
        prop_assert_eq!(pool.allocate().handle(), first);
    }
}
