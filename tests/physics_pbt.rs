use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use talus_core::particles::{ParticleField, MAX_DT, MAX_ROCKS};
use talus_core::terrain::{BaseTerrain, Flat, HeightField};
use talus_data::Vec3;

prop_compose! {
    fn arb_drop()(
        x in -30.0f64..30.0,
        z in -30.0f64..30.0,
        vx in -3.0f64..3.0,
        vy in -20.0f64..0.0,
        vz in -3.0f64..3.0,
        size in 0.2f64..1.0,
    ) -> (Vec3, Vec3, f64) {
        (Vec3::new(x, 10.0, z), Vec3::new(vx, vy, vz), size)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_rocks_never_tunnel_below_terrain(
        (position, velocity, size) in arb_drop(),
        dt in 1e-4f64..=MAX_DT,
    ) {
        let mut field = ParticleField::new(BaseTerrain);
        field.insert(position, velocity, size);
        for _ in 0..2_000 {
            field.step(dt);
        }
        for rock in field.rocks() {
            let ground = BaseTerrain.height(rock.position.x, rock.position.z);
            prop_assert!(
                rock.position.y - rock.size >= ground - 1e-9,
                "rock center {} below ground {} + size {}",
                rock.position.y, ground, rock.size
            );
        }
    }

    #[test]
    fn test_positions_and_velocities_stay_finite(
        (position, velocity, size) in arb_drop(),
        dt in 1e-4f64..=MAX_DT,
    ) {
        let mut field = ParticleField::new(BaseTerrain);
        field.insert(position, velocity, size);
        for _ in 0..500 {
            field.step(dt);
        }
        for rock in field.rocks() {
            prop_assert!(rock.position.x.is_finite());
            prop_assert!(rock.position.y.is_finite());
            prop_assert!(rock.position.z.is_finite());
            prop_assert!(rock.velocity.length().is_finite());
        }
    }

    #[test]
    fn test_oversized_dt_behaves_like_clamped_dt(
        (position, velocity, size) in arb_drop(),
        excess in 0.0f64..100.0,
    ) {
        let mut clamped = ParticleField::new(Flat(-1.2));
        clamped.insert(position, velocity, size);
        let mut oversized = ParticleField::new(Flat(-1.2));
        oversized.insert(position, velocity, size);

        clamped.step(MAX_DT);
        oversized.step(MAX_DT + excess);
        prop_assert_eq!(clamped.rocks()[0].position, oversized.rocks()[0].position);
    }

    #[test]
    fn test_stats_stay_on_the_contract_scale(
        (position, velocity, size) in arb_drop(),
        steps in 0usize..300,
    ) {
        let mut field = ParticleField::new(BaseTerrain);
        field.insert(position, velocity, size);
        for _ in 0..steps {
            field.step(0.016);
        }
        let stats = field.stats();
        prop_assert!((0.0..=100.0).contains(&stats.hazard_index));
        prop_assert!((0.0..=100.0).contains(&stats.confidence));
        prop_assert!(stats.velocity_avg >= 0.0);
        prop_assert!(stats.active_rocks >= 0.0);
    }

    #[test]
    fn test_capacity_bound_holds_under_spawn_pressure(
        seed in any::<u64>(),
        spawns in 0usize..400,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut field = ParticleField::new(BaseTerrain);
        for _ in 0..spawns {
            field.spawn(&mut rng);
        }
        prop_assert!(field.rocks().len() <= MAX_ROCKS);
    }
}

#[test]
fn test_spawn_is_deterministic_per_seed() {
    let mut a = ParticleField::new(BaseTerrain);
    let mut b = ParticleField::new(BaseTerrain);
    let mut rng_a = ChaCha8Rng::seed_from_u64(99);
    let mut rng_b = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..10 {
        a.spawn(&mut rng_a);
        b.spawn(&mut rng_b);
    }
    for (ra, rb) in a.rocks().iter().zip(b.rocks()) {
        assert_eq!(ra.position, rb.position);
        assert_eq!(ra.velocity, rb.velocity);
        assert_eq!(ra.size, rb.size);
    }
}
