//! Property tests for the simulation invariants

use flappy3d::Tuning;
use flappy3d::sim::physics::{impulse, integrate};
use flappy3d::sim::score::evaluate;
use flappy3d::sim::{
    BirdKind, Collision, GamePhase, Player, TickInput, World, activate, game_over, tick,
};
use proptest::prelude::*;

fn pair_xs(world: &World) -> Vec<f32> {
    world.obstacles.iter().map(|p| p.x()).collect()
}

proptest! {
    #[test]
    fn gravity_lowers_velocity_by_a_constant(
        y in -3.0f32..3.0,
        vel in -0.5f32..0.5,
        steps in 1usize..200,
    ) {
        let tuning = Tuning::default();
        let mut bird = Player::new(BirdKind::Local, [-2.0, y], 0.2);
        bird.vel_y = vel;

        for _ in 0..steps {
            let before = bird.clone();
            integrate(&mut bird, tuning.gravity);
            prop_assert!(bird.vel_y < before.vel_y);
            prop_assert_eq!(bird.vel_y, before.vel_y + tuning.gravity);
            prop_assert_eq!(bird.pos.y, before.pos.y + bird.vel_y);
            prop_assert_eq!(bird.pos.x, before.pos.x);
        }
    }

    #[test]
    fn flap_overwrites_any_velocity(vel in -10.0f32..10.0, flaps in 1usize..5) {
        let tuning = Tuning::default();
        let mut bird = Player::new(BirdKind::Local, [-2.0, 0.5], 0.2);
        bird.vel_y = vel;
        for _ in 0..flaps {
            impulse(&mut bird, tuning.flap_strength);
        }
        prop_assert_eq!(bird.vel_y, tuning.flap_strength);
    }

    #[test]
    fn window_never_exceeds_capacity(
        seed in any::<u64>(),
        presses in proptest::collection::vec(any::<bool>(), 1..1500),
    ) {
        let mut world = World::new(Tuning::default(), seed);
        for press in presses {
            tick(&mut world, &TickInput { activate: press, autopilot: false });
            prop_assert!(world.obstacles.len() <= world.tuning.max_pipes);
        }
    }

    #[test]
    fn neighbouring_pairs_keep_their_spacing(seed in any::<u64>(), ticks in 1usize..3000) {
        let mut world = World::new(Tuning::default(), seed);
        let autopilot = TickInput { activate: false, autopilot: true };
        for _ in 0..ticks {
            tick(&mut world, &autopilot);
        }

        let xs = pair_xs(&world);
        for w in xs.windows(2) {
            prop_assert!((w[1] - w[0] - world.tuning.spacing).abs() < 1e-2, "{:?}", xs);
        }
    }

    #[test]
    fn a_pair_scores_at_most_once(seed in any::<u64>(), ticks in 1usize..1500) {
        let mut world = World::new(Tuning::default(), seed);
        let autopilot = TickInput { activate: false, autopilot: true };
        for _ in 0..ticks {
            tick(&mut world, &autopilot);
        }

        let pipe_width = world.tuning.pipe_width;
        let player = world.player.clone();
        evaluate(&player, &mut world.obstacles, pipe_width);
        prop_assert_eq!(evaluate(&player, &mut world.obstacles, pipe_width), 0);
    }

    #[test]
    fn restart_resets_everything(
        seed in any::<u64>(),
        presses in proptest::collection::vec(any::<bool>(), 0..600),
    ) {
        let mut world = World::new(Tuning::default(), seed);
        activate(&mut world);
        for press in presses {
            tick(&mut world, &TickInput { activate: press, autopilot: false });
        }
        world.score += 5;
        game_over(&mut world, Collision::BoundaryExit);
        prop_assert_eq!(world.phase, GamePhase::GameOver);

        activate(&mut world);
        let t = &world.tuning;
        prop_assert_eq!(world.phase, GamePhase::Playing);
        prop_assert_eq!(world.score, 0);
        prop_assert_eq!(world.player.pos.x, t.player_start[0]);
        prop_assert_eq!(world.player.pos.y, t.player_start[1]);
        prop_assert_eq!(world.player.vel_y, t.flap_strength);
        prop_assert_eq!(pair_xs(&world), vec![7.0, 11.0, 15.0, 19.0]);
        prop_assert!(world.obstacles.iter().all(|p| !p.passed));
    }
}
