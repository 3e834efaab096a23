//! Per-frame simulation tick and the game phase machine
//!
//! One tick runs per display refresh. Activations (flap/start/restart) are
//! applied through [`activate`], either directly by the host as input arrives
//! or via [`TickInput::activate`] at the start of a tick.

use super::collision::{self, Collision};
use super::physics;
use super::score;
use super::state::{
    DECORATIVE_WING_BEAT, GameEvent, GamePhase, IDLE_WING_BEAT, Overlay, OverlayId,
    PLAYING_WING_BEAT, World,
};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Activation trigger (space/click)
    pub activate: bool,
    /// Attract mode - the tick flaps (and restarts) on its own
    pub autopilot: bool,
}

/// Handle one activation trigger
///
/// Starts the game, restarts it after a crash, or flaps mid-episode.
pub fn activate(world: &mut World) {
    match world.phase {
        GamePhase::NotStarted => {
            world.push_event(GameEvent::ClearOverlay(OverlayId::Start));
            start_episode(world);
        }
        GamePhase::Playing => {}
        GamePhase::GameOver => {
            world.push_event(GameEvent::ClearOverlay(OverlayId::GameOver));
            start_episode(world);
        }
    }
    physics::impulse(&mut world.player, world.tuning.flap_strength);
}

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &TickInput) {
    world.time_ticks += 1;

    if input.activate || (input.autopilot && world.phase != GamePhase::Playing) {
        activate(world);
    }

    let time_ms = world.time_ms();

    if world.phase != GamePhase::Playing {
        // Idle flapping only; nothing else moves
        world.player.animate_wings(time_ms, IDLE_WING_BEAT);
        return;
    }

    if input.autopilot && autopilot_wants_flap(world) {
        physics::impulse(&mut world.player, world.tuning.flap_strength);
    }

    // Bird
    physics::integrate(&mut world.player, world.tuning.gravity);
    world.player.animate_wings(time_ms, PLAYING_WING_BEAT);
    world.decorative.animate_wings(time_ms, DECORATIVE_WING_BEAT);

    // Pipes
    advance_obstacles(world);

    // Score
    let gained = score::evaluate(&world.player, &mut world.obstacles, world.tuning.pipe_width);
    if gained > 0 {
        world.score += gained;
        log::info!("Score: {}", world.score);
        world.push_event(GameEvent::ScoreChanged(world.score));
    }

    // Crash
    if let Some(cause) = collision::detect(
        &world.player,
        &world.obstacles,
        world.visible_half_height(),
        world.tuning.boundary,
    ) {
        game_over(world, cause);
    }
}

/// End the episode; a no-op unless currently playing
pub fn game_over(world: &mut World, cause: Collision) {
    if world.phase != GamePhase::Playing {
        return;
    }
    world.phase = GamePhase::GameOver;
    log::info!("Game Over! Final Score: {} ({:?})", world.score, cause);

    let score = world.score;
    world.push_event(GameEvent::GameOver { score, cause });
    world.push_event(GameEvent::ShowOverlay(Overlay::GameOver { score }));
}

/// Reset bird, score and pipes, then enter `Playing`
fn start_episode(world: &mut World) {
    log::info!("Resetting game elements...");

    world.player.reset(world.tuning.player_start);
    world.decorative.reset(world.tuning.decorative_start);

    let change = world.obstacles.reset_window(&world.tuning, &mut world.rng);
    for id in change.retired {
        world.push_event(GameEvent::PairRetired { id });
    }
    for id in change.spawned {
        world.push_event(GameEvent::PairSpawned { id });
    }

    world.score = 0;
    world.push_event(GameEvent::ScoreChanged(0));
    world.phase = GamePhase::Playing;
}

/// Scroll, recycle and top up the pipe window
fn advance_obstacles(world: &mut World) {
    let tuning = &world.tuning;
    world.obstacles.advance(tuning.speed);

    let mut changes = Vec::new();
    if let Some((retired, spawned)) =
        world
            .obstacles
            .recycle(tuning.trailing_edge_x(), tuning, &mut world.rng)
    {
        changes.push(GameEvent::PairRetired { id: retired });
        changes.push(GameEvent::PairSpawned { id: spawned });
    }

    let spawned = world.obstacles.fill_if_needed(
        tuning.spawn_x,
        tuning.spacing,
        tuning.max_pipes,
        tuning,
        &mut world.rng,
    );
    changes.extend(spawned.into_iter().map(|id| GameEvent::PairSpawned { id }));

    for event in changes {
        world.push_event(event);
    }
}

/// Flap when below the next opening's centre and falling
fn autopilot_wants_flap(world: &World) -> bool {
    const MARGIN: f32 = 0.5;

    let player = &world.player;
    let bird_left = player.bounds().min.x;
    // Nearest pipe the bird has not fully cleared yet
    let target = world
        .obstacles
        .iter()
        .find(|p| p.upper.bounds().max.x >= bird_left)
        .map(|p| p.gap_center)
        .unwrap_or(world.tuning.gap_center);

    player.vel_y <= 0.0 && player.pos.y < target - MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::ObstaclePart;

    fn world() -> World {
        World::new(Tuning::default(), 12345)
    }

    fn pair_xs(world: &World) -> Vec<f32> {
        world.obstacles.iter().map(|p| p.x()).collect()
    }

    #[test]
    fn test_tick_idle_until_activated() {
        let mut w = world();
        w.drain_events();
        let before = w.player.pos;
        let xs = pair_xs(&w);

        for _ in 0..30 {
            tick(&mut w, &TickInput::default());
        }

        assert_eq!(w.phase, GamePhase::NotStarted);
        assert_eq!(w.player.pos, before);
        assert_eq!(pair_xs(&w), xs);
        assert!(w.events().is_empty());
    }

    #[test]
    fn test_first_activation_starts_episode() {
        let mut w = world();
        w.drain_events();

        activate(&mut w);

        assert_eq!(w.phase, GamePhase::Playing);
        assert_eq!(w.player.vel_y, w.tuning.flap_strength);
        assert_eq!(pair_xs(&w), vec![7.0, 11.0, 15.0, 19.0]);

        let events = w.drain_events();
        assert_eq!(events[0], GameEvent::ClearOverlay(OverlayId::Start));
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::PairRetired { .. })).count(),
            1
        );
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::PairSpawned { .. })).count(),
            4
        );
        assert!(events.contains(&GameEvent::ScoreChanged(0)));
    }

    #[test]
    fn test_activation_mid_game_only_flaps() {
        let mut w = world();
        activate(&mut w);
        for _ in 0..10 {
            tick(&mut w, &TickInput::default());
        }
        let xs = pair_xs(&w);
        let y = w.player.pos.y;
        w.drain_events();

        activate(&mut w);

        assert_eq!(w.phase, GamePhase::Playing);
        assert_eq!(w.player.vel_y, w.tuning.flap_strength);
        assert_eq!(w.player.pos.y, y);
        assert_eq!(pair_xs(&w), xs);
        assert!(w.events().is_empty());
    }

    #[test]
    fn test_gravity_sequence_after_start() {
        let mut w = world();
        activate(&mut w);
        // Cancel the start flap to observe free fall from rest
        w.player.vel_y = 0.0;

        tick(&mut w, &TickInput::default());
        assert!((w.player.vel_y - -0.005).abs() < 1e-7);
        assert!((w.player.pos.y - 0.495).abs() < 1e-6);

        tick(&mut w, &TickInput::default());
        assert!((w.player.vel_y - -0.010).abs() < 1e-7);
        assert!((w.player.pos.y - 0.485).abs() < 1e-6);
    }

    #[test]
    fn test_falling_out_of_view_ends_game() {
        let mut w = world();
        activate(&mut w);

        let mut ticks = 0;
        while w.phase == GamePhase::Playing && ticks < 1000 {
            tick(&mut w, &TickInput::default());
            ticks += 1;
        }

        assert_eq!(w.phase, GamePhase::GameOver);
        let events = w.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver {
                score: 0,
                cause: Collision::BoundaryExit
            }
        )));
        assert!(events.contains(&GameEvent::ShowOverlay(Overlay::GameOver { score: 0 })));
    }

    #[test]
    fn test_decorative_wings_only_beat_while_playing() {
        let mut w = world();
        let rest = w.decorative.wings;
        for _ in 0..30 {
            tick(&mut w, &TickInput::default());
        }
        assert_eq!(w.decorative.wings, rest);
        assert_ne!(w.player.wings, rest);

        activate(&mut w);
        tick(&mut w, &TickInput::default());
        assert_ne!(w.decorative.wings, rest);

        game_over(&mut w, Collision::BoundaryExit);
        let frozen = w.decorative.wings;
        for _ in 0..10 {
            tick(&mut w, &TickInput::default());
        }
        assert_eq!(w.decorative.wings, frozen);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut w = world();
        activate(&mut w);
        w.drain_events();

        let cause = Collision::Obstacle {
            pair_id: 1,
            part: ObstaclePart::Upper,
        };
        game_over(&mut w, cause);
        game_over(&mut w, cause);
        game_over(&mut w, Collision::BoundaryExit);

        assert_eq!(w.phase, GamePhase::GameOver);
        let overlays = w
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ShowOverlay(_)))
            .count();
        assert_eq!(overlays, 1);
    }

    #[test]
    fn test_game_over_ignored_before_start() {
        let mut w = world();
        game_over(&mut w, Collision::BoundaryExit);
        assert_eq!(w.phase, GamePhase::NotStarted);
    }

    #[test]
    fn test_ticks_after_game_over_freeze_world() {
        let mut w = world();
        activate(&mut w);
        game_over(&mut w, Collision::BoundaryExit);
        let y = w.player.pos.y;
        let xs = pair_xs(&w);
        w.drain_events();

        for _ in 0..20 {
            tick(&mut w, &TickInput::default());
        }

        assert_eq!(w.player.pos.y, y);
        assert_eq!(pair_xs(&w), xs);
        assert!(w.events().is_empty());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut w = world();
        activate(&mut w);
        w.score = 5;
        w.player.pos.y = -9.0;
        for _ in 0..50 {
            tick(&mut w, &TickInput::default());
        }
        game_over(&mut w, Collision::BoundaryExit);
        w.drain_events();

        activate(&mut w);

        assert_eq!(w.phase, GamePhase::Playing);
        assert_eq!(w.score, 0);
        assert_eq!(w.player.pos.x, w.tuning.player_start[0]);
        assert_eq!(w.player.pos.y, w.tuning.player_start[1]);
        assert_eq!(w.player.vel_y, w.tuning.flap_strength);
        assert_eq!(pair_xs(&w), vec![7.0, 11.0, 15.0, 19.0]);
        assert!(w.obstacles.iter().all(|p| !p.passed));
        assert_eq!(
            w.drain_events()[0],
            GameEvent::ClearOverlay(OverlayId::GameOver)
        );
    }

    #[test]
    fn test_tick_input_activate_starts_game() {
        let mut w = world();
        tick(
            &mut w,
            &TickInput {
                activate: true,
                ..Default::default()
            },
        );
        assert_eq!(w.phase, GamePhase::Playing);
        // Flap applied, then one step of gravity
        assert!((w.player.vel_y - (w.tuning.flap_strength + w.tuning.gravity)).abs() < 1e-7);
    }

    #[test]
    fn test_window_never_exceeds_max() {
        let mut w = world();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut w, &input);
            assert!(w.obstacles.len() <= w.tuning.max_pipes);
        }
    }

    #[test]
    fn test_autopilot_scores() {
        let mut w = world();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut w, &input);
        }
        // First pipe clears after ~270 ticks, then one every ~114
        assert_eq!(w.phase, GamePhase::Playing);
        assert!(w.score >= 10, "score {}", w.score);
    }

    #[test]
    fn test_determinism() {
        let mut a = world();
        let mut b = world();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..500 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(pair_xs(&a), pair_xs(&b));
        let gaps_a: Vec<f32> = a.obstacles.iter().map(|p| p.gap_center).collect();
        let gaps_b: Vec<f32> = b.obstacles.iter().map(|p| p.gap_center).collect();
        assert_eq!(gaps_a, gaps_b);
    }
}
