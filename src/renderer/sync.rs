//! Mirror simulation state into a [`Scene`]

use std::collections::HashMap;

use super::{Axis, BirdVisual, PairVisual, Scene};
use crate::sim::{BirdKind, GameEvent, Player, World};

/// Maps simulation ids to scene handles
#[derive(Debug, Default)]
pub struct SceneSync {
    player: Option<BirdVisual>,
    decorative: Option<BirdVisual>,
    pairs: HashMap<u32, PairVisual>,
}

impl SceneSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pipe pairs currently mirrored
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn pair(&self, id: u32) -> Option<PairVisual> {
        self.pairs.get(&id).copied()
    }

    pub fn player(&self) -> Option<BirdVisual> {
        self.player
    }

    /// Apply this frame's events, then copy every position and wing angle
    pub fn apply<S: Scene + ?Sized>(&mut self, scene: &mut S, world: &World, events: &[GameEvent]) {
        if self.player.is_none() {
            self.player = Some(Self::add_bird(scene, BirdKind::Local));
        }
        if self.decorative.is_none() {
            self.decorative = Some(Self::add_bird(scene, BirdKind::Decorative));
        }

        for event in events {
            match *event {
                GameEvent::PairSpawned { id } => {
                    // Spawned and retired between two frames: nothing to show
                    if world.obstacles.get(id).is_none() || self.pairs.contains_key(&id) {
                        continue;
                    }
                    let visual = scene.create_obstacle_pair_visual();
                    scene.add_to_scene(visual.upper);
                    scene.add_to_scene(visual.lower);
                    self.pairs.insert(id, visual);
                }
                GameEvent::PairRetired { id } => {
                    if let Some(visual) = self.pairs.remove(&id) {
                        scene.remove_from_scene(visual.upper);
                        scene.remove_from_scene(visual.lower);
                    }
                }
                _ => {}
            }
        }

        if let Some(visual) = self.player {
            Self::place_bird(scene, visual, &world.player);
        }
        if let Some(visual) = self.decorative {
            Self::place_bird(scene, visual, &world.decorative);
        }

        for pair in world.obstacles.iter() {
            if let Some(visual) = self.pairs.get(&pair.id) {
                scene.set_position(visual.upper, pair.upper.pos);
                scene.set_position(visual.lower, pair.lower.pos);
            }
        }
    }

    fn add_bird<S: Scene + ?Sized>(scene: &mut S, kind: BirdKind) -> BirdVisual {
        let visual = scene.create_player_visual(kind);
        scene.add_to_scene(visual.body);
        visual
    }

    fn place_bird<S: Scene + ?Sized>(scene: &mut S, visual: BirdVisual, bird: &Player) {
        scene.set_position(visual.body, bird.pos);
        scene.set_rotation(visual.left_wing, Axis::Z, bird.wings.left);
        scene.set_rotation(visual.right_wing, Axis::Z, bird.wings.right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::renderer::Handle;
    use crate::sim::{TickInput, activate, tick};
    use glam::Vec3;
    use std::collections::{HashMap, HashSet};

    /// Scene that only tracks what is visible and where
    #[derive(Default)]
    struct FakeScene {
        next: u32,
        visible: HashSet<Handle>,
        positions: HashMap<Handle, Vec3>,
        renders: u32,
    }

    impl FakeScene {
        fn handle(&mut self) -> Handle {
            self.next += 1;
            Handle(self.next)
        }
    }

    impl Scene for FakeScene {
        type Error = ();

        fn create_player_visual(&mut self, _kind: BirdKind) -> BirdVisual {
            BirdVisual {
                body: self.handle(),
                left_wing: self.handle(),
                right_wing: self.handle(),
            }
        }
        fn create_obstacle_pair_visual(&mut self) -> PairVisual {
            PairVisual {
                upper: self.handle(),
                lower: self.handle(),
            }
        }
        fn set_position(&mut self, handle: Handle, pos: Vec3) {
            self.positions.insert(handle, pos);
        }
        fn set_rotation(&mut self, _handle: Handle, _axis: Axis, _angle: f32) {}
        fn add_to_scene(&mut self, handle: Handle) {
            self.visible.insert(handle);
        }
        fn remove_from_scene(&mut self, handle: Handle) {
            self.visible.remove(&handle);
        }
        fn render(&mut self) -> Result<(), ()> {
            self.renders += 1;
            Ok(())
        }
        fn visible_half_height(&self, depth: f32) -> f32 {
            depth
        }
    }

    #[test]
    fn test_initial_scene_has_birds_and_one_pair() {
        let mut world = World::new(Tuning::default(), 5);
        let mut scene = FakeScene::default();
        let mut sync = SceneSync::new();

        let events = world.drain_events();
        sync.apply(&mut scene, &world, &events);

        assert_eq!(sync.pair_count(), 1);
        // Two bird bodies plus upper and lower pipe
        assert_eq!(scene.visible.len(), 4);
        let body = sync.player().unwrap().body;
        assert_eq!(scene.positions[&body], world.player.pos);
    }

    #[test]
    fn test_start_swaps_pairs_and_tracks_positions() {
        let mut world = World::new(Tuning::default(), 5);
        let mut scene = FakeScene::default();
        let mut sync = SceneSync::new();
        let events = world.drain_events();
        sync.apply(&mut scene, &world, &events);

        activate(&mut world);
        for _ in 0..10 {
            tick(&mut world, &TickInput::default());
        }
        let events = world.drain_events();
        sync.apply(&mut scene, &world, &events);

        assert_eq!(sync.pair_count(), world.obstacles.len());
        assert_eq!(scene.visible.len(), 2 + 2 * world.obstacles.len());
        for pair in world.obstacles.iter() {
            let visual = sync.pair(pair.id).unwrap();
            assert_eq!(scene.positions[&visual.upper], pair.upper.pos);
            assert_eq!(scene.positions[&visual.lower], pair.lower.pos);
        }
    }

    #[test]
    fn test_pairs_spawned_and_retired_in_one_batch_are_skipped() {
        let mut world = World::new(Tuning::default(), 5);
        let mut scene = FakeScene::default();
        let mut sync = SceneSync::new();

        // Two restarts without a frame in between
        activate(&mut world);
        world.phase = crate::sim::GamePhase::GameOver;
        activate(&mut world);

        let events = world.drain_events();
        sync.apply(&mut scene, &world, &events);
        assert_eq!(sync.pair_count(), world.tuning.max_pipes);
        assert_eq!(scene.visible.len(), 2 + 2 * world.tuning.max_pipes);

        assert!(scene.render().is_ok());
        assert_eq!(scene.renders, 1);
    }
}
