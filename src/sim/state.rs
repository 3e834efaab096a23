//! Game state and core simulation types
//!
//! Everything the simulation owns lives in [`World`]; collaborators only read
//! positions from it and drain its event outbox.

use std::f32::consts::FRAC_PI_4;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::collision::Collision;
use super::obstacles::ObstacleWindow;
use crate::consts::FRAME_MS;
use crate::{Tuning, visible_half_height};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first activation
    #[default]
    NotStarted,
    /// Active episode
    Playing,
    /// Episode ended, waiting for a restart activation
    GameOver,
}

/// Which bird a [`Player`] represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BirdKind {
    /// The simulated, player-controlled bird
    Local,
    /// Animated scenery only; never moves, collides or scores
    Decorative,
}

/// Wing flap animation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WingBeat {
    /// Angular frequency in radians per millisecond
    pub rate: f32,
    /// Swing amplitude in radians
    pub amplitude: f32,
}

/// Lazy flapping while waiting to start or after a crash
pub const IDLE_WING_BEAT: WingBeat = WingBeat { rate: 0.01, amplitude: 0.5 };
/// Faster, wider flapping during play
pub const PLAYING_WING_BEAT: WingBeat = WingBeat { rate: 0.02, amplitude: 0.7 };
pub const DECORATIVE_WING_BEAT: WingBeat = WingBeat { rate: 0.008, amplitude: 0.3 };

/// Wing rotations about the z axis (radians)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wings {
    pub left: f32,
    pub right: f32,
}

impl Default for Wings {
    fn default() -> Self {
        Self {
            left: FRAC_PI_4,
            right: -FRAC_PI_4,
        }
    }
}

/// A bird
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub kind: BirdKind,
    /// x and z stay fixed during play
    pub pos: Vec3,
    pub vel_y: f32,
    /// Body radius (collision extent)
    pub radius: f32,
    pub wings: Wings,
}

impl Player {
    pub fn new(kind: BirdKind, start: [f32; 2], radius: f32) -> Self {
        Self {
            kind,
            pos: Vec3::new(start[0], start[1], 0.0),
            vel_y: 0.0,
            radius,
            wings: Wings::default(),
        }
    }

    /// Put the bird back on its spawn point at rest
    pub fn reset(&mut self, start: [f32; 2]) {
        self.pos = Vec3::new(start[0], start[1], 0.0);
        self.vel_y = 0.0;
    }

    /// World-space bounding box of the body
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec3::splat(self.radius))
    }

    /// Set wing angles for the given animation time
    pub fn animate_wings(&mut self, time_ms: f32, beat: WingBeat) {
        let swing = (time_ms * beat.rate).sin() * beat.amplitude;
        self.wings.left = FRAC_PI_4 + swing;
        self.wings.right = -FRAC_PI_4 - swing;
    }
}

/// Half of an obstacle pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstaclePart {
    Upper,
    Lower,
}

/// One pipe (shaft plus cap) as a box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec3,
    pub half_extents: Vec3,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.half_extents)
    }
}

/// Upper and lower pipe sharing a vertical gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub id: u32,
    pub upper: Obstacle,
    pub lower: Obstacle,
    /// Vertical centre of the opening
    pub gap_center: f32,
    /// Already counted toward the score
    pub passed: bool,
}

impl ObstaclePair {
    /// Build a pair at `x` whose opening of `tuning.gap` is centred on `gap_center`
    pub fn new(id: u32, x: f32, gap_center: f32, tuning: &Tuning) -> Self {
        let height = tuning.pipe_height();
        let half_extents = Vec3::new(tuning.cap_width / 2.0, height / 2.0, tuning.cap_width / 2.0);
        let offset = tuning.gap / 2.0 + height / 2.0;

        Self {
            id,
            upper: Obstacle {
                pos: Vec3::new(x, gap_center + offset, 0.0),
                half_extents,
            },
            lower: Obstacle {
                pos: Vec3::new(x, gap_center - offset, 0.0),
                half_extents,
            },
            gap_center,
            passed: false,
        }
    }

    /// Horizontal position (both halves share it)
    #[inline]
    pub fn x(&self) -> f32 {
        self.upper.pos.x
    }

    pub fn shift_x(&mut self, dx: f32) {
        self.upper.pos.x += dx;
        self.lower.pos.x += dx;
    }

    pub fn part(&self, part: ObstaclePart) -> &Obstacle {
        match part {
            ObstaclePart::Upper => &self.upper,
            ObstaclePart::Lower => &self.lower,
        }
    }
}

/// Text overlays the HUD can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayId {
    Start,
    GameOver,
}

/// An overlay with its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Start,
    GameOver { score: u32 },
}

impl Overlay {
    pub fn id(&self) -> OverlayId {
        match self {
            Overlay::Start => OverlayId::Start,
            Overlay::GameOver { .. } => OverlayId::GameOver,
        }
    }

    /// Display text (lines separated by `\n`)
    pub fn text(&self) -> String {
        match self {
            Overlay::Start => "Press Space or Click to Start".to_string(),
            Overlay::GameOver { score } => {
                format!("Game Over!\nScore: {}\nClick or Press Space to Restart", score)
            }
        }
    }
}

/// Changes collaborators must mirror, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PairSpawned { id: u32 },
    PairRetired { id: u32 },
    ScoreChanged(u32),
    ShowOverlay(Overlay),
    ClearOverlay(OverlayId),
    GameOver { score: u32, cause: Collision },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// The controlled bird
    pub player: Player,
    /// Scenery bird
    pub decorative: Player,
    /// Active obstacle window
    pub obstacles: ObstacleWindow,
    pub score: u32,
    /// Simulation tick counter (drives animation time)
    pub time_ticks: u64,
    /// Cached from the static camera
    visible_half_height: f32,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl World {
    /// Create a world in `NotStarted` with the start prompt queued
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let visible_half_height = visible_half_height(tuning.fov_y_degrees, tuning.camera_z);
        let player = Player::new(BirdKind::Local, tuning.player_start, tuning.player_radius);
        let decorative =
            Player::new(BirdKind::Decorative, tuning.decorative_start, tuning.player_radius);

        let mut world = Self {
            seed,
            tuning,
            phase: GamePhase::NotStarted,
            player,
            decorative,
            obstacles: ObstacleWindow::new(),
            score: 0,
            time_ticks: 0,
            visible_half_height,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };

        // A single pipe sits at the spawn point until the first start
        let id = world
            .obstacles
            .spawn_pair(world.tuning.spawn_x, &world.tuning, &mut world.rng);
        world.push_event(GameEvent::PairSpawned { id });
        world.push_event(GameEvent::ScoreChanged(0));
        world.push_event(GameEvent::ShowOverlay(Overlay::Start));

        world
    }

    /// Half of the visible vertical extent at the player plane
    #[inline]
    pub fn visible_half_height(&self) -> f32 {
        self.visible_half_height
    }

    /// Simulated animation time in milliseconds
    pub fn time_ms(&self) -> f32 {
        self.time_ticks as f32 * FRAME_MS
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending events without consuming them
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
