//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, constant per-tick physics
//! - Seeded RNG only
//! - Stable iteration order (window order = spatial order)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod collision;
pub mod obstacles;
pub mod physics;
pub mod score;
pub mod state;
pub mod tick;

pub use bounds::Aabb;
pub use collision::{Collision, check_boundary, check_obstacles, detect};
pub use obstacles::{ObstacleWindow, WindowChange};
pub use state::{
    BirdKind, GameEvent, GamePhase, Obstacle, ObstaclePair, ObstaclePart, Overlay, OverlayId,
    Player, World,
};
pub use tick::{TickInput, activate, game_over, tick};
