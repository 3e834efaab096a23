//! Collision detection
//!
//! Two terminal conditions: the bird leaving the visible vertical range, and
//! the bird's box overlapping a pipe's box. Both are pure checks on current
//! positions; the caller decides what a hit means.

use super::obstacles::ObstacleWindow;
use super::state::{ObstaclePair, ObstaclePart, Player};
use crate::BoundaryMode;

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Bird left the visible vertical range
    BoundaryExit,
    /// Bird hit a pipe
    Obstacle { pair_id: u32, part: ObstaclePart },
}

/// Check the bird against the top and bottom of the view
pub fn check_boundary(
    player: &Player,
    visible_half_height: f32,
    mode: BoundaryMode,
) -> Option<Collision> {
    let y = player.pos.y;
    let r = player.radius;

    let out = match mode {
        // Whole body beyond an edge
        BoundaryMode::Exit => y - r > visible_half_height || y + r < -visible_half_height,
        // Any part of the body beyond an edge
        BoundaryMode::Touch => y + r > visible_half_height || y - r < -visible_half_height,
    };

    out.then_some(Collision::BoundaryExit)
}

/// Check the bird against every pipe; first hit in window order wins
pub fn check_obstacles<'a>(
    player: &Player,
    pairs: impl IntoIterator<Item = &'a ObstaclePair>,
) -> Option<Collision> {
    let bird = player.bounds();

    for pair in pairs {
        for part in [ObstaclePart::Upper, ObstaclePart::Lower] {
            if bird.intersects(&pair.part(part).bounds()) {
                return Some(Collision::Obstacle {
                    pair_id: pair.id,
                    part,
                });
            }
        }
    }

    None
}

/// Run both checks, boundary first
pub fn detect(
    player: &Player,
    window: &ObstacleWindow,
    visible_half_height: f32,
    mode: BoundaryMode,
) -> Option<Collision> {
    check_boundary(player, visible_half_height, mode)
        .or_else(|| check_obstacles(player, window.iter()))
}
