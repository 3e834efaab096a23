//! Pass detection
//!
//! A pair scores once, the first tick the bird is past its trailing edge.

use super::obstacles::ObstacleWindow;
use super::state::Player;

/// Mark newly passed pairs and return how many points they are worth
pub fn evaluate(player: &Player, window: &mut ObstacleWindow, pipe_width: f32) -> u32 {
    let mut gained = 0;
    for pair in window.iter_mut() {
        if !pair.passed && pair.x() + pipe_width / 2.0 < player.pos.x {
            pair.passed = true;
            gained += 1;
        }
    }
    gained
}
