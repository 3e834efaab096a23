//! Bird physics
//!
//! Per-tick Euler step: gravity accumulates into velocity, velocity into height.

use super::state::Player;

/// Advance one tick under gravity (`gravity` is negative)
#[inline]
pub fn integrate(player: &mut Player, gravity: f32) {
    player.vel_y += gravity;
    player.pos.y += player.vel_y;
}

/// Flap: overwrite vertical velocity so repeated flaps never stack
#[inline]
pub fn impulse(player: &mut Player, flap_strength: f32) {
    player.vel_y = flap_strength;
}
