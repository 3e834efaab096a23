//! Flappy 3D - a gap-dodging arcade game in a perspective scene
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle stream, collisions, game phase)
//! - `renderer`: Render collaborator interface and WebGPU pipeline
//! - `input`: Activation input mapping and per-frame queue
//! - `ui`: Overlay/score HUD collaborator
//! - `tuning`: Data-driven gameplay constants

pub mod input;
pub mod renderer;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use tuning::{BoundaryMode, Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Simulated milliseconds per tick (one tick per display refresh at 60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Bird physics, in world units per tick
    pub const GRAVITY: f32 = -0.005;
    pub const FLAP_STRENGTH: f32 = 0.10;

    /// Local bird spawn point and body size
    pub const PLAYER_START_X: f32 = -2.0;
    pub const PLAYER_START_Y: f32 = 0.5;
    pub const PLAYER_RADIUS: f32 = 0.2;

    /// Decorative (non-simulated) bird spawn point
    pub const DECORATIVE_START_X: f32 = -2.5;
    pub const DECORATIVE_START_Y: f32 = 1.0;

    /// Pipe dimensions
    pub const PIPE_GAP: f32 = 3.8;
    pub const PIPE_WIDTH: f32 = 0.8;
    pub const PIPE_CAP_WIDTH: f32 = 0.9; // slightly wider than the shaft
    pub const PIPE_SHAFT_HEIGHT: f32 = 4.0;
    pub const PIPE_CAP_HEIGHT: f32 = 0.4;
    /// Gap centre wanders by this fraction of the shaft height
    pub const GAP_OFFSET_FRACTION: f32 = 0.6;

    /// Pipe stream
    pub const PIPE_SPEED: f32 = 0.035;
    pub const PIPE_SPAWN_X: f32 = 7.0;
    pub const PIPE_SPACING: f32 = 4.0;
    pub const MAX_PIPES: usize = 4;
    /// Largest window a tuning override may ask for
    pub const MAX_PIPES_LIMIT: usize = 64;

    /// Static perspective camera
    pub const CAMERA_Z: f32 = 5.0;
    pub const CAMERA_FOV_Y_DEGREES: f32 = 75.0;
}

/// Half of the vertical extent visible at `distance` in front of a perspective camera
#[inline]
pub fn visible_half_height(fov_y_degrees: f32, distance: f32) -> f32 {
    (fov_y_degrees.to_radians() / 2.0).tan() * distance
}
