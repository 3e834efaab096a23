//! Rendering collaborator
//!
//! The simulation never touches render objects. A [`Scene`] hands out opaque
//! [`Handle`]s and keeps its own graph; [`SceneSync`] mirrors a
//! [`World`](crate::sim::World) into any scene once per frame.

pub mod pipeline;
pub mod shapes;
pub mod sync;
pub mod vertex;

pub use pipeline::{RenderState, SceneGraph};
pub use sync::SceneSync;

use glam::Vec3;

use crate::sim::BirdKind;

/// Opaque reference to an object owned by a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u32);

/// Rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Handles making up one bird (wings are children of the body)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirdVisual {
    pub body: Handle,
    pub left_wing: Handle,
    pub right_wing: Handle,
}

/// Handles for the two halves of an obstacle pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairVisual {
    pub upper: Handle,
    pub lower: Handle,
}

/// Operations the game consumes from a renderer
pub trait Scene {
    type Error;

    fn create_player_visual(&mut self, kind: BirdKind) -> BirdVisual;
    fn create_obstacle_pair_visual(&mut self) -> PairVisual;
    /// Move an object (children follow their parent)
    fn set_position(&mut self, handle: Handle, pos: Vec3);
    fn set_rotation(&mut self, handle: Handle, axis: Axis, angle: f32);
    /// Make an object (and its children) visible
    fn add_to_scene(&mut self, handle: Handle);
    /// Drop an object (and its children) from the scene for good
    fn remove_from_scene(&mut self, handle: Handle);
    fn render(&mut self) -> Result<(), Self::Error>;
    /// Half the visible vertical extent at `depth` in front of the camera
    fn visible_half_height(&self, depth: f32) -> f32;
}
