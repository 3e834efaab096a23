//! Gameplay tuning
//!
//! Every constant the simulation reads lives here so a page (or a native run)
//! can override it with a JSON document. Missing fields fall back to
//! [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How the vertical play-area boundary is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Game over once the whole bird body has left the visible range
    #[default]
    Exit,
    /// Game over as soon as any part of the bird body leaves the visible range
    Touch,
}

/// Errors from loading or validating a tuning override
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// Source text was not valid tuning JSON
    Parse(String),
    /// A field parsed but holds an unusable value
    Invalid { field: &'static str, reason: &'static str },
    /// The override file could not be read
    Io(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(msg) => write!(f, "invalid tuning JSON: {}", msg),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning value for `{}`: {}", field, reason)
            }
            TuningError::Io(msg) => write!(f, "could not read tuning: {}", msg),
        }
    }
}

impl std::error::Error for TuningError {}

/// Data-driven gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Per-tick change of vertical velocity (negative = down)
    pub gravity: f32,
    /// Vertical velocity set by every flap
    pub flap_strength: f32,

    pub player_start: [f32; 2],
    pub player_radius: f32,
    pub decorative_start: [f32; 2],

    /// Vertical opening between the upper and lower pipe
    pub gap: f32,
    /// Pipe shaft width (scoring threshold)
    pub pipe_width: f32,
    /// Pipe cap width (collision and visual extent along x/z)
    pub cap_width: f32,
    pub shaft_height: f32,
    pub cap_height: f32,
    /// Gap centre before the random offset is applied
    pub gap_center: f32,
    /// Random gap-centre range as a fraction of the shaft height
    pub gap_offset_fraction: f32,

    /// Leftward pipe movement per tick
    pub speed: f32,
    pub spawn_x: f32,
    pub spacing: f32,
    pub max_pipes: usize,

    pub camera_z: f32,
    pub fov_y_degrees: f32,

    pub boundary: BoundaryMode,
    /// Fixed RNG seed (host picks one when absent)
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            flap_strength: FLAP_STRENGTH,

            player_start: [PLAYER_START_X, PLAYER_START_Y],
            player_radius: PLAYER_RADIUS,
            decorative_start: [DECORATIVE_START_X, DECORATIVE_START_Y],

            gap: PIPE_GAP,
            pipe_width: PIPE_WIDTH,
            cap_width: PIPE_CAP_WIDTH,
            shaft_height: PIPE_SHAFT_HEIGHT,
            cap_height: PIPE_CAP_HEIGHT,
            gap_center: 0.0,
            gap_offset_fraction: GAP_OFFSET_FRACTION,

            speed: PIPE_SPEED,
            spawn_x: PIPE_SPAWN_X,
            spacing: PIPE_SPACING,
            max_pipes: MAX_PIPES,

            camera_z: CAMERA_Z,
            fov_y_degrees: CAMERA_FOV_Y_DEGREES,

            boundary: BoundaryMode::Exit,
            seed: None,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        let finite = [
            ("gravity", self.gravity),
            ("flap_strength", self.flap_strength),
            ("player_start", self.player_start[0]),
            ("player_start", self.player_start[1]),
            ("player_radius", self.player_radius),
            ("decorative_start", self.decorative_start[0]),
            ("decorative_start", self.decorative_start[1]),
            ("gap", self.gap),
            ("pipe_width", self.pipe_width),
            ("cap_width", self.cap_width),
            ("shaft_height", self.shaft_height),
            ("cap_height", self.cap_height),
            ("gap_center", self.gap_center),
            ("gap_offset_fraction", self.gap_offset_fraction),
            ("speed", self.speed),
            ("spawn_x", self.spawn_x),
            ("spacing", self.spacing),
            ("camera_z", self.camera_z),
            ("fov_y_degrees", self.fov_y_degrees),
        ];
        if let Some((field, _)) = finite.into_iter().find(|(_, v)| !v.is_finite()) {
            return invalid(field, "must be a finite number");
        }

        if !(self.gravity < 0.0) {
            return invalid("gravity", "must be negative");
        }
        if !(self.flap_strength > 0.0) {
            return invalid("flap_strength", "must be positive");
        }
        if !(self.player_radius > 0.0) {
            return invalid("player_radius", "must be positive");
        }
        if !(self.gap > 0.0) {
            return invalid("gap", "must be positive");
        }
        if !(self.pipe_width > 0.0) {
            return invalid("pipe_width", "must be positive");
        }
        if !(self.cap_width > 0.0) {
            return invalid("cap_width", "must be positive");
        }
        if !(self.shaft_height > 0.0) {
            return invalid("shaft_height", "must be positive");
        }
        if self.cap_height < 0.0 {
            return invalid("cap_height", "must not be negative");
        }
        if !(0.0..=1.0).contains(&self.gap_offset_fraction) {
            return invalid("gap_offset_fraction", "must be within 0..=1");
        }
        if !(self.speed > 0.0) {
            return invalid("speed", "must be positive");
        }
        if !(self.spacing > 0.0) {
            return invalid("spacing", "must be positive");
        }
        if self.max_pipes == 0 {
            return invalid("max_pipes", "must be at least 1");
        }
        if self.max_pipes > MAX_PIPES_LIMIT {
            return invalid("max_pipes", "must be at most 64");
        }
        if !(self.camera_z > 0.0) {
            return invalid("camera_z", "camera must sit in front of the play plane");
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return invalid("fov_y_degrees", "must be within (0, 180)");
        }
        Ok(())
    }

    /// Pipes are retired once they pass this x (left edge of the view)
    pub fn trailing_edge_x(&self) -> f32 {
        -self.camera_z
    }

    /// Height of one pipe assembly (shaft plus cap)
    pub fn pipe_height(&self) -> f32 {
        self.shaft_height + self.cap_height
    }

    /// Width of the uniform random gap-centre range
    pub fn gap_offset_range(&self) -> f32 {
        self.shaft_height * self.gap_offset_fraction
    }

    /// Load an override, falling back to defaults
    ///
    /// Reads the text of a `<script id="tuning">` element if the page has one.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("tuning"))
            .and_then(|el| el.text_content());

        match text {
            Some(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring tuning override: {}", e);
                Self::default()
            }),
            None => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }

    /// Load an override, falling back to defaults
    ///
    /// Reads the file named by `FLAPPY3D_TUNING` if it is set.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var("FLAPPY3D_TUNING") else {
            log::info!("Using default tuning");
            return Self::default();
        };

        let result = std::fs::read_to_string(&path)
            .map_err(|e| TuningError::Io(format!("{}: {}", path, e)))
            .and_then(|json| Self::from_json(&json));

        match result {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning override: {}", e);
                Self::default()
            }
        }
    }
}
