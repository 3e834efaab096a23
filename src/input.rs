//! Activation input
//!
//! Browser callbacks push raw events into an [`InputQueue`]; the frame
//! callback drains it before ticking, so input and simulation never
//! interleave within a tick.

/// Raw input events the game listens to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed (`KeyboardEvent.code`, e.g. `"Space"`)
    KeyDown { code: String },
    /// A mouse button was pressed (0 = primary)
    PointerDown { button: i16 },
}

/// Key code of the activation key
pub const ACTIVATION_KEY: &str = "Space";
/// Key code that toggles attract mode
pub const AUTOPILOT_KEY: &str = "KeyA";

impl InputEvent {
    /// Space or primary click
    pub fn is_activation(&self) -> bool {
        match self {
            InputEvent::KeyDown { code } => code == ACTIVATION_KEY,
            InputEvent::PointerDown { button } => *button == 0,
        }
    }

    pub fn is_autopilot_toggle(&self) -> bool {
        matches!(self, InputEvent::KeyDown { code } if code == AUTOPILOT_KEY)
    }
}

/// A queue of input events, drained once per frame
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events in arrival order
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
