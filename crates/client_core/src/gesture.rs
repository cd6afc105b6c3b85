//! Drag-to-decide interpretation for the topmost card.
//!
//! The interpreter only tracks geometry and phase. Acting on a decision
//! (saving the event, scheduling the deck advance) is the caller's job.

use std::time::Duration;

/// Minimum absolute horizontal displacement, in pixels, that turns a drag
/// into a decision.
pub const SWIPE_THRESHOLD_PX: f64 = 100.0;
/// Delay between a decision and the next card being exposed.
pub const EXIT_ANIMATION: Duration = Duration::from_millis(500);

const ROTATION_DIVISOR: f64 = 10.0;
const OPACITY_FALLOFF_PX: f64 = 300.0;
const TOP_SLOT: usize = 0;

/// Live visual state of the dragged card. Opacity is left unclamped; the
/// renderer decides what to do with values outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub dx: f64,
    pub dy: f64,
    pub rotation_deg: f64,
    pub opacity: f64,
}

impl CardTransform {
    pub const IDENTITY: Self = Self {
        dx: 0.0,
        dy: 0.0,
        rotation_deg: 0.0,
        opacity: 1.0,
    };

    pub fn from_offset(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            rotation_deg: dx / ROTATION_DIVISOR,
            opacity: 1.0 - dx.abs() / OPACITY_FALLOFF_PX,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Accept,
    Reject,
    Cancel,
}

impl GestureOutcome {
    pub fn classify(dx: f64) -> Self {
        if dx.abs() > SWIPE_THRESHOLD_PX {
            if dx > 0.0 {
                Self::Accept
            } else {
                Self::Reject
            }
        } else {
            Self::Cancel
        }
    }

    pub fn direction(self) -> Option<SwipeDirection> {
        match self {
            Self::Accept => Some(SwipeDirection::Right),
            Self::Reject => Some(SwipeDirection::Left),
            Self::Cancel => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        }
    }
}

impl From<SwipeDirection> for GestureOutcome {
    fn from(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Right => Self::Accept,
            SwipeDirection::Left => Self::Reject,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GesturePhase {
    Idle,
    Dragging {
        origin_x: f64,
        origin_y: f64,
        dx: f64,
        dy: f64,
    },
    /// A decision was made and the card is animating out. Input is ignored
    /// until `finish_exit`, which is what keeps a duplicated release from
    /// advancing the deck twice.
    Exiting(SwipeDirection),
}

#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    phase: GesturePhase,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self {
            phase: GesturePhase::Idle,
        }
    }

    /// Begins a drag. Ignored unless `slot` is the top of the stack and no
    /// drag or exit is in progress.
    pub fn start(&mut self, slot: usize, x: f64, y: f64) -> bool {
        if slot != TOP_SLOT || self.phase != GesturePhase::Idle {
            return false;
        }
        self.phase = GesturePhase::Dragging {
            origin_x: x,
            origin_y: y,
            dx: 0.0,
            dy: 0.0,
        };
        true
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> Option<CardTransform> {
        let GesturePhase::Dragging {
            origin_x,
            origin_y,
            dx,
            dy,
        } = &mut self.phase
        else {
            return None;
        };
        *dx = x - *origin_x;
        *dy = y - *origin_y;
        Some(CardTransform::from_offset(*dx, *dy))
    }

    /// Releases the drag and classifies it. Returns `None` when no drag is
    /// active, so repeated or synthetic releases are harmless.
    pub fn end(&mut self) -> Option<GestureOutcome> {
        let GesturePhase::Dragging { dx, .. } = self.phase else {
            return None;
        };
        let outcome = GestureOutcome::classify(dx);
        self.phase = match outcome.direction() {
            Some(direction) => GesturePhase::Exiting(direction),
            None => GesturePhase::Idle,
        };
        Some(outcome)
    }

    /// Records a decision made without dragging (buttons, keyboard).
    pub fn commit(&mut self, direction: SwipeDirection) -> bool {
        if self.phase != GesturePhase::Idle {
            return false;
        }
        self.phase = GesturePhase::Exiting(direction);
        true
    }

    /// Marks the exit animation as done so the next top card is interactive.
    pub fn finish_exit(&mut self) -> bool {
        if matches!(self.phase, GesturePhase::Exiting(_)) {
            self.phase = GesturePhase::Idle;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
    }

    pub fn transform(&self) -> CardTransform {
        match self.phase {
            GesturePhase::Dragging { dx, dy, .. } => CardTransform::from_offset(dx, dy),
            GesturePhase::Idle | GesturePhase::Exiting(_) => CardTransform::IDENTITY,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == GesturePhase::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging { .. })
    }

    pub fn exit_direction(&self) -> Option<SwipeDirection> {
        match self.phase {
            GesturePhase::Exiting(direction) => Some(direction),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
