// # Gesture Tracking
//
// Reduces a pointer event stream bound to one element into a cumulative
// drag offset plus an `active` flag.
//
// - **GestureTracker**: pure state machine (Idle <-> Dragging)
// - **spawn_tracker**: runs a tracker on the runtime, fed by `GestureInput`,
//   observable through a `watch` channel, torn down by dropping `TrackerHandle`

mod binding;

pub use binding::{spawn_tracker, GestureInput, TrackerHandle};

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position or offset in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Observable tracker output
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    /// Cumulative offset from where the first drag started
    pub offset: Point,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Press on the bound element
    Press(Point),
    /// Pointer moved anywhere on the surface
    Move(Point),
    /// Pointer released anywhere on the surface
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Dragging { press: Point, baseline: Point },
}

/// Drag state machine for one element
#[derive(Debug, Clone)]
pub struct GestureTracker {
    phase: Phase,
    state: GestureState,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureTracker {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            state: GestureState::default(),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Apply one event. Returns false when the event did not affect the tracker.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        match (event, self.phase) {
            // A press mid-drag restarts from wherever the offset is now
            (PointerEvent::Press(press), _) => {
                self.phase = Phase::Dragging {
                    press,
                    baseline: self.state.offset,
                };
                self.state.active = true;
                true
            }
            (PointerEvent::Move(position), Phase::Dragging { press, baseline }) => {
                self.state.offset = baseline + (position - press);
                true
            }
            (PointerEvent::Release, Phase::Dragging { .. }) => {
                self.end();
                true
            }
            (PointerEvent::Move(_), Phase::Idle) | (PointerEvent::Release, Phase::Idle) => false,
        }
    }

    /// Leave Dragging without a release event. The offset is kept.
    pub fn end(&mut self) {
        self.phase = Phase::Idle;
        self.state.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut tracker = GestureTracker::new();
        assert!(!tracker.handle(PointerEvent::Move(Point::new(50.0, 50.0))));
        assert_eq!(tracker.state(), GestureState::default());
    }

    #[test]
    fn test_drag_tracks_delta_from_press() {
        let mut tracker = GestureTracker::new();

        assert!(tracker.handle(PointerEvent::Press(Point::new(100.0, 100.0))));
        assert!(tracker.state().active);

        tracker.handle(PointerEvent::Move(Point::new(110.0, 95.0)));
        assert_eq!(tracker.state().offset, Point::new(10.0, -5.0));

        tracker.handle(PointerEvent::Release);
        let state = tracker.state();
        assert!(!state.active);
        assert_eq!(state.offset, Point::new(10.0, -5.0));
    }

    #[test]
    fn test_consecutive_drags_compose() {
        let mut tracker = GestureTracker::new();

        tracker.handle(PointerEvent::Press(Point::new(0.0, 0.0)));
        tracker.handle(PointerEvent::Move(Point::new(30.0, 40.0)));
        tracker.handle(PointerEvent::Release);

        // Second drag starts somewhere else; no snap back to zero
        tracker.handle(PointerEvent::Press(Point::new(200.0, 200.0)));
        assert_eq!(tracker.state().offset, Point::new(30.0, 40.0));

        tracker.handle(PointerEvent::Move(Point::new(205.0, 190.0)));
        assert_eq!(tracker.state().offset, Point::new(35.0, 30.0));
    }

    #[test]
    fn test_moves_after_release_are_ignored() {
        let mut tracker = GestureTracker::new();
        tracker.handle(PointerEvent::Press(Point::ORIGIN));
        tracker.handle(PointerEvent::Move(Point::new(5.0, 5.0)));
        tracker.handle(PointerEvent::Release);

        assert!(!tracker.handle(PointerEvent::Move(Point::new(500.0, 500.0))));
        assert_eq!(tracker.state().offset, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_end_keeps_offset() {
        let mut tracker = GestureTracker::new();
        tracker.handle(PointerEvent::Press(Point::ORIGIN));
        tracker.handle(PointerEvent::Move(Point::new(-8.0, 3.0)));

        tracker.end();
        assert!(!tracker.is_dragging());
        assert_eq!(
            tracker.state(),
            GestureState {
                offset: Point::new(-8.0, 3.0),
                active: false
            }
        );
    }
}
