//! Pointer tracking for the hidden input surface, scoped per console.
//!
//! The hidden input follows the pointer so a paste or context menu lands on
//! it. Tracking only runs while a `PointerScope` is alive; dropping the scope
//! detaches it and forgets the last position.

use crate::console::settings;
use std::cell::RefCell;
use std::rc::Rc;

/// Screen position in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Default)]
struct PointerState {
    attached: bool,
    last: Option<Point>,
    anchor: Option<Point>,
}

/// Per-console pointer tracker.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    state: Rc<RefCell<PointerState>>,
}

impl PointerTracker {
    /// Start tracking; the returned scope detaches on drop.
    pub fn attach(&self) -> PointerScope {
        self.state.borrow_mut().attached = true;
        PointerScope {
            state: Rc::clone(&self.state),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }

    /// Record a pointer move; the input anchor trails the pointer.
    pub fn moved(&self, at: Point) {
        let mut state = self.state.borrow_mut();
        if !state.attached {
            return;
        }
        state.last = Some(at);
        // Negative y means the pointer left the document.
        if at.y > 0 {
            state.anchor = Some(offset(at, settings::POINTER_TRAIL_OFFSET));
        }
    }

    /// Pull the input anchor under the pointer ahead of a paste.
    pub fn grab(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(last) = state.last {
            state.anchor = Some(offset(last, settings::POINTER_GRAB_OFFSET));
        }
    }

    /// Where the hidden input currently sits, if tracking has a position.
    pub fn anchor(&self) -> Option<Point> {
        self.state.borrow().anchor
    }
}

/// Live tracking registration; dropping it detaches the tracker.
#[derive(Debug)]
pub struct PointerScope {
    state: Rc<RefCell<PointerState>>,
}

impl Drop for PointerScope {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.attached = false;
        state.last = None;
        state.anchor = None;
    }
}

fn offset(at: Point, delta: i32) -> Point {
    Point {
        x: at.x + delta,
        y: at.y + delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_are_ignored_until_attached() {
        let tracker = PointerTracker::default();
        tracker.moved(Point { x: 10, y: 10 });
        assert_eq!(tracker.anchor(), None);
    }

    #[test]
    fn scope_tracks_and_detaches_on_drop() {
        let tracker = PointerTracker::default();
        {
            let _scope = tracker.attach();
            tracker.moved(Point { x: 10, y: 20 });
            assert_eq!(tracker.anchor(), Some(Point { x: 40, y: 50 }));
            tracker.grab();
            assert_eq!(tracker.anchor(), Some(Point { x: -3, y: 7 }));
        }
        assert!(!tracker.is_attached());
        assert_eq!(tracker.anchor(), None);
        tracker.moved(Point { x: 1, y: 1 });
        assert_eq!(tracker.anchor(), None);
    }

    #[test]
    fn pointer_outside_document_keeps_anchor() {
        let tracker = PointerTracker::default();
        let _scope = tracker.attach();
        tracker.moved(Point { x: 5, y: 5 });
        tracker.moved(Point { x: 8, y: -1 });
        assert_eq!(tracker.anchor(), Some(Point { x: 35, y: 35 }));
    }
}
