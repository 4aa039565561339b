// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event bridge: turns transitions and drag samples into an ordered, de-duplicated event queue.
//!
//! ## Ordering
//!
//! For one drag gesture the bridge emits `DragBegin` exactly once, then zero or more
//! `DragChange`, then either exactly one `DragEnd` or, when a commanded resize interrupts
//! the gesture, nothing (the sheet emits a direct `DetentChange` instead).
//!
//! ## De-duplication
//!
//! A `DragChange` with the same index as the previous drag event and a position closer
//! than the epsilon is dropped. Realtime `PositionChange` samples are dropped the same
//! way. Lifecycle events (`DidPresent`, `DetentChange`, `DidDismiss`, ...) are never dropped.
//!
//! ## Minimal example
//!
//! ```
//! use understory_sheet::bridge::{EventBridge, SheetEvent};
//! use understory_sheet::DetentInfo;
//!
//! let mut bridge = EventBridge::new(0.5);
//! let at = |position| DetentInfo { index: 0, value: 0.3, position };
//! assert!(bridge.drag_begin(at(560.0)));
//! assert!(!bridge.drag_change(at(560.2)));
//! assert!(bridge.drag_change(at(540.0)));
//! assert!(bridge.drag_end(at(320.0)));
//! assert_eq!(bridge.drain().len(), 3);
//! ```

use alloc::vec::Vec;

use kurbo::Size;

use crate::types::{DetentInfo, PositionInfo};

/// An externally observable change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SheetEvent {
    /// The sheet was constructed. Emitted once.
    Mount,
    /// Presentation was requested at a detent.
    WillPresent(DetentInfo),
    /// The host finished presenting.
    DidPresent(DetentInfo),
    /// The resting detent changed.
    DetentChange(DetentInfo),
    /// A drag gesture started.
    DragBegin(DetentInfo),
    /// A drag gesture moved.
    DragChange(DetentInfo),
    /// A drag gesture ended and the sheet settled.
    DragEnd(DetentInfo),
    /// Continuous position report.
    PositionChange(PositionInfo),
    /// Dismissal started.
    WillDismiss,
    /// The sheet is gone.
    DidDismiss,
    /// The sheet is about to become the top of the stack.
    WillFocus,
    /// The sheet is the top of the stack.
    DidFocus,
    /// The sheet is about to lose the top of the stack.
    WillBlur,
    /// The sheet lost the top of the stack.
    DidBlur,
    /// The container was resized.
    ContainerSizeChange(Size),
}

/// Ordered event queue with drag-gesture tracking.
#[derive(Clone, Debug)]
pub struct EventBridge {
    queue: Vec<SheetEvent>,
    epsilon: f64,
    last_drag: Option<DetentInfo>,
    last_position: Option<f64>,
}

impl Default for EventBridge {
    fn default() -> Self {
        Self::new(understory_detent::DEFAULT_EPSILON)
    }
}

impl EventBridge {
    /// Creates an empty bridge with the given de-duplication tolerance.
    pub fn new(epsilon: f64) -> Self {
        Self {
            queue: Vec::new(),
            epsilon,
            last_drag: None,
            last_position: None,
        }
    }

    /// The de-duplication tolerance.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Sets the de-duplication tolerance.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Queues `event` unconditionally.
    pub fn emit(&mut self, event: SheetEvent) {
        self.queue.push(event);
    }

    /// Returns `true` between `drag_begin` and `drag_end`/`interrupt_drag`.
    pub fn is_dragging(&self) -> bool {
        self.last_drag.is_some()
    }

    /// Starts a gesture. Returns `false` if one is already active.
    ///
    /// The gesture's first position report is never suppressed.
    pub fn drag_begin(&mut self, info: DetentInfo) -> bool {
        if self.last_drag.is_some() {
            return false;
        }
        self.last_drag = Some(info);
        self.last_position = None;
        self.queue.push(SheetEvent::DragBegin(info));
        true
    }

    /// Reports gesture movement. Returns `false` when suppressed or no gesture is active.
    pub fn drag_change(&mut self, info: DetentInfo) -> bool {
        let Some(last) = self.last_drag else {
            return false;
        };
        if last.index == info.index && (last.position - info.position).abs() < self.epsilon {
            return false;
        }
        self.last_drag = Some(info);
        self.queue.push(SheetEvent::DragChange(info));
        true
    }

    /// Ends the gesture. Returns `false` if none is active.
    pub fn drag_end(&mut self, info: DetentInfo) -> bool {
        if self.last_drag.take().is_none() {
            return false;
        }
        self.queue.push(SheetEvent::DragEnd(info));
        true
    }

    /// Ends the gesture without emitting `DragEnd`. Returns `false` if none was active.
    pub fn interrupt_drag(&mut self) -> bool {
        self.last_drag.take().is_some()
    }

    /// Queues a position report.
    ///
    /// Realtime samples within epsilon of the previous report are dropped.
    pub fn position_change(&mut self, info: PositionInfo) -> bool {
        if info.realtime
            && self
                .last_position
                .is_some_and(|last| (last - info.position).abs() < self.epsilon)
        {
            return false;
        }
        self.last_position = Some(info.position);
        self.queue.push(SheetEvent::PositionChange(info));
        true
    }

    /// Forgets gesture and position history. Queued events are kept.
    pub fn reset(&mut self) {
        self.last_drag = None;
        self.last_position = None;
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<SheetEvent> {
        core::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(index: usize, position: f64) -> DetentInfo {
        DetentInfo {
            index,
            value: 0.0,
            position,
        }
    }

    #[test]
    fn begin_is_emitted_once() {
        let mut bridge = EventBridge::new(0.5);
        assert!(bridge.drag_begin(info(0, 560.0)));
        assert!(!bridge.drag_begin(info(0, 550.0)));
        assert_eq!(bridge.drain(), [SheetEvent::DragBegin(info(0, 560.0))]);
    }

    #[test]
    fn change_without_begin_is_dropped() {
        let mut bridge = EventBridge::default();
        assert!(!bridge.drag_change(info(0, 500.0)));
        assert!(!bridge.drag_end(info(0, 500.0)));
        assert_eq!(bridge.pending(), 0);
    }

    #[test]
    fn jitter_is_suppressed_but_index_change_is_not() {
        let mut bridge = EventBridge::new(0.5);
        bridge.drag_begin(info(0, 560.0));
        assert!(!bridge.drag_change(info(0, 560.3)));
        assert!(bridge.drag_change(info(1, 560.3)));
        assert!(bridge.drag_change(info(1, 559.0)));
        // Compared against the last emitted sample, not the last received one.
        assert!(!bridge.drag_change(info(1, 558.6)));
        assert_eq!(bridge.pending(), 3);
    }

    #[test]
    fn interrupted_gesture_has_no_end() {
        let mut bridge = EventBridge::new(0.5);
        bridge.drag_begin(info(0, 560.0));
        bridge.drag_change(info(0, 500.0));
        assert!(bridge.interrupt_drag());
        assert!(!bridge.drag_end(info(1, 320.0)));
        let events = bridge.drain();
        assert!(
            !events.iter().any(|e| matches!(e, SheetEvent::DragEnd(_))),
            "interrupted drag must not end: {events:?}"
        );
    }

    #[test]
    fn only_realtime_positions_are_deduplicated() {
        let mut bridge = EventBridge::new(0.5);
        let at = |position, realtime| PositionInfo {
            index: 0.0,
            value: 0.3,
            position,
            realtime,
        };
        assert!(bridge.position_change(at(560.0, true)));
        assert!(!bridge.position_change(at(560.1, true)));
        assert!(bridge.position_change(at(560.1, false)));
        bridge.reset();
        assert!(bridge.position_change(at(560.1, true)));
        assert_eq!(bridge.pending(), 3);
    }
}
