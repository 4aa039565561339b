// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the sheet: lifecycle states, gesture phases, event payloads, and configuration.

use alloc::vec::Vec;

use understory_detent::{DEFAULT_EPSILON, DetentSpec};

/// Lifecycle state of a [`Sheet`](crate::sheet::Sheet).
///
/// `Idle` is initial. `Dismissed` returns to `Idle` once the host reports teardown;
/// commands treat the two alike.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum SheetState {
    /// Not on screen.
    #[default]
    Idle,
    /// The host was asked to show the sheet and has not acknowledged yet.
    Presenting,
    /// Resting at a detent.
    Presented,
    /// A user drag is in progress.
    Dragging,
    /// Moving to a detent after a drag or a resize; waiting for the host to settle.
    Settling,
    /// The host was asked to hide the sheet and has not acknowledged yet.
    Dismissing,
    /// Hidden; waiting for the host to finish teardown.
    Dismissed,
}

impl SheetState {
    /// Returns `true` while the sheet is on screen, including while it is being dismissed.
    pub const fn is_presented(self) -> bool {
        matches!(
            self,
            Self::Presented | Self::Dragging | Self::Settling | Self::Dismissing
        )
    }

    /// Returns `true` for `Idle` and `Dismissed`.
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Idle | Self::Dismissed)
    }

    /// Returns `true` when the sheet is on screen and no dismissal is underway.
    pub(crate) const fn is_settled_on_screen(self) -> bool {
        matches!(self, Self::Presented | Self::Dragging | Self::Settling)
    }
}

/// Phase of a host-reported drag sample.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GesturePhase {
    /// The finger went down and the sheet started to follow it.
    Began,
    /// The sheet moved.
    Changed,
    /// The finger lifted; the host will settle the sheet at a detent.
    Ended,
}

/// Kinds of commands; at most one of each kind is pending at a time.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CommandKind {
    /// Show the sheet at a detent.
    Present,
    /// Hide the sheet.
    Dismiss,
    /// Move a presented sheet to another detent.
    Resize,
}

/// A detent index with its screen fraction and top-edge position.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DetentInfo {
    /// Detent index.
    pub index: usize,
    /// Screen fraction of the detent, in `[0, 1]`.
    pub value: f64,
    /// Screen Y of the sheet's top edge.
    pub position: f64,
}

/// A continuous position report.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PositionInfo {
    /// Interpolated detent index; negative below detent `0`.
    pub index: f64,
    /// Interpolated screen fraction, in `[0, 1]`.
    pub value: f64,
    /// Screen Y of the sheet's top edge.
    pub position: f64,
    /// `true` for samples that track a live gesture; `false` for layout-driven moves.
    pub realtime: bool,
}

bitflags::bitflags! {
    /// Behavior switches for a sheet.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SheetOptions: u8 {
        /// Drag samples from the host are tracked. When unset they are ignored.
        const DRAGGABLE       = 0b0000_0001;
        /// Emit [`PositionChange`](crate::bridge::SheetEvent::PositionChange) events.
        const POSITION_EVENTS = 0b0000_0010;
    }
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self::DRAGGABLE | Self::POSITION_EVENTS
    }
}

/// Construction-time configuration of a sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetConfig {
    /// Ordered detents; index `0` is the smallest.
    pub detents: Vec<DetentSpec>,
    /// Optional cap on the sheet height, in logical units.
    pub max_height: Option<f64>,
    /// Behavior switches.
    pub options: SheetOptions,
    /// Display scale (physical pixels per logical unit); sets the comparison epsilon.
    pub display_scale: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            detents: alloc::vec![DetentSpec::MEDIUM, DetentSpec::LARGE],
            max_height: None,
            options: SheetOptions::default(),
            display_scale: 1.0,
        }
    }
}

impl SheetConfig {
    /// Configuration with the given detents and defaults otherwise.
    pub fn with_detents(detents: Vec<DetentSpec>) -> Self {
        Self {
            detents,
            ..Self::default()
        }
    }

    /// Epsilon in logical units: half a physical pixel.
    pub fn epsilon(&self) -> f64 {
        if self.display_scale.is_finite() && self.display_scale > 0.0 {
            DEFAULT_EPSILON / self.display_scale
        } else {
            DEFAULT_EPSILON
        }
    }
}
