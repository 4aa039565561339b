// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command rejections and dropped host callbacks.

use alloc::string::String;
use core::fmt;

use crate::registry::SheetId;
use crate::types::SheetState;

/// Why a command was rejected.
///
/// Delivered only through the command's own completion callback, exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetError {
    /// A newer command of the same kind replaced this one.
    ///
    /// Not a real failure: a newer operation is in flight.
    Superseded,
    /// The host failed to present, resize, or dismiss.
    Presentation(String),
    /// The detent index is not configured.
    InvalidIndex {
        /// Requested index.
        index: usize,
        /// Number of configured detents.
        count: usize,
    },
    /// The command needs a presented sheet.
    NotPresented,
    /// The sheet is being dismissed.
    Dismissing,
    /// A dismissal or teardown displaced the command before it finished.
    Interrupted,
    /// The embedder cancelled the pending command.
    Cancelled,
    /// The command targeted a sheet that is no longer tracked.
    Stale(SheetId),
}

/// Rejection of [`Sheet::present`](crate::sheet::Sheet::present).
pub type PresentError = SheetError;
/// Rejection of [`Sheet::dismiss`](crate::sheet::Sheet::dismiss).
pub type DismissError = SheetError;
/// Rejection of [`Sheet::resize`](crate::sheet::Sheet::resize).
pub type ResizeError = SheetError;

impl SheetError {
    /// Returns `true` for [`SheetError::Superseded`], which callers usually ignore.
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Superseded => f.write_str("superseded by a newer command"),
            Self::Presentation(reason) => write!(f, "presentation failed: {reason}"),
            Self::InvalidIndex { index, count } => {
                write!(f, "detent index {index} is out of bounds (0..{count})")
            }
            Self::NotPresented => f.write_str("sheet is not presented"),
            Self::Dismissing => f.write_str("sheet is being dismissed"),
            Self::Interrupted => f.write_str("interrupted by a dismissal"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Stale(id) => write!(f, "sheet {id:?} is no longer tracked"),
        }
    }
}

impl core::error::Error for SheetError {}

/// A host callback arrived for a sheet that is no longer tracked.
///
/// The callback is dropped. Returned so callers can observe it; ignoring it is fine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StaleCallbackError {
    /// The unknown sheet.
    pub sheet: SheetId,
}

impl fmt::Display for StaleCallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "callback for untracked sheet {:?}", self.sheet)
    }
}

impl core::error::Error for StaleCallbackError {}

/// Why a host callback routed through a [`SheetRegistry`](crate::registry::SheetRegistry)
/// was dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallbackError {
    /// The sheet is no longer tracked.
    Stale(StaleCallbackError),
    /// The sheet is tracked, but the callback does not apply in its current state.
    NotApplicable {
        /// The addressed sheet.
        sheet: SheetId,
        /// Its state when the callback arrived.
        state: SheetState,
    },
}

impl CallbackError {
    /// Returns `true` if the sheet is no longer tracked.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale(_))
    }
}

impl From<StaleCallbackError> for CallbackError {
    fn from(error: StaleCallbackError) -> Self {
        Self::Stale(error)
    }
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stale(error) => error.fmt(f),
            Self::NotApplicable { sheet, state } => {
                write!(f, "callback for sheet {sheet:?} does not apply in state {state:?}")
            }
        }
    }
}

impl core::error::Error for CallbackError {}
