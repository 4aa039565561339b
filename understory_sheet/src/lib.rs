// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_sheet --heading-base-level=0

//! Understory Sheet: presentation state machine and event stream for draggable multi-detent sheets.
//!
//! A sheet rests at one of several detents (see `understory_detent`). This crate serializes
//! present, dismiss, and resize commands against one sheet while the user may be dragging it,
//! and publishes what happened as an ordered event queue.
//!
//! - [`Sheet`]: lifecycle state machine for one sheet. Commands take a completion callback
//!   that runs exactly once.
//! - [`SheetHost`]: the rendering side. The sheet asks it to present, dismiss, resize, and
//!   re-layout; it answers through `Sheet` callbacks.
//! - [`EventBridge`]: ordered, de-duplicated [`SheetEvent`] queue, drained with
//!   [`Sheet::drain_events`].
//! - [`SheetRegistry`]: many sheets by [`SheetId`], with stacking and focus events.
//!
//! ## Threading
//!
//! Everything runs on one thread. Commands, host callbacks, and measurement updates may
//! interleave in any order; the state machine is the single point that orders them. A
//! second command of a kind already pending supersedes the first instead of queueing.
//!
//! ## Example
//!
//! ```rust
//! use understory_detent::{DetentSpec, Measurements};
//! use understory_sheet::{GesturePhase, NoHost, Sheet, SheetConfig, SheetEvent, SheetState};
//!
//! let config = SheetConfig::with_detents(vec![
//!     DetentSpec::Fraction(0.3),
//!     DetentSpec::Fraction(0.6),
//! ]);
//! let mut sheet = Sheet::new(NoHost, config);
//! sheet.set_measurements(Measurements::new(800.0));
//!
//! sheet.present(0, true, |_| {});
//! sheet.did_present(0);
//!
//! // The user drags from detent 0 toward detent 1 and lets go.
//! sheet.drag_sample(560.0, GesturePhase::Began);
//! sheet.drag_sample(440.0, GesturePhase::Changed);
//! sheet.drag_sample(330.0, GesturePhase::Ended);
//! assert_eq!(sheet.state(), SheetState::Settling);
//!
//! sheet.did_settle(1, 320.0);
//! assert_eq!(sheet.active_index(), Some(1));
//!
//! let events = sheet.drain_events();
//! let ends = events.iter().position(|e| matches!(e, SheetEvent::DragEnd(_)));
//! let changes = events.iter().position(|e| matches!(e, SheetEvent::DetentChange(_)));
//! assert!(ends < changes);
//! ```
//!
//! ## Logging
//!
//! With the `tracing` feature, state transitions are logged at `debug` and dropped
//! callbacks or rejected commands at `warn`. No subscriber is installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[macro_use]
mod logging;

pub mod bridge;
pub mod command;
pub mod error;
pub mod host;
pub mod registry;
pub mod sheet;
pub mod types;

pub use bridge::{EventBridge, SheetEvent};
pub use command::{Completion, PendingCommand};
pub use error::{
    CallbackError, DismissError, PresentError, ResizeError, SheetError, StaleCallbackError,
};
pub use host::{NoHost, SheetHost};
pub use registry::{SheetId, SheetRegistry};
pub use sheet::Sheet;
pub use types::{
    CommandKind, DetentInfo, GesturePhase, PositionInfo, SheetConfig, SheetOptions, SheetState,
};
