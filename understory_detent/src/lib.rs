// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_detent --heading-base-level=0

//! Understory Detent: detent resolution and drag interpolation for multi-stop sheets.
//!
//! A sheet (for example a bottom sheet) rests at one of several vertical stops called detents.
//! This crate turns abstract detent specifications into screen space and maps raw drag
//! positions back onto a continuous detent index.
//!
//! - [`DetentSpec`]: a configured stop, in points, as a fraction of the screen, or `Auto`
//!   (sized to the measured content plus header).
//! - [`DetentTable`]: pure resolution of specs against [`Measurements`].
//! - [`DetentCalculator`]: resolved detents plus positions observed at rest, with
//!   segment lookup and interpolation for drags.
//!
//! It does not render, animate, or track gestures. Upstream code feeds it measurements and
//! raw positions; a presentation layer (see `understory_sheet`) consumes its answers.
//!
//! ## Coordinates
//!
//! Positions are the screen Y of the sheet's top edge. Smaller Y is higher on screen, which
//! means a larger sheet. A fully closed sheet has its top edge at `screen_height`.
//!
//! ## Example
//!
//! ```rust
//! use understory_detent::{DetentCalculator, DetentSpec, Measurements};
//!
//! let mut calc = DetentCalculator::new(vec![
//!     DetentSpec::Fraction(0.3),
//!     DetentSpec::Fraction(0.6),
//!     DetentSpec::Auto,
//! ]);
//! calc.set_measurements(
//!     Measurements::new(800.0)
//!         .with_content_height(400.0)
//!         .with_header_height(40.0),
//! );
//!
//! let positions: Vec<f64> = calc.resolved().iter().map(|d| d.position).collect();
//! assert_eq!(positions, [560.0, 320.0, 360.0]);
//!
//! // A quarter of the way from detent 0 to detent 1.
//! assert_eq!(calc.interpolated_index(500.0), 0.25);
//! ```
//!
//! ## Parsing
//!
//! [`DetentSpec`] implements [`FromStr`](core::str::FromStr) for the textual forms
//! `auto`, `medium`, `large`, `NN%` and plain point values.
//!
//! ## Float semantics
//!
//! Comparisons use a tolerance of half a physical pixel (see
//! [`DetentCalculator::set_display_scale`]) so float jitter never flips segments.
//! Invalid inputs (non-positive screen height, NaN) degrade to fraction `0` and never panic.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod calculator;
pub mod table;
pub mod types;

pub use calculator::{DEFAULT_EPSILON, DetentCalculator};
pub use table::{ConfigurationError, DetentTable, resolve};
pub use types::{DetentSpec, Measurements, ParseDetentError, ResolvedDetent, Segment};
