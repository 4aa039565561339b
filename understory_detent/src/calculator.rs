// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detent calculator: resolved detents, observed resting positions, and drag interpolation.
//!
//! ## Usage
//!
//! 1) Create a [`DetentCalculator`] over the configured detents.
//! 2) Push measurements with [`DetentCalculator::set_measurements`] whenever the host reports them.
//! 3) When the sheet comes to rest at a detent, record the observed top edge with
//!    [`DetentCalculator::store_resolved_position`]. Stored positions anchor interpolation
//!    until the measurements or the configuration change.
//! 4) While dragging, map raw positions with [`DetentCalculator::find_segment`],
//!    [`DetentCalculator::interpolated_index`] and [`DetentCalculator::interpolated_detent_value`].
//!
//! ## Minimal example
//!
//! ```
//! use understory_detent::{DetentCalculator, DetentSpec, Measurements};
//!
//! let mut calc = DetentCalculator::new(vec![DetentSpec::Fraction(0.3), DetentSpec::Fraction(0.6)]);
//! calc.set_measurements(Measurements::new(800.0));
//!
//! // Halfway between detent 0 (y = 560) and detent 1 (y = 320).
//! assert_eq!(calc.interpolated_index(440.0), 0.5);
//!
//! // Halfway between closed (y = 800) and detent 0.
//! assert_eq!(calc.interpolated_index(680.0), -0.5);
//! ```

use alloc::vec::Vec;

use crate::table::{DetentTable, clamp_unit};
use crate::types::{DetentSpec, Measurements, ResolvedDetent, Segment};

/// Default comparison tolerance: half a physical pixel at display scale `1`.
pub const DEFAULT_EPSILON: f64 = 0.5;

/// Stateful detent geometry for one sheet.
///
/// Holds the [`DetentTable`], the current [`Measurements`], the resolved detents,
/// and the positions actually observed at rest (which can differ slightly from the
/// theoretical ones because hosts round to device pixels).
#[derive(Clone, Debug)]
pub struct DetentCalculator {
    table: DetentTable,
    measurements: Measurements,
    resolved: Vec<ResolvedDetent>,
    observed: Vec<Option<f64>>,
    epsilon: f64,
}

impl Default for DetentCalculator {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl DetentCalculator {
    /// Creates a calculator over `specs` with no measurements yet.
    pub fn new(specs: Vec<DetentSpec>) -> Self {
        let mut calc = Self {
            table: DetentTable::new(specs),
            measurements: Measurements::default(),
            resolved: Vec::new(),
            observed: Vec::new(),
            epsilon: DEFAULT_EPSILON,
        };
        calc.refresh();
        calc
    }

    /// The underlying table.
    pub fn table(&self) -> &DetentTable {
        &self.table
    }

    /// The configured detents, in index order.
    pub fn detents(&self) -> &[DetentSpec] {
        self.table.specs()
    }

    /// Number of configured detents.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` when no detents are configured.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Current measurements.
    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    /// Comparison tolerance in logical units.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Sets the comparison tolerance directly. Negative or NaN values are ignored.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        if epsilon >= 0.0 {
            self.epsilon = epsilon;
        }
    }

    /// Derives the tolerance from the display scale: half a physical pixel.
    pub fn set_display_scale(&mut self, scale: f64) {
        self.epsilon = if scale.is_finite() && scale > 0.0 {
            DEFAULT_EPSILON / scale
        } else {
            DEFAULT_EPSILON
        };
    }

    /// Replaces the detent configuration and drops every stored position.
    pub fn set_detents(&mut self, specs: Vec<DetentSpec>) {
        self.table.set_specs(specs);
        self.refresh();
    }

    /// Sets the maximum sheet height. Returns `true` if resolution changed.
    pub fn set_max_height(&mut self, max_height: Option<f64>) -> bool {
        if self.table.max_height() == max_height {
            return false;
        }
        self.table.set_max_height(max_height);
        self.refresh()
    }

    /// Updates the measurements.
    ///
    /// Returns `false` (and keeps stored positions) when nothing changed.
    /// Otherwise every detent is re-resolved and stored positions are dropped.
    pub fn set_measurements(&mut self, measurements: Measurements) -> bool {
        if self.measurements == measurements {
            return false;
        }
        self.measurements = measurements;
        self.refresh();
        true
    }

    // Re-resolves and invalidates stored positions. Returns whether any
    // resolved detent moved.
    fn refresh(&mut self) -> bool {
        let resolved = self.table.resolve(&self.measurements);
        let changed = resolved != self.resolved;
        self.resolved = resolved;
        self.observed.clear();
        self.observed.resize(self.resolved.len(), None);
        changed
    }

    /// All resolved detents, in index order.
    pub fn resolved(&self) -> &[ResolvedDetent] {
        &self.resolved
    }

    /// The resolved detent at `index`, if configured.
    pub fn resolved_detent(&self, index: usize) -> Option<ResolvedDetent> {
        self.resolved.get(index).copied()
    }

    /// Screen fraction of the detent at `index`, or `0` when out of range.
    pub fn detent_value(&self, index: usize) -> f64 {
        self.resolved.get(index).map_or(0.0, |d| d.fraction)
    }

    /// Top-edge position of a fully closed sheet: the screen bottom.
    pub fn closed_position(&self) -> f64 {
        let screen = self.measurements.screen_height;
        if screen.is_finite() { screen } else { 0.0 }
    }

    /// Theoretical top-edge position for `index`, or the closed position when out of range.
    pub fn theoretical_position(&self, index: usize) -> f64 {
        self.resolved
            .get(index)
            .map_or_else(|| self.closed_position(), |d| d.position)
    }

    /// Records the position observed while resting at `index`.
    ///
    /// Returns `false` for an out-of-range index or a non-finite position.
    pub fn store_resolved_position(&mut self, index: usize, position: f64) -> bool {
        if !position.is_finite() {
            return false;
        }
        match self.observed.get_mut(index) {
            Some(slot) => {
                *slot = Some(position);
                true
            }
            None => false,
        }
    }

    /// The stored observed position for `index`, if any.
    pub fn stored_position(&self, index: usize) -> Option<f64> {
        self.observed.get(index).copied().flatten()
    }

    /// Best estimate of the resting position for `index`.
    ///
    /// The stored observation when present, otherwise the theoretical position.
    pub fn estimated_position(&self, index: usize) -> f64 {
        self.stored_position(index)
            .unwrap_or_else(|| self.theoretical_position(index))
    }

    /// Drops all stored positions.
    pub fn clear(&mut self) {
        self.observed.iter_mut().for_each(|slot| *slot = None);
    }

    /// Locates the pair of adjacent detents bracketing `position`.
    ///
    /// Returns `None` only when no detents are configured. Positions within
    /// [`epsilon`](Self::epsilon) of a detent snap onto it so float jitter never
    /// flips between segments. See [`Segment`] for the index conventions.
    pub fn find_segment(&self, position: f64) -> Option<Segment> {
        let count = self.len();
        if count == 0 {
            return None;
        }
        let eps = self.epsilon;
        let last = count - 1;

        let first = self.estimated_position(0);
        if position > first + eps {
            let closed = self.closed_position();
            let span = closed - first;
            let progress = if span > eps {
                (closed - position) / span
            } else {
                0.0
            };
            return Some(Segment {
                lower: -1,
                progress,
            });
        }

        for i in 0..last {
            let from = self.estimated_position(i);
            let to = self.estimated_position(i + 1);
            if position <= from + eps && position >= to - eps {
                return Some(Segment {
                    lower: i as isize,
                    progress: progress_between(from, to, position, eps),
                });
            }
        }

        let top = self.estimated_position(last);
        if position < top - eps {
            // Overscroll continues the slope of the last segment.
            let span = if last > 0 {
                self.estimated_position(last - 1) - top
            } else {
                self.closed_position() - top
            };
            let progress = if span > eps {
                (top - position) / span
            } else {
                0.0
            };
            return Some(Segment {
                lower: last as isize,
                progress,
            });
        }

        // Only reachable with detents that are not ordered by height.
        Some(Segment {
            lower: last as isize,
            progress: 0.0,
        })
    }

    /// Continuous index for `position`: `lower + progress` of [`find_segment`](Self::find_segment).
    ///
    /// `0.5` is halfway from detent `0` to detent `1`; `-0.3` is 30% of the way
    /// from detent `0` toward closed. Values beyond the configured range are
    /// extrapolated, not clamped. Returns `-1` when no detents are configured.
    pub fn interpolated_index(&self, position: f64) -> f64 {
        self.find_segment(position)
            .map_or(-1.0, |segment| segment.interpolated_index())
    }

    /// Interpolated screen fraction for `position`, in `[0, 1]`.
    pub fn interpolated_detent_value(&self, position: f64) -> f64 {
        let Some(segment) = self.find_segment(position) else {
            return 0.0;
        };
        let value = if segment.lower < 0 {
            self.detent_value(0) * segment.progress
        } else {
            let lower = segment.lower as usize;
            let from = self.detent_value(lower);
            let to = if lower + 1 < self.len() {
                self.detent_value(lower + 1)
            } else {
                let prev = if lower > 0 {
                    self.detent_value(lower - 1)
                } else {
                    0.0
                };
                from + (from - prev)
            };
            from + segment.progress * (to - from)
        };
        clamp_unit(value)
    }
}

fn progress_between(from: f64, to: f64, position: f64, eps: f64) -> f64 {
    let span = from - to;
    if span <= eps || (from - position).abs() <= eps {
        return 0.0;
    }
    if (position - to).abs() <= eps {
        return 1.0;
    }
    ((from - position) / span).clamp(0.0, 1.0)
}
