// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detent table: resolves detent specifications to screen space.
//!
//! Resolution is a pure function of the specs and the [`Measurements`]:
//!
//! - `Points(v)`: `fraction = clamp(v / screen_height, 0, 1)`.
//! - `Fraction(v)`: `fraction = clamp(v, 0, 1)`.
//! - `Auto`: `fraction = clamp((content + header) / screen_height, 0, 1)`, or `0`
//!   while either measurement is unknown.
//!
//! and in every case `position = screen_height * (1 - fraction)`, computed as
//! `screen_height - height` so whole-unit heights land on whole-unit positions.
//!
//! An optional maximum height caps every fraction at `max_height / screen_height`.
//! A non-positive screen height resolves every detent to fraction `0`.

use alloc::vec::Vec;
use core::fmt;

use crate::types::{DetentSpec, Measurements, ResolvedDetent};

/// Problems found in a detent configuration.
///
/// These are never returned from resolution, which degrades to fraction `0`
/// instead. Use [`DetentTable::validate`] to surface them for diagnostics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConfigurationError {
    /// The detent list is empty.
    NoDetents,
    /// The screen height is zero, negative, or not finite.
    NonPositiveScreenHeight(f64),
    /// A fraction detent outside `(0, 1]`.
    InvalidFraction {
        /// Index of the offending detent.
        index: usize,
        /// The configured value.
        value: f64,
    },
    /// A points detent that is negative or not finite.
    InvalidPoints {
        /// Index of the offending detent.
        index: usize,
        /// The configured value.
        value: f64,
    },
    /// More than one `Auto` detent; they all resolve to the same size.
    MultipleAuto,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDetents => f.write_str("no detents configured"),
            Self::NonPositiveScreenHeight(h) => write!(f, "screen height {h} is not positive"),
            Self::InvalidFraction { index, value } => {
                write!(f, "detent {index}: fraction {value} must be in (0, 1]")
            }
            Self::InvalidPoints { index, value } => {
                write!(f, "detent {index}: points value {value} must be finite and non-negative")
            }
            Self::MultipleAuto => f.write_str("more than one auto detent configured"),
        }
    }
}

impl core::error::Error for ConfigurationError {}

/// An ordered set of detent specifications plus an optional height cap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetentTable {
    specs: Vec<DetentSpec>,
    max_height: Option<f64>,
}

impl DetentTable {
    /// Creates a table over `specs` with no height cap.
    pub fn new(specs: Vec<DetentSpec>) -> Self {
        Self {
            specs,
            max_height: None,
        }
    }

    /// The configured detents, in index order.
    pub fn specs(&self) -> &[DetentSpec] {
        &self.specs
    }

    /// Replaces the configured detents.
    pub fn set_specs(&mut self, specs: Vec<DetentSpec>) {
        self.specs = specs;
    }

    /// Number of configured detents.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` when no detents are configured.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The maximum sheet height, if any.
    pub fn max_height(&self) -> Option<f64> {
        self.max_height
    }

    /// Caps every resolved detent at `max_height` logical units.
    pub fn set_max_height(&mut self, max_height: Option<f64>) {
        self.max_height = max_height;
    }

    /// Resolves a single spec.
    pub fn resolve_one(&self, spec: DetentSpec, m: &Measurements) -> ResolvedDetent {
        let screen = m.screen_height;
        if !is_usable_screen(screen) {
            return ResolvedDetent {
                fraction: 0.0,
                position: screen_or_zero(screen),
            };
        }
        let (mut fraction, mut height) = match spec {
            DetentSpec::Points(v) => {
                let h = clamp_height(v, screen);
                (h / screen, h)
            }
            DetentSpec::Fraction(v) => {
                let f = clamp_unit(v);
                (f, f * screen)
            }
            DetentSpec::Auto => {
                let h = clamp_height(m.auto_height(), screen);
                (h / screen, h)
            }
        };
        if let Some(max) = self.max_height {
            let cap = clamp_height(max, screen);
            if height > cap {
                height = cap;
                fraction = cap / screen;
            }
        }
        ResolvedDetent {
            fraction,
            position: screen - height,
        }
    }

    /// Resolves every spec, in index order.
    pub fn resolve(&self, m: &Measurements) -> Vec<ResolvedDetent> {
        self.specs.iter().map(|&s| self.resolve_one(s, m)).collect()
    }

    /// Checks the configuration against `m`, reporting the first problem found.
    pub fn validate(&self, m: &Measurements) -> Result<(), ConfigurationError> {
        if self.specs.is_empty() {
            return Err(ConfigurationError::NoDetents);
        }
        if !is_usable_screen(m.screen_height) {
            return Err(ConfigurationError::NonPositiveScreenHeight(m.screen_height));
        }
        let mut autos = 0;
        for (index, spec) in self.specs.iter().enumerate() {
            match *spec {
                DetentSpec::Fraction(value) if !(value > 0.0 && value <= 1.0) => {
                    return Err(ConfigurationError::InvalidFraction { index, value });
                }
                DetentSpec::Points(value) if !value.is_finite() || value < 0.0 => {
                    return Err(ConfigurationError::InvalidPoints { index, value });
                }
                DetentSpec::Auto => autos += 1,
                _ => {}
            }
        }
        if autos > 1 {
            return Err(ConfigurationError::MultipleAuto);
        }
        Ok(())
    }
}

/// Resolves `specs` against `m` without a height cap.
///
/// ```
/// use understory_detent::{resolve, DetentSpec, Measurements};
///
/// let m = Measurements::new(800.0)
///     .with_content_height(400.0)
///     .with_header_height(40.0);
/// let specs = [DetentSpec::Fraction(0.3), DetentSpec::Fraction(0.6), DetentSpec::Auto];
/// let resolved = resolve(&specs, &m);
/// let positions: Vec<f64> = resolved.iter().map(|d| d.position).collect();
/// assert_eq!(positions, [560.0, 320.0, 360.0]);
/// ```
pub fn resolve(specs: &[DetentSpec], m: &Measurements) -> Vec<ResolvedDetent> {
    let table = DetentTable::default();
    specs.iter().map(|&s| table.resolve_one(s, m)).collect()
}

fn is_usable_screen(screen: f64) -> bool {
    screen.is_finite() && screen > 0.0
}

// NaN maps to 0 so a bad input never leaks into positions.
pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

fn clamp_height(h: f64, screen: f64) -> f64 {
    if h.is_nan() { 0.0 } else { h.clamp(0.0, screen) }
}

fn screen_or_zero(screen: f64) -> f64 {
    if screen.is_finite() { screen } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn scenario() -> (DetentTable, Measurements) {
        let table = DetentTable::new(vec![
            DetentSpec::Fraction(0.3),
            DetentSpec::Fraction(0.6),
            DetentSpec::Auto,
        ]);
        let m = Measurements::new(800.0)
            .with_content_height(400.0)
            .with_header_height(40.0);
        (table, m)
    }

    #[test]
    fn resolves_fraction_and_auto() {
        let (table, m) = scenario();
        let r = table.resolve(&m);
        let fractions: Vec<f64> = r.iter().map(|d| d.fraction).collect();
        let positions: Vec<f64> = r.iter().map(|d| d.position).collect();
        assert_eq!(fractions, vec![0.3, 0.6, 0.55]);
        assert_eq!(positions, vec![560.0, 320.0, 360.0]);
    }

    #[test]
    fn resolve_is_idempotent() {
        let (table, m) = scenario();
        assert_eq!(table.resolve(&m), table.resolve(&m));
    }

    #[test]
    fn points_are_clamped_to_screen() {
        let table = DetentTable::new(vec![DetentSpec::Points(200.0), DetentSpec::Points(5000.0)]);
        let r = table.resolve(&Measurements::new(800.0));
        assert_eq!(r[0].fraction, 0.25);
        assert_eq!(r[0].position, 600.0);
        assert_eq!(r[1].fraction, 1.0);
        assert_eq!(r[1].position, 0.0);
    }

    #[test]
    fn auto_is_zero_until_measured() {
        let table = DetentTable::new(vec![DetentSpec::Auto]);
        let m = Measurements::new(800.0).with_content_height(400.0);
        let r = table.resolve(&m);
        assert_eq!(r[0].fraction, 0.0);
        assert_eq!(r[0].position, 800.0);
    }

    #[test]
    fn non_positive_screen_resolves_to_zero() {
        let (table, mut m) = scenario();
        m.screen_height = 0.0;
        for d in table.resolve(&m) {
            assert_eq!(d.fraction, 0.0);
            assert_eq!(d.position, 0.0);
        }
        m.screen_height = -10.0;
        assert!(table.resolve(&m).iter().all(|d| d.fraction == 0.0));
        assert_eq!(
            table.validate(&m),
            Err(ConfigurationError::NonPositiveScreenHeight(-10.0))
        );
    }

    #[test]
    fn max_height_caps_fractions() {
        let (mut table, m) = scenario();
        table.set_max_height(Some(400.0));
        let r = table.resolve(&m);
        assert_eq!(r[0].fraction, 0.3);
        assert_eq!(r[1].fraction, 0.5);
        assert_eq!(r[2].fraction, 0.5);
        assert_eq!(r[2].position, 400.0);
    }

    #[test]
    fn validate_reports_problems() {
        let m = Measurements::new(800.0);
        assert_eq!(
            DetentTable::default().validate(&m),
            Err(ConfigurationError::NoDetents)
        );
        let t = DetentTable::new(vec![DetentSpec::Fraction(1.5)]);
        assert_eq!(
            t.validate(&m),
            Err(ConfigurationError::InvalidFraction {
                index: 0,
                value: 1.5
            })
        );
        let t = DetentTable::new(vec![DetentSpec::Auto, DetentSpec::Auto]);
        assert_eq!(t.validate(&m), Err(ConfigurationError::MultipleAuto));
        let (t, m) = scenario();
        assert_eq!(t.validate(&m), Ok(()));
    }
}
