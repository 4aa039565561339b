// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detent specifications, resolved detents, and the measurements they are resolved against.

use core::fmt;
use core::str::FromStr;

/// One configured resting stop of a sheet.
///
/// Detents are supplied as an ordered sequence; the order defines the index
/// `0..N-1`. Callers are expected to order them by increasing resolved height.
/// The calculator does not sort, and an unordered sequence yields undefined
/// (but never panicking) interpolation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DetentSpec {
    /// A fixed sheet height in logical units.
    Points(f64),
    /// A fraction of the usable screen height, nominally in `[0, 1]`.
    Fraction(f64),
    /// Sized to fit the measured content plus header.
    ///
    /// Resolves to `0` until both the content and the header have reported a size.
    Auto,
}

impl DetentSpec {
    /// The `"medium"` detent: half of the screen.
    pub const MEDIUM: Self = Self::Fraction(0.5);
    /// The `"large"` detent: the full screen.
    pub const LARGE: Self = Self::Fraction(1.0);

    /// Returns `true` for [`DetentSpec::Auto`].
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// Error returned when parsing a [`DetentSpec`] from text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDetentError {
    input: alloc::string::String,
}

impl ParseDetentError {
    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseDetentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid detent `{}`: expected `auto`, `medium`, `large`, a percentage, or a number of points",
            self.input
        )
    }
}

impl core::error::Error for ParseDetentError {}

impl FromStr for DetentSpec {
    type Err = ParseDetentError;

    /// Parses `auto`, `medium`, `large`, `NN%` and bare numbers (points).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDetentError { input: s.into() };
        let trimmed = s.trim();
        match trimmed {
            "auto" => return Ok(Self::Auto),
            "medium" => return Ok(Self::MEDIUM),
            "large" => return Ok(Self::LARGE),
            _ => {}
        }
        if let Some(percent) = trimmed.strip_suffix('%') {
            let value: f64 = percent.trim_end().parse().map_err(|_| err())?;
            if !value.is_finite() {
                return Err(err());
            }
            return Ok(Self::Fraction(value / 100.0));
        }
        let points: f64 = trimmed.parse().map_err(|_| err())?;
        if !points.is_finite() {
            return Err(err());
        }
        Ok(Self::Points(points))
    }
}

/// A detent converted to screen space for the current [`Measurements`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ResolvedDetent {
    /// Fraction of the usable screen height covered by the sheet, in `[0, 1]`.
    pub fraction: f64,
    /// Screen Y of the sheet's top edge when resting at this detent.
    ///
    /// Smaller is higher on screen, which means a larger sheet.
    pub position: f64,
}

/// Host-owned measurements that detents are resolved against.
///
/// `content_height` and `header_height` stay `None` until the corresponding
/// subtree reports a size. "Not measured" is distinct from "measured as zero".
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Measurements {
    /// Usable screen height. Non-positive values are a configuration error.
    pub screen_height: f64,
    /// Measured content height, if known.
    pub content_height: Option<f64>,
    /// Measured header height, if known.
    pub header_height: Option<f64>,
}

impl Measurements {
    /// Measurements with only the screen height known.
    pub const fn new(screen_height: f64) -> Self {
        Self {
            screen_height,
            content_height: None,
            header_height: None,
        }
    }

    /// Sets the content height.
    #[must_use]
    pub const fn with_content_height(mut self, height: f64) -> Self {
        self.content_height = Some(height);
        self
    }

    /// Sets the header height.
    #[must_use]
    pub const fn with_header_height(mut self, height: f64) -> Self {
        self.header_height = Some(height);
        self
    }

    /// Height an [`DetentSpec::Auto`] detent asks for.
    ///
    /// Zero until both content and header are measured.
    pub fn auto_height(&self) -> f64 {
        match (self.content_height, self.header_height) {
            (Some(content), Some(header)) => content + header,
            _ => 0.0,
        }
    }
}

/// The pair of adjacent detents bracketing a raw position.
///
/// `lower == -1` is the segment between fully closed (the top edge at the
/// screen bottom) and detent `0`. `lower == N - 1` past the last detent is
/// overscroll, extrapolated from the last configured segment.
///
/// `progress` runs from `0` at `lower` to `1` at `lower + 1` and stays in
/// `[0, 1]` inside the configured range. Outside it (below closed, or past the
/// last detent) it is extrapolated linearly so overscroll stays visible.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    /// Lower detent index; `-1` means closed.
    pub lower: isize,
    /// Linear progress toward `lower + 1`.
    pub progress: f64,
}

impl Segment {
    /// Continuous index: `lower + progress`.
    pub fn interpolated_index(&self) -> f64 {
        self.lower as f64 + self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keywords() {
        assert_eq!("auto".parse::<DetentSpec>(), Ok(DetentSpec::Auto));
        assert_eq!("medium".parse::<DetentSpec>(), Ok(DetentSpec::Fraction(0.5)));
        assert_eq!(" large ".parse::<DetentSpec>(), Ok(DetentSpec::Fraction(1.0)));
    }

    #[test]
    fn parse_percent_and_points() {
        assert_eq!("25%".parse::<DetentSpec>(), Ok(DetentSpec::Fraction(0.25)));
        assert_eq!("320".parse::<DetentSpec>(), Ok(DetentSpec::Points(320.0)));
        assert_eq!("12.5".parse::<DetentSpec>(), Ok(DetentSpec::Points(12.5)));
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "tall".parse::<DetentSpec>().unwrap_err();
        assert_eq!(err.input(), "tall");
        assert!("%".parse::<DetentSpec>().is_err());
        assert!("inf".parse::<DetentSpec>().is_err());
    }

    #[test]
    fn auto_height_needs_both_measurements() {
        let m = Measurements::new(800.0).with_content_height(400.0);
        assert_eq!(m.auto_height(), 0.0);
        let m = m.with_header_height(40.0);
        assert_eq!(m.auto_height(), 440.0);
    }

    #[test]
    fn segment_index_is_lower_plus_progress() {
        let s = Segment {
            lower: -1,
            progress: 0.25,
        };
        assert_eq!(s.interpolated_index(), -0.75);
    }
}
