//! Directed two-point segment with lazily cached metrics

use crate::azimuth;
use geo::{Coord, Euclidean, Length};
use std::cell::OnceCell;

/// An ordered pair of points
///
/// Endpoints never change after construction, so length and azimuth are computed
/// on first use and cached for the lifetime of the segment.
#[derive(Clone, Debug)]
pub struct Segment {
    start: Coord<f64>,
    end: Coord<f64>,
    cached_length: OnceCell<f64>,
    cached_azimuth: OnceCell<f64>,
}

impl Segment {
    /// Create a segment from `start` to `end`
    pub fn new(start: Coord<f64>, end: Coord<f64>) -> Self {
        Self {
            start,
            end,
            cached_length: OnceCell::new(),
            cached_azimuth: OnceCell::new(),
        }
    }

    #[inline]
    pub fn start(&self) -> Coord<f64> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Coord<f64> {
        self.end
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        *self
            .cached_length
            .get_or_init(|| Euclidean.length(&self.as_line()))
    }

    /// Bearing from start to end in (-180, 180]
    pub fn azimuth(&self) -> f64 {
        *self
            .cached_azimuth
            .get_or_init(|| azimuth::azimuth(self.start, self.end))
    }

    /// View as a `geo::Line` for distance and intersection queries
    #[inline]
    pub fn as_line(&self) -> geo::Line<f64> {
        geo::Line::new(self.start, self.end)
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl From<geo::Line<f64>> for Segment {
    fn from(line: geo::Line<f64>) -> Self {
        Self::new(line.start, line.end)
    }
}
