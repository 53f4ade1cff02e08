//! Azimuth arithmetic
//!
//! Bearings are in degrees with 0 = north, 90 = east, 180/-180 = south and -90 = west.
//! No tolerance is applied here; callers decide when a delta is effectively zero.

use geo::Coord;

/// Bearing from `start` to `end` in the range (-180, 180]
#[inline]
pub fn azimuth(start: Coord<f64>, end: Coord<f64>) -> f64 {
    let az = (end.x - start.x).atan2(end.y - start.y).to_degrees();
    // atan2 yields -180 only for a due-south bearing with a negative-zero dx
    if az == -180.0 { 180.0 } else { az }
}

/// Fold a bearing onto the [0, 180] half so both directions of an undirected line match
///
/// -180 maps to 180, other negative values gain 180, the rest are unchanged.
#[inline]
pub fn normalize_to_positive(azimuth: f64) -> f64 {
    if azimuth == -180.0 {
        180.0
    } else if azimuth < 0.0 {
        azimuth + 180.0
    } else {
        azimuth
    }
}

/// Fold an angle outside ±90 back by 180
#[inline]
pub fn normalize_to_90_range(azimuth: f64) -> f64 {
    if azimuth > 90.0 {
        azimuth - 180.0
    } else if azimuth < -90.0 {
        azimuth + 180.0
    } else {
        azimuth
    }
}

/// Signed rotation in [-90, 90] that aligns `line_azimuth` with `segment_azimuth`
///
/// Both bearings are treated as undirected axes, so the antiparallel alignment is
/// just as good as the parallel one and the smaller correction wins.
#[inline]
pub fn delta_azimuth(segment_azimuth: f64, line_azimuth: f64) -> f64 {
    normalize_to_90_range(normalize_to_positive(segment_azimuth) - normalize_to_positive(line_azimuth))
}
