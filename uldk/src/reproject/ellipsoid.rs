//! Ellipsoid definitions

/// GRS80 ellipsoid (datum of both PUWG 1992 and PUWG 2000)
pub struct GRS80;

impl GRS80 {
    /// Semi-major axis (equatorial radius) in meters
    pub const A: f64 = 6378137.0;

    /// Flattening
    pub const F: f64 = 1.0 / 298.257222101;

    /// First eccentricity squared
    pub const E2: f64 = 2.0 * Self::F - Self::F * Self::F;

    /// First eccentricity
    pub const E: f64 = 0.0818191910428158; // sqrt(E2)

    /// Second eccentricity squared
    pub const EP2: f64 = Self::E2 / (1.0 - Self::E2);
}
