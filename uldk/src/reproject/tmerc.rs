//! Gauss-Krüger (transverse Mercator) projection
//!
//! PUWG 1992 and every PUWG 2000 zone are transverse Mercator projections on
//! GRS80; they differ only in central meridian, scale factor and false
//! origin, so both directions are implemented once over a parameter set.

use super::ellipsoid::GRS80;
use super::Geographic;

/// Parameters of one transverse Mercator variant
#[derive(Debug, Clone, Copy)]
pub struct TmercParams {
    /// Central meridian in radians
    pub lon0: f64,
    /// Scale factor at the central meridian
    pub k0: f64,
    /// False easting
    pub x0: f64,
    /// False northing
    pub y0: f64,
}

/// Meridian arc length from the equator to `lat`
fn meridian_arc(lat: f64) -> f64 {
    let a = GRS80::A;
    let e2 = GRS80::E2;

    a * ((1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0) * lat
        - (3.0 * e2 / 8.0 + 3.0 * e2.powi(2) / 32.0 + 45.0 * e2.powi(3) / 1024.0)
            * (2.0 * lat).sin()
        + (15.0 * e2.powi(2) / 256.0 + 45.0 * e2.powi(3) / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e2.powi(3) / 3072.0) * (6.0 * lat).sin())
}

/// Projects geographic coordinates onto the plane
pub fn from_geographic(geo: Geographic, params: &TmercParams) -> (f64, f64) {
    let e2 = GRS80::E2;
    let ep2 = GRS80::EP2;

    let sin_lat = geo.lat.sin();
    let cos_lat = geo.lat.cos();
    let tan_lat = geo.lat.tan();

    let n = GRS80::A / (1.0 - e2 * sin_lat.powi(2)).sqrt();
    let t = tan_lat.powi(2);
    let c = ep2 * cos_lat.powi(2);
    let a = (geo.lon - params.lon0) * cos_lat;

    let m = meridian_arc(geo.lat);

    let x = params.k0
        * n
        * (a
            + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t.powi(2) + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + params.x0;

    let y = params.k0
        * (m + n
            * tan_lat
            * (a.powi(2) / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c.powi(2)) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t.powi(2) + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0))
        + params.y0;

    (x, y)
}

/// Inverse-projects plane coordinates to geographic coordinates
pub fn to_geographic(x: f64, y: f64, params: &TmercParams) -> Geographic {
    let a = GRS80::A;
    let e2 = GRS80::E2;
    let ep2 = GRS80::EP2;

    let x = x - params.x0;
    let y = y - params.y0;

    // Footprint latitude from the meridian distance
    let m = y / params.k0;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
    let t1 = tan_phi1.powi(2);
    let c1 = ep2 * cos_phi1.powi(2);
    let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
    let d = x / (n1 * params.k0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                    - 252.0 * ep2
                    - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let lon = params.lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    Geographic::new(lon, lat)
}
