//! Plane-coordinate reprojection for the Polish cadastre, pure Rust
//!
//! The registry serves geometries in PUWG 1992 (EPSG:2180), the single-zone
//! national system. Survey drawings use PUWG 2000 (EPSG:2176-2179), split
//! into four Gauss-Krüger zones along the 15°E, 18°E, 21°E and 24°E
//! meridians. Conversion runs through geographic coordinates:
//!
//! 1. inverse-project the PUWG 1992 point to longitude/latitude,
//! 2. pick the PUWG 2000 zone whose central meridian is nearest,
//! 3. forward-project with that zone's parameters.
//!
//! The zone is resolved once per parcel (from its anchor) so rings near a
//! band boundary never mix zones.

mod ellipsoid;
mod tmerc;

pub use ellipsoid::GRS80;
pub use tmerc::TmercParams;

use std::fmt;

use geo::Coord;
use thiserror::Error;
use tracing::debug;

use crate::types::{CanonicalParcel, Ring};
use crate::UldkError;

const DEG: f64 = std::f64::consts::PI / 180.0;

/// PUWG 1992 (EPSG:2180) projection parameters
pub const PUWG_1992: TmercParams = TmercParams {
    lon0: 19.0 * DEG,
    k0: 0.9993,
    x0: 500_000.0,
    y0: -5_300_000.0,
};

/// Scale factor shared by all PUWG 2000 zones
const PUWG_2000_K0: f64 = 0.999923;

// Valid geographic domain of PUWG 1992, padded slightly beyond the
// EPSG:2180 area of use
const LON_MIN_DEG: f64 = 13.5;
const LON_MAX_DEG: f64 = 25.0;
const LAT_MIN_DEG: f64 = 48.5;
const LAT_MAX_DEG: f64 = 55.5;

/// Point in geographic coordinates (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude in radians
    pub lon: f64,
    /// Latitude in radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Converts to degrees
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Creates from degrees
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }
}

/// Coordinate fell outside PUWG 1992's valid geographic domain
#[derive(Debug, Clone, Error)]
#[error("coordinate ({lon_deg:.4}°E, {lat_deg:.4}°N) outside the PUWG 1992 domain")]
pub struct DomainError {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

/// One of PUWG 2000's four longitude-band zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PuwgZone {
    Zone5,
    Zone6,
    Zone7,
    Zone8,
}

impl PuwgZone {
    /// Selects the zone whose central meridian is nearest to `lon_deg`.
    ///
    /// Band boundaries sit midway between adjacent central meridians.
    pub fn for_longitude(lon_deg: f64) -> Self {
        if lon_deg < 16.5 {
            Self::Zone5
        } else if lon_deg < 19.5 {
            Self::Zone6
        } else if lon_deg < 22.5 {
            Self::Zone7
        } else {
            Self::Zone8
        }
    }

    /// Conventional zone code (also the leading digit of eastings)
    pub fn number(self) -> u8 {
        match self {
            Self::Zone5 => 5,
            Self::Zone6 => 6,
            Self::Zone7 => 7,
            Self::Zone8 => 8,
        }
    }

    pub fn central_meridian_deg(self) -> f64 {
        match self {
            Self::Zone5 => 15.0,
            Self::Zone6 => 18.0,
            Self::Zone7 => 21.0,
            Self::Zone8 => 24.0,
        }
    }

    pub fn epsg(self) -> u32 {
        2171 + self.number() as u32
    }

    /// The zone's false easting encodes its number as the leading digit
    pub fn false_easting(self) -> f64 {
        self.number() as f64 * 1_000_000.0 + 500_000.0
    }

    fn params(self) -> TmercParams {
        TmercParams {
            lon0: self.central_meridian_deg().to_radians(),
            k0: PUWG_2000_K0,
            x0: self.false_easting(),
            y0: 0.0,
        }
    }
}

impl fmt::Display for PuwgZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PUWG 2000/{}", self.number())
    }
}

/// Inverse-projects a PUWG 1992 point to geographic coordinates.
///
/// # Errors
///
/// Returns [`DomainError`] when the point resolves outside the projection's
/// valid longitude/latitude range.
pub fn puwg1992_to_geographic(x: f64, y: f64) -> Result<Geographic, DomainError> {
    let geo = tmerc::to_geographic(x, y, &PUWG_1992);
    check_domain(geo)
}

/// Inverse-projects a PUWG 2000 point to geographic coordinates
pub fn puwg2000_to_geographic(x: f64, y: f64, zone: PuwgZone) -> Result<Geographic, DomainError> {
    let geo = tmerc::to_geographic(x, y, &zone.params());
    check_domain(geo)
}

/// Forward-projects geographic coordinates into a PUWG 2000 zone
pub fn geographic_to_puwg2000(geo: Geographic, zone: PuwgZone) -> Coord {
    let (x, y) = tmerc::from_geographic(geo, &zone.params());
    Coord { x, y }
}

/// Forward-projects geographic coordinates into PUWG 1992
pub fn geographic_to_puwg1992(geo: Geographic) -> Coord {
    let (x, y) = tmerc::from_geographic(geo, &PUWG_1992);
    Coord { x, y }
}

/// Converts one PUWG 1992 point into a fixed PUWG 2000 zone
pub fn point_to_puwg2000(x: f64, y: f64, zone: PuwgZone) -> Result<Coord, DomainError> {
    let geo = puwg1992_to_geographic(x, y)?;
    Ok(geographic_to_puwg2000(geo, zone))
}

/// Converts one PUWG 2000 point back into PUWG 1992
pub fn point_to_puwg1992(x: f64, y: f64, zone: PuwgZone) -> Result<Coord, DomainError> {
    let geo = puwg2000_to_geographic(x, y, zone)?;
    Ok(geographic_to_puwg1992(geo))
}

fn check_domain(geo: Geographic) -> Result<Geographic, DomainError> {
    let (lon_deg, lat_deg) = geo.to_degrees();
    if !(LON_MIN_DEG..=LON_MAX_DEG).contains(&lon_deg)
        || !(LAT_MIN_DEG..=LAT_MAX_DEG).contains(&lat_deg)
    {
        return Err(DomainError { lon_deg, lat_deg });
    }
    Ok(geo)
}

/// Rewrites a parcel's coordinates from PUWG 1992 into PUWG 2000.
///
/// The target zone is resolved once from the anchor and applied to every
/// vertex of every ring, even where strict per-point selection near a band
/// boundary would disagree.
///
/// # Errors
///
/// Returns [`UldkError::Projection`] when any vertex leaves the valid
/// PUWG 1992 domain.
pub fn reproject_parcel(parcel: &CanonicalParcel) -> Result<(CanonicalParcel, PuwgZone), UldkError> {
    let key = &parcel.key;
    let to_projection_error =
        |e: DomainError| UldkError::projection(key.as_str(), e.to_string());

    let anchor_geo = puwg1992_to_geographic(parcel.anchor.x, parcel.anchor.y)
        .map_err(to_projection_error)?;
    let zone = PuwgZone::for_longitude(anchor_geo.to_degrees().0);
    debug!(key = %key, zone = zone.number(), "resolved target zone");

    let anchor = geographic_to_puwg2000(anchor_geo, zone);

    let rings = parcel
        .rings
        .iter()
        .map(|ring| {
            let points = ring
                .points
                .iter()
                .map(|p| point_to_puwg2000(p.x, p.y, zone).map_err(to_projection_error))
                .collect::<Result<Vec<Coord>, UldkError>>()?;
            Ok(Ring {
                kind: ring.kind,
                points,
            })
        })
        .collect::<Result<Vec<Ring>, UldkError>>()?;

    Ok((
        CanonicalParcel {
            key: key.clone(),
            rings,
            anchor,
        },
        zone,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParcelKey;

    #[test]
    fn test_zone_selection_bands() {
        assert_eq!(PuwgZone::for_longitude(14.2), PuwgZone::Zone5);
        assert_eq!(PuwgZone::for_longitude(16.49), PuwgZone::Zone5);
        assert_eq!(PuwgZone::for_longitude(16.5), PuwgZone::Zone6);
        assert_eq!(PuwgZone::for_longitude(18.0), PuwgZone::Zone6);
        assert_eq!(PuwgZone::for_longitude(19.5), PuwgZone::Zone7);
        assert_eq!(PuwgZone::for_longitude(22.49), PuwgZone::Zone7);
        assert_eq!(PuwgZone::for_longitude(22.5), PuwgZone::Zone8);
        assert_eq!(PuwgZone::for_longitude(24.1), PuwgZone::Zone8);
    }

    #[test]
    fn test_zone_selection_is_monotonic() {
        let mut last = 0;
        let mut lon = 14.0;
        while lon < 25.0 {
            let number = PuwgZone::for_longitude(lon).number();
            assert!(number >= last, "zone decreased at lon={lon}");
            last = number;
            lon += 0.01;
        }
    }

    #[test]
    fn test_zone_constants() {
        assert_eq!(PuwgZone::Zone5.epsg(), 2176);
        assert_eq!(PuwgZone::Zone8.epsg(), 2179);
        assert_eq!(PuwgZone::Zone7.false_easting(), 7_500_000.0);
    }

    #[test]
    fn test_round_trip_1992_2000_1992() {
        // Warsaw-ish, zone 7
        let a = geographic_to_puwg1992(Geographic::from_degrees(21.0122, 52.2297));
        let zone = PuwgZone::for_longitude(21.0122);
        assert_eq!(zone, PuwgZone::Zone7);

        let b = point_to_puwg2000(a.x, a.y, zone).unwrap();
        let back = point_to_puwg1992(b.x, b.y, zone).unwrap();

        assert!((back.x - a.x).abs() < 1e-3, "dx={}", (back.x - a.x).abs());
        assert!((back.y - a.y).abs() < 1e-3, "dy={}", (back.y - a.y).abs());
    }

    #[test]
    fn test_forward_zone7_warsaw() {
        let a = geographic_to_puwg1992(Geographic::from_degrees(21.0122, 52.2297));
        let b = point_to_puwg2000(a.x, a.y, PuwgZone::Zone7).unwrap();

        // Leading digit of the easting encodes the zone number
        assert!(b.x > 7_500_000.0 && b.x < 7_502_000.0, "x={}", b.x);
        assert!((b.y - 5_788_450.0).abs() < 300.0, "y={}", b.y);
    }

    #[test]
    fn test_out_of_domain_fails() {
        assert!(puwg1992_to_geographic(0.0, 0.0).is_err());
    }

    #[test]
    fn test_parcel_uses_single_zone() {
        // A parcel straddling the 19.5°E band boundary: anchor decides
        let west = geographic_to_puwg1992(Geographic::from_degrees(19.499, 52.0));
        let east = geographic_to_puwg1992(Geographic::from_degrees(19.501, 52.0));
        let parcel = CanonicalParcel {
            key: ParcelKey::new("boundary"),
            rings: vec![Ring::open(vec![west, east])],
            anchor: east,
        };

        let (projected, zone) = reproject_parcel(&parcel).unwrap();
        assert_eq!(zone, PuwgZone::Zone7);

        // Every vertex lands in zone 7's coordinate range
        for p in &projected.rings[0].points {
            assert!(
                p.x > 7_000_000.0 && p.x < 8_000_000.0,
                "vertex left the anchor's zone: x={}",
                p.x
            );
        }
        assert!(projected.anchor.x > 7_000_000.0 && projected.anchor.x < 8_000_000.0);
    }
}
