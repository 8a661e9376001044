//! Geometry normalization
//!
//! Registry shapes arrive as arbitrary `geo` geometries: single polygons,
//! polygons with holes, disjoint multi-part parcels, sometimes degenerate
//! slivers. Normalization reduces a shape to a canonical set of drawable
//! rings plus one label anchor per parcel.

use geo::{Coord, Geometry, LineString};
use tracing::warn;

use crate::types::{CanonicalParcel, DrawMode, ParcelKey, RawShape, Ring, RingKind};
use crate::UldkError;

/// Turns a registry shape into a canonical parcel.
///
/// All rings of multi-ring shapes are kept; the outer boundary is not
/// treated specially since both draw modes render every ring. Degenerate
/// rings (fewer than 3 distinct points in polygon mode, fewer than 2 in
/// lines mode) are dropped.
///
/// # Errors
///
/// Returns [`UldkError::EmptyGeometry`] when every ring was dropped.
pub fn normalize(
    key: &ParcelKey,
    shape: &RawShape,
    mode: DrawMode,
) -> Result<CanonicalParcel, UldkError> {
    let mut rings = Vec::new();
    collect_rings(shape, mode, &mut rings);

    if rings.is_empty() {
        warn!(key = %key, "shape reduced to nothing drawable");
        return Err(UldkError::EmptyGeometry {
            key: key.to_string(),
        });
    }

    let anchor = anchor_of(&rings);

    Ok(CanonicalParcel {
        key: key.clone(),
        rings,
        anchor,
    })
}

fn collect_rings(geom: &Geometry, mode: DrawMode, out: &mut Vec<Ring>) {
    match geom {
        Geometry::Polygon(poly) => {
            push_ring(poly.exterior(), mode, out);
            for interior in poly.interiors() {
                push_ring(interior, mode, out);
            }
        }
        Geometry::MultiPolygon(mp) => {
            for poly in mp {
                collect_rings(&Geometry::Polygon(poly.clone()), mode, out);
            }
        }
        Geometry::LineString(ls) => push_ring(ls, mode, out),
        Geometry::MultiLineString(mls) => {
            for ls in mls {
                push_ring(ls, mode, out);
            }
        }
        Geometry::GeometryCollection(gc) => {
            for g in gc {
                collect_rings(g, mode, out);
            }
        }
        Geometry::Line(line) => {
            push_ring(&LineString::new(vec![line.start, line.end]), mode, out)
        }
        Geometry::Rect(rect) => {
            collect_rings(&Geometry::Polygon(rect.to_polygon()), mode, out)
        }
        Geometry::Triangle(tri) => {
            collect_rings(&Geometry::Polygon(tri.to_polygon()), mode, out)
        }
        // Points carry no drawable boundary
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
    }
}

/// Filters a raw ring and appends it in canonical form
fn push_ring(ls: &LineString, mode: DrawMode, out: &mut Vec<Ring>) {
    let mut points = dedup_consecutive(ls.coords());
    let closes = points.len() > 1 && coords_equal(points[0], points[points.len() - 1]);
    let distinct = if closes {
        points.len() - 1
    } else {
        points.len()
    };

    match mode {
        DrawMode::Polygon => {
            if distinct < 3 {
                warn!(points = distinct, "dropping degenerate ring");
                return;
            }
            // The polygon primitive requires closure
            if !closes {
                let first = points[0];
                points.push(first);
            }
            out.push(Ring::closed(points));
        }
        DrawMode::Lines => {
            if distinct < 2 {
                warn!(points = distinct, "dropping degenerate ring");
                return;
            }
            let kind = if closes {
                RingKind::Closed
            } else {
                RingKind::Open
            };
            out.push(Ring { kind, points });
        }
    }
}

/// Label anchor: arithmetic mean of the largest ring's distinct vertices.
///
/// A cheap deterministic proxy for "inside the shape"; the anchor only
/// places a text label.
fn anchor_of(rings: &[Ring]) -> Coord {
    let largest = rings
        .iter()
        .max_by_key(|r| r.distinct_vertices().len())
        .expect("rings is non-empty");

    let vertices = largest.distinct_vertices();
    let n = vertices.len() as f64;
    let sum = vertices
        .iter()
        .fold(Coord { x: 0.0, y: 0.0 }, |acc, p| Coord {
            x: acc.x + p.x,
            y: acc.y + p.y,
        });

    Coord {
        x: sum.x / n,
        y: sum.y / n,
    }
}

/// Drops consecutive duplicate points
fn dedup_consecutive<'a>(coords: impl Iterator<Item = &'a Coord>) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::new();
    for &c in coords {
        if out.last().map_or(true, |&last| !coords_equal(last, c)) {
            out.push(c);
        }
    }
    out
}

/// Compares two coordinates with tolerance
fn coords_equal(a: Coord, b: Coord) -> bool {
    const TOLERANCE: f64 = 1e-6;
    (a.x - b.x).abs() < TOLERANCE && (a.y - b.y).abs() < TOLERANCE
}
