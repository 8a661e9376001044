//! Data types for the uldk crate

use std::fmt;

use geo::{Coord, Geometry};

use crate::reproject::PuwgZone;
use crate::UldkError;

/// Shape returned by the registry for one parcel, in PUWG 1992 coordinates
pub type RawShape = Geometry<f64>;

/// Validated cadastral parcel identifier
///
/// Opaque to the pipeline: syntactic validation beyond non-emptiness is
/// delegated to the registry, which rejects unknown identifiers per key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParcelKey(String);

impl ParcelKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form used for map labels: the last dot-separated segment
    /// (full identifiers look like `141201_1.0001.123/4`)
    pub fn short_label(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ParcelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How parcels are drawn in the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// One closed polygon per ring
    Polygon,
    /// One polyline per ring, segments drawn as-is
    Lines,
}

/// Whether a ring closes back on its first point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    Closed,
    Open,
}

/// One contiguous boundary part of a parcel
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub kind: RingKind,
    /// Ordered vertices; closed rings repeat the first point at the end
    pub points: Vec<Coord>,
}

impl Ring {
    pub fn closed(points: Vec<Coord>) -> Self {
        Self {
            kind: RingKind::Closed,
            points,
        }
    }

    pub fn open(points: Vec<Coord>) -> Self {
        Self {
            kind: RingKind::Open,
            points,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.kind == RingKind::Closed
    }

    /// Vertices without the closing duplicate of a closed ring
    pub fn distinct_vertices(&self) -> &[Coord] {
        if self.is_closed() && self.points.len() > 1 {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        }
    }
}

/// A parcel reduced to drawable rings plus a label anchor
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalParcel {
    pub key: ParcelKey,
    pub rings: Vec<Ring>,
    /// Label position: mean of the largest ring's distinct vertices
    pub anchor: Coord,
}

/// A decided parcel ready for emission
///
/// `zone` is `Some` exactly when the coordinates were rewritten into
/// PUWG 2000; all rings and the anchor share that single zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedParcel {
    pub parcel: CanonicalParcel,
    pub zone: Option<PuwgZone>,
}

/// Why one key failed while the batch continued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Fetch(String),
    EmptyGeometry,
    Projection(String),
}

impl FailureReason {
    /// Stable machine-readable code for reports
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::EmptyGeometry => "empty_geometry",
            Self::Projection(_) => "projection",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(reason) => write!(f, "fetch failed: {reason}"),
            Self::EmptyGeometry => f.write_str("no drawable geometry"),
            Self::Projection(reason) => write!(f, "projection failed: {reason}"),
        }
    }
}

impl From<UldkError> for FailureReason {
    fn from(err: UldkError) -> Self {
        match err {
            UldkError::Fetch { reason, .. } => Self::Fetch(reason),
            UldkError::EmptyGeometry { .. } => Self::EmptyGeometry,
            UldkError::Projection { reason, .. } => Self::Projection(reason),
            // EmptyInput aborts before any key is processed
            UldkError::EmptyInput => Self::Fetch(err.to_string()),
        }
    }
}

/// One failed key with its reason, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedKey {
    pub key: ParcelKey,
    pub reason: FailureReason,
}

/// Processing status of one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParcelState {
    Pending,
    Fetching,
    Normalizing,
    Reprojecting,
    Done,
    Failed(FailureReason),
}

impl ParcelState {
    pub fn is_decided(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

/// Outcome of one batch run
///
/// Keys are unique within a batch, so both buckets are mappings even though
/// they preserve input order for reporting. Invariant:
/// `succeeded.len() + failed.len() == total`.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub succeeded: Vec<ProcessedParcel>,
    pub failed: Vec<FailedKey>,
    pub total: usize,
}

impl BatchResult {
    pub fn decided(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_consistent(&self) -> bool {
        self.decided() == self.total
    }

    pub fn failure_of(&self, key: &ParcelKey) -> Option<&FailureReason> {
        self.failed.iter().find(|f| &f.key == key).map(|f| &f.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label() {
        let key = ParcelKey::new("141201_1.0001.123/4");
        assert_eq!(key.short_label(), "123/4");

        let bare = ParcelKey::new("123");
        assert_eq!(bare.short_label(), "123");
    }

    #[test]
    fn test_distinct_vertices_closed() {
        let ring = Ring::closed(vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 0.0, y: 0.0 },
        ]);
        assert_eq!(ring.distinct_vertices().len(), 3);
    }

    #[test]
    fn test_distinct_vertices_open() {
        let ring = Ring::open(vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }]);
        assert_eq!(ring.distinct_vertices().len(), 2);
    }

    #[test]
    fn test_failure_reason_code() {
        assert_eq!(FailureReason::Fetch("x".into()).code(), "fetch");
        assert_eq!(FailureReason::EmptyGeometry.code(), "empty_geometry");
        assert_eq!(FailureReason::Projection("x".into()).code(), "projection");
    }
}
