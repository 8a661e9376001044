//! End-to-end pipeline tests against an in-memory registry

use std::collections::HashMap;
use std::future::{ready, Ready};

use geo::{Geometry, LineString, Polygon};
use uldk::reproject::{geographic_to_puwg1992, Geographic};
use uldk::{
    parse_identifiers, process_batch, CancelToken, DrawMode, FailureReason, ParcelKey,
    ProcessOptions, PuwgZone, RawShape, RegistryClient, UldkError,
};

struct FakeRegistry {
    shapes: HashMap<String, RawShape>,
}

impl FakeRegistry {
    fn new(entries: Vec<(&str, RawShape)>) -> Self {
        Self {
            shapes: entries
                .into_iter()
                .map(|(k, g)| (k.to_string(), g))
                .collect(),
        }
    }
}

impl RegistryClient for FakeRegistry {
    fn fetch(&self, key: &ParcelKey) -> Ready<Result<RawShape, UldkError>> {
        ready(match self.shapes.get(key.as_str()) {
            Some(shape) => Ok(shape.clone()),
            None => Err(UldkError::fetch(key.as_str(), "not found")),
        })
    }
}

/// Closed square centered on the given geographic position, in PUWG 1992
fn square_at(lon_deg: f64, lat_deg: f64, half_size: f64) -> RawShape {
    let c = geographic_to_puwg1992(Geographic::from_degrees(lon_deg, lat_deg));
    Geometry::Polygon(Polygon::new(
        LineString::from(vec![
            (c.x - half_size, c.y - half_size),
            (c.x + half_size, c.y - half_size),
            (c.x + half_size, c.y + half_size),
            (c.x - half_size, c.y + half_size),
            (c.x - half_size, c.y - half_size),
        ]),
        vec![],
    ))
}

#[tokio::test]
async fn test_full_batch_with_conversion() {
    let registry = FakeRegistry::new(vec![
        ("140101_1.0001.1", square_at(21.0, 52.2, 50.0)),
        ("320101_1.0001.2", square_at(15.3, 53.4, 50.0)),
    ]);
    let keys = parse_identifiers("140101_1.0001.1\n320101_1.0001.2\nmissing").unwrap();
    let options = ProcessOptions {
        convert_to_puwg2000: true,
        ..Default::default()
    };

    let mut events = 0usize;
    let result = process_batch(keys, &registry, &options, &CancelToken::new(), |p| {
        events += 1;
        assert!(p.fraction() > 0.0 && p.fraction() <= 1.0);
    })
    .await;

    assert_eq!(result.total, 3);
    assert_eq!(result.succeeded.len(), 2);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(events, 3);
    assert!(result.is_consistent());

    // Zones resolved per parcel from the anchor's longitude
    assert_eq!(result.succeeded[0].zone, Some(PuwgZone::Zone7));
    assert_eq!(result.succeeded[1].zone, Some(PuwgZone::Zone5));

    // Eastings carry the zone number as leading digit
    assert!(result.succeeded[0].parcel.anchor.x > 7_000_000.0);
    assert!(result.succeeded[1].parcel.anchor.x < 6_000_000.0);

    assert!(matches!(
        result.failure_of(&ParcelKey::new("missing")),
        Some(FailureReason::Fetch(_))
    ));
}

#[tokio::test]
async fn test_zone_boundary_parcel_lands_in_one_zone() {
    // Straddles the 19.5°E band boundary; the anchor decides the zone
    let registry = FakeRegistry::new(vec![("edge", square_at(19.5, 52.0, 500.0))]);
    let keys = parse_identifiers("edge").unwrap();
    let options = ProcessOptions {
        convert_to_puwg2000: true,
        ..Default::default()
    };

    let result = process_batch(keys, &registry, &options, &CancelToken::new(), |_| {}).await;

    let parcel = &result.succeeded[0];
    assert_eq!(parcel.zone, Some(PuwgZone::Zone7));
    for ring in &parcel.parcel.rings {
        for p in &ring.points {
            assert!(
                p.x > 7_000_000.0 && p.x < 8_000_000.0,
                "vertex escaped the parcel's zone: {}",
                p.x
            );
        }
    }
}

#[tokio::test]
async fn test_lines_mode_without_conversion() {
    let registry = FakeRegistry::new(vec![("a", square_at(18.0, 51.0, 10.0))]);
    let keys = parse_identifiers("a").unwrap();
    let options = ProcessOptions {
        draw_mode: DrawMode::Lines,
        ..Default::default()
    };

    let result = process_batch(keys, &registry, &options, &CancelToken::new(), |_| {}).await;

    let parcel = &result.succeeded[0];
    assert!(parcel.zone.is_none());
    assert_eq!(parcel.parcel.rings.len(), 1);
    assert!(parcel.parcel.rings[0].is_closed());

    // Anchor stays inside the square
    let xs: Vec<f64> = parcel.parcel.rings[0].points.iter().map(|p| p.x).collect();
    let min = xs.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(parcel.parcel.anchor.x >= min && parcel.parcel.anchor.x <= max);
}
