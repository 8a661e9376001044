//! Drawing emission
//!
//! Pure mapping from processed parcels to drawing-surface calls; no
//! geometric computation. Ring point order is preserved exactly, since
//! reversing orientation would flip polygon fill semantics in the
//! consuming renderer.

use geo::Coord;
use tracing::debug;
use uldk::ProcessedParcel;

use crate::config::DrawConfig;

pub const POLYGON_LAYER: &str = "plot_as_polygon";
pub const LINES_LAYER: &str = "plot_as_lines";
pub const LABEL_LAYER: &str = "identifier_layer";

/// Vector-drawing primitives the emitter writes against
pub trait DrawingSurface {
    /// Adds a closed polygon; the surface closes the ring itself, so
    /// `points` must not repeat the first vertex
    fn add_polygon(&mut self, points: &[Coord], layer: &str, color: u8);

    /// Adds an open polyline drawn vertex to vertex
    fn add_polyline(&mut self, points: &[Coord], layer: &str, color: u8);

    /// Adds a text label anchored at `position`
    fn add_text(&mut self, position: Coord, text: &str, height: f64, layer: &str, color: u8);
}

/// Draws every parcel, in batch order
pub fn emit_parcels<S: DrawingSurface>(
    parcels: &[ProcessedParcel],
    config: &DrawConfig,
    surface: &mut S,
) {
    for item in parcels {
        let parcel = &item.parcel;
        for ring in &parcel.rings {
            if config.draw_as_lines {
                surface.add_polyline(&ring.points, LINES_LAYER, config.line_color);
            } else {
                surface.add_polygon(ring.distinct_vertices(), POLYGON_LAYER, config.polygon_color);
            }
        }
        if config.add_labels {
            surface.add_text(
                parcel.anchor,
                parcel.key.short_label(),
                config.text_height(),
                LABEL_LAYER,
                config.label_color,
            );
        }
        debug!(key = %parcel.key, rings = parcel.rings.len(), "parcel drawn");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uldk::{CanonicalParcel, ParcelKey, Ring};

    #[derive(Debug, PartialEq)]
    enum Call {
        Polygon(Vec<Coord>, String, u8),
        Polyline(Vec<Coord>, String, u8),
        Text(String, String, u8),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl DrawingSurface for Recorder {
        fn add_polygon(&mut self, points: &[Coord], layer: &str, color: u8) {
            self.calls
                .push(Call::Polygon(points.to_vec(), layer.to_string(), color));
        }

        fn add_polyline(&mut self, points: &[Coord], layer: &str, color: u8) {
            self.calls
                .push(Call::Polyline(points.to_vec(), layer.to_string(), color));
        }

        fn add_text(&mut self, _position: Coord, text: &str, _height: f64, layer: &str, color: u8) {
            self.calls
                .push(Call::Text(text.to_string(), layer.to_string(), color));
        }
    }

    fn parcel(key: &str) -> ProcessedParcel {
        let points = vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 0.0, y: 0.0 },
        ];
        ProcessedParcel {
            parcel: CanonicalParcel {
                key: ParcelKey::new(key),
                rings: vec![Ring::closed(points)],
                anchor: Coord { x: 0.5, y: 0.5 },
            },
            zone: None,
        }
    }

    #[test]
    fn test_polygon_mode_drops_closing_duplicate() {
        let mut recorder = Recorder::default();
        emit_parcels(&[parcel("1.2.3")], &DrawConfig::default(), &mut recorder);

        assert_eq!(recorder.calls.len(), 1);
        match &recorder.calls[0] {
            Call::Polygon(points, layer, color) => {
                assert_eq!(points.len(), 3);
                assert_eq!(layer, POLYGON_LAYER);
                assert_eq!(*color, 2);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_lines_mode_keeps_closing_segment() {
        let config = DrawConfig {
            draw_as_lines: true,
            ..Default::default()
        };
        let mut recorder = Recorder::default();
        emit_parcels(&[parcel("1.2.3")], &config, &mut recorder);

        match &recorder.calls[0] {
            Call::Polyline(points, layer, _) => {
                assert_eq!(points.len(), 4);
                assert_eq!(points.first(), points.last());
                assert_eq!(layer, LINES_LAYER);
            }
            other => panic!("expected polyline, got {other:?}"),
        }
    }

    #[test]
    fn test_labels_use_short_identifier() {
        let config = DrawConfig {
            add_labels: true,
            ..Default::default()
        };
        let mut recorder = Recorder::default();
        emit_parcels(&[parcel("141201_1.0001.123/4")], &config, &mut recorder);

        assert_eq!(recorder.calls.len(), 2);
        assert_eq!(
            recorder.calls[1],
            Call::Text("123/4".to_string(), LABEL_LAYER.to_string(), 3)
        );
    }

    #[test]
    fn test_batch_order_preserved() {
        let mut recorder = Recorder::default();
        let config = DrawConfig {
            add_labels: true,
            ..Default::default()
        };
        emit_parcels(&[parcel("a"), parcel("b")], &config, &mut recorder);

        let texts: Vec<&Call> = recorder
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Text(..)))
            .collect();
        assert_eq!(
            texts,
            vec![
                &Call::Text("a".to_string(), LABEL_LAYER.to_string(), 3),
                &Call::Text("b".to_string(), LABEL_LAYER.to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_point_order_never_reversed() {
        let mut recorder = Recorder::default();
        emit_parcels(&[parcel("1")], &DrawConfig::default(), &mut recorder);

        match &recorder.calls[0] {
            Call::Polygon(points, _, _) => {
                assert_eq!(points[0], Coord { x: 0.0, y: 0.0 });
                assert_eq!(points[1], Coord { x: 1.0, y: 0.0 });
                assert_eq!(points[2], Coord { x: 1.0, y: 1.0 });
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }
}
