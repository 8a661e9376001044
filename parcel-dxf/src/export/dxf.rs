//! Minimal DXF writer (R12 ASCII, streaming)
//!
//! Only the entities the emitter needs: POLYLINE/VERTEX/SEQEND ring work
//! and TEXT labels, plus a LAYER table. R12 is the oldest dialect every
//! CAD tool still reads; the format is group-code/value pairs, one per
//! line.
//!
//! An existing drawing at the output path is appended to, not replaced:
//! [`DxfDocument::open_or_new`] reads its layer table and carries every
//! entity through verbatim, so foreign entity types survive a round trip
//! untouched.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::Coord;

use crate::emit::DrawingSurface;

#[derive(Debug)]
enum Entity {
    Polyline {
        points: Vec<Coord>,
        closed: bool,
        layer: String,
        color: u8,
    },
    Text {
        position: Coord,
        text: String,
        height: f64,
        layer: String,
        color: u8,
    },
}

/// In-memory DXF drawing, written in one pass by [`DxfDocument::save`]
#[derive(Debug, Default)]
pub struct DxfDocument {
    layers: Vec<(String, u8)>,
    entities: Vec<Entity>,
    /// Raw group-code/value pairs of a loaded drawing's entities,
    /// written back unchanged ahead of anything added here
    existing: Vec<(String, String)>,
}

impl DxfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the drawing at `path` for appending, or starts a fresh one
    /// when no file exists there yet.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but is not readable as a DXF drawing,
    /// rather than overwrite it.
    pub fn open_or_new(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content)
                .context(format!("Failed to open drawing: {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => {
                Err(e).context(format!("Failed to read file: {}", path.display()))
            }
        }
    }

    fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        let lines: Vec<&str> = content.lines().map(str::trim).collect();
        let pairs: Vec<(&str, &str)> = lines
            .chunks(2)
            .filter(|c| c.len() == 2)
            .map(|c| (c[0], c[1]))
            .collect();

        if !pairs.contains(&("0", "SECTION")) {
            bail!("not a DXF drawing");
        }

        let mut doc = Self::new();
        let mut section = "";
        let mut i = 0;
        while i < pairs.len() {
            let (code, value) = pairs[i];
            match (code, value) {
                ("0", "SECTION") => {
                    if let Some(&("2", name)) = pairs.get(i + 1) {
                        section = name;
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                ("0", "ENDSEC") => {
                    section = "";
                    i += 1;
                }
                ("0", "EOF") => break,
                ("0", "LAYER") if section == "TABLES" => {
                    let mut name = None;
                    let mut color = 7u8;
                    i += 1;
                    while i < pairs.len() && pairs[i].0 != "0" {
                        match pairs[i] {
                            ("2", v) => name = Some(v.to_string()),
                            ("62", v) => color = v.parse().unwrap_or(7),
                            _ => {}
                        }
                        i += 1;
                    }
                    if let Some(name) = name {
                        if !doc.layers.iter().any(|(n, _)| n == &name) {
                            doc.layers.push((name, color));
                        }
                    }
                }
                _ if section == "ENTITIES" => {
                    doc.existing.push((code.to_string(), value.to_string()));
                    i += 1;
                }
                _ => i += 1,
            }
        }

        Ok(doc)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.existing.is_empty()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Registers a layer on first use; the first color wins
    fn ensure_layer(&mut self, name: &str, color: u8) {
        if !self.layers.iter().any(|(n, _)| n == name) {
            self.layers.push((name.to_string(), color));
        }
    }

    /// Writes the whole document to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .context(format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        writeln!(w, "0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1009\n0\nENDSEC")?;

        writeln!(
            w,
            "0\nSECTION\n2\nTABLES\n0\nTABLE\n2\nLAYER\n70\n{}",
            self.layers.len()
        )?;
        for (name, color) in &self.layers {
            writeln!(w, "0\nLAYER\n2\n{name}\n70\n0\n62\n{color}\n6\nCONTINUOUS")?;
        }
        writeln!(w, "0\nENDTAB\n0\nENDSEC")?;

        writeln!(w, "0\nSECTION\n2\nENTITIES")?;
        for (code, value) in &self.existing {
            writeln!(w, "{code}\n{value}")?;
        }
        for entity in &self.entities {
            write_entity(w, entity)?;
        }
        writeln!(w, "0\nENDSEC\n0\nEOF")?;

        Ok(())
    }
}

fn write_entity<W: Write>(w: &mut W, entity: &Entity) -> Result<()> {
    match entity {
        Entity::Polyline {
            points,
            closed,
            layer,
            color,
        } => {
            let flags = if *closed { 1 } else { 0 };
            writeln!(w, "0\nPOLYLINE\n8\n{layer}\n62\n{color}\n66\n1\n70\n{flags}")?;
            for p in points {
                writeln!(
                    w,
                    "0\nVERTEX\n8\n{layer}\n10\n{}\n20\n{}",
                    fmt_coord(p.x),
                    fmt_coord(p.y)
                )?;
            }
            writeln!(w, "0\nSEQEND")?;
        }
        Entity::Text {
            position,
            text,
            height,
            layer,
            color,
        } => {
            writeln!(
                w,
                "0\nTEXT\n8\n{layer}\n62\n{color}\n10\n{}\n20\n{}\n40\n{}\n1\n{text}",
                fmt_coord(position.x),
                fmt_coord(position.y),
                fmt_coord(*height)
            )?;
        }
    }
    Ok(())
}

/// Plain fixed-point decimal; DXF readers choke on scientific notation
fn fmt_coord(v: f64) -> String {
    format!("{v:.3}")
}

impl DrawingSurface for DxfDocument {
    fn add_polygon(&mut self, points: &[Coord], layer: &str, color: u8) {
        self.ensure_layer(layer, color);
        self.entities.push(Entity::Polyline {
            points: points.to_vec(),
            closed: true,
            layer: layer.to_string(),
            color,
        });
    }

    fn add_polyline(&mut self, points: &[Coord], layer: &str, color: u8) {
        self.ensure_layer(layer, color);
        self.entities.push(Entity::Polyline {
            points: points.to_vec(),
            closed: false,
            layer: layer.to_string(),
            color,
        });
    }

    fn add_text(&mut self, position: Coord, text: &str, height: f64, layer: &str, color: u8) {
        self.ensure_layer(layer, color);
        self.entities.push(Entity::Text {
            position,
            text: text.to_string(),
            height,
            layer: layer.to_string(),
            color,
        });
    }
}
