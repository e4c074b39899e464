//! DXB reader

use std::io::{self, BufRead};

use byteorder::{LittleEndian, ReadBytesExt};

use super::{DxbItemType, DXB_SENTINEL};
use crate::document::CadDocument;
use crate::entities::{
    polyline_flags, Arc, Circle, Entity, EntityType, Face3D, Line, Point, Polyline, Solid, Vertex,
};
use crate::error::{DxfError, Result};
use crate::types::{Color, Vector3};

/// A polyline whose `SEQEND` has not been read yet.
struct PendingPolyline {
    polyline: Polyline,
    vertices: Vec<Vertex>,
    layer: String,
    color: Color,
}

/// Reads a DXB stream into a [`CadDocument`].
///
/// Reading starts in integer mode with a scale factor of 1, layer `0` and
/// color by-layer.
pub struct DxbReader<R: BufRead> {
    reader: R,
    offset: usize,
    integer_mode: bool,
    scale: f64,
    layer: String,
    color: Color,
    last_line_end: Vector3,
    /// Third and fourth corner of the previous trace
    last_trace: Option<(Vector3, Vector3)>,
    polyline: Option<PendingPolyline>,
}

impl<R: BufRead> DxbReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            integer_mode: true,
            scale: 1.0,
            layer: "0".to_string(),
            color: Color::BY_LAYER,
            last_line_end: Vector3::ZERO,
            last_trace: None,
            polyline: None,
        }
    }

    pub fn read(mut self) -> Result<CadDocument> {
        self.read_sentinel()?;
        let mut document = CadDocument::new();
        loop {
            let offset = self.offset;
            let code = match self.reader.read_u8() {
                Ok(code) => code,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    tracing::warn!(offset, "DXB stream ended without a terminator");
                    break;
                }
                Err(e) => return Err(e.into()),
            };
            self.offset += 1;
            if code == 0 {
                break;
            }
            let item = DxbItemType::from_code(code)
                .ok_or_else(|| DxfError::parse(offset, format!("unknown DXB item type {}", code)))?;
            tracing::trace!(offset, ?item, "DXB item");
            self.read_item(item, &mut document)?;
        }
        self.finish_polyline(&mut document);
        Ok(document)
    }

    fn read_sentinel(&mut self) -> Result<()> {
        let mut sentinel = [0u8; DXB_SENTINEL.len()];
        self.reader
            .read_exact(&mut sentinel)
            .map_err(|_| DxfError::InvalidSentinel("DXB sentinel is truncated".into()))?;
        if sentinel[..] != *DXB_SENTINEL {
            return Err(DxfError::InvalidSentinel(format!(
                "expected DXB sentinel, found {:?}",
                String::from_utf8_lossy(&sentinel)
            )));
        }
        self.offset = DXB_SENTINEL.len();
        Ok(())
    }

    fn read_item(&mut self, item: DxbItemType, document: &mut CadDocument) -> Result<()> {
        match item {
            DxbItemType::Line => {
                let start = self.read_point3()?;
                let end = self.read_point3()?;
                self.add_line(document, start, end);
            }
            DxbItemType::LineExtension => {
                let delta = self.read_point2()?;
                let start = self.last_line_end;
                self.add_line(document, start, start + delta);
            }
            DxbItemType::LineExtension3D => {
                let delta = self.read_point3()?;
                let start = self.last_line_end;
                self.add_line(document, start, start + delta);
            }
            DxbItemType::Point => {
                let location = self.read_point2()?;
                self.add_entity(document, Point::at(location));
            }
            DxbItemType::Circle => {
                let center = self.read_point2()?;
                let radius = self.read_n()?;
                self.add_entity(document, Circle::from_center_radius(center, radius));
            }
            DxbItemType::Arc => {
                let center = self.read_point2()?;
                let radius = self.read_n()?;
                let start = self.read_a()?;
                let end = self.read_a()?;
                self.add_entity(document, Arc::from_center_radius_angles(center, radius, start, end));
            }
            DxbItemType::Trace => {
                let corners = [
                    self.read_point2()?,
                    self.read_point2()?,
                    self.read_point2()?,
                    self.read_point2()?,
                ];
                self.add_trace(document, corners);
            }
            DxbItemType::TraceExtension => {
                let third = self.read_point2()?;
                let fourth = self.read_point2()?;
                let (first, second) = self.last_trace.unwrap_or_else(|| {
                    tracing::warn!(offset = self.offset, "trace extension without a trace");
                    (Vector3::ZERO, Vector3::ZERO)
                });
                self.add_trace(document, [first, second, third, fourth]);
            }
            DxbItemType::Solid => {
                let solid = Solid::from_corners(
                    self.read_point2()?,
                    self.read_point2()?,
                    self.read_point2()?,
                    self.read_point2()?,
                );
                self.add_entity(document, solid);
            }
            DxbItemType::Face => {
                let face = Face3D::from_corners(
                    self.read_point3()?,
                    self.read_point3()?,
                    self.read_point3()?,
                    self.read_point3()?,
                );
                self.add_entity(document, face);
            }
            DxbItemType::Polyline => {
                let closed = self.read_w()? != 0;
                self.finish_polyline(document);
                let mut polyline = Polyline::new();
                if closed {
                    polyline.flags |= polyline_flags::CLOSED;
                }
                self.polyline = Some(PendingPolyline {
                    polyline,
                    vertices: Vec::new(),
                    layer: self.layer.clone(),
                    color: self.color,
                });
            }
            DxbItemType::Vertex => {
                let location = self.read_point2()?;
                match self.polyline.as_mut() {
                    Some(pending) => pending.vertices.push(Vertex::at(location)),
                    None => tracing::warn!(offset = self.offset, "vertex outside a polyline"),
                }
            }
            DxbItemType::Seqend => {
                if self.polyline.is_none() {
                    tracing::warn!(offset = self.offset, "SEQEND without a polyline");
                }
                self.finish_polyline(document);
            }
            DxbItemType::Bulge => {
                let bulge = self.read_f()?;
                match self.polyline.as_mut().and_then(|p| p.vertices.last_mut()) {
                    Some(vertex) => vertex.bulge = bulge,
                    None => tracing::warn!(offset = self.offset, "bulge without a vertex"),
                }
            }
            DxbItemType::Width => {
                let start = self.read_n()?;
                let end = self.read_n()?;
                match self.polyline.as_mut() {
                    Some(pending) => match pending.vertices.last_mut() {
                        Some(vertex) => {
                            vertex.start_width = start;
                            vertex.end_width = end;
                        }
                        None => {
                            pending.polyline.default_start_width = start;
                            pending.polyline.default_end_width = end;
                        }
                    },
                    None => tracing::warn!(offset = self.offset, "width outside a polyline"),
                }
            }
            DxbItemType::ScaleFactor => self.scale = self.read_f()?,
            DxbItemType::NumberMode => {
                self.integer_mode = self.read_w()? == 0;
                tracing::debug!(integer_mode = self.integer_mode, "DXB number mode");
            }
            DxbItemType::NewLayer => self.layer = self.read_name()?,
            DxbItemType::NewColor => self.color = Color::from_raw_value(self.read_w()?),
            DxbItemType::BlockBase => document.header.insertion_base = self.read_point2()?,
        }
        Ok(())
    }

    fn styled(&self, entity: impl Into<Entity>) -> Entity {
        let mut entity = entity.into();
        entity.common.layer = self.layer.clone();
        entity.common.color = self.color;
        entity
    }

    fn add_entity(&mut self, document: &mut CadDocument, entity: impl Into<Entity>) {
        self.finish_polyline(document);
        let entity = self.styled(entity);
        document.add_entity(entity);
    }

    fn add_line(&mut self, document: &mut CadDocument, start: Vector3, end: Vector3) {
        self.last_line_end = end;
        self.add_entity(document, Line::from_points(start, end));
    }

    fn add_trace(&mut self, document: &mut CadDocument, corners: [Vector3; 4]) {
        let [first, second, third, fourth] = corners;
        self.last_trace = Some((third, fourth));
        let trace = Solid::from_corners(first, second, third, fourth);
        self.add_entity(document, EntityType::Trace(trace));
    }

    fn finish_polyline(&mut self, document: &mut CadDocument) {
        let Some(pending) = self.polyline.take() else {
            return;
        };
        let style = |entity: &mut Entity| {
            entity.common.layer = pending.layer.clone();
            entity.common.color = pending.color;
        };
        let vertices: Vec<Entity> = pending
            .vertices
            .into_iter()
            .map(|vertex| {
                let mut entity = Entity::from(vertex);
                style(&mut entity);
                entity
            })
            .collect();
        let id = document.add_polyline(pending.polyline, vertices);
        let seqend = match document.entity_mut(id) {
            Some(entity) => {
                style(entity);
                match &entity.specific {
                    EntityType::Polyline(polyline) => polyline.seqend,
                    _ => None,
                }
            }
            None => None,
        };
        if let Some(seqend) = seqend.and_then(|id| document.entity_mut(id)) {
            style(seqend);
        }
    }

    fn read_value<T>(&mut self, size: usize, read: impl FnOnce(&mut R) -> io::Result<T>) -> Result<T> {
        match read(&mut self.reader) {
            Ok(value) => {
                self.offset += size;
                Ok(value)
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(DxfError::UnexpectedEof { offset: self.offset })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read_w(&mut self) -> Result<i16> {
        self.read_value(2, |r| r.read_i16::<LittleEndian>())
    }

    fn read_f(&mut self) -> Result<f64> {
        self.read_value(8, |r| r.read_f64::<LittleEndian>())
    }

    fn read_n(&mut self) -> Result<f64> {
        if self.integer_mode {
            Ok(f64::from(self.read_w()?) * self.scale)
        } else {
            self.read_f()
        }
    }

    fn read_a(&mut self) -> Result<f64> {
        if self.integer_mode {
            let millionths = self.read_value(4, |r| r.read_i32::<LittleEndian>())?;
            Ok(f64::from(millionths) / 1_000_000.0)
        } else {
            self.read_f()
        }
    }

    fn read_point2(&mut self) -> Result<Vector3> {
        let x = self.read_n()?;
        let y = self.read_n()?;
        Ok(Vector3::new(x, y, 0.0))
    }

    fn read_point3(&mut self) -> Result<Vector3> {
        let x = self.read_n()?;
        let y = self.read_n()?;
        let z = self.read_n()?;
        Ok(Vector3::new(x, y, z))
    }

    fn read_name(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        let read = self.reader.read_until(0, &mut bytes)?;
        self.offset += read;
        if bytes.pop() != Some(0) {
            return Err(DxfError::UnexpectedEof { offset: self.offset });
        }
        Ok(encoding_rs::WINDOWS_1252
            .decode_without_bom_handling(&bytes)
            .0
            .into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct Dxb(Vec<u8>);

    impl Dxb {
        fn new() -> Self {
            Dxb(DXB_SENTINEL.to_vec())
        }

        fn item(mut self, item: DxbItemType) -> Self {
            self.0.push(item.code());
            self
        }

        fn w(mut self, value: i16) -> Self {
            self.0.extend_from_slice(&value.to_le_bytes());
            self
        }

        fn f(mut self, value: f64) -> Self {
            self.0.extend_from_slice(&value.to_le_bytes());
            self
        }

        fn name(mut self, value: &str) -> Self {
            self.0.extend_from_slice(value.as_bytes());
            self.0.push(0);
            self
        }

        fn read(mut self) -> CadDocument {
            self.0.push(0);
            DxbReader::new(Cursor::new(self.0)).read().unwrap()
        }
    }

    #[test]
    fn test_integer_mode_uses_scale_factor() {
        let document = Dxb::new()
            .item(DxbItemType::ScaleFactor)
            .f(0.5)
            .item(DxbItemType::Line)
            .w(2)
            .w(4)
            .w(0)
            .w(6)
            .w(8)
            .w(10)
            .read();
        let entity = document.entities().next().unwrap();
        let EntityType::Line(line) = &entity.specific else {
            panic!("expected a line");
        };
        assert_eq!(line.start, Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(line.end, Vector3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_layer_and_color_state() {
        let document = Dxb::new()
            .item(DxbItemType::NumberMode)
            .w(1)
            .item(DxbItemType::NewLayer)
            .name("WALLS")
            .item(DxbItemType::NewColor)
            .w(3)
            .item(DxbItemType::Point)
            .f(1.5)
            .f(2.5)
            .item(DxbItemType::Circle)
            .f(0.0)
            .f(0.0)
            .f(4.0)
            .read();
        let entities: Vec<_> = document.entities().collect();
        assert_eq!(entities.len(), 2);
        for entity in &entities {
            assert_eq!(entity.layer(), "WALLS");
            assert_eq!(entity.common.color, Color::GREEN);
        }
        let EntityType::Circle(circle) = &entities[1].specific else {
            panic!("expected a circle");
        };
        assert_eq!(circle.radius, 4.0);
    }

    #[test]
    fn test_line_extension_continues_previous_line() {
        let document = Dxb::new()
            .item(DxbItemType::Line)
            .w(0)
            .w(0)
            .w(0)
            .w(1)
            .w(1)
            .w(0)
            .item(DxbItemType::LineExtension)
            .w(2)
            .w(0)
            .read();
        let lines: Vec<_> = document
            .entities()
            .filter_map(|e| match &e.specific {
                EntityType::Line(line) => Some(line.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].start, Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(lines[1].end, Vector3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_integer_mode_arc_angles() {
        let mut dxb = Dxb::new().item(DxbItemType::Arc).w(0).w(0).w(5);
        dxb.0.extend_from_slice(&90_000_000i32.to_le_bytes());
        dxb.0.extend_from_slice(&180_000_000i32.to_le_bytes());
        let document = dxb.read();
        let EntityType::Arc(arc) = &document.entities().next().unwrap().specific else {
            panic!("expected an arc");
        };
        assert_eq!(arc.start_angle, 90.0);
        assert_eq!(arc.end_angle, 180.0);
    }

    #[test]
    fn test_polyline_with_bulge_and_width() {
        let document = Dxb::new()
            .item(DxbItemType::NumberMode)
            .w(1)
            .item(DxbItemType::Polyline)
            .w(1)
            .item(DxbItemType::Vertex)
            .f(0.0)
            .f(0.0)
            .item(DxbItemType::Bulge)
            .f(1.0)
            .item(DxbItemType::Vertex)
            .f(2.0)
            .f(0.0)
            .item(DxbItemType::Width)
            .f(0.5)
            .f(0.25)
            .item(DxbItemType::Seqend)
            .read();

        assert_eq!(document.entity_ids().len(), 1);
        let polyline_entity = document.entities().next().unwrap();
        let EntityType::Polyline(polyline) = &polyline_entity.specific else {
            panic!("expected a polyline");
        };
        assert!(polyline.is_closed());
        assert_eq!(polyline.vertices.len(), 2);
        assert!(polyline.seqend.is_some());

        let vertices: Vec<&Vertex> = polyline
            .vertices
            .iter()
            .filter_map(|&id| match &document.entity(id)?.specific {
                EntityType::Vertex(v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(vertices[0].bulge, 1.0);
        assert_eq!(vertices[1].location, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(vertices[1].start_width, 0.5);
        assert_eq!(vertices[1].end_width, 0.25);
    }

    #[test]
    fn test_trace_extension_shares_corners() {
        let document = Dxb::new()
            .item(DxbItemType::NumberMode)
            .w(1)
            .item(DxbItemType::Trace)
            .f(0.0)
            .f(0.0)
            .f(0.0)
            .f(1.0)
            .f(2.0)
            .f(0.0)
            .f(2.0)
            .f(1.0)
            .item(DxbItemType::TraceExtension)
            .f(4.0)
            .f(0.0)
            .f(4.0)
            .f(1.0)
            .read();
        let traces: Vec<_> = document
            .entities()
            .filter_map(|e| match &e.specific {
                EntityType::Trace(t) => Some(t.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[1].first_corner, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(traces[1].second_corner, Vector3::new(2.0, 1.0, 0.0));
        assert_eq!(traces[1].fourth_corner, Vector3::new(4.0, 1.0, 0.0));
    }

    #[test]
    fn test_invalid_sentinel() {
        let result = DxbReader::new(Cursor::new(b"AutoCAD DXB 2.0\r\n\x1a\x00\x00".to_vec())).read();
        assert!(matches!(result, Err(DxfError::InvalidSentinel(_))));
    }

    #[test]
    fn test_unknown_item_type() {
        let mut data = DXB_SENTINEL.to_vec();
        data.push(42);
        let result = DxbReader::new(Cursor::new(data)).read();
        assert!(matches!(result, Err(DxfError::Parse { offset, .. }) if offset == DXB_SENTINEL.len()));
    }

    #[test]
    fn test_truncated_item() {
        let mut data = DXB_SENTINEL.to_vec();
        data.extend_from_slice(&[DxbItemType::Point.code(), 1]);
        let result = DxbReader::new(Cursor::new(data)).read();
        assert!(matches!(result, Err(DxfError::UnexpectedEof { .. })));
    }
}
