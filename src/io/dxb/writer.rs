//! DXB writer

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use super::{DxbItemType, DXB_SENTINEL};
use crate::document::CadDocument;
use crate::entities::{Entity, EntityType, Vertex};
use crate::error::Result;
use crate::item::ItemArena;
use crate::notification::NotificationType;
use crate::types::{Color, Vector3};

/// Writes the entities of a document as float-mode DXB.
///
/// Only geometry DXB can express is written: lines, points, circles, arcs,
/// traces, solids, 3D faces and polylines. Other entities are skipped with
/// a notification.
pub struct DxbWriter<W: Write> {
    writer: W,
    layer: String,
    color: Color,
}

impl<W: Write> DxbWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            layer: "0".to_string(),
            color: Color::BY_LAYER,
        }
    }

    pub fn write(mut self, document: &mut CadDocument) -> Result<()> {
        self.writer.write_all(DXB_SENTINEL)?;
        self.item(DxbItemType::NumberMode)?;
        self.w(1)?;

        let mut skipped = Vec::new();
        for entity in document.entities() {
            if !self.write_entity(entity, document.arena())? {
                skipped.push(entity.type_name().to_string());
            }
        }
        self.writer.write_u8(0)?;
        self.writer.flush()?;

        for type_name in skipped {
            document.notifications.notify(
                NotificationType::NotSupported,
                format!("{} has no DXB representation", type_name),
            );
        }
        Ok(())
    }

    /// Write one entity; `false` if DXB cannot express it.
    fn write_entity(&mut self, entity: &Entity, arena: &ItemArena) -> Result<bool> {
        let item = match &entity.specific {
            EntityType::Line(_) => DxbItemType::Line,
            EntityType::Point(_) => DxbItemType::Point,
            EntityType::Circle(_) => DxbItemType::Circle,
            EntityType::Arc(_) => DxbItemType::Arc,
            EntityType::Trace(_) => DxbItemType::Trace,
            EntityType::Solid(_) => DxbItemType::Solid,
            EntityType::Face3D(_) => DxbItemType::Face,
            EntityType::Polyline(_) => DxbItemType::Polyline,
            _ => return Ok(false),
        };
        self.write_style(entity)?;
        self.item(item)?;
        match &entity.specific {
            EntityType::Line(line) => {
                self.point3(&line.start)?;
                self.point3(&line.end)?;
            }
            EntityType::Point(point) => self.point2(&point.location)?,
            EntityType::Circle(circle) => {
                self.point2(&circle.center)?;
                self.f(circle.radius)?;
            }
            EntityType::Arc(arc) => {
                self.point2(&arc.center)?;
                self.f(arc.radius)?;
                self.f(arc.start_angle)?;
                self.f(arc.end_angle)?;
            }
            EntityType::Trace(solid) | EntityType::Solid(solid) => {
                for corner in [
                    &solid.first_corner,
                    &solid.second_corner,
                    &solid.third_corner,
                    &solid.fourth_corner,
                ] {
                    self.point2(corner)?;
                }
            }
            EntityType::Face3D(face) => {
                for corner in [
                    &face.first_corner,
                    &face.second_corner,
                    &face.third_corner,
                    &face.fourth_corner,
                ] {
                    self.point3(corner)?;
                }
            }
            EntityType::Polyline(polyline) => {
                self.w(i16::from(polyline.is_closed()))?;
                if polyline.default_start_width != 0.0 || polyline.default_end_width != 0.0 {
                    self.item(DxbItemType::Width)?;
                    self.f(polyline.default_start_width)?;
                    self.f(polyline.default_end_width)?;
                }
                let vertices = polyline
                    .vertices
                    .iter()
                    .filter_map(|&id| arena[id].as_entity())
                    .filter_map(|entity| match &entity.specific {
                        EntityType::Vertex(vertex) => Some(vertex),
                        _ => None,
                    });
                for vertex in vertices {
                    self.write_vertex(vertex)?;
                }
                self.item(DxbItemType::Seqend)?;
            }
            _ => {}
        }
        Ok(true)
    }

    fn write_vertex(&mut self, vertex: &Vertex) -> Result<()> {
        self.item(DxbItemType::Vertex)?;
        self.point2(&vertex.location)?;
        if vertex.bulge != 0.0 {
            self.item(DxbItemType::Bulge)?;
            self.f(vertex.bulge)?;
        }
        if vertex.start_width != 0.0 || vertex.end_width != 0.0 {
            self.item(DxbItemType::Width)?;
            self.f(vertex.start_width)?;
            self.f(vertex.end_width)?;
        }
        Ok(())
    }

    /// Emit layer and color items when they differ from the current state.
    fn write_style(&mut self, entity: &Entity) -> Result<()> {
        if entity.common.layer != self.layer {
            self.layer = entity.common.layer.clone();
            self.item(DxbItemType::NewLayer)?;
            let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&self.layer);
            self.writer.write_all(&bytes)?;
            self.writer.write_u8(0)?;
        }
        if entity.common.color != self.color {
            self.color = entity.common.color;
            self.item(DxbItemType::NewColor)?;
            self.w(self.color.raw_value())?;
        }
        Ok(())
    }

    fn item(&mut self, item: DxbItemType) -> Result<()> {
        self.writer.write_u8(item.code())?;
        Ok(())
    }

    fn w(&mut self, value: i16) -> Result<()> {
        self.writer.write_i16::<LittleEndian>(value)?;
        Ok(())
    }

    fn f(&mut self, value: f64) -> Result<()> {
        self.writer.write_f64::<LittleEndian>(value)?;
        Ok(())
    }

    fn point2(&mut self, point: &Vector3) -> Result<()> {
        self.f(point.x)?;
        self.f(point.y)
    }

    fn point3(&mut self, point: &Vector3) -> Result<()> {
        self.f(point.x)?;
        self.f(point.y)?;
        self.f(point.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Arc, Circle, Line, Polyline, Text};
    use crate::io::dxb::DxbReader;
    use std::io::Cursor;

    fn round_trip(document: &mut CadDocument) -> CadDocument {
        let mut buf = Vec::new();
        DxbWriter::new(&mut buf).write(document).unwrap();
        DxbReader::new(Cursor::new(buf)).read().unwrap()
    }

    #[test]
    fn test_writes_float_mode_header() {
        let mut buf = Vec::new();
        DxbWriter::new(&mut buf).write(&mut CadDocument::new()).unwrap();
        let mut expected = DXB_SENTINEL.to_vec();
        expected.extend_from_slice(&[135, 1, 0, 0]);
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_geometry_survives_round_trip() {
        let mut document = CadDocument::new();
        document.add_entity(Line::from_points(Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0)));
        let mut circle = Entity::from(Circle::from_center_radius(Vector3::new(1.0, 1.0, 0.0), 2.5));
        circle.common.layer = "HOLES".to_string();
        circle.common.color = Color::RED;
        document.add_entity(circle);
        document.add_entity(Arc::from_center_radius_angles(Vector3::ZERO, 1.0, 30.0, 120.0));

        let read = round_trip(&mut document);
        let entities: Vec<_> = read.entities().collect();
        assert_eq!(entities.len(), 3);
        let EntityType::Line(line) = &entities[0].specific else {
            panic!("expected a line");
        };
        assert_eq!(line.end, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(entities[1].layer(), "HOLES");
        assert_eq!(entities[1].common.color, Color::RED);
        let EntityType::Arc(arc) = &entities[2].specific else {
            panic!("expected an arc");
        };
        assert_eq!(entities[2].layer(), "0");
        assert_eq!(entities[2].common.color, Color::BY_LAYER);
        assert_eq!((arc.start_angle, arc.end_angle), (30.0, 120.0));
    }

    #[test]
    fn test_polyline_round_trip() {
        let mut document = CadDocument::new();
        document.add_polyline(
            Polyline::new(),
            [
                Vertex::at(Vector3::new(0.0, 0.0, 0.0)).with_bulge(0.5),
                Vertex::at(Vector3::new(3.0, 0.0, 0.0)),
            ],
        );
        let read = round_trip(&mut document);
        let EntityType::Polyline(polyline) = &read.entities().next().unwrap().specific else {
            panic!("expected a polyline");
        };
        assert_eq!(polyline.vertices.len(), 2);
        let EntityType::Vertex(first) = &read.entity(polyline.vertices[0]).unwrap().specific else {
            panic!("expected a vertex");
        };
        assert_eq!(first.bulge, 0.5);
    }

    #[test]
    fn test_unsupported_entities_are_reported() {
        let mut document = CadDocument::new();
        document.add_entity(Text::new());
        let read = round_trip(&mut document);
        assert_eq!(read.entities().count(), 0);
        assert!(document
            .notifications
            .iter()
            .any(|n| n.notification_type == NotificationType::NotSupported));
    }
}
