//! Whole-document reading, writing and re-reading

mod common;

use std::io::Cursor;

use acadrust_dxf::{
    Arc, CadDocument, Circle, CodePairValue, DxfClass, DxfError, DxfReaderConfiguration, DxfVersion,
    Entity, EntityType, Line, NotificationType, Point, Polyline, Text, Vector3, Vertex,
};
use common::*;

fn sample_document() -> CadDocument {
    let mut document = CadDocument::new();
    let mut line = Entity::from(Line::from_points(Vector3::new(0.0, 0.0, 0.0), Vector3::new(10.0, 5.0, 0.0)));
    line.common.layer = "WALLS".to_string();
    document.add_entity(line);
    document.add_entity(Circle::from_center_radius(Vector3::new(2.0, 2.0, 0.0), 0.75));
    document.add_entity(Arc::from_center_radius_angles(Vector3::ZERO, 3.0, 0.0, 90.0));
    let mut text = Text::new();
    text.value = "Äpfel ^ 10%".to_string();
    text.height = 2.5;
    document.add_entity(text);
    document.add_polyline(
        Polyline::new(),
        [
            Vertex::at(Vector3::new(0.0, 0.0, 0.0)).with_bulge(0.5),
            Vertex::at(Vector3::new(4.0, 0.0, 0.0)),
            Vertex::at(Vector3::new(4.0, 4.0, 0.0)),
        ],
    );
    document.normalize();
    document
}

fn assert_sample_geometry(document: &CadDocument) {
    let entities: Vec<&Entity> = document.entities().collect();
    assert_eq!(entities.len(), 5);

    let EntityType::Line(line) = &entities[0].specific else {
        panic!("expected a line, found {}", entities[0].type_name());
    };
    assert_eq!(line.end, Vector3::new(10.0, 5.0, 0.0));
    assert_eq!(entities[0].layer(), "WALLS");

    let EntityType::Circle(circle) = &entities[1].specific else {
        panic!("expected a circle");
    };
    assert_eq!(circle.radius, 0.75);

    let EntityType::Arc(arc) = &entities[2].specific else {
        panic!("expected an arc");
    };
    assert_eq!(arc.end_angle, 90.0);

    let EntityType::Text(text) = &entities[3].specific else {
        panic!("expected text");
    };
    assert_eq!(text.value, "Äpfel ^ 10%");

    let EntityType::Polyline(polyline) = &entities[4].specific else {
        panic!("expected a polyline");
    };
    assert_eq!(polyline.vertices.len(), 3);
    assert!(polyline.seqend.is_some());
    let EntityType::Vertex(first) = &document.entity(polyline.vertices[0]).unwrap().specific else {
        panic!("expected a vertex");
    };
    assert_eq!(first.bulge, 0.5);
}

#[test]
fn block_with_two_points() {
    let bytes = dxf_file(&[(
        "BLOCKS",
        vec![
            (0, "BLOCK"),
            (8, "0"),
            (2, "TWO_POINTS"),
            (70, "0"),
            (10, "0.0"),
            (20, "0.0"),
            (30, "0.0"),
            (0, "POINT"),
            (8, "0"),
            (10, "1.1"),
            (20, "2.2"),
            (30, "3.3"),
            (0, "POINT"),
            (8, "0"),
            (10, "4.4"),
            (20, "5.5"),
            (30, "6.6"),
            (0, "ENDBLK"),
            (8, "0"),
        ],
    )]);
    let document = read(bytes);
    assert_eq!(document.blocks().count(), 1);
    let block_id = document.block_ids()[0];
    assert_eq!(document.block(block_id).unwrap().name, "TWO_POINTS");

    let locations: Vec<Vector3> = document
        .block_entities(block_id)
        .map(|entity| match &entity.specific {
            EntityType::Point(point) => point.location,
            _ => panic!("expected points only"),
        })
        .collect();
    assert_eq!(locations, vec![Vector3::new(1.1, 2.2, 3.3), Vector3::new(4.4, 5.5, 6.6)]);
    assert!(document.block(block_id).unwrap().end.is_some());
}

#[test]
fn extension_data_group_round_trips() {
    let bytes = dxf_file(&[
        ("HEADER", header_for("AC1015")),
        (
            "ENTITIES",
            vec![
                (0, "LINE"),
                (5, "20"),
                (102, "{ACAD_XDICTIONARY"),
                (360, "1A"),
                (360, "1B"),
                (102, "}"),
                (100, "AcDbEntity"),
                (8, "0"),
                (100, "AcDbLine"),
                (10, "0.0"),
                (20, "0.0"),
                (30, "0.0"),
                (11, "1.0"),
                (21, "1.0"),
                (31, "0.0"),
            ],
        ),
        (
            "OBJECTS",
            vec![
                (0, "XRECORD"),
                (5, "1A"),
                (100, "AcDbXrecord"),
                (1, "first"),
                (0, "XRECORD"),
                (5, "1B"),
                (100, "AcDbXrecord"),
                (1, "second"),
            ],
        ),
    ]);
    let mut document = read(bytes);
    let reread = read(write_text(&mut document));

    let entity = reread.entities().next().unwrap();
    let groups = &entity.common.extras.extension_data_groups;
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name.as_deref(), Some("ACAD_XDICTIONARY"));

    // handles are renumbered on write; the group follows its targets
    let expected: Vec<(i32, CodePairValue)> = reread
        .objects()
        .map(|object| (360, CodePairValue::Str(object.common.handle.to_hex())))
        .collect();
    let items: Vec<(i32, CodePairValue)> = groups[0].pairs().map(|p| (p.code, p.value.clone())).collect();
    assert_eq!(items.len(), 2);
    assert_eq!(items, expected);
}

#[test]
fn extension_data_group_drops_unknown_handles() {
    let bytes = dxf_file(&[
        ("HEADER", header_for("AC1015")),
        (
            "ENTITIES",
            vec![
                (0, "POINT"),
                (5, "20"),
                (102, "{ACAD_REACTORS"),
                (330, "9999"),
                (102, "}"),
                (100, "AcDbEntity"),
                (8, "0"),
            ],
        ),
    ]);
    let mut document = read(bytes);
    let reread = read(write_text(&mut document));
    let group = &reread.entities().next().unwrap().common.extras.extension_data_groups[0];
    let values: Vec<Option<&str>> = group.pairs().map(|p| p.as_str()).collect();
    assert_eq!(values, vec![Some("0")]);
}

#[test]
fn bool_header_variables_accept_both_encodings() {
    for code in [290, 280] {
        let bytes = dxf_file(&[(
            "HEADER",
            vec![(9, "$ACADVER"), (1, "AC1015"), (9, "$HIDETEXT"), (code, "1")],
        )]);
        let mut document = read(bytes);
        assert!(document.header.hide_text, "code {}", code);

        let pairs = pairs_of(&write_text(&mut document));
        let positions: Vec<usize> = pairs
            .iter()
            .enumerate()
            .filter(|(_, p)| p.as_str() == Some("$HIDETEXT"))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(positions.len(), 1);
        let value = &pairs[positions[0] + 1];
        assert_eq!(value.code, 290);
        assert_eq!(value.value, CodePairValue::Boolean(true));
    }
}

#[test]
fn ascii_round_trip_with_legacy_escapes() {
    let mut document = sample_document();
    let output = write_with(&mut document, false, DxfVersion::AC1015);
    let text = String::from_utf8(output.clone()).unwrap();
    assert!(text.contains("\\U+00C4pfel ^  10%"));
    assert_sample_geometry(&read(output));
}

#[test]
fn ascii_round_trip_in_utf8() {
    let mut document = sample_document();
    let output = write_with(&mut document, false, DxfVersion::AC1032);
    assert!(String::from_utf8(output.clone()).unwrap().contains("Äpfel"));
    assert_sample_geometry(&read(output));
}

#[test]
fn binary_round_trips() {
    for version in [DxfVersion::AC1009, DxfVersion::AC1015, DxfVersion::AC1032] {
        let mut document = sample_document();
        let output = write_with(&mut document, true, version);
        assert!(output.starts_with(acadrust_dxf::io::dxf::BINARY_DXF_SENTINEL));
        let reread = read(output);
        assert_eq!(reread.header.version, version);
        assert_sample_geometry(&reread);
    }
}

#[test]
fn release_12_output_has_no_object_sections() {
    let mut document = sample_document();
    let output = String::from_utf8(write_with(&mut document, false, DxfVersion::AC1009)).unwrap();
    assert!(!output.contains("OBJECTS"));
    assert!(!output.contains("CLASSES"));
    assert!(!output.contains("AcDbEntity"));
    assert_sample_geometry(&read(output.into_bytes()));
}

#[test]
fn entities_are_owned_by_model_space_record() {
    let mut document = sample_document();
    let pairs = pairs_of(&write_with(&mut document, false, DxfVersion::AC1015));
    let model_space = document
        .find_table_record(acadrust_dxf::TableType::BlockRecord, "*Model_Space")
        .and_then(|id| document.table_record(id))
        .unwrap()
        .common
        .handle;

    let line = pairs.iter().position(|p| p.as_str() == Some("LINE") && p.code == 0).unwrap();
    let owner = pairs[line..].iter().find(|p| p.code == 330).unwrap();
    assert_eq!(owner.handle_value(), model_space);
}

#[test]
fn classes_and_thumbnail_round_trip() {
    let mut document = sample_document();
    document.classes.push(DxfClass {
        dxf_name: "ACDBDICTIONARYWDFLT".to_string(),
        cpp_class_name: "AcDbDictionaryWithDefault".to_string(),
        application_name: "ObjectDBX Classes".to_string(),
        ..Default::default()
    });
    let thumbnail: Vec<u8> = (0..300u32).map(|i| (i % 251) as u8).collect();
    document.thumbnail = Some(thumbnail.clone());

    let reread = read(write_with(&mut document, false, DxfVersion::AC1018));
    assert_eq!(reread.classes.len(), 1);
    assert_eq!(reread.classes[0].cpp_class_name, "AcDbDictionaryWithDefault");
    assert_eq!(reread.thumbnail, Some(thumbnail));
}

#[test]
fn unknown_entities_are_kept_as_proxies() {
    let bytes = dxf_file(&[
        ("HEADER", header_for("AC1015")),
        (
            "ENTITIES",
            vec![(0, "ACME_WIDGET"), (8, "0"), (1, "payload"), (40, "2.5"), (0, "POINT"), (8, "0")],
        ),
    ]);
    let mut document = read(bytes);
    assert!(document.notifications.has_type(NotificationType::NotSupported));
    assert_eq!(document.entities().count(), 2);

    let reread = read(write_text(&mut document));
    let proxy = reread.entities().next().unwrap();
    assert_eq!(proxy.type_name(), "ACME_WIDGET");
    assert!(matches!(proxy.specific, EntityType::Proxy(_)));
    assert!(proxy
        .common
        .extras
        .excess_code_pairs
        .iter()
        .any(|p| p.code == 1 && p.as_str() == Some("payload")));
}

#[test]
fn unknown_sections_are_skipped() {
    let bytes = dxf_file(&[
        ("ACME_DATA", vec![(1, "anything"), (70, "3")]),
        ("ENTITIES", vec![(0, "POINT"), (8, "0"), (10, "1.0"), (20, "1.0"), (30, "0.0")]),
    ]);
    let document = read(bytes);
    assert_eq!(document.entities().count(), 1);
    assert!(document.notifications.has_type(NotificationType::NotSupported));
}

fn file_with_broken_spline() -> Vec<u8> {
    dxf_file(&[
        (
            "ENTITIES",
            vec![
                (0, "SPLINE"),
                (8, "0"),
                (10, "1.0"),
                (10, "2.0"),
                (20, "1.0"),
                (0, "POINT"),
                (8, "0"),
            ],
        ),
        (
            "BLOCKS",
            vec![(0, "BLOCK"), (8, "0"), (2, "AFTER"), (0, "ENDBLK"), (8, "0")],
        ),
    ])
}

#[test]
fn strict_reading_fails_on_bad_record() {
    let result = CadDocument::read_from(Cursor::new(file_with_broken_spline()));
    assert!(matches!(result, Err(DxfError::InvalidRecord { .. })));
}

#[test]
fn failsafe_reading_recovers_at_next_section() {
    let config = DxfReaderConfiguration {
        failsafe: true,
        ..Default::default()
    };
    let document = CadDocument::read_with_configuration(Cursor::new(file_with_broken_spline()), config).unwrap();
    assert!(document.notifications.has_type(NotificationType::Error));
    assert!(document.find_block("AFTER").is_some());
}

#[test]
fn structural_error_carries_line_number() {
    let bytes = b"  0\r\nSECTION\r\n  2\r\nENTITIES\r\nnot a code\r\nPOINT\r\n".to_vec();
    match CadDocument::read_from(Cursor::new(bytes)) {
        Err(DxfError::Parse { offset, .. }) => assert_eq!(offset, 5),
        other => panic!("expected a parse error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn dxb_through_the_document() {
    let mut document = CadDocument::new();
    document.add_entity(Point::from_coords(1.0, 2.0, 0.0));
    document.add_entity(Line::from_points(Vector3::ZERO, Vector3::new(3.0, 4.0, 5.0)));
    let mut bytes = Vec::new();
    document.write_dxb_to(&mut bytes).unwrap();

    let reread = CadDocument::read_from(Cursor::new(bytes)).unwrap();
    let types: Vec<&str> = reread.entities().map(|e| e.type_name()).collect();
    assert_eq!(types, vec!["POINT", "LINE"]);
}

fn record_codes(pairs: &[acadrust_dxf::CodePair], type_name: &str, codes: &[i32]) -> Vec<i32> {
    let start = pairs
        .iter()
        .position(|p| p.code == 0 && p.as_str() == Some(type_name))
        .unwrap();
    pairs[start + 1..]
        .iter()
        .take_while(|p| p.code != 0)
        .filter(|p| codes.contains(&p.code))
        .map(|p| p.code)
        .collect()
}

#[test]
fn dictionary_keeps_soft_and_hard_entries_apart() {
    let bytes = dxf_file(&[
        ("HEADER", header_for("AC1015")),
        (
            "OBJECTS",
            vec![
                (0, "DICTIONARY"),
                (5, "C"),
                (100, "AcDbDictionary"),
                (3, "A"),
                (350, "D"),
                (3, "B"),
                (360, "E"),
                (0, "XRECORD"),
                (5, "D"),
                (100, "AcDbXrecord"),
                (0, "XRECORD"),
                (5, "E"),
                (100, "AcDbXrecord"),
            ],
        ),
    ]);
    let mut document = read(bytes);
    let pairs = pairs_of(&write_text(&mut document));
    assert_eq!(record_codes(&pairs, "DICTIONARY", &[280, 350, 360]), vec![350, 360]);
}

#[test]
fn insert_without_attributes_absorbs_its_seqend() {
    let bytes = dxf_file(&[(
        "ENTITIES",
        vec![
            (0, "INSERT"),
            (8, "0"),
            (66, "1"),
            (2, "DOOR"),
            (10, "0.0"),
            (20, "0.0"),
            (30, "0.0"),
            (0, "SEQEND"),
            (8, "0"),
            (0, "POINT"),
            (8, "0"),
        ],
    )]);
    let mut document = read(bytes);
    let types: Vec<&str> = document.entities().map(|e| e.type_name()).collect();
    assert_eq!(types, vec!["INSERT", "POINT"]);

    let pairs = pairs_of(&write_text(&mut document));
    assert!(!pairs.iter().any(|p| p.code == 0 && p.as_str() == Some("SEQEND")));
}

#[test]
fn unknown_version_is_read_as_the_default() {
    let bytes = dxf_file(&[
        ("HEADER", header_for("AC9999")),
        ("ENTITIES", vec![(0, "POINT"), (8, "0"), (10, "1.0"), (20, "2.0"), (30, "0.0")]),
    ]);
    let document = read(bytes);
    assert_eq!(document.header.version, DxfVersion::AC1009);
    assert_eq!(document.entities().count(), 1);
    let warnings = document.notifications.of_type(NotificationType::Warning);
    assert!(warnings.iter().any(|n| n.message.contains("AC9999")));
}
