//! Code-pair level behavior: value typing, escaping, tokenizers

mod common;

use std::io::Cursor;

use acadrust_dxf::io::dxf::control_chars::{
    escape_control_characters, escape_unicode, unescape_control_characters, unescape_unicode,
};
use acadrust_dxf::io::dxf::reader::{DxfBinaryReader, DxfTextReader};
use acadrust_dxf::{CodePair, CodePairValue, DxfReader, EntityType, GroupCodeValueType, Vector3};
use common::*;
use proptest::prelude::*;

fn tokenize(text: &str) -> Vec<CodePair> {
    DxfTextReader::new(Cursor::new(text.as_bytes().to_vec()))
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn out_of_range_shorts_are_clamped() {
    let pairs = tokenize(" 70\r\n99999\r\n 70\r\n-99999\r\n");
    assert_eq!(pairs[0].value, CodePairValue::Short(i16::MAX));
    assert_eq!(pairs[1].value, CodePairValue::Short(i16::MIN));
}

#[test]
fn integers_written_as_doubles_are_accepted() {
    let pairs = tokenize(" 90\r\n12.0\r\n 62\r\n7.9\r\n");
    assert_eq!(pairs[0].value, CodePairValue::Integer(12));
    assert_eq!(pairs[1].value, CodePairValue::Short(7));
}

#[test]
fn unparseable_number_is_an_error_with_line() {
    let result: Result<Vec<_>, _> = DxfTextReader::new(Cursor::new(b"  0\r\nLINE\r\n 10\r\nabc\r\n".to_vec())).collect();
    match result {
        Err(acadrust_dxf::DxfError::InvalidValue { code, offset, value }) => {
            assert_eq!(code, 10);
            assert_eq!(offset, 3);
            assert_eq!(value, "abc");
        }
        other => panic!("expected an invalid value error, got {:?}", other),
    }
}

#[test]
fn comments_do_not_change_records() {
    let plain = dxf_file(&[(
        "ENTITIES",
        vec![(0, "POINT"), (8, "A"), (10, "1.0"), (20, "2.0"), (30, "3.0")],
    )]);
    let commented = dxf_file(&[(
        "ENTITIES",
        vec![
            (999, "before"),
            (0, "POINT"),
            (999, "inside"),
            (8, "A"),
            (10, "1.0"),
            (999, "between coordinates"),
            (20, "2.0"),
            (30, "3.0"),
            (999, "after"),
        ],
    )]);
    let plain = read(plain);
    let commented = read(commented);
    let plain: Vec<_> = plain.entities().cloned().collect();
    let commented: Vec<_> = commented.entities().cloned().collect();
    assert_eq!(plain, commented);
    assert_eq!(plain.len(), 1);
}

#[test]
fn legacy_binary_uses_single_byte_codes() {
    let bytes = legacy_binary_strings(&[(0, "SECTION"), (2, "ENTITIES"), (0, "ENDSEC"), (0, "EOF")]);
    let mut reader = DxfBinaryReader::new(Cursor::new(bytes)).unwrap();
    let pairs: Vec<_> = reader.by_ref().collect::<Result<_, _>>().unwrap();
    assert!(!reader.uses_wide_codes());
    assert_eq!(pairs[1], CodePair::string(2, "ENTITIES"));
    assert_eq!(pairs.len(), 4);
}

#[test]
fn two_byte_first_code_switches_binary_width() {
    let bytes = wide_binary_strings(&[(0, "SECTION"), (2, "ENTITIES"), (0, "ENDSEC"), (0, "EOF")]);
    let mut reader = DxfBinaryReader::new(Cursor::new(bytes)).unwrap();
    let pairs: Vec<_> = reader.by_ref().collect::<Result<_, _>>().unwrap();
    assert!(reader.uses_wide_codes());
    assert_eq!(pairs[1], CodePair::string(2, "ENTITIES"));
    assert_eq!(pairs[3], CodePair::string(0, "EOF"));
}

#[test]
fn binary_document_is_detected_and_read() {
    let mut bytes = acadrust_dxf::io::dxf::BINARY_DXF_SENTINEL.to_vec();
    bytes.extend_from_slice(BINARY_FIXTURE_PREFIX);
    // POINT at (1.5, 2.5, 0.0) with 2-byte codes
    for (code, payload) in [
        (10i16, 1.5f64.to_le_bytes()),
        (20, 2.5f64.to_le_bytes()),
        (30, 0.0f64.to_le_bytes()),
    ] {
        bytes.extend_from_slice(&code.to_le_bytes());
        bytes.extend_from_slice(&payload);
    }
    for value in ["ENDSEC", "EOF"] {
        bytes.extend_from_slice(&0i16.to_le_bytes());
        bytes.extend_from_slice(value.as_bytes());
        bytes.push(0);
    }

    let reader = DxfReader::from_reader(Cursor::new(bytes)).unwrap();
    assert!(reader.is_binary());
    let document = reader.read().unwrap();
    let EntityType::Point(point) = &document.entities().next().unwrap().specific else {
        panic!("expected a point");
    };
    assert_eq!(point.location, Vector3::new(1.5, 2.5, 0.0));
}

const BINARY_FIXTURE_PREFIX: &[u8] = b"\x00\x00SECTION\x00\x02\x00ENTITIES\x00\x00\x00POINT\x00";

#[test]
fn control_characters_in_values_are_decoded() {
    let pairs = tokenize("  1\r\nTAB^IHERE ^ caret\r\n");
    assert_eq!(pairs[0].as_str(), Some("TAB\tHERE ^ caret"));
}

#[test]
fn legacy_unicode_escapes_are_decoded() {
    let pairs = tokenize("  1\r\n\\U+00C4pfel \\U+D83D\\U+DE00\r\n");
    assert_eq!(pairs[0].as_str(), Some("Äpfel 😀"));
}

proptest! {
    #[test]
    fn control_escaping_round_trips(s in "[\\x00-\\x1f -~]{0,40}") {
        let escaped = escape_control_characters(&s);
        let unescaped = unescape_control_characters(&escaped, 0).unwrap();
        prop_assert_eq!(&*unescaped, s.as_str());
        let reescaped = escape_control_characters(&unescaped);
        prop_assert_eq!(&*reescaped, &*escaped);
    }

    #[test]
    fn unicode_escaping_round_trips(s in "[a-zA-Z0-9 äöüßÆ€\u{4e2d}\u{1F600}]{0,20}") {
        let escaped = escape_unicode(&s);
        prop_assert!(escaped.is_ascii());
        prop_assert_eq!(&*unescape_unicode(&escaped), s.as_str());
    }

    #[test]
    fn every_code_has_a_value_type(code in any::<i32>()) {
        let value_type = GroupCodeValueType::from_code(code);
        if !(0..=1071).contains(&code) {
            prop_assert_eq!(value_type, GroupCodeValueType::String);
        }
    }

    #[test]
    fn text_values_survive_the_writer(s in "[\\x01-\\x1f!-~]([\\x01-\\x1f -~]{0,28}[\\x01-\\x1f!-~])?") {
        let mut document = acadrust_dxf::CadDocument::new();
        document.header.current_layer = s.clone();
        let output = write_text(&mut document);
        let pairs = pairs_of(&output);
        let position = pairs.iter().position(|p| p.as_str() == Some("$CLAYER")).unwrap();
        prop_assert_eq!(pairs[position + 1].as_str(), Some(s.as_str()));
    }
}
