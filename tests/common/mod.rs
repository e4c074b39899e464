//! Shared helpers for the integration tests: DXF fixtures assembled from
//! `(code, value)` lists and read/write shortcuts.

#![allow(dead_code)]

use std::io::Cursor;

use acadrust_dxf::io::dxf::reader::DxfTextReader;
use acadrust_dxf::io::dxf::BINARY_DXF_SENTINEL;
use acadrust_dxf::{CadDocument, CodePair, DxfWriter, DxfWriterConfiguration, DxfVersion};

/// Render pairs as ASCII DXF lines.
pub fn text_dxf(pairs: &[(i32, &str)]) -> Vec<u8> {
    let mut out = String::new();
    for (code, value) in pairs {
        out.push_str(&format!("{:>3}\r\n{}\r\n", code, value));
    }
    out.into_bytes()
}

/// Wrap section bodies in `SECTION`/`ENDSEC` and finish with `EOF`.
pub fn dxf_file(sections: &[(&str, Vec<(i32, &str)>)]) -> Vec<u8> {
    let mut pairs: Vec<(i32, &str)> = Vec::new();
    for (name, body) in sections {
        pairs.push((0, "SECTION"));
        pairs.push((2, name));
        pairs.extend(body.iter().cloned());
        pairs.push((0, "ENDSEC"));
    }
    pairs.push((0, "EOF"));
    text_dxf(&pairs)
}

/// A HEADER section body declaring `version`.
pub fn header_for(version: &str) -> Vec<(i32, &str)> {
    vec![(9, "$ACADVER"), (1, version)]
}

pub fn read(bytes: Vec<u8>) -> CadDocument {
    CadDocument::read_from(Cursor::new(bytes)).expect("document should read")
}

pub fn write_text(document: &mut CadDocument) -> Vec<u8> {
    DxfWriter::new(document).write_to_vec().expect("document should write")
}

pub fn write_with(document: &mut CadDocument, binary: bool, version: DxfVersion) -> Vec<u8> {
    DxfWriter::new(document)
        .with_configuration(DxfWriterConfiguration {
            binary,
            version: Some(version),
        })
        .write_to_vec()
        .expect("document should write")
}

/// Tokenize ASCII DXF output back into pairs.
pub fn pairs_of(bytes: &[u8]) -> Vec<CodePair> {
    DxfTextReader::utf8(Cursor::new(bytes))
        .collect::<Result<Vec<_>, _>>()
        .expect("output should tokenize")
}

/// Binary DXF with 1-byte codes: the sentinel, then each pair as a code
/// byte and a NUL-terminated string.
pub fn legacy_binary_strings(pairs: &[(u8, &str)]) -> Vec<u8> {
    let mut out = BINARY_DXF_SENTINEL.to_vec();
    for (code, value) in pairs {
        out.push(*code);
        out.extend_from_slice(value.as_bytes());
        out.push(0);
    }
    out
}

/// Binary DXF with 2-byte codes, string values only.
pub fn wide_binary_strings(pairs: &[(i16, &str)]) -> Vec<u8> {
    let mut out = BINARY_DXF_SENTINEL.to_vec();
    for (code, value) in pairs {
        out.extend_from_slice(&code.to_le_bytes());
        out.extend_from_slice(value.as_bytes());
        out.push(0);
    }
    out
}
