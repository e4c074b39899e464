//! DXF writer module

mod binary_writer;
mod section_writer;
mod stream_writer;
mod text_writer;

pub use binary_writer::DxfBinaryWriter;
pub use section_writer::SectionWriter;
pub use stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
pub use text_writer::{format_double, DxfTextWriter};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::document::CadDocument;
use crate::error::Result;
use crate::types::DxfVersion;

/// Configuration for the DXF writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DxfWriterConfiguration {
    /// Write binary DXF instead of ASCII.
    pub binary: bool,
    /// Version to write; `None` uses the document's `$ACADVER`.
    pub version: Option<DxfVersion>,
}

/// DXF file writer
///
/// Writing renumbers every handle in the document, so the writer borrows
/// it mutably.
pub struct DxfWriter<'a> {
    document: &'a mut CadDocument,
    config: DxfWriterConfiguration,
}

impl<'a> DxfWriter<'a> {
    /// Create a new DXF writer for ASCII output
    pub fn new(document: &'a mut CadDocument) -> Self {
        Self {
            document,
            config: DxfWriterConfiguration::default(),
        }
    }

    /// Set the writer configuration.
    pub fn with_configuration(mut self, config: DxfWriterConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Write to a file
    pub fn write_to_file<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to_writer(BufWriter::new(file))
    }

    /// Write to any writer
    pub fn write_to_writer<W: Write>(self, writer: W) -> Result<()> {
        let version = self.config.version.unwrap_or(self.document.header.version);
        let output_handles = version.has_object_model() || self.document.header.handling;
        let seed = self.document.assign_handles();
        tracing::debug!(%version, binary = self.config.binary, handle_seed = %seed, "writing DXF");

        if self.config.binary {
            let mut stream_writer = DxfBinaryWriter::new(writer, version)?;
            SectionWriter::new(&mut stream_writer, version, output_handles).write_document(self.document)?;
            stream_writer.flush()
        } else {
            let mut stream_writer = DxfTextWriter::new(writer, version);
            SectionWriter::new(&mut stream_writer, version, output_handles).write_document(self.document)?;
            stream_writer.flush()
        }
    }

    /// Write to a byte vector
    pub fn write_to_vec(self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to_writer(&mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Line;
    use crate::types::Vector3;

    #[test]
    fn test_minimal_document_layout() {
        let mut document = CadDocument::new();
        document.header.version = DxfVersion::AC1009;
        let text = String::from_utf8(DxfWriter::new(&mut document).write_to_vec().unwrap()).unwrap();
        assert!(text.starts_with("  0\r\nSECTION\r\n  2\r\nHEADER\r\n  9\r\n$ACADVER\r\n  1\r\nAC1009\r\n"));
        assert!(text.ends_with("  0\r\nEOF\r\n"));
        assert!(!text.contains("CLASSES"));
        assert!(!text.contains("OBJECTS"));
        assert!(!text.contains("BLOCK_RECORD"));
    }

    #[test]
    fn test_version_override() {
        let mut document = CadDocument::with_defaults();
        document.add_entity(Line::from_points(Vector3::ZERO, Vector3::new(1.0, 1.0, 0.0)));
        let config = DxfWriterConfiguration {
            version: Some(DxfVersion::AC1015),
            ..Default::default()
        };
        let text = String::from_utf8(
            DxfWriter::new(&mut document)
                .with_configuration(config)
                .write_to_vec()
                .unwrap(),
        )
        .unwrap();
        assert!(text.contains("$ACADVER\r\n  1\r\nAC1015\r\n"));
        assert!(text.contains("BLOCK_RECORD"));
        assert!(text.contains("AcDbLine"));
    }
}
