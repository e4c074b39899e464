//! DXF file reader

mod binary_reader;
mod buffer;
mod group_reader;
mod section_reader;
mod stream_reader;
mod text_reader;

pub use binary_reader::DxfBinaryReader;
pub use buffer::CodePairBuffer;
pub use group_reader::{is_group_start, read_group, read_xdata};
pub use stream_reader::{DxfStreamReader, PairListReader};
pub use text_reader::DxfTextReader;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use encoding_rs::Encoding;

use section_reader::SectionReader;

use crate::document::CadDocument;
use crate::error::Result;
use crate::io::dxb::{DxbReader, DXB_SENTINEL};
use crate::io::dxf::BINARY_DXF_SENTINEL;
use crate::notification::NotificationType;
use crate::types::DxfVersion;

/// Configuration for the DXF reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct DxfReaderConfiguration {
    /// When `true`, an error inside a section is reported as a notification
    /// and the reader skips to the section's `ENDSEC` instead of aborting.
    ///
    /// Default: `false` (strict mode, errors propagate).
    pub failsafe: bool,
    /// Encoding for text in pre-2007 files. `None` decodes bytes above 0x7F
    /// as Latin-1 and lets `$DWGCODEPAGE` pick the encoding; a fixed
    /// encoding overrides `$DWGCODEPAGE`.
    pub encoding: Option<&'static Encoding>,
}

/// Which flavour of file the first bytes announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Text,
    Binary,
    Dxb,
}

/// DXF file reader
pub struct DxfReader<'a> {
    reader: Box<dyn BufRead + 'a>,
    format: InputFormat,
    config: DxfReaderConfiguration,
}

impl<'a> DxfReader<'a> {
    /// Create a reader, detecting ASCII DXF, binary DXF or DXB from the
    /// first bytes. Nothing is consumed.
    pub fn from_reader<R: BufRead + 'a>(mut reader: R) -> Result<Self> {
        let head = reader.fill_buf()?;
        let format = if head.starts_with(BINARY_DXF_SENTINEL) {
            InputFormat::Binary
        } else if head.starts_with(DXB_SENTINEL) {
            InputFormat::Dxb
        } else {
            InputFormat::Text
        };
        tracing::debug!(?format, "detected input format");
        Ok(Self {
            reader: Box::new(reader),
            format,
            config: DxfReaderConfiguration::default(),
        })
    }

    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    pub fn is_binary(&self) -> bool {
        self.format == InputFormat::Binary
    }

    /// Read the whole stream into a document.
    pub fn read(self) -> Result<CadDocument> {
        let config = self.config;
        let stream: Box<dyn DxfStreamReader + 'a> = match self.format {
            InputFormat::Dxb => return DxbReader::new(self.reader).read(),
            InputFormat::Text => match config.encoding {
                Some(encoding) => Box::new(DxfTextReader::with_encoding(self.reader, encoding)),
                None => Box::new(DxfTextReader::new(self.reader)),
            },
            InputFormat::Binary => {
                let mut binary = DxfBinaryReader::new(self.reader)?;
                if let Some(encoding) = config.encoding {
                    binary.set_encoding(encoding);
                }
                Box::new(binary)
            }
        };
        read_document(CodePairBuffer::new(stream)?, config)
    }
}

impl DxfReader<'static> {
    /// Create a reader for a file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }
}

/// Read sections until `EOF`, then bind pointers.
fn read_document(mut buffer: CodePairBuffer<'_>, config: DxfReaderConfiguration) -> Result<CadDocument> {
    let mut document = CadDocument::new();
    // files without a $ACADVER are Release 12 or older
    document.header.version = DxfVersion::AC1009;

    while let Some(pair) = buffer.try_peek() {
        if buffer.is_at(0, "EOF") {
            break;
        }
        if !buffer.is_at(0, "SECTION") {
            tracing::trace!(offset = pair.offset, "skipping pair outside a section");
            buffer.advance()?;
            continue;
        }
        buffer.advance()?;
        let section_name = match buffer.try_peek() {
            Some(pair) if pair.code == 2 => {
                let name = pair.string_value();
                buffer.advance()?;
                name
            }
            _ => String::new(),
        };
        tracing::debug!(section = %section_name, "reading section");

        let mut reader = SectionReader::new(&mut buffer, &mut document, config.encoding.is_none());
        let result = match section_name.as_str() {
            "HEADER" => reader.read_header(),
            "CLASSES" => reader.read_classes(),
            "TABLES" => reader.read_tables(),
            "BLOCKS" => reader.read_blocks(),
            "ENTITIES" => reader.read_entities(),
            "OBJECTS" => reader.read_objects(),
            "THUMBNAILIMAGE" => reader.read_thumbnail(),
            _ => {
                reader.notify(
                    NotificationType::NotSupported,
                    format!("section {} skipped", section_name),
                );
                reader.skip_section()
            }
        };

        if let Err(e) = result {
            if !config.failsafe {
                return Err(e);
            }
            document.notifications.notify(
                NotificationType::Error,
                format!("error reading {} section: {}", section_name, e),
            );
            SectionReader::new(&mut buffer, &mut document, false).skip_section_lossy();
        }
    }

    document.bind_pointers();
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_detects_formats() {
        let text = DxfReader::from_reader(Cursor::new(b"  0\r\nEOF\r\n".to_vec())).unwrap();
        assert_eq!(text.format, InputFormat::Text);

        let mut binary = BINARY_DXF_SENTINEL.to_vec();
        binary.extend_from_slice(&[0, 0]);
        let binary = DxfReader::from_reader(Cursor::new(binary)).unwrap();
        assert!(binary.is_binary());

        let dxb = DxfReader::from_reader(Cursor::new(DXB_SENTINEL.to_vec())).unwrap();
        assert_eq!(dxb.format, InputFormat::Dxb);
    }

    #[test]
    fn test_empty_stream_reads_empty_document() {
        let document = DxfReader::from_reader(Cursor::new(Vec::new()))
            .unwrap()
            .read()
            .unwrap();
        assert_eq!(document.entities().count(), 0);
        assert_eq!(document.header.version, DxfVersion::AC1009);
    }
}
