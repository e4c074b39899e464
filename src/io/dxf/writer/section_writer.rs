//! DXF section writers
//!
//! Each `write_*` method emits one complete section. Records build their
//! pairs into a scratch vector which is then handed to the stream writer.

use crate::blocks::BlockEnd;
use crate::document::{CadDocument, MODEL_SPACE, PAPER_SPACE};
use crate::entities::Entity;
use crate::error::Result;
use crate::io::dxf::CodePair;
use crate::record::{integer_count, DxfRecord};
use crate::tables::TableType;
use crate::types::{DxfVersion, Handle};

use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};

/// Thumbnail bytes per `310` pair
const THUMBNAIL_CHUNK: usize = 127;

/// Writes all DXF sections
pub struct SectionWriter<'w, W: DxfStreamWriter> {
    writer: &'w mut W,
    version: DxfVersion,
    output_handles: bool,
}

impl<'w, W: DxfStreamWriter> SectionWriter<'w, W> {
    /// Create a new section writer
    pub fn new(writer: &'w mut W, version: DxfVersion, output_handles: bool) -> Self {
        Self {
            writer,
            version,
            output_handles,
        }
    }

    fn flush_pairs(&mut self, pairs: &mut Vec<CodePair>) -> Result<()> {
        self.writer.write_pairs(pairs)?;
        pairs.clear();
        Ok(())
    }

    /// Write every section the version supports, then `EOF`.
    pub fn write_document(&mut self, document: &CadDocument) -> Result<()> {
        self.write_header(document)?;
        self.write_classes(document)?;
        self.write_tables(document)?;
        self.write_blocks(document)?;
        self.write_entities(document)?;
        self.write_objects(document)?;
        self.write_thumbnail(document)?;
        self.writer.write_eof()
    }

    /// Write the HEADER section
    pub fn write_header(&mut self, document: &CadDocument) -> Result<()> {
        self.writer.write_section_start("HEADER")?;
        let mut pairs = Vec::new();
        document
            .header
            .add_value_pairs(&mut pairs, self.version, self.output_handles);
        self.flush_pairs(&mut pairs)?;
        self.writer.write_section_end()
    }

    /// Write the CLASSES section (Release 13 and later)
    pub fn write_classes(&mut self, document: &CadDocument) -> Result<()> {
        if !self.version.has_object_model() {
            return Ok(());
        }
        self.writer.write_section_start("CLASSES")?;
        let mut pairs = Vec::new();
        for class in &document.classes {
            class.add_value_pairs(&mut pairs, self.version);
        }
        self.flush_pairs(&mut pairs)?;
        self.writer.write_section_end()
    }

    /// Write the TABLES section
    pub fn write_tables(&mut self, document: &CadDocument) -> Result<()> {
        self.writer.write_section_start("TABLES")?;
        let mut pairs = Vec::new();
        for table_type in TableType::ALL {
            if !table_type.is_supported(self.version) {
                continue;
            }
            let Some(table) = document.table(table_type) else {
                continue;
            };
            table.add_header_pairs(&mut pairs, self.version, self.output_handles, table.records.len());
            for record in document.table_records(table_type) {
                record.add_value_pairs(&mut pairs, self.version, self.output_handles);
            }
            pairs.push(CodePair::string(0, "ENDTAB"));
            self.flush_pairs(&mut pairs)?;
        }
        self.writer.write_section_end()
    }

    /// Write the BLOCKS section
    pub fn write_blocks(&mut self, document: &CadDocument) -> Result<()> {
        self.writer.write_section_start("BLOCKS")?;
        let mut pairs = Vec::new();
        for &id in document.block_ids() {
            let Some(block) = document.block(id) else {
                continue;
            };
            let owner = block_record_handle(document, &block.name);
            block.add_value_pairs_owned_by(&mut pairs, self.version, self.output_handles, owner);
            for &entity_id in &block.entities {
                if let Some(entity) = document.entity(entity_id) {
                    self.add_entity(document, entity, owner, &mut pairs);
                }
            }
            match block.end.and_then(|end| document.item(end)?.as_block_end()) {
                Some(end) => end.add_value_pairs_owned_by(&mut pairs, self.version, self.output_handles, owner),
                None => {
                    let mut end = BlockEnd::new();
                    end.layer = block.layer.clone();
                    end.add_value_pairs_owned_by(&mut pairs, self.version, false, owner);
                }
            }
            self.flush_pairs(&mut pairs)?;
        }
        self.writer.write_section_end()
    }

    /// Write the ENTITIES section
    pub fn write_entities(&mut self, document: &CadDocument) -> Result<()> {
        self.writer.write_section_start("ENTITIES")?;
        let model_space = block_record_handle(document, MODEL_SPACE);
        let paper_space = block_record_handle(document, PAPER_SPACE);
        let mut pairs = Vec::new();
        for entity in document.entities() {
            let owner = if entity.common.is_in_paper_space {
                paper_space
            } else {
                model_space
            };
            self.add_entity(document, entity, owner, &mut pairs);
            self.flush_pairs(&mut pairs)?;
        }
        self.writer.write_section_end()
    }

    fn add_entity(&self, document: &CadDocument, entity: &Entity, owner: Handle, pairs: &mut Vec<CodePair>) {
        entity.add_value_pairs_owned_by(pairs, self.version, self.output_handles, owner);
        entity.add_trailing_code_pairs(pairs, self.version, self.output_handles, document.arena());
    }

    /// Write the OBJECTS section (Release 13 and later)
    pub fn write_objects(&mut self, document: &CadDocument) -> Result<()> {
        if !self.version.has_object_model() {
            return Ok(());
        }
        self.writer.write_section_start("OBJECTS")?;
        let mut pairs = Vec::new();
        for object in document.objects() {
            object.add_value_pairs(&mut pairs, self.version, self.output_handles);
            self.flush_pairs(&mut pairs)?;
        }
        self.writer.write_section_end()
    }

    /// Write the THUMBNAILIMAGE section (AutoCAD 2000 and later, when present)
    pub fn write_thumbnail(&mut self, document: &CadDocument) -> Result<()> {
        let Some(data) = document.thumbnail.as_deref() else {
            return Ok(());
        };
        if self.version < DxfVersion::AC1015 {
            return Ok(());
        }
        self.writer.write_section_start("THUMBNAILIMAGE")?;
        self.writer.write_i32(90, integer_count(data.len()))?;
        for chunk in data.chunks(THUMBNAIL_CHUNK) {
            self.writer.write_string(310, &hex::encode_upper(chunk))?;
        }
        self.writer.write_section_end()
    }
}

/// Handle of the block record named `name`, or NULL if there is none.
fn block_record_handle(document: &CadDocument, name: &str) -> Handle {
    document
        .find_table_record(TableType::BlockRecord, name)
        .and_then(|id| document.table_record(id))
        .map(|record| record.common.handle)
        .unwrap_or(Handle::NULL)
}
