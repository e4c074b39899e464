//! Section-level parsing: turns the pair stream of each section into
//! records in a [`CadDocument`].

use super::buffer::CodePairBuffer;
use crate::blocks::{Block, BlockEnd};
use crate::classes::DxfClass;
use crate::document::CadDocument;
use crate::entities::{Entity, EntityType, Seqend};
use crate::error::{DxfError, Result};
use crate::io::dxf::code_page::encoding_from_code_page;
use crate::item::{DrawingItem, ItemId};
use crate::notification::NotificationType;
use crate::objects::{Object, ObjectType};
use crate::record::populate_from_buffer;
use crate::tables::{SymbolTable, TableRecord, TableType};

/// Reads one section at a time. Every `read_*` method starts after the
/// section's `2/NAME` pair and consumes the closing `ENDSEC`.
pub(super) struct SectionReader<'b, 'a> {
    buffer: &'b mut CodePairBuffer<'a>,
    document: &'b mut CadDocument,
    /// Whether `$DWGCODEPAGE` may change the text encoding
    use_code_page: bool,
}

impl<'b, 'a> SectionReader<'b, 'a> {
    pub fn new(
        buffer: &'b mut CodePairBuffer<'a>,
        document: &'b mut CadDocument,
        use_code_page: bool,
    ) -> Self {
        Self {
            buffer,
            document,
            use_code_page,
        }
    }

    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        self.document.notifications.notify(notification_type, message);
    }

    /// Whether the buffer is at `0/ENDSEC`; consumes it if so. End of input
    /// also ends the section.
    fn at_section_end(&mut self) -> Result<bool> {
        if self.buffer.is_at(0, "ENDSEC") {
            self.buffer.advance()?;
            return Ok(true);
        }
        Ok(!self.buffer.items_remain())
    }

    fn current_type_name(&self) -> Option<String> {
        self.buffer
            .try_peek()
            .filter(|p| p.code == 0)
            .map(|p| p.string_value())
    }

    pub fn skip_section(&mut self) -> Result<()> {
        while !self.at_section_end()? {
            self.buffer.advance()?;
        }
        Ok(())
    }

    /// Skip to `ENDSEC` after an error, giving up quietly if the stream
    /// itself is broken.
    pub fn skip_section_lossy(&mut self) {
        loop {
            match self.at_section_end() {
                Ok(false) => {
                    if self.buffer.advance().is_err() {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    pub fn read_header(&mut self) -> Result<()> {
        while !self.at_section_end()? {
            let pair = self.buffer.peek()?;
            if pair.code != 9 {
                tracing::warn!(offset = pair.offset, code = pair.code, "header pair without a variable name");
                self.buffer.advance()?;
                continue;
            }
            let name = pair.string_value();
            self.buffer.advance()?;

            let mut values = Vec::new();
            while let Some(pair) = self.buffer.try_peek() {
                if pair.code == 9 || pair.code == 0 {
                    break;
                }
                values.push(pair.clone());
                self.buffer.advance()?;
            }
            match self.document.header.set_variable(&name, &values) {
                Err(DxfError::UnsupportedVersion(text)) => {
                    let current = self.document.header.version;
                    self.notify(
                        NotificationType::Warning,
                        format!("unknown version {}, reading as {}", text, current),
                    );
                    continue;
                }
                result => result?,
            }
            self.apply_encoding_variable(&name);
        }
        Ok(())
    }

    /// React to header variables that change how the rest of the file is
    /// decoded.
    fn apply_encoding_variable(&mut self, name: &str) {
        let header = &self.document.header;
        match name {
            "$ACADVER" if header.version.is_utf8() => {
                tracing::debug!(version = %header.version, "switching to UTF-8");
                self.buffer.switch_to_utf8();
            }
            "$DWGCODEPAGE" if self.use_code_page && !header.version.is_utf8() => {
                match encoding_from_code_page(&header.code_page) {
                    Some(encoding) => {
                        tracing::debug!(code_page = %header.code_page, encoding = encoding.name(), "using code page");
                        self.buffer.set_encoding(encoding);
                    }
                    None => tracing::debug!(code_page = %header.code_page, "keeping default decoding"),
                }
            }
            _ => {}
        }
    }

    pub fn read_classes(&mut self) -> Result<()> {
        while !self.at_section_end()? {
            let Some(type_name) = self.current_type_name() else {
                self.buffer.advance()?;
                continue;
            };
            self.buffer.advance()?;
            let mut class = DxfClass::default();
            // Release 13 names each entry after its class instead of `CLASS`
            if type_name != "CLASS" {
                class.dxf_name = type_name;
            }
            while let Some(pair) = self.buffer.try_peek() {
                if pair.code == 0 {
                    break;
                }
                if !class.try_set_pair(pair) {
                    tracing::trace!(code = pair.code, "unclaimed CLASS pair");
                }
                self.buffer.advance()?;
            }
            self.document.classes.push(class);
        }
        Ok(())
    }

    pub fn read_tables(&mut self) -> Result<()> {
        while !self.at_section_end()? {
            if self.buffer.is_at(0, "TABLE") {
                self.buffer.advance()?;
                self.read_table()?;
            } else {
                let pair = self.buffer.peek()?;
                tracing::warn!(offset = pair.offset, "unexpected pair in TABLES section");
                self.buffer.advance()?;
            }
        }
        Ok(())
    }

    fn read_table(&mut self) -> Result<()> {
        let name = match self.buffer.try_peek() {
            Some(pair) if pair.code == 2 => pair.string_value(),
            _ => String::new(),
        };
        let Some(table_type) = TableType::from_name(&name) else {
            self.notify(NotificationType::NotSupported, format!("table {} skipped", name));
            while self.buffer.items_remain() && !self.buffer.is_at(0, "ENDSEC") {
                let done = self.buffer.is_at(0, "ENDTAB");
                self.buffer.advance()?;
                if done {
                    break;
                }
            }
            return Ok(());
        };

        let mut header = SymbolTable::new(table_type);
        populate_from_buffer(&mut header, self.buffer)?;
        if let Some(table) = self.document.table_mut(table_type) {
            table.handle = header.handle;
            table.owner_handle = header.owner_handle;
            table.extras = header.extras;
        }

        while let Some(type_name) = self.current_type_name() {
            match type_name.as_str() {
                "ENDTAB" => {
                    self.buffer.advance()?;
                    break;
                }
                "ENDSEC" => break,
                _ => {}
            }
            self.buffer.advance()?;
            let record_type = TableType::from_name(&type_name).unwrap_or_else(|| {
                tracing::warn!(record = %type_name, table = table_type.name(), "unknown record type in table");
                table_type
            });
            let mut record = TableRecord::for_table(record_type);
            populate_from_buffer(&mut record, self.buffer)?;
            self.document.add_table_record(record);
        }
        Ok(())
    }

    pub fn read_blocks(&mut self) -> Result<()> {
        while !self.at_section_end()? {
            if self.buffer.is_at(0, "BLOCK") {
                self.buffer.advance()?;
                self.read_block()?;
            } else {
                let pair = self.buffer.peek()?;
                tracing::warn!(offset = pair.offset, "unexpected pair in BLOCKS section");
                self.buffer.advance()?;
            }
        }
        Ok(())
    }

    fn read_block(&mut self) -> Result<()> {
        let mut block = Block::new("");
        populate_from_buffer(&mut block, self.buffer)?;

        while let Some(type_name) = self.current_type_name() {
            match type_name.as_str() {
                "ENDBLK" => {
                    self.buffer.advance()?;
                    let mut end = BlockEnd::new();
                    populate_from_buffer(&mut end, self.buffer)?;
                    block.end = Some(self.document.insert_item(DrawingItem::BlockEnd(end)));
                    break;
                }
                "BLOCK" | "ENDSEC" => {
                    tracing::warn!(block = %block.name, "block without ENDBLK");
                    break;
                }
                _ => {
                    let id = self.read_entity()?;
                    block.entities.push(id);
                }
            }
        }

        let id = self.document.insert_item(DrawingItem::Block(block));
        self.document.push_block_id(id);
        Ok(())
    }

    pub fn read_entities(&mut self) -> Result<()> {
        while !self.at_section_end()? {
            if self.current_type_name().is_some() {
                let id = self.read_entity()?;
                self.document.push_entity_id(id);
            } else {
                self.buffer.advance()?;
            }
        }
        Ok(())
    }

    /// Read the entity at the current `0` pair together with the vertices,
    /// attributes and `SEQEND` that belong to it.
    fn read_entity(&mut self) -> Result<ItemId> {
        let type_name = self.buffer.peek()?.string_value();
        self.buffer.advance()?;

        let mut entity = Entity::from_type_name(&type_name);
        if matches!(entity.specific, EntityType::Proxy(_)) {
            self.notify(
                NotificationType::NotSupported,
                format!("entity type {} kept as proxy", type_name),
            );
        }
        populate_from_buffer(&mut entity, self.buffer)?;

        match &mut entity.specific {
            EntityType::Polyline(polyline) => {
                polyline.vertices = self.read_children("VERTEX")?;
                polyline.seqend = self.read_seqend()?;
            }
            EntityType::Insert(insert) => {
                insert.attributes = self.read_children("ATTRIB")?;
                // an empty attribute list may still be closed by a SEQEND
                insert.seqend = self.read_seqend()?;
            }
            _ => {}
        }
        Ok(self.document.insert_item(DrawingItem::Entity(entity)))
    }

    fn read_children(&mut self, type_name: &str) -> Result<Vec<ItemId>> {
        let mut children = Vec::new();
        while self.buffer.is_at(0, type_name) {
            children.push(self.read_entity()?);
        }
        Ok(children)
    }

    fn read_seqend(&mut self) -> Result<Option<ItemId>> {
        if !self.buffer.is_at(0, "SEQEND") {
            return Ok(None);
        }
        self.buffer.advance()?;
        let mut seqend = Entity::from(Seqend);
        populate_from_buffer(&mut seqend, self.buffer)?;
        Ok(Some(self.document.insert_item(DrawingItem::Entity(seqend))))
    }

    pub fn read_objects(&mut self) -> Result<()> {
        while !self.at_section_end()? {
            let Some(type_name) = self.current_type_name() else {
                self.buffer.advance()?;
                continue;
            };
            self.buffer.advance()?;
            let mut object = Object::from_type_name(&type_name);
            if matches!(object.specific, ObjectType::Proxy(_)) {
                self.notify(
                    NotificationType::NotSupported,
                    format!("object type {} kept as proxy", type_name),
                );
            }
            populate_from_buffer(&mut object, self.buffer)?;
            let id = self.document.insert_item(DrawingItem::Object(object));
            self.document.push_object_id(id);
        }
        Ok(())
    }

    pub fn read_thumbnail(&mut self) -> Result<()> {
        let mut data = Vec::new();
        while !self.at_section_end()? {
            let pair = self.buffer.peek()?;
            match pair.code {
                // byte count; the chunks carry the data
                90 => {}
                310 => {
                    let chunk = hex::decode(pair.as_str().unwrap_or_default())
                        .map_err(|e| DxfError::parse(pair.offset, format!("invalid thumbnail data: {}", e)))?;
                    data.extend_from_slice(&chunk);
                }
                _ => tracing::trace!(code = pair.code, "unclaimed thumbnail pair"),
            }
            self.buffer.advance()?;
        }
        self.document.thumbnail = Some(data);
        Ok(())
    }
}
