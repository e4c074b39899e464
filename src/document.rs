//! The drawing container

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use ahash::AHashSet;
use indexmap::IndexMap;

use crate::blocks::{Block, BlockEnd};
use crate::classes::DxfClass;
use crate::entities::{Entity, Insert, Polyline, Seqend};
use crate::error::Result;
use crate::handles::{self, BindReport};
use crate::header::Header;
use crate::io::dxb::{DxbReader, DxbWriter};
use crate::io::dxf::{DxfReader, DxfReaderConfiguration, DxfWriter, DxfWriterConfiguration};
use crate::item::{DrawingItem, Item, ItemArena, ItemId, Pointer};
use crate::notification::{NotificationCollection, NotificationType};
use crate::objects::{Dictionary, Object};
use crate::tables::{
    AppId, BlockRecord, DimStyle, Layer, LineType, SymbolTable, TableRecord, TableType, TextStyle,
};
use crate::types::Handle;

pub const MODEL_SPACE: &str = "*Model_Space";
pub const PAPER_SPACE: &str = "*Paper_Space";

/// A complete drawing.
///
/// Every table, table record, block, entity and object is stored in one
/// arena and addressed by [`ItemId`]. The four root lists (tables, blocks,
/// entities, objects) give the write order; everything else is reached
/// through them.
#[derive(Debug, Clone)]
pub struct CadDocument {
    pub header: Header,
    pub classes: Vec<DxfClass>,
    /// Raw bitmap of the THUMBNAILIMAGE section
    pub thumbnail: Option<Vec<u8>>,
    /// Notifications collected during the last read or write
    pub notifications: NotificationCollection,
    arena: ItemArena,
    tables: IndexMap<TableType, ItemId>,
    blocks: Vec<ItemId>,
    entities: Vec<ItemId>,
    objects: Vec<ItemId>,
}

impl CadDocument {
    /// An empty drawing with all nine tables present and empty.
    pub fn new() -> Self {
        let mut arena = ItemArena::new();
        let tables = TableType::ALL
            .into_iter()
            .map(|t| (t, arena.insert(DrawingItem::Table(SymbolTable::new(t)))))
            .collect();
        CadDocument {
            header: Header::new(),
            classes: Vec::new(),
            thumbnail: None,
            notifications: NotificationCollection::new(),
            arena,
            tables,
            blocks: Vec::new(),
            entities: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// A drawing with the standard records in place; see [`normalize`](Self::normalize).
    pub fn with_defaults() -> Self {
        let mut document = Self::new();
        document.normalize();
        document
    }

    pub fn arena(&self) -> &ItemArena {
        &self.arena
    }

    pub fn item(&self, id: ItemId) -> Option<&DrawingItem> {
        self.arena.get(id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut DrawingItem> {
        self.arena.get_mut(id)
    }

    /// The item currently carrying `handle`.
    pub fn item_by_handle(&self, handle: Handle) -> Option<ItemId> {
        if handle.is_null() {
            return None;
        }
        self.arena
            .iter()
            .find(|(_, item)| item.handle() == handle)
            .map(|(id, _)| id)
    }

    /// The item that owns `id`, as recorded by the last bind or assign pass.
    pub fn owner_of(&self, id: ItemId) -> Option<ItemId> {
        self.arena.owner(id)
    }

    pub fn entity(&self, id: ItemId) -> Option<&Entity> {
        self.arena.get(id).and_then(DrawingItem::as_entity)
    }

    pub fn entity_mut(&mut self, id: ItemId) -> Option<&mut Entity> {
        self.arena.get_mut(id).and_then(DrawingItem::as_entity_mut)
    }

    pub fn object(&self, id: ItemId) -> Option<&Object> {
        self.arena.get(id).and_then(DrawingItem::as_object)
    }

    pub fn object_mut(&mut self, id: ItemId) -> Option<&mut Object> {
        self.arena.get_mut(id).and_then(DrawingItem::as_object_mut)
    }

    pub fn dictionary_mut(&mut self, id: ItemId) -> Option<&mut Dictionary> {
        self.object_mut(id).and_then(Object::as_dictionary_mut)
    }

    pub fn block(&self, id: ItemId) -> Option<&Block> {
        self.arena.get(id).and_then(DrawingItem::as_block)
    }

    pub fn table_record(&self, id: ItemId) -> Option<&TableRecord> {
        self.arena.get(id).and_then(DrawingItem::as_table_record)
    }

    pub fn table_record_mut(&mut self, id: ItemId) -> Option<&mut TableRecord> {
        self.arena.get_mut(id).and_then(DrawingItem::as_table_record_mut)
    }

    /// Top-level entities (the ENTITIES section), in order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter_map(|&id| self.entity(id))
    }

    pub fn entity_ids(&self) -> &[ItemId] {
        &self.entities
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter().filter_map(|&id| self.object(id))
    }

    pub fn object_ids(&self) -> &[ItemId] {
        &self.objects
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter_map(|&id| self.block(id))
    }

    pub fn block_ids(&self) -> &[ItemId] {
        &self.blocks
    }

    /// Entities of a block definition, in order.
    pub fn block_entities(&self, block: ItemId) -> impl Iterator<Item = &Entity> {
        self.block(block)
            .map(|b| b.entities.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|&id| self.entity(id))
    }

    pub fn find_block(&self, name: &str) -> Option<ItemId> {
        self.blocks
            .iter()
            .copied()
            .find(|&id| self.block(id).is_some_and(|b| b.name.eq_ignore_ascii_case(name)))
    }

    pub fn table_id(&self, table_type: TableType) -> ItemId {
        self.tables[&table_type]
    }

    pub fn table(&self, table_type: TableType) -> Option<&SymbolTable> {
        self.arena.get(self.table_id(table_type))?.as_table()
    }

    pub(crate) fn table_mut(&mut self, table_type: TableType) -> Option<&mut SymbolTable> {
        let id = self.table_id(table_type);
        self.arena.get_mut(id)?.as_table_mut()
    }

    fn table_record_ids(&self, table_type: TableType) -> &[ItemId] {
        self.table(table_type).map(|t| t.records.as_slice()).unwrap_or(&[])
    }

    /// Records of one table, in order.
    pub fn table_records(&self, table_type: TableType) -> impl Iterator<Item = &TableRecord> {
        self.table_record_ids(table_type)
            .iter()
            .filter_map(|&id| self.table_record(id))
    }

    /// Look up a table record by name, ignoring case.
    pub fn find_table_record(&self, table_type: TableType, name: &str) -> Option<ItemId> {
        self.table_record_ids(table_type)
            .iter()
            .copied()
            .find(|&id| self.table_record(id).is_some_and(|r| r.name().eq_ignore_ascii_case(name)))
    }

    /// Append a record to the table matching its type.
    pub fn add_table_record(&mut self, record: TableRecord) -> ItemId {
        let table_type = record.table_type();
        let id = self.arena.insert(DrawingItem::TableRecord(record));
        if let Some(table) = self.table_mut(table_type) {
            table.records.push(id);
        }
        id
    }

    /// Add a record unless one with the same name exists; returns the id of
    /// whichever is in the table.
    pub fn ensure_table_record(&mut self, record: TableRecord) -> ItemId {
        match self.find_table_record(record.table_type(), record.name()) {
            Some(id) => id,
            None => self.add_table_record(record),
        }
    }

    /// Add a top-level entity.
    pub fn add_entity(&mut self, entity: impl Into<Entity>) -> ItemId {
        let id = self.arena.insert(DrawingItem::Entity(entity.into()));
        self.entities.push(id);
        id
    }

    /// Add a polyline with its vertices and closing `SEQEND`. Returns the
    /// polyline's id.
    pub fn add_polyline(
        &mut self,
        polyline: Polyline,
        vertices: impl IntoIterator<Item = impl Into<Entity>>,
    ) -> ItemId {
        let id = self.insert_polyline(polyline, vertices);
        self.entities.push(id);
        id
    }

    fn insert_polyline(
        &mut self,
        mut polyline: Polyline,
        vertices: impl IntoIterator<Item = impl Into<Entity>>,
    ) -> ItemId {
        polyline.vertices = vertices
            .into_iter()
            .map(|v| self.arena.insert(DrawingItem::Entity(v.into())))
            .collect();
        polyline.seqend = Some(self.arena.insert(DrawingItem::Entity(Seqend.into())));
        self.arena.insert(DrawingItem::Entity(polyline.into()))
    }

    /// Add a block reference carrying attributes.
    pub fn add_insert(
        &mut self,
        mut insert: Insert,
        attributes: impl IntoIterator<Item = impl Into<Entity>>,
    ) -> ItemId {
        insert.attributes = attributes
            .into_iter()
            .map(|a| self.arena.insert(DrawingItem::Entity(a.into())))
            .collect();
        if !insert.attributes.is_empty() {
            insert.seqend = Some(self.arena.insert(DrawingItem::Entity(Seqend.into())));
        }
        self.add_entity(insert)
    }

    /// Add a block definition, giving it an `ENDBLK` and, when missing, a
    /// block record of the same name.
    pub fn add_block(&mut self, mut block: Block) -> ItemId {
        if block.end.is_none() {
            let mut end = BlockEnd::new();
            end.layer = block.layer.clone();
            end.is_in_paper_space = block.is_in_paper_space;
            block.end = Some(self.arena.insert(DrawingItem::BlockEnd(end)));
        }
        self.ensure_table_record(TableRecord::new(block.name.clone(), BlockRecord::new()));
        let id = self.arena.insert(DrawingItem::Block(block));
        self.blocks.push(id);
        id
    }

    /// Append an entity to a block definition. Returns `None` when `block`
    /// is not a block.
    pub fn add_entity_to_block(&mut self, block: ItemId, entity: impl Into<Entity>) -> Option<ItemId> {
        self.block(block)?;
        let id = self.arena.insert(DrawingItem::Entity(entity.into()));
        self.arena[block].as_block_mut()?.entities.push(id);
        Some(id)
    }

    /// Add an object to the OBJECTS section.
    pub fn add_object(&mut self, object: impl Into<Object>) -> ItemId {
        let id = self.arena.insert(DrawingItem::Object(object.into()));
        self.objects.push(id);
        id
    }

    /// The named object dictionary: the first object, when it is a dictionary.
    pub fn root_dictionary(&self) -> Option<ItemId> {
        self.objects
            .first()
            .copied()
            .filter(|&id| self.object(id).is_some_and(|o| o.as_dictionary().is_some()))
    }

    /// Insert an already-built entity into the arena without listing it
    /// anywhere; the caller links it from a parent.
    pub(crate) fn insert_item(&mut self, item: DrawingItem) -> ItemId {
        self.arena.insert(item)
    }

    pub(crate) fn push_entity_id(&mut self, id: ItemId) {
        self.entities.push(id);
    }

    pub(crate) fn push_block_id(&mut self, id: ItemId) {
        self.blocks.push(id);
    }

    pub(crate) fn push_object_id(&mut self, id: ItemId) {
        self.objects.push(id);
    }

    /// Root items in write order: tables, blocks, entities, objects.
    fn roots(&self) -> Vec<ItemId> {
        self.tables
            .values()
            .chain(&self.blocks)
            .chain(&self.entities)
            .chain(&self.objects)
            .copied()
            .collect()
    }

    /// Resolve every pointer against the handles present and record owners.
    /// Dangling and duplicate handles become warnings.
    pub fn bind_pointers(&mut self) -> BindReport {
        let roots = self.roots();
        let report = handles::bind_pointers(&mut self.arena, &roots);
        for handle in &report.dangling {
            self.notifications.notify(
                NotificationType::Warning,
                format!("pointer to handle {} has no target", handle),
            );
        }
        for handle in &report.duplicates {
            self.notifications.notify(
                NotificationType::Warning,
                format!("handle {} is used by more than one item", handle),
            );
        }
        report
    }

    /// Renumber every item from 1 and store the next free handle as `$HANDSEED`.
    pub fn assign_handles(&mut self) -> Handle {
        let roots = self.roots();
        let (next, map) = handles::assign_handles_with_map(&mut self.arena, &roots);
        self.header.remap_handles(&map);
        self.header.handle_seed = next;
        next
    }

    /// Add the records every drawing is expected to carry:
    ///
    /// * layer `0` plus a layer for every layer name an entity uses
    /// * line types `BYLAYER`, `BYBLOCK` and `CONTINUOUS`
    /// * text style and dimension style `STANDARD`, app id `ACAD`
    /// * block records and blocks `*Model_Space` and `*Paper_Space`
    /// * a root dictionary containing `ACAD_GROUP`
    ///
    /// Existing records are left alone.
    pub fn normalize(&mut self) {
        self.ensure_table_record(TableRecord::new("0", Layer::new()));
        for name in self.used_layer_names() {
            self.ensure_table_record(TableRecord::new(name, Layer::new()));
        }

        self.ensure_table_record(TableRecord::new("BYLAYER", LineType::new()));
        self.ensure_table_record(TableRecord::new("BYBLOCK", LineType::new()));
        self.ensure_table_record(TableRecord::new("CONTINUOUS", LineType::continuous()));
        self.ensure_table_record(TableRecord::new("STANDARD", TextStyle::new()));
        self.ensure_table_record(TableRecord::new("ACAD", AppId));
        self.ensure_table_record(TableRecord::new("STANDARD", DimStyle::new()));

        for name in [MODEL_SPACE, PAPER_SPACE] {
            if self.find_block(name).is_none() {
                self.add_block(Block::new(name));
            } else {
                self.ensure_table_record(TableRecord::new(name, BlockRecord::new()));
            }
        }

        self.ensure_root_dictionary();
    }

    fn used_layer_names(&self) -> Vec<String> {
        let mut seen = AHashSet::new();
        let mut names = Vec::new();
        for (_, item) in self.arena.iter() {
            let layer = match item {
                DrawingItem::Entity(e) => &e.common.layer,
                DrawingItem::Block(b) => &b.layer,
                DrawingItem::BlockEnd(e) => &e.layer,
                _ => continue,
            };
            if !layer.is_empty() && seen.insert(layer.to_ascii_uppercase()) {
                names.push(layer.clone());
            }
        }
        names
    }

    fn ensure_root_dictionary(&mut self) {
        let root = match self.root_dictionary() {
            Some(id) => id,
            None => {
                let id = self.arena.insert(DrawingItem::Object(Dictionary::new().into()));
                self.objects.insert(0, id);
                id
            }
        };
        let has_groups = self
            .object(root)
            .and_then(Object::as_dictionary)
            .is_some_and(|d| d.get("ACAD_GROUP").is_some());
        if !has_groups {
            let groups = self.add_object(Dictionary::new());
            if let Some(dictionary) = self.dictionary_mut(root) {
                dictionary.insert("ACAD_GROUP", Pointer::to(groups));
            }
        }
    }

    /// Read an ASCII or binary DXF, or a DXB, stream.
    pub fn read_from(reader: impl Read) -> Result<Self> {
        DxfReader::from_reader(BufReader::new(reader))?.read()
    }

    pub fn read_with_configuration(
        reader: impl Read,
        configuration: DxfReaderConfiguration,
    ) -> Result<Self> {
        DxfReader::from_reader(BufReader::new(reader))?
            .with_configuration(configuration)
            .read()
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_from(File::open(path)?)
    }

    /// Write ASCII DXF in the header's version.
    pub fn write_to(&mut self, writer: impl Write) -> Result<()> {
        DxfWriter::new(self).write_to_writer(writer)
    }

    pub fn write_binary_to(&mut self, writer: impl Write) -> Result<()> {
        DxfWriter::new(self)
            .with_configuration(DxfWriterConfiguration {
                binary: true,
                ..Default::default()
            })
            .write_to_writer(writer)
    }

    pub fn save_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.write_to(BufWriter::new(File::create(path)?))
    }

    pub fn save_binary_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.write_binary_to(BufWriter::new(File::create(path)?))
    }

    /// Read a DXB stream, sentinel included.
    pub fn read_dxb_from(reader: impl Read) -> Result<Self> {
        DxbReader::new(BufReader::new(reader)).read()
    }

    pub fn load_dxb_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_dxb_from(File::open(path)?)
    }

    /// Write the supported top-level entities as DXB.
    pub fn write_dxb_to(&mut self, writer: impl Write) -> Result<()> {
        DxbWriter::new(writer).write(self)
    }

    pub fn save_dxb_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.write_dxb_to(BufWriter::new(File::create(path)?))
    }
}

impl Default for CadDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Line, Point, Vertex};
    use crate::types::Vector3;

    #[test]
    fn test_new_document_has_all_tables() {
        let document = CadDocument::new();
        for table_type in TableType::ALL {
            let table = document.table(table_type).unwrap();
            assert_eq!(table.table_type, table_type);
            assert!(table.records.is_empty());
        }
        assert_eq!(document.entities().count(), 0);
    }

    #[test]
    fn test_normalize_adds_standard_records() {
        let mut document = CadDocument::new();
        document.add_entity(Entity::from(Point::new()).with_layer("WALLS"));
        document.normalize();

        assert!(document.find_table_record(TableType::Layer, "0").is_some());
        assert!(document.find_table_record(TableType::Layer, "walls").is_some());
        assert!(document.find_table_record(TableType::LineType, "CONTINUOUS").is_some());
        assert!(document.find_table_record(TableType::BlockRecord, MODEL_SPACE).is_some());
        assert!(document.find_block(PAPER_SPACE).is_some());

        let root = document.root_dictionary().unwrap();
        let groups = document.object(root).unwrap().as_dictionary().unwrap();
        assert!(groups.get("ACAD_GROUP").is_some());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut document = CadDocument::with_defaults();
        let items = document.arena().len();
        document.normalize();
        assert_eq!(document.arena().len(), items);
    }

    #[test]
    fn test_assign_handles_sets_seed() {
        let mut document = CadDocument::with_defaults();
        let line = document.add_entity(Line::from_points(Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0)));
        let next = document.assign_handles();

        assert_eq!(next.value() as usize, document.arena().len() + 1);
        assert_eq!(document.header.handle_seed, next);
        let handle = document.entity(line).unwrap().common.handle;
        assert_eq!(document.item_by_handle(handle), Some(line));
    }

    #[test]
    fn test_polyline_children() {
        let mut document = CadDocument::new();
        let id = document.add_polyline(
            Polyline::new(),
            [Vertex::at(Vector3::ZERO), Vertex::at(Vector3::new(1.0, 1.0, 0.0))],
        );
        let children = document.arena()[id].child_items();
        assert_eq!(children.len(), 3);
        assert_eq!(document.entity(children[0]).unwrap().type_name(), "VERTEX");
        assert_eq!(document.entity(children[2]).unwrap().type_name(), "SEQEND");
        assert_eq!(document.entities().count(), 1);
    }
}
