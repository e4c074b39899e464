//! Drawing items, their arena, and pointers between them
//!
//! Everything with a handle lives in one [`ItemArena`] and is addressed by
//! [`ItemId`]. Structural ownership (a table's records, a block's entities,
//! a polyline's vertices) is expressed by child id lists; cross references
//! to arbitrary items are [`Pointer`]s, which keep the handle read from the
//! file until the bind pass resolves them.

use std::ops::{Index, IndexMut};

use crate::blocks::{Block, BlockEnd};
use crate::entities::Entity;
use crate::objects::Object;
use crate::record::{DxfRecord, RecordExtras};
use crate::tables::{SymbolTable, TableRecord};
use crate::types::Handle;

/// Index of an item in its drawing's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

impl ItemId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A reference to another item.
///
/// `handle` is what was read from (or will be written to) the file; `item`
/// is the resolved target. Writing uses the target's freshly assigned
/// handle, so only `item` matters once bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pointer {
    pub handle: Handle,
    pub item: Option<ItemId>,
}

impl Pointer {
    /// An unbound pointer holding a handle from the file.
    pub fn new(handle: Handle) -> Self {
        Pointer { handle, item: None }
    }

    /// A pointer bound to `item`.
    pub fn to(item: ItemId) -> Self {
        Pointer {
            handle: Handle::NULL,
            item: Some(item),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.item.is_some()
    }
}

/// Handle bookkeeping shared by every item kind.
pub trait Item {
    fn handle(&self) -> Handle;
    fn set_handle(&mut self, handle: Handle);
    fn owner_handle(&self) -> Handle;
    fn set_owner_handle(&mut self, handle: Handle);

    /// Structurally owned children, in write order.
    fn child_items(&self) -> Vec<ItemId> {
        Vec::new()
    }

    fn pointers(&self) -> Vec<&Pointer> {
        Vec::new()
    }

    fn pointers_mut(&mut self) -> Vec<&mut Pointer> {
        Vec::new()
    }

    fn is_entity(&self) -> bool {
        false
    }

    fn is_dictionary(&self) -> bool {
        false
    }
}

/// Any item that can live in a drawing.
#[derive(Debug, Clone)]
pub enum DrawingItem {
    Table(SymbolTable),
    TableRecord(TableRecord),
    Block(Block),
    BlockEnd(BlockEnd),
    Entity(Entity),
    Object(Object),
}

macro_rules! delegate {
    ($self:expr, $item:ident => $body:expr) => {
        match $self {
            DrawingItem::Table($item) => $body,
            DrawingItem::TableRecord($item) => $body,
            DrawingItem::Block($item) => $body,
            DrawingItem::BlockEnd($item) => $body,
            DrawingItem::Entity($item) => $body,
            DrawingItem::Object($item) => $body,
        }
    };
}

impl Item for DrawingItem {
    fn handle(&self) -> Handle {
        delegate!(self, i => i.handle())
    }

    fn set_handle(&mut self, handle: Handle) {
        delegate!(self, i => i.set_handle(handle))
    }

    fn owner_handle(&self) -> Handle {
        delegate!(self, i => i.owner_handle())
    }

    fn set_owner_handle(&mut self, handle: Handle) {
        delegate!(self, i => i.set_owner_handle(handle))
    }

    fn child_items(&self) -> Vec<ItemId> {
        delegate!(self, i => i.child_items())
    }

    fn pointers(&self) -> Vec<&Pointer> {
        delegate!(self, i => i.pointers())
    }

    fn pointers_mut(&mut self) -> Vec<&mut Pointer> {
        delegate!(self, i => i.pointers_mut())
    }

    fn is_entity(&self) -> bool {
        delegate!(self, i => i.is_entity())
    }

    fn is_dictionary(&self) -> bool {
        delegate!(self, i => i.is_dictionary())
    }
}

impl DrawingItem {
    /// The DXF type name (`LINE`, `DICTIONARY`, `TABLE`, ...).
    pub fn type_name(&self) -> &str {
        match self {
            DrawingItem::Table(_) => "TABLE",
            DrawingItem::TableRecord(r) => r.type_name(),
            DrawingItem::Block(_) => "BLOCK",
            DrawingItem::BlockEnd(_) => "ENDBLK",
            DrawingItem::Entity(e) => e.type_name(),
            DrawingItem::Object(o) => o.type_name(),
        }
    }

    pub fn extras_mut(&mut self) -> &mut RecordExtras {
        delegate!(self, i => i.extras_mut())
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            DrawingItem::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_entity_mut(&mut self) -> Option<&mut Entity> {
        match self {
            DrawingItem::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            DrawingItem::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            DrawingItem::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            DrawingItem::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            DrawingItem::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_block_end(&self) -> Option<&BlockEnd> {
        match self {
            DrawingItem::BlockEnd(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&SymbolTable> {
        match self {
            DrawingItem::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut SymbolTable> {
        match self {
            DrawingItem::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_record(&self) -> Option<&TableRecord> {
        match self {
            DrawingItem::TableRecord(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_table_record_mut(&mut self) -> Option<&mut TableRecord> {
        match self {
            DrawingItem::TableRecord(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct ItemSlot {
    item: DrawingItem,
    owner: Option<ItemId>,
}

/// Storage for every item of a drawing plus each item's owner link.
#[derive(Debug, Clone, Default)]
pub struct ItemArena {
    slots: Vec<ItemSlot>,
}

impl ItemArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: DrawingItem) -> ItemId {
        self.slots.push(ItemSlot { item, owner: None });
        ItemId(self.slots.len() - 1)
    }

    pub fn get(&self, id: ItemId) -> Option<&DrawingItem> {
        self.slots.get(id.0).map(|s| &s.item)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut DrawingItem> {
        self.slots.get_mut(id.0).map(|s| &mut s.item)
    }

    /// The item that owns `id`, if any.
    pub fn owner(&self, id: ItemId) -> Option<ItemId> {
        self.slots.get(id.0).and_then(|s| s.owner)
    }

    /// Record `owner` as the owner of `id` and copy its handle into `id`'s
    /// owner handle.
    pub fn set_owner(&mut self, id: ItemId, owner: ItemId) {
        let owner_handle = self[owner].handle();
        let slot = &mut self.slots[id.0];
        slot.owner = Some(owner);
        slot.item.set_owner_handle(owner_handle);
    }

    /// Record the owner link only.
    pub(crate) fn set_owner_link(&mut self, id: ItemId, owner: Option<ItemId>) {
        self.slots[id.0].owner = owner;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &DrawingItem)> {
        self.slots.iter().enumerate().map(|(i, s)| (ItemId(i), &s.item))
    }
}

impl Index<ItemId> for ItemArena {
    type Output = DrawingItem;

    fn index(&self, id: ItemId) -> &DrawingItem {
        &self.slots[id.0].item
    }
}

impl IndexMut<ItemId> for ItemArena {
    fn index_mut(&mut self, id: ItemId) -> &mut DrawingItem {
        &mut self.slots[id.0].item
    }
}
