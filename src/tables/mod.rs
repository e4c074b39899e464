//! Symbol tables and their records
//!
//! The TABLES section holds one [`SymbolTable`] per [`TableType`]. A table
//! owns its records by [`ItemId`]; each [`TableRecord`] is the shared
//! name/flags/handle data plus a type-specific payload.

pub mod appid;
pub mod block_record;
pub mod dimstyle;
pub mod layer;
pub mod linetype;
pub mod textstyle;
pub mod ucs;
pub mod view;
pub mod vport;

pub use appid::AppId;
pub use block_record::BlockRecord;
pub use dimstyle::DimStyle;
pub use layer::{Layer, LayerFlags};
pub use linetype::{LineType, LineTypeElement};
pub use textstyle::{TextGenerationFlags, TextStyle};
pub use ucs::Ucs;
pub use view::View;
pub use vport::VPort;

use crate::io::dxf::CodePair;
use crate::item::{Item, ItemId, Pointer};
use crate::record::{push_handle, short_count, DxfRecord, RecordExtras};
use crate::types::{DxfVersion, Handle};

/// The nine symbol table kinds, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableType {
    VPort,
    LineType,
    Layer,
    TextStyle,
    View,
    Ucs,
    AppId,
    DimStyle,
    BlockRecord,
}

impl TableType {
    pub const ALL: [TableType; 9] = [
        TableType::VPort,
        TableType::LineType,
        TableType::Layer,
        TableType::TextStyle,
        TableType::View,
        TableType::Ucs,
        TableType::AppId,
        TableType::DimStyle,
        TableType::BlockRecord,
    ];

    /// Table name, which is also the `0` type name of its records.
    pub fn name(&self) -> &'static str {
        match self {
            TableType::VPort => "VPORT",
            TableType::LineType => "LTYPE",
            TableType::Layer => "LAYER",
            TableType::TextStyle => "STYLE",
            TableType::View => "VIEW",
            TableType::Ucs => "UCS",
            TableType::AppId => "APPID",
            TableType::DimStyle => "DIMSTYLE",
            TableType::BlockRecord => "BLOCK_RECORD",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    fn record_subclass_marker(&self) -> &'static str {
        match self {
            TableType::VPort => "AcDbViewportTableRecord",
            TableType::LineType => "AcDbLinetypeTableRecord",
            TableType::Layer => "AcDbLayerTableRecord",
            TableType::TextStyle => "AcDbTextStyleTableRecord",
            TableType::View => "AcDbViewTableRecord",
            TableType::Ucs => "AcDbUCSTableRecord",
            TableType::AppId => "AcDbRegAppTableRecord",
            TableType::DimStyle => "AcDbDimStyleTableRecord",
            TableType::BlockRecord => "AcDbBlockTableRecord",
        }
    }

    /// Code of the record's own handle; dimension styles use 105.
    fn handle_code(&self) -> i32 {
        match self {
            TableType::DimStyle => 105,
            _ => 5,
        }
    }

    /// Whether the table exists in files of `version`.
    pub fn is_supported(&self, version: DxfVersion) -> bool {
        match self {
            TableType::BlockRecord => version.has_object_model(),
            _ => true,
        }
    }
}

/// A `TABLE` record: the container of one kind of table record.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable {
    pub handle: Handle,
    pub owner_handle: Handle,
    pub table_type: TableType,
    pub records: Vec<ItemId>,
    pub extras: RecordExtras,
}

impl SymbolTable {
    pub fn new(table_type: TableType) -> Self {
        SymbolTable {
            handle: Handle::NULL,
            owner_handle: Handle::NULL,
            table_type,
            records: Vec::new(),
            extras: RecordExtras::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.table_type.name()
    }

    /// Write the `TABLE` header; the caller writes the records and `ENDTAB`.
    pub fn add_header_pairs(
        &self,
        pairs: &mut Vec<CodePair>,
        version: DxfVersion,
        output_handles: bool,
        record_count: usize,
    ) {
        pairs.push(CodePair::string(0, "TABLE"));
        pairs.push(CodePair::string(2, self.name()));
        if output_handles && self.handle.is_valid() {
            push_handle(pairs, 5, self.handle);
        }
        if version.has_object_model() {
            self.extras.add_extension_data_pairs(pairs);
            push_handle(pairs, 330, self.owner_handle);
            pairs.push(CodePair::string(100, "AcDbSymbolTable"));
        }
        pairs.push(CodePair::short(70, short_count(record_count)));
        if version.has_object_model() && self.table_type == TableType::DimStyle {
            pairs.push(CodePair::string(100, "AcDbDimStyleTable"));
        }
        self.extras.add_xdata_pairs(pairs);
    }
}

impl DxfRecord for SymbolTable {
    type ReadState = ();

    fn try_set_pair(&mut self, pair: &CodePair, _state: &mut ()) -> bool {
        match pair.code {
            5 => self.handle = pair.handle_value(),
            330 => self.owner_handle = pair.handle_value(),
            // table name, record count, subclass markers and the dimension
            // style table's own record list are all derived on write
            2 | 70 | 71 | 100 | 340 => {}
            _ => return false,
        }
        true
    }

    fn extras_mut(&mut self) -> &mut RecordExtras {
        &mut self.extras
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion, output_handles: bool) {
        self.add_header_pairs(pairs, version, output_handles, self.records.len());
    }
}

impl Item for SymbolTable {
    fn handle(&self) -> Handle {
        self.handle
    }

    fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    fn owner_handle(&self) -> Handle {
        self.owner_handle
    }

    fn set_owner_handle(&mut self, handle: Handle) {
        self.owner_handle = handle;
    }

    fn child_items(&self) -> Vec<ItemId> {
        self.records.clone()
    }
}

/// Type-specific table record data.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRecordType {
    VPort(VPort),
    LineType(LineType),
    Layer(Layer),
    TextStyle(TextStyle),
    View(View),
    Ucs(Ucs),
    AppId(AppId),
    DimStyle(DimStyle),
    BlockRecord(BlockRecord),
}

impl TableRecordType {
    pub fn for_table(table_type: TableType) -> Self {
        match table_type {
            TableType::VPort => TableRecordType::VPort(VPort::new()),
            TableType::LineType => TableRecordType::LineType(LineType::new()),
            TableType::Layer => TableRecordType::Layer(Layer::new()),
            TableType::TextStyle => TableRecordType::TextStyle(TextStyle::new()),
            TableType::View => TableRecordType::View(View::new()),
            TableType::Ucs => TableRecordType::Ucs(Ucs::new()),
            TableType::AppId => TableRecordType::AppId(AppId),
            TableType::DimStyle => TableRecordType::DimStyle(DimStyle::new()),
            TableType::BlockRecord => TableRecordType::BlockRecord(BlockRecord::new()),
        }
    }

    pub fn table_type(&self) -> TableType {
        match self {
            TableRecordType::VPort(_) => TableType::VPort,
            TableRecordType::LineType(_) => TableType::LineType,
            TableRecordType::Layer(_) => TableType::Layer,
            TableRecordType::TextStyle(_) => TableType::TextStyle,
            TableRecordType::View(_) => TableType::View,
            TableRecordType::Ucs(_) => TableType::Ucs,
            TableRecordType::AppId(_) => TableType::AppId,
            TableRecordType::DimStyle(_) => TableType::DimStyle,
            TableRecordType::BlockRecord(_) => TableType::BlockRecord,
        }
    }

    fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match self {
            TableRecordType::VPort(r) => r.try_set_pair(pair),
            TableRecordType::LineType(r) => r.try_set_pair(pair),
            TableRecordType::Layer(r) => r.try_set_pair(pair),
            TableRecordType::TextStyle(r) => r.try_set_pair(pair),
            TableRecordType::View(r) => r.try_set_pair(pair),
            TableRecordType::Ucs(r) => r.try_set_pair(pair),
            TableRecordType::AppId(_) => false,
            TableRecordType::DimStyle(r) => r.try_set_pair(pair),
            TableRecordType::BlockRecord(r) => r.try_set_pair(pair),
        }
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        match self {
            TableRecordType::VPort(r) => r.add_value_pairs(pairs, version),
            TableRecordType::LineType(r) => r.add_value_pairs(pairs, version),
            TableRecordType::Layer(r) => r.add_value_pairs(pairs, version),
            TableRecordType::TextStyle(r) => r.add_value_pairs(pairs, version),
            TableRecordType::View(r) => r.add_value_pairs(pairs, version),
            TableRecordType::Ucs(r) => r.add_value_pairs(pairs, version),
            TableRecordType::AppId(_) => {}
            TableRecordType::DimStyle(r) => r.add_value_pairs(pairs, version),
            TableRecordType::BlockRecord(r) => r.add_value_pairs(pairs, version),
        }
    }
}

/// Fields every table record has.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRecordCommon {
    pub handle: Handle,
    pub owner_handle: Handle,
    pub name: String,
    pub flags: i16,
    pub extras: RecordExtras,
}

/// One entry of a symbol table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRecord {
    pub common: TableRecordCommon,
    pub specific: TableRecordType,
}

impl TableRecord {
    pub fn new(name: impl Into<String>, specific: impl Into<TableRecordType>) -> Self {
        TableRecord {
            common: TableRecordCommon {
                name: name.into(),
                ..Default::default()
            },
            specific: specific.into(),
        }
    }

    /// An empty record for the table named by a `0` pair.
    pub fn for_table(table_type: TableType) -> Self {
        TableRecord {
            common: TableRecordCommon::default(),
            specific: TableRecordType::for_table(table_type),
        }
    }

    pub fn name(&self) -> &str {
        &self.common.name
    }

    pub fn table_type(&self) -> TableType {
        self.specific.table_type()
    }

    pub fn type_name(&self) -> &'static str {
        self.table_type().name()
    }

    /// The `70` flags read as layer state; only meaningful for layers.
    pub fn layer_flags(&self) -> LayerFlags {
        LayerFlags::from_bits_truncate(self.common.flags)
    }

    pub fn set_layer_flags(&mut self, flags: LayerFlags) {
        self.common.flags = (self.common.flags & !LayerFlags::all().bits()) | flags.bits();
    }

    pub fn as_layer(&self) -> Option<&Layer> {
        match &self.specific {
            TableRecordType::Layer(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn as_line_type(&self) -> Option<&LineType> {
        match &self.specific {
            TableRecordType::LineType(line_type) => Some(line_type),
            _ => None,
        }
    }

    pub fn as_block_record(&self) -> Option<&BlockRecord> {
        match &self.specific {
            TableRecordType::BlockRecord(record) => Some(record),
            _ => None,
        }
    }
}

impl DxfRecord for TableRecord {
    type ReadState = ();

    fn try_set_pair(&mut self, pair: &CodePair, _state: &mut ()) -> bool {
        // Block records use 70 for insertion units, so the payload goes first.
        if self.specific.try_set_pair(pair) {
            return true;
        }
        let table_type = self.table_type();
        match pair.code {
            code if code == table_type.handle_code() => self.common.handle = pair.handle_value(),
            330 => self.common.owner_handle = pair.handle_value(),
            2 => self.common.name = pair.string_value(),
            70 => self.common.flags = pair.short_value(),
            100 => {}
            _ => return false,
        }
        true
    }

    fn extras_mut(&mut self) -> &mut RecordExtras {
        &mut self.common.extras
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion, output_handles: bool) {
        let table_type = self.table_type();
        pairs.push(CodePair::string(0, table_type.name()));
        if output_handles && self.common.handle.is_valid() {
            push_handle(pairs, table_type.handle_code(), self.common.handle);
        }
        if version.has_object_model() {
            self.common.extras.add_extension_data_pairs(pairs);
            push_handle(pairs, 330, self.common.owner_handle);
            pairs.push(CodePair::string(100, "AcDbSymbolTableRecord"));
            pairs.push(CodePair::string(100, table_type.record_subclass_marker()));
        }
        pairs.push(CodePair::string(2, self.common.name.as_str()));
        if table_type != TableType::BlockRecord {
            pairs.push(CodePair::short(70, self.common.flags));
        }
        self.specific.add_value_pairs(pairs, version);
        self.common.extras.add_excess_pairs(pairs);
        self.common.extras.add_xdata_pairs(pairs);
    }
}

impl Item for TableRecord {
    fn handle(&self) -> Handle {
        self.common.handle
    }

    fn set_handle(&mut self, handle: Handle) {
        self.common.handle = handle;
    }

    fn owner_handle(&self) -> Handle {
        self.common.owner_handle
    }

    fn set_owner_handle(&mut self, handle: Handle) {
        self.common.owner_handle = handle;
    }

    fn pointers(&self) -> Vec<&Pointer> {
        match &self.specific {
            TableRecordType::LineType(line_type) => line_type.elements.iter().map(|e| &e.style).collect(),
            TableRecordType::Layer(layer) => vec![&layer.plot_style, &layer.material],
            TableRecordType::DimStyle(style) => vec![&style.text_style],
            TableRecordType::BlockRecord(record) => vec![&record.layout],
            _ => Vec::new(),
        }
    }

    fn pointers_mut(&mut self) -> Vec<&mut Pointer> {
        match &mut self.specific {
            TableRecordType::LineType(line_type) => {
                line_type.elements.iter_mut().map(|e| &mut e.style).collect()
            }
            TableRecordType::Layer(layer) => vec![&mut layer.plot_style, &mut layer.material],
            TableRecordType::DimStyle(style) => vec![&mut style.text_style],
            TableRecordType::BlockRecord(record) => vec![&mut record.layout],
            _ => Vec::new(),
        }
    }
}

macro_rules! impl_into_record_type {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for TableRecordType {
                fn from(value: $ty) -> Self {
                    TableRecordType::$ty(value)
                }
            }
        )*
    };
}

impl_into_record_type!(VPort, LineType, Layer, TextStyle, View, Ucs, AppId, DimStyle, BlockRecord);
