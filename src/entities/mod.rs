//! Graphical entities
//!
//! An [`Entity`] is the data every entity shares ([`EntityCommon`]) plus a
//! type-specific payload ([`EntityType`]). Entities that own sub-entities
//! (polyline vertices, insert attributes, their closing `SEQEND`) refer to
//! them by [`ItemId`].

mod arc;
mod attribute_entity;
mod circle;
mod face3d;
mod hatch;
mod insert;
mod line;
mod lwpolyline;
mod point;
mod polyline;
mod seqend;
mod solid;
mod spline;
mod text;
mod unknown_entity;

pub use arc::Arc;
pub use attribute_entity::{Attribute, AttributeMText};
pub use circle::Circle;
pub use face3d::Face3D;
pub use hatch::{
    boundary_path_flags, BoundaryEdge, BoundaryPath, Hatch, HatchPatternLine, PolylineBoundary, PolylineBoundaryVertex,
};
pub use insert::Insert;
pub use line::Line;
pub use lwpolyline::{LwPolyline, LwVertex};
pub use point::Point;
pub use polyline::{polyline_flags, vertex_flags, Polyline, Vertex};
pub use seqend::Seqend;
pub use solid::Solid;
pub use spline::Spline;
pub use text::Text;
pub use unknown_entity::ProxyEntity;

pub(crate) use hatch::HatchReadState;
pub(crate) use spline::SplineReadState;

use crate::error::Result;
use crate::io::dxf::CodePair;
use crate::item::{Item, ItemArena, ItemId, Pointer};
use crate::record::{push_handle, DxfRecord, RecordExtras};
use crate::types::{Color, DxfVersion, Handle, LineWeight};

/// Data shared by all entities (the `AcDbEntity` subclass).
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    pub handle: Handle,
    pub owner_handle: Handle,
    pub layer: String,
    pub linetype: String,
    pub color: Color,
    pub line_weight: LineWeight,
    pub linetype_scale: f64,
    pub is_invisible: bool,
    pub is_in_paper_space: bool,
    pub extras: RecordExtras,
}

impl EntityCommon {
    pub fn new() -> Self {
        EntityCommon {
            handle: Handle::NULL,
            owner_handle: Handle::NULL,
            layer: "0".to_string(),
            linetype: "BYLAYER".to_string(),
            color: Color::BY_LAYER,
            line_weight: LineWeight::ByLayer,
            linetype_scale: 1.0,
            is_invisible: false,
            is_in_paper_space: false,
            extras: RecordExtras::default(),
        }
    }

    pub fn with_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }

    fn try_set_pair(&mut self, pair: &CodePair) -> bool {
        match pair.code {
            5 => self.handle = pair.handle_value(),
            330 => self.owner_handle = pair.handle_value(),
            8 => self.layer = pair.string_value(),
            6 => self.linetype = pair.string_value(),
            62 => self.color = Color::from_raw_value(pair.short_value()),
            370 => self.line_weight = LineWeight::from_value(pair.short_value()),
            48 => self.linetype_scale = pair.double_value(),
            60 => self.is_invisible = pair.short_value() != 0,
            67 => self.is_in_paper_space = pair.short_value() != 0,
            _ => return false,
        }
        true
    }

    fn add_value_pairs(
        &self,
        pairs: &mut Vec<CodePair>,
        version: DxfVersion,
        output_handles: bool,
        default_owner: Handle,
    ) {
        if output_handles && self.handle.is_valid() {
            push_handle(pairs, 5, self.handle);
        }
        if version.has_object_model() {
            self.extras.add_extension_data_pairs(pairs);
            let owner = if self.owner_handle.is_valid() {
                self.owner_handle
            } else {
                default_owner
            };
            if owner.is_valid() {
                push_handle(pairs, 330, owner);
            }
            pairs.push(CodePair::string(100, "AcDbEntity"));
        }
        if self.is_in_paper_space {
            pairs.push(CodePair::short(67, 1));
        }
        pairs.push(CodePair::string(8, self.layer.clone()));
        if !self.linetype.is_empty() && !self.linetype.eq_ignore_ascii_case("BYLAYER") {
            pairs.push(CodePair::string(6, self.linetype.clone()));
        }
        if !self.color.is_by_layer() {
            pairs.push(CodePair::short(62, self.color.raw_value()));
        }
        if version >= DxfVersion::AC1015 && self.line_weight != LineWeight::ByLayer {
            pairs.push(CodePair::short(370, self.line_weight.value()));
        }
        if version.has_object_model() {
            if self.linetype_scale != 1.0 {
                pairs.push(CodePair::double(48, self.linetype_scale));
            }
            if self.is_invisible {
                pairs.push(CodePair::short(60, 1));
            }
        }
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-specific entity data.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityType {
    Point(Point),
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Text(Text),
    Attribute(Attribute),
    Solid(Solid),
    Trace(Solid),
    Face3D(Face3D),
    LwPolyline(LwPolyline),
    Polyline(Polyline),
    Vertex(Vertex),
    Seqend(Seqend),
    Insert(Insert),
    Spline(Spline),
    Hatch(Hatch),
    /// An entity type this crate does not model; its pairs are kept as overflow.
    Proxy(ProxyEntity),
}

impl EntityType {
    /// Construct the empty payload for a `0` type name.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "POINT" => EntityType::Point(Point::new()),
            "LINE" => EntityType::Line(Line::new()),
            "CIRCLE" => EntityType::Circle(Circle::new()),
            "ARC" => EntityType::Arc(Arc::new()),
            "TEXT" => EntityType::Text(Text::new()),
            "ATTRIB" => EntityType::Attribute(Attribute::new()),
            "SOLID" => EntityType::Solid(Solid::new()),
            "TRACE" => EntityType::Trace(Solid::new()),
            "3DFACE" => EntityType::Face3D(Face3D::new()),
            "LWPOLYLINE" => EntityType::LwPolyline(LwPolyline::new()),
            "POLYLINE" => EntityType::Polyline(Polyline::new()),
            "VERTEX" => EntityType::Vertex(Vertex::new()),
            "SEQEND" => EntityType::Seqend(Seqend),
            "INSERT" => EntityType::Insert(Insert::new()),
            "SPLINE" => EntityType::Spline(Spline::new()),
            "HATCH" => EntityType::Hatch(Hatch::new()),
            other => EntityType::Proxy(ProxyEntity::new(other)),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            EntityType::Point(_) => "POINT",
            EntityType::Line(_) => "LINE",
            EntityType::Circle(_) => "CIRCLE",
            EntityType::Arc(_) => "ARC",
            EntityType::Text(_) => "TEXT",
            EntityType::Attribute(_) => "ATTRIB",
            EntityType::Solid(_) => "SOLID",
            EntityType::Trace(_) => "TRACE",
            EntityType::Face3D(_) => "3DFACE",
            EntityType::LwPolyline(_) => "LWPOLYLINE",
            EntityType::Polyline(_) => "POLYLINE",
            EntityType::Vertex(_) => "VERTEX",
            EntityType::Seqend(_) => "SEQEND",
            EntityType::Insert(_) => "INSERT",
            EntityType::Spline(_) => "SPLINE",
            EntityType::Hatch(_) => "HATCH",
            EntityType::Proxy(p) => &p.type_name,
        }
    }

    fn try_set_pair(&mut self, pair: &CodePair, state: &mut EntityReadState) -> bool {
        match self {
            EntityType::Point(e) => e.try_set_pair(pair),
            EntityType::Line(e) => e.try_set_pair(pair),
            EntityType::Circle(e) => e.try_set_pair(pair),
            EntityType::Arc(e) => e.try_set_pair(pair),
            EntityType::Text(e) => e.try_set_pair(pair),
            EntityType::Attribute(e) => e.try_set_pair(pair, state.subclass.as_deref()),
            EntityType::Solid(e) | EntityType::Trace(e) => e.try_set_pair(pair),
            EntityType::Face3D(e) => e.try_set_pair(pair),
            EntityType::LwPolyline(e) => e.try_set_pair(pair),
            EntityType::Polyline(e) => e.try_set_pair(pair),
            EntityType::Vertex(e) => e.try_set_pair(pair),
            EntityType::Seqend(_) => false,
            EntityType::Insert(e) => e.try_set_pair(pair),
            EntityType::Spline(e) => e.try_set_pair(pair, &mut state.spline),
            EntityType::Hatch(e) => e.try_set_pair(pair, &mut state.hatch),
            EntityType::Proxy(_) => false,
        }
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        match self {
            EntityType::Point(e) => e.add_value_pairs(pairs, version),
            EntityType::Line(e) => e.add_value_pairs(pairs, version),
            EntityType::Circle(e) => e.add_value_pairs(pairs, version),
            EntityType::Arc(e) => e.add_value_pairs(pairs, version),
            EntityType::Text(e) => e.add_value_pairs(pairs, version),
            EntityType::Attribute(e) => e.add_value_pairs(pairs, version),
            EntityType::Solid(e) | EntityType::Trace(e) => e.add_value_pairs(pairs, version),
            EntityType::Face3D(e) => e.add_value_pairs(pairs, version),
            EntityType::LwPolyline(e) => e.add_value_pairs(pairs, version),
            EntityType::Polyline(e) => e.add_value_pairs(pairs, version),
            EntityType::Vertex(e) => e.add_value_pairs(pairs, version),
            EntityType::Seqend(_) => {}
            EntityType::Insert(e) => e.add_value_pairs(pairs, version),
            EntityType::Spline(e) => e.add_value_pairs(pairs, version),
            EntityType::Hatch(e) => e.add_value_pairs(pairs, version),
            EntityType::Proxy(_) => {}
        }
    }
}

/// Parse state for one entity read.
#[derive(Debug, Default)]
pub struct EntityReadState {
    /// Most recent `100` (or `101`) marker
    subclass: Option<String>,
    spline: SplineReadState,
    hatch: HatchReadState,
}

/// A graphical entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub common: EntityCommon,
    pub specific: EntityType,
}

impl Entity {
    pub fn new(specific: EntityType) -> Self {
        Entity {
            common: EntityCommon::new(),
            specific,
        }
    }

    /// An empty entity for a `0` type name; unknown names become proxies.
    pub fn from_type_name(name: &str) -> Self {
        Entity::new(EntityType::from_type_name(name))
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.common.layer = layer.into();
        self
    }

    pub fn type_name(&self) -> &str {
        self.specific.type_name()
    }

    pub fn layer(&self) -> &str {
        &self.common.layer
    }

    pub fn xdata(&self) -> &crate::xdata::ExtendedData {
        &self.common.extras.xdata
    }

    /// Write with `default_owner` as the `330` value when the entity has
    /// no owner handle of its own (Release 13 and later).
    pub fn add_value_pairs_owned_by(
        &self,
        pairs: &mut Vec<CodePair>,
        version: DxfVersion,
        output_handles: bool,
        default_owner: Handle,
    ) {
        pairs.push(CodePair::string(0, self.type_name()));
        self.common
            .add_value_pairs(pairs, version, output_handles, default_owner);
        self.specific.add_value_pairs(pairs, version);
        if matches!(self.specific, EntityType::Proxy(_)) {
            self.common.extras.add_excess_pairs(pairs);
        }
        self.common.extras.add_xdata_pairs(pairs);
    }

    /// Write the records that follow this one: polyline vertices or insert
    /// attributes, then their `SEQEND`.
    pub fn add_trailing_code_pairs(
        &self,
        pairs: &mut Vec<CodePair>,
        version: DxfVersion,
        output_handles: bool,
        arena: &ItemArena,
    ) {
        let (children, seqend) = match &self.specific {
            EntityType::Polyline(p) => (&p.vertices, p.seqend),
            EntityType::Insert(i) if !i.attributes.is_empty() => (&i.attributes, i.seqend),
            _ => return,
        };
        let owner = self.common.handle;
        for &child in children {
            if let Some(entity) = arena[child].as_entity() {
                entity.add_value_pairs_owned_by(pairs, version, output_handles, owner);
            }
        }
        match seqend.and_then(|id| arena[id].as_entity()) {
            Some(entity) => entity.add_value_pairs_owned_by(pairs, version, output_handles, owner),
            None => Entity::from(Seqend)
                .with_layer(self.common.layer.clone())
                .add_value_pairs_owned_by(pairs, version, false, owner),
        }
    }
}

impl DxfRecord for Entity {
    type ReadState = EntityReadState;

    fn try_set_pair(&mut self, pair: &CodePair, state: &mut EntityReadState) -> bool {
        if pair.code == 100 || pair.code == 101 {
            let marker = pair.string_value();
            let keep_for_proxy =
                matches!(self.specific, EntityType::Proxy(_)) && marker != "AcDbEntity";
            state.subclass = Some(marker);
            return !keep_for_proxy;
        }
        let in_common = matches!(state.subclass.as_deref(), None | Some("AcDbEntity"));
        if in_common {
            self.common.try_set_pair(pair) || self.specific.try_set_pair(pair, state)
        } else {
            self.specific.try_set_pair(pair, state) || self.common.try_set_pair(pair)
        }
    }

    fn extras_mut(&mut self) -> &mut RecordExtras {
        &mut self.common.extras
    }

    fn after_read(&mut self, state: EntityReadState) -> Result<()> {
        match &mut self.specific {
            EntityType::Spline(spline) => spline.after_read(state.spline),
            _ => Ok(()),
        }
    }

    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion, output_handles: bool) {
        self.add_value_pairs_owned_by(pairs, version, output_handles, Handle::NULL);
    }
}

impl Item for Entity {
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

    fn child_items(&self) -> Vec<ItemId> {
        let (children, seqend) = match &self.specific {
            EntityType::Polyline(p) => (&p.vertices, p.seqend),
            EntityType::Insert(i) => (&i.attributes, i.seqend),
            _ => return Vec::new(),
        };
        children.iter().copied().chain(seqend).collect()
    }

    fn pointers(&self) -> Vec<&Pointer> {
        match &self.specific {
            EntityType::Hatch(h) => h.boundary_paths.iter().flat_map(|p| p.source_boundaries.iter()).collect(),
            _ => Vec::new(),
        }
    }

    fn pointers_mut(&mut self) -> Vec<&mut Pointer> {
        match &mut self.specific {
            EntityType::Hatch(h) => h
                .boundary_paths
                .iter_mut()
                .flat_map(|p| p.source_boundaries.iter_mut())
                .collect(),
            _ => Vec::new(),
        }
    }

    fn is_entity(&self) -> bool {
        true
    }
}

macro_rules! impl_into_entity {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Entity {
                fn from(value: $ty) -> Self {
                    Entity::new(EntityType::$variant(value))
                }
            }
        )*
    };
}

impl_into_entity! {
    Point => Point,
    Line => Line,
    Circle => Circle,
    Arc => Arc,
    Text => Text,
    Attribute => Attribute,
    Solid => Solid,
    Face3D => Face3D,
    LwPolyline => LwPolyline,
    Polyline => Polyline,
    Vertex => Vertex,
    Seqend => Seqend,
    Insert => Insert,
    Spline => Spline,
    Hatch => Hatch,
    ProxyEntity => Proxy,
}

impl From<EntityType> for Entity {
    fn from(specific: EntityType) -> Self {
        Entity::new(specific)
    }
}
