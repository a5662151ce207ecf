//! Compiled storage metadata.

mod attribute;
pub use attribute::{Attribute, RelationAttribute, ScalarAttribute, ScalarKind};

mod fk;
pub use fk::{ForeignKey, ReferentialAction};

mod index;
pub use index::{Index, IndexKind};

mod join;
pub use join::{Join, JoinColumn, JoinTable, MorphColumn, OrderBy, SortOrder, TypeColumn};

use indexmap::IndexMap;

/// Storage metadata for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Uniquely identifies the model within the schema. Synthesized models
    /// use their table name as uid.
    pub uid: String,

    /// Singular entity name, used to derive join and order column names.
    pub singular_name: String,

    /// Name of the backing table.
    pub table_name: String,

    pub kind: ModelKind,

    /// Compiled attributes, in declaration order (injected identity
    /// attributes first).
    pub attributes: IndexMap<String, Attribute>,

    pub indexes: Vec<Index>,

    pub foreign_keys: Vec<ForeignKey>,

    pub lifecycles: Lifecycles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    ContentType,
    Component,

    /// A synthesized auxiliary table: a relation join table, a morph join
    /// table, or a component link table.
    JoinTable,
}

/// Runtime lifecycle subscribers. The compiler never registers any; the
/// runtime attaches them after the schema is frozen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycles {}

impl Model {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn is_content_type(&self) -> bool {
        matches!(self.kind, ModelKind::ContentType)
    }

    pub fn is_component(&self) -> bool {
        matches!(self.kind, ModelKind::Component)
    }

    pub fn is_join_table(&self) -> bool {
        matches!(self.kind, ModelKind::JoinTable)
    }
}
