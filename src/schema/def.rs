//! Declared content model, before compilation.

mod attribute;
pub use attribute::{
    AttributeSpec, ComponentSpec, DynamicZoneSpec, MediaSpec, RelationKind, RelationSpec,
    ScalarSpec,
};

use indexmap::IndexMap;

/// A declared content type or component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Definition {
    /// Globally unique identifier across content types and components.
    pub uid: String,

    /// Singular entity name, used to derive join and order column names.
    pub singular_name: String,

    /// Name of the table this definition is stored in.
    pub table_name: String,

    pub kind: DefKind,

    pub attributes: IndexMap<String, AttributeSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum DefKind {
    /// A top-level persisted entity kind. Gains a `documentId` identity.
    ContentType,

    /// A reusable attribute group attached to content types through a link
    /// table. Never queried independently.
    Component,
}

impl Definition {
    pub fn content_type(uid: &str, singular_name: &str, table_name: &str) -> Self {
        Self::new(uid, singular_name, table_name, DefKind::ContentType)
    }

    pub fn component(uid: &str, singular_name: &str, table_name: &str) -> Self {
        Self::new(uid, singular_name, table_name, DefKind::Component)
    }

    fn new(uid: &str, singular_name: &str, table_name: &str, kind: DefKind) -> Self {
        Self {
            uid: uid.to_string(),
            singular_name: singular_name.to_string(),
            table_name: table_name.to_string(),
            kind,
            attributes: IndexMap::new(),
        }
    }

    /// Adds an attribute, preserving declaration order.
    pub fn attribute(mut self, name: &str, spec: AttributeSpec) -> Self {
        self.attributes.insert(name.to_string(), spec);
        self
    }

    pub fn is_content_type(&self) -> bool {
        matches!(self.kind, DefKind::ContentType)
    }
}
