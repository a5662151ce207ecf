use super::{Join, JoinColumn, JoinTable, MorphColumn};
use crate::schema::def::RelationKind;

/// A compiled attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Scalar(ScalarAttribute),
    Relation(RelationAttribute),
}

/// A scalar attribute mapped to a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarAttribute {
    pub kind: ScalarKind,

    /// Backing column name. Defaults to the snake-cased attribute name when
    /// not set by the compiler.
    pub column_name: Option<String>,

    pub unsigned: bool,

    pub nullable: bool,
}

/// Column type vocabulary.
///
/// Only the kinds the compiler injects are structured; user-declared scalar
/// kinds pass through opaquely for the storage layer to interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarKind {
    Increments,
    Integer,
    Float,
    String,
    Declared(String),
}

/// A relation attribute with its storage strategy resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationAttribute {
    pub kind: RelationKind,

    pub target: Option<String>,

    pub inversed_by: Option<String>,

    pub mapped_by: Option<String>,

    pub morph_by: Option<String>,

    pub use_join_table: bool,

    /// True once the relation compiler has resolved this side as responsible
    /// for the join metadata.
    pub owner: bool,

    /// Join metadata, wired during the second compilation pass. `None` on
    /// passive sides until the owner mirrors its descriptor over.
    pub join: Option<Join>,
}

impl Attribute {
    pub fn is_relation(&self) -> bool {
        matches!(self, Self::Relation(_))
    }

    pub fn as_scalar(&self) -> Option<&ScalarAttribute> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&RelationAttribute> {
        match self {
            Self::Relation(relation) => Some(relation),
            _ => None,
        }
    }
}

impl ScalarAttribute {
    pub fn declared(kind: &str) -> Self {
        Self {
            kind: ScalarKind::Declared(kind.to_string()),
            column_name: None,
            unsigned: false,
            nullable: true,
        }
    }

    pub fn increments() -> Self {
        Self {
            kind: ScalarKind::Increments,
            column_name: None,
            unsigned: false,
            nullable: false,
        }
    }

    pub fn unsigned_integer() -> Self {
        Self {
            kind: ScalarKind::Integer,
            column_name: None,
            unsigned: true,
            nullable: true,
        }
    }

    pub fn string() -> Self {
        Self {
            kind: ScalarKind::String,
            column_name: None,
            unsigned: false,
            nullable: true,
        }
    }

    /// Fractional ordering column; nullable so unordered rows stay cheap.
    pub fn order_column() -> Self {
        Self {
            kind: ScalarKind::Float,
            column_name: None,
            unsigned: true,
            nullable: true,
        }
    }

    pub fn with_column_name(mut self, name: &str) -> Self {
        self.column_name = Some(name.to_string());
        self
    }
}

impl RelationAttribute {
    /// Whether the relation declares an inverse side at all.
    pub fn is_bidirectional(&self) -> bool {
        self.inversed_by.is_some() || self.mapped_by.is_some()
    }

    /// The owner is the side responsible for producing join metadata: the
    /// only side when unidirectional, the `inversedBy` side otherwise.
    pub fn is_owner(&self) -> bool {
        !self.is_bidirectional() || self.inversed_by.is_some()
    }

    pub fn join_table(&self) -> Option<&JoinTable> {
        match &self.join {
            Some(Join::Table(table)) => Some(table),
            _ => None,
        }
    }

    pub fn join_column(&self) -> Option<&JoinColumn> {
        match &self.join {
            Some(Join::Column(column)) => Some(column),
            _ => None,
        }
    }

    pub fn morph_column(&self) -> Option<&MorphColumn> {
        match &self.join {
            Some(Join::MorphColumn(column)) => Some(column),
            _ => None,
        }
    }
}
