use std::fmt;

/// A declared attribute, tagged by type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum AttributeSpec {
    /// A scalar attribute. The kind (`string`, `integer`, `datetime`, ...) is
    /// opaque to the compiler and passed through to the storage layer.
    Scalar(ScalarSpec),
    Media(MediaSpec),
    Component(ComponentSpec),
    #[cfg_attr(feature = "serde", serde(rename = "dynamiczone"))]
    DynamicZone(DynamicZoneSpec),
    Relation(RelationSpec),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarSpec {
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaSpec {
    /// When true, the attribute holds any number of media entries.
    pub multiple: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentSpec {
    /// Uid of the component definition this attribute embeds.
    pub component: String,

    /// When true, the attribute holds an ordered list of component instances.
    pub repeatable: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DynamicZoneSpec {
    /// Uids of the component definitions allowed in this zone.
    pub components: Vec<String>,
}

/// A declared relation.
///
/// Presence of `inversed_by` or `mapped_by` makes the relation bidirectional;
/// `inversed_by` additionally marks this side as the owner.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RelationSpec {
    pub kind: RelationKind,

    /// Target model uid. Absent for `morphToOne`/`morphToMany`, whose target
    /// is resolved at query time through a type discriminator.
    pub target: Option<String>,

    pub inversed_by: Option<String>,

    pub mapped_by: Option<String>,

    /// When `Some(false)`, a one-to-one or many-to-one relation stores a join
    /// column on the owner's table instead of a join table.
    pub use_join_table: Option<bool>,

    /// For `morphOne`/`morphMany`: the attribute on the target model that
    /// holds the morph join metadata.
    pub morph_by: Option<String>,
}

impl RelationSpec {
    pub fn new(kind: RelationKind) -> Self {
        Self {
            kind,
            target: None,
            inversed_by: None,
            mapped_by: None,
            use_join_table: None,
            morph_by: None,
        }
    }

    pub fn target(mut self, uid: &str) -> Self {
        self.target = Some(uid.to_string());
        self
    }

    pub fn inversed_by(mut self, attribute: &str) -> Self {
        self.inversed_by = Some(attribute.to_string());
        self
    }

    pub fn mapped_by(mut self, attribute: &str) -> Self {
        self.mapped_by = Some(attribute.to_string());
        self
    }

    pub fn use_join_table(mut self, value: bool) -> Self {
        self.use_join_table = Some(value);
        self
    }

    pub fn morph_by(mut self, attribute: &str) -> Self {
        self.morph_by = Some(attribute.to_string());
        self
    }
}

/// The eight relation cardinalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    MorphToOne,
    MorphToMany,
    MorphOne,
    MorphMany,
}

impl RelationKind {
    /// True when the "many" side is reachable from the declaring attribute.
    /// These relations carry an order column on their join table.
    pub fn is_any_to_many(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }

    /// True when the declaring side is a "many" side. The inverse of such a
    /// bidirectional relation is ordered, hence the inverse order column.
    pub fn is_many_to_any(self) -> bool {
        matches!(self, Self::ManyToOne | Self::ManyToMany)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OneToOne => "oneToOne",
            Self::OneToMany => "oneToMany",
            Self::ManyToOne => "manyToOne",
            Self::ManyToMany => "manyToMany",
            Self::MorphToOne => "morphToOne",
            Self::MorphToMany => "morphToMany",
            Self::MorphOne => "morphOne",
            Self::MorphMany => "morphMany",
        })
    }
}

impl AttributeSpec {
    pub fn scalar(kind: &str) -> Self {
        Self::Scalar(ScalarSpec {
            kind: kind.to_string(),
        })
    }

    pub fn media(multiple: bool) -> Self {
        Self::Media(MediaSpec { multiple })
    }

    pub fn component(component: &str, repeatable: bool) -> Self {
        Self::Component(ComponentSpec {
            component: component.to_string(),
            repeatable,
        })
    }

    pub fn dynamic_zone<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::DynamicZone(DynamicZoneSpec {
            components: components.into_iter().map(Into::into).collect(),
        })
    }

    pub fn relation(spec: RelationSpec) -> Self {
        Self::Relation(spec)
    }
}
