//! Rewrites media, component and dynamic-zone attributes into equivalent
//! relation descriptors, so the relation compiler is the single place that
//! decides storage strategy.

use crate::schema::def::{AttributeSpec, Definition, RelationKind, RelationSpec};
use crate::schema::model::{
    Attribute, Join, JoinColumn, JoinTable, MorphColumn, OrderBy, RelationAttribute,
    ScalarAttribute, TypeColumn,
};
use crate::schema::name;

use indexmap::IndexMap;

/// Attribute on the media target model that holds the morph join metadata.
const MEDIA_MORPH_BY: &str = "related";

/// Pseudo-field carrying the component discriminator in query input.
const COMPONENT_TYPE_FIELD: &str = "__component";

pub(super) fn needs_link_model(spec: &AttributeSpec) -> bool {
    matches!(
        spec,
        AttributeSpec::Component(_) | AttributeSpec::DynamicZone(_)
    )
}

/// Converts one declared attribute into its compiled, not-yet-wired form.
pub(super) fn attribute(
    attribute_name: &str,
    spec: &AttributeSpec,
    def: &Definition,
    media_target: &str,
) -> Attribute {
    match spec {
        AttributeSpec::Scalar(scalar) => {
            Attribute::Scalar(ScalarAttribute::declared(&scalar.kind))
        }
        AttributeSpec::Media(media) => Attribute::Relation(RelationAttribute {
            kind: if media.multiple {
                RelationKind::MorphMany
            } else {
                RelationKind::MorphOne
            },
            target: Some(media_target.to_string()),
            inversed_by: None,
            mapped_by: None,
            morph_by: Some(MEDIA_MORPH_BY.to_string()),
            use_join_table: true,
            owner: false,
            join: None,
        }),
        AttributeSpec::Component(component) => Attribute::Relation(RelationAttribute {
            kind: if component.repeatable {
                RelationKind::OneToMany
            } else {
                RelationKind::OneToOne
            },
            target: Some(component.component.clone()),
            inversed_by: None,
            mapped_by: None,
            morph_by: None,
            use_join_table: true,
            owner: false,
            join: Some(Join::Table(component_join_table(attribute_name, def))),
        }),
        AttributeSpec::DynamicZone(_) => Attribute::Relation(RelationAttribute {
            kind: RelationKind::MorphToMany,
            target: None,
            inversed_by: None,
            mapped_by: None,
            morph_by: None,
            use_join_table: true,
            owner: false,
            join: Some(Join::Table(zone_join_table(attribute_name, def))),
        }),
        AttributeSpec::Relation(relation) => Attribute::Relation(declared_relation(relation)),
    }
}

fn declared_relation(spec: &RelationSpec) -> RelationAttribute {
    RelationAttribute {
        kind: spec.kind,
        target: spec.target.clone(),
        inversed_by: spec.inversed_by.clone(),
        mapped_by: spec.mapped_by.clone(),
        morph_by: spec.morph_by.clone(),
        use_join_table: spec.use_join_table.unwrap_or(true),
        owner: false,
        join: None,
    }
}

/// Join table descriptor routing a component attribute through the owner's
/// shared link table, pinned to this attribute by the `field` column.
fn component_join_table(attribute_name: &str, def: &Definition) -> JoinTable {
    JoinTable {
        name: name::link_table(&def.table_name),
        join_column: JoinColumn::new("entity_id", "id"),
        inverse_join_column: Some(JoinColumn::new("component_id", "id")),
        morph_column: None,
        order_column_name: Some("order".to_string()),
        order_by: Some(OrderBy::asc("order")),
        inverse_order_column_name: None,
        pivot_columns: link_pivot_columns(),
        on: on_field(attribute_name),
    }
}

/// Like [`component_join_table`], but the component reference is polymorphic:
/// `component_type` discriminates between the zone's component tables.
fn zone_join_table(attribute_name: &str, def: &Definition) -> JoinTable {
    JoinTable {
        name: name::link_table(&def.table_name),
        join_column: JoinColumn::new("entity_id", "id"),
        inverse_join_column: None,
        morph_column: Some(MorphColumn {
            id_column: JoinColumn::new("component_id", "id"),
            type_column: TypeColumn {
                name: "component_type".to_string(),
            },
            type_field: Some(COMPONENT_TYPE_FIELD.to_string()),
        }),
        order_column_name: Some("order".to_string()),
        order_by: Some(OrderBy::asc("order")),
        inverse_order_column_name: None,
        pivot_columns: link_pivot_columns(),
        on: on_field(attribute_name),
    }
}

fn link_pivot_columns() -> Vec<String> {
    ["entity_id", "component_id", "field", "component_type"]
        .iter()
        .map(|column| column.to_string())
        .collect()
}

fn on_field(attribute_name: &str) -> IndexMap<String, String> {
    let mut on = IndexMap::new();
    on.insert("field".to_string(), attribute_name.to_string());
    on
}
