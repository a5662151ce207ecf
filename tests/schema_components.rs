use content_schema::schema::def::{AttributeSpec, Definition, RelationKind, RelationSpec};
use content_schema::schema::model::{
    ForeignKey, Model, OrderBy, RelationAttribute, ScalarKind,
};
use content_schema::Schema;

use pretty_assertions::assert_eq;

fn page_defs() -> [Definition; 3] {
    [
        Definition::content_type("api::page.page", "page", "pages")
            .attribute("title", AttributeSpec::scalar("string"))
            .attribute("seo", AttributeSpec::component("default.seo", false))
            .attribute("blocks", AttributeSpec::component("default.block", true))
            .attribute(
                "body",
                AttributeSpec::dynamic_zone(["default.seo", "default.block"]),
            ),
        Definition::component("default.seo", "seo", "components_seo")
            .attribute("description", AttributeSpec::scalar("text")),
        Definition::component("default.block", "block", "components_block")
            .attribute("content", AttributeSpec::scalar("richtext")),
    ]
}

fn relation_attr<'a>(schema: &'a Schema, uid: &str, name: &str) -> &'a RelationAttribute {
    schema
        .model(uid)
        .unwrap_or_else(|| panic!("model `{uid}` missing"))
        .attribute(name)
        .unwrap_or_else(|| panic!("attribute `{name}` missing"))
        .as_relation()
        .unwrap_or_else(|| panic!("attribute `{name}` should be a relation"))
}

fn attribute_names(model: &Model) -> Vec<&str> {
    model.attributes.keys().map(String::as_str).collect()
}

#[test]
fn all_component_attributes_share_one_link_table() {
    let schema = Schema::compile(&page_defs()).unwrap();

    // Three definitions plus exactly one shared link model.
    assert_eq!(schema.len(), 4);

    let link = schema.model("pages_components").unwrap();
    assert!(link.is_join_table());
    assert_eq!(link.table_name, "pages_components");

    for attribute in ["seo", "blocks", "body"] {
        let relation = relation_attr(&schema, "api::page.page", attribute);
        let join_table = relation.join_table().unwrap();
        assert_eq!(join_table.name, "pages_components", "attribute `{attribute}`");
        assert_eq!(
            join_table.on.get("field").map(String::as_str),
            Some(attribute)
        );
    }
}

#[test]
fn link_model_shape() {
    let schema = Schema::compile(&page_defs()).unwrap();
    let link = schema.model("pages_components").unwrap();

    assert_eq!(
        attribute_names(link),
        [
            "id",
            "entity_id",
            "component_id",
            "component_type",
            "field",
            "order"
        ]
    );

    let order = link.attribute("order").unwrap().as_scalar().unwrap();
    assert_eq!(order.kind, ScalarKind::Float);
    assert!(order.nullable);

    let index_names: Vec<_> = link.indexes.iter().map(|index| index.name.as_str()).collect();
    assert_eq!(
        index_names,
        [
            "pages_field_index",
            "pages_component_type_index",
            "pages_entity_fk",
            "pages_unique"
        ]
    );

    let unique = link.indexes.iter().find(|index| index.is_unique()).unwrap();
    assert_eq!(
        unique.columns,
        ["entity_id", "component_id", "field", "component_type"]
    );

    assert_eq!(
        link.foreign_keys,
        [ForeignKey::cascade("pages_entity_fk", "entity_id", "pages", "id")]
    );
}

#[test]
fn single_component_compiles_to_one_to_one() {
    let schema = Schema::compile(&page_defs()).unwrap();
    let relation = relation_attr(&schema, "api::page.page", "seo");

    assert_eq!(relation.kind, RelationKind::OneToOne);
    assert_eq!(relation.target.as_deref(), Some("default.seo"));
    assert!(relation.owner);

    let join_table = relation.join_table().unwrap();
    assert_eq!(join_table.join_column.name, "entity_id");
    assert_eq!(join_table.join_column.referenced_column, "id");
    assert_eq!(
        join_table.inverse_join_column.as_ref().unwrap().name,
        "component_id"
    );
    assert_eq!(join_table.order_column_name.as_deref(), Some("order"));
    assert_eq!(join_table.order_by, Some(OrderBy::asc("order")));
    assert_eq!(
        join_table.pivot_columns,
        ["entity_id", "component_id", "field", "component_type"]
    );
}

#[test]
fn repeatable_component_compiles_to_one_to_many() {
    let schema = Schema::compile(&page_defs()).unwrap();
    let relation = relation_attr(&schema, "api::page.page", "blocks");

    assert_eq!(relation.kind, RelationKind::OneToMany);
    assert_eq!(relation.target.as_deref(), Some("default.block"));
    assert!(relation.owner);
    assert!(relation.join_table().is_some());
}

#[test]
fn dynamic_zone_compiles_to_morph_to_many() {
    let schema = Schema::compile(&page_defs()).unwrap();
    let relation = relation_attr(&schema, "api::page.page", "body");

    assert_eq!(relation.kind, RelationKind::MorphToMany);
    assert_eq!(relation.target, None);
    assert!(relation.owner);

    let join_table = relation.join_table().unwrap();
    assert_eq!(join_table.name, "pages_components");
    assert_eq!(join_table.inverse_join_column, None);

    let morph = join_table.morph_column.as_ref().unwrap();
    assert_eq!(morph.id_column.name, "component_id");
    assert_eq!(morph.type_column.name, "component_type");
    assert_eq!(morph.type_field.as_deref(), Some("__component"));
}

#[test]
fn component_target_must_be_registered() {
    let defs = [Definition::content_type("api::page.page", "page", "pages")
        .attribute("seo", AttributeSpec::component("default.seo", false))];
    let err = Schema::compile(&defs).unwrap_err();

    let msg = err.to_string();
    assert!(
        msg.contains("unknown target `default.seo`"),
        "got: {msg}"
    );
    assert!(
        msg.contains("error on attribute `seo` in model `api::page.page`"),
        "got: {msg}"
    );
}

#[test]
fn models_without_components_get_no_link_table() {
    let defs = [
        Definition::content_type("api::shop.shop", "shop", "shops").attribute(
            "products",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::ManyToMany).target("api::product.product"),
            ),
        ),
        Definition::content_type("api::product.product", "product", "products"),
    ];
    let schema = Schema::compile(&defs).unwrap();

    assert!(schema.model("shops_components").is_none());
    assert!(schema.model("products_components").is_none());
}
