use content_schema::schema::def::{AttributeSpec, Definition, RelationKind, RelationSpec};
use content_schema::schema::model::{
    ForeignKey, IndexKind, Model, OrderBy, RelationAttribute,
};
use content_schema::Schema;

use pretty_assertions::assert_eq;

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

fn assert_mentions(err: &content_schema::Error, needles: &[&str]) {
    let msg = err.to_string();
    for needle in needles {
        assert!(
            msg.contains(needle),
            "error should mention `{needle}`, got: {msg}"
        );
    }
}

#[test]
fn unidirectional_one_to_many_creates_join_table() {
    let defs = [
        Definition::content_type("api::shop.shop", "shop", "shops").attribute(
            "products_om",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::OneToMany).target("api::product.product"),
            ),
        ),
        Definition::content_type("api::product.product", "product", "products"),
    ];
    let schema = Schema::compile(&defs).unwrap();

    let relation = relation_attr(&schema, "api::shop.shop", "products_om");
    assert!(relation.owner);

    let join_table = relation.join_table().expect("join table expected");
    assert_eq!(join_table.name, "shops_products_om_links");
    assert_eq!(join_table.join_column.name, "shop_id");
    assert_eq!(join_table.join_column.referenced_column, "id");
    let inverse = join_table.inverse_join_column.as_ref().unwrap();
    assert_eq!(inverse.name, "product_id");
    assert_eq!(inverse.referenced_table.as_deref(), Some("products"));
    assert_eq!(join_table.order_column_name.as_deref(), Some("product_order"));
    assert_eq!(join_table.order_by, Some(OrderBy::asc("product_order")));
    assert_eq!(join_table.inverse_order_column_name, None);
    assert_eq!(join_table.pivot_columns, ["shop_id", "product_id"]);

    let model = schema.model("shops_products_om_links").unwrap();
    assert!(model.is_join_table());
    assert_eq!(
        attribute_names(model),
        ["id", "shop_id", "product_id", "product_order"]
    );

    let unique = model
        .indexes
        .iter()
        .find(|index| index.is_unique())
        .expect("compound unique index expected");
    assert_eq!(unique.name, "shops_products_om_links_unique");
    assert_eq!(unique.columns, ["shop_id", "product_id"]);

    assert_eq!(
        model.foreign_keys,
        [
            ForeignKey::cascade("shops_products_om_links_fk", "shop_id", "shops", "id"),
            ForeignKey::cascade(
                "shops_products_om_links_inv_fk",
                "product_id",
                "products",
                "id"
            ),
        ]
    );
}

#[test]
fn self_referencing_many_to_many_prefixes_inverse_column() {
    let defs = [Definition::content_type(
        "api::category.category",
        "category",
        "categories",
    )
    .attribute(
        "related",
        AttributeSpec::relation(
            RelationSpec::new(RelationKind::ManyToMany).target("api::category.category"),
        ),
    )];
    let schema = Schema::compile(&defs).unwrap();

    let relation = relation_attr(&schema, "api::category.category", "related");
    let join_table = relation.join_table().unwrap();

    assert_eq!(join_table.join_column.name, "category_id");
    assert_eq!(
        join_table.inverse_join_column.as_ref().unwrap().name,
        "inv_category_id"
    );
    assert_ne!(
        join_table.join_column.name,
        join_table.inverse_join_column.as_ref().unwrap().name
    );
    // Unidirectional: ordered from the owner side only.
    assert_eq!(join_table.order_column_name.as_deref(), Some("category_order"));
    assert_eq!(join_table.inverse_order_column_name, None);

    let model = schema.model("categories_related_links").unwrap();
    let unique = model.indexes.iter().find(|index| index.is_unique()).unwrap();
    assert_eq!(unique.columns, ["category_id", "inv_category_id"]);
}

#[test]
fn bidirectional_many_to_many_wires_both_sides_once() {
    let defs = [
        Definition::content_type("api::article.article", "article", "articles").attribute(
            "tags",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::ManyToMany)
                    .target("api::tag.tag")
                    .inversed_by("articles"),
            ),
        ),
        Definition::content_type("api::tag.tag", "tag", "tags").attribute(
            "articles",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::ManyToMany)
                    .target("api::article.article")
                    .mapped_by("tags"),
            ),
        ),
    ];
    let schema = Schema::compile(&defs).unwrap();

    // Two declared models plus exactly one join table, never two.
    assert_eq!(schema.len(), 3);

    let owner = relation_attr(&schema, "api::article.article", "tags");
    assert!(owner.owner);
    let owner_table = owner.join_table().unwrap();
    assert_eq!(owner_table.name, "articles_tags_links");
    assert_eq!(owner_table.join_column.name, "article_id");
    assert_eq!(
        owner_table.inverse_join_column.as_ref().unwrap().name,
        "tag_id"
    );
    assert_eq!(owner_table.order_column_name.as_deref(), Some("tag_order"));
    assert_eq!(
        owner_table.inverse_order_column_name.as_deref(),
        Some("article_order")
    );

    let inverse = relation_attr(&schema, "api::tag.tag", "articles");
    assert!(!inverse.owner);
    let inverse_table = inverse.join_table().unwrap();
    assert_eq!(inverse_table.name, "articles_tags_links");
    assert_eq!(inverse_table.join_column.name, "tag_id");
    assert_eq!(
        inverse_table.inverse_join_column.as_ref().unwrap().name,
        "article_id"
    );
    assert_eq!(
        inverse_table.order_column_name.as_deref(),
        Some("article_order")
    );
    assert_eq!(
        inverse_table.inverse_order_column_name.as_deref(),
        Some("tag_order")
    );

    let model = schema.model("articles_tags_links").unwrap();
    assert_eq!(
        attribute_names(model),
        ["id", "article_id", "tag_id", "tag_order", "article_order"]
    );
}

#[test]
fn bidirectional_one_to_many_is_owned_by_the_many_side() {
    let defs = [
        Definition::content_type("api::article.article", "article", "articles").attribute(
            "category",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::ManyToOne)
                    .target("api::category.category")
                    .inversed_by("articles"),
            ),
        ),
        Definition::content_type("api::category.category", "category", "categories").attribute(
            "articles",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::OneToMany)
                    .target("api::article.article")
                    .mapped_by("category"),
            ),
        ),
    ];
    let schema = Schema::compile(&defs).unwrap();

    let owner = relation_attr(&schema, "api::article.article", "category");
    assert!(owner.owner);
    let owner_table = owner.join_table().unwrap();
    assert_eq!(owner_table.name, "articles_category_links");
    // The owner attribute reaches a single row: no order column.
    assert_eq!(owner_table.order_column_name, None);
    assert_eq!(
        owner_table.inverse_order_column_name.as_deref(),
        Some("article_order")
    );

    let inverse = relation_attr(&schema, "api::category.category", "articles");
    assert!(!inverse.owner);
    let inverse_table = inverse.join_table().unwrap();
    assert_eq!(inverse_table.join_column.name, "category_id");
    assert_eq!(
        inverse_table.order_column_name.as_deref(),
        Some("article_order")
    );
    assert_eq!(inverse_table.inverse_order_column_name, None);

    let model = schema.model("articles_category_links").unwrap();
    assert_eq!(
        attribute_names(model),
        ["id", "article_id", "category_id", "article_order"]
    );
}

#[test]
fn one_side_of_bidirectional_one_to_many_cannot_own() {
    let defs = [
        Definition::content_type("api::category.category", "category", "categories").attribute(
            "articles",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::OneToMany)
                    .target("api::article.article")
                    .inversed_by("category"),
            ),
        ),
        Definition::content_type("api::article.article", "article", "articles").attribute(
            "category",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::ManyToOne)
                    .target("api::category.category")
                    .mapped_by("articles"),
            ),
        ),
    ];
    let err = Schema::compile(&defs).unwrap_err();

    assert_mentions(
        &err,
        &[
            "`articles` cannot be the owner side of a bidirectional oneToMany",
            "api::category.category",
        ],
    );
}

#[test]
fn many_side_of_bidirectional_many_to_one_must_own() {
    let defs = [
        Definition::content_type("api::article.article", "article", "articles").attribute(
            "category",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::ManyToOne)
                    .target("api::category.category")
                    .mapped_by("articles"),
            ),
        ),
        Definition::content_type("api::category.category", "category", "categories"),
    ];
    let err = Schema::compile(&defs).unwrap_err();

    assert_mentions(
        &err,
        &[
            "`category` must be the owner side of a bidirectional manyToOne",
            "api::article.article",
        ],
    );
}

#[test]
fn join_column_when_join_table_is_disabled() {
    let defs = [
        Definition::content_type("api::user.user", "user", "users").attribute(
            "profile",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::OneToOne)
                    .target("api::profile.profile")
                    .use_join_table(false),
            ),
        ),
        Definition::content_type("api::profile.profile", "profile", "profiles"),
    ];
    let schema = Schema::compile(&defs).unwrap();

    // No auxiliary table synthesized.
    assert_eq!(schema.len(), 2);

    let relation = relation_attr(&schema, "api::user.user", "profile");
    assert!(relation.owner);
    let column = relation.join_column().expect("join column expected");
    assert_eq!(column.name, "profile_id");
    assert_eq!(column.referenced_column, "id");
    assert_eq!(column.referenced_table.as_deref(), Some("profiles"));
}

#[test]
fn join_column_mirrors_onto_inverse_side() {
    let defs = [
        Definition::content_type("api::user.user", "user", "users").attribute(
            "profile",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::OneToOne)
                    .target("api::profile.profile")
                    .use_join_table(false)
                    .inversed_by("user"),
            ),
        ),
        Definition::content_type("api::profile.profile", "profile", "profiles").attribute(
            "user",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::OneToOne)
                    .target("api::user.user")
                    .mapped_by("profile"),
            ),
        ),
    ];
    let schema = Schema::compile(&defs).unwrap();

    let inverse = relation_attr(&schema, "api::profile.profile", "user");
    assert!(!inverse.owner);
    let column = inverse.join_column().expect("mirrored join column expected");
    assert_eq!(column.name, "id");
    assert_eq!(column.referenced_column, "profile_id");
    assert_eq!(column.referenced_table.as_deref(), Some("users"));
}

#[test]
fn inversed_by_attribute_must_exist() {
    let defs = [
        Definition::content_type("api::article.article", "article", "articles").attribute(
            "tags",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::ManyToMany)
                    .target("api::tag.tag")
                    .inversed_by("artcles"),
            ),
        ),
        Definition::content_type("api::tag.tag", "tag", "tags"),
    ];
    let err = Schema::compile(&defs).unwrap_err();

    assert_mentions(
        &err,
        &[
            "inversedBy attribute `artcles` not found on target `api::tag.tag`",
            "error on attribute `tags` in model `api::article.article`",
        ],
    );
}

#[test]
fn inversed_by_attribute_must_be_a_relation() {
    let defs = [
        Definition::content_type("api::article.article", "article", "articles").attribute(
            "tags",
            AttributeSpec::relation(
                RelationSpec::new(RelationKind::ManyToMany)
                    .target("api::tag.tag")
                    .inversed_by("name"),
            ),
        ),
        Definition::content_type("api::tag.tag", "tag", "tags")
            .attribute("name", AttributeSpec::scalar("string")),
    ];
    let err = Schema::compile(&defs).unwrap_err();

    assert_mentions(&err, &["non-relational attribute", "`name`"]);
}

#[test]
fn unique_index_kind_is_marked() {
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

    let model = schema.model("shops_products_links").unwrap();
    let kinds: Vec<_> = model.indexes.iter().map(|index| index.kind).collect();
    assert_eq!(
        kinds,
        [IndexKind::Plain, IndexKind::Plain, IndexKind::Unique]
    );
}
