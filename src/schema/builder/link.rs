use super::BuildCtx;
use crate::schema::def::Definition;
use crate::schema::model::{Attribute, ForeignKey, Index, ScalarAttribute};
use crate::schema::name;

use indexmap::IndexMap;

impl BuildCtx<'_> {
    /// Synthesizes the shared link model attaching components and dynamic
    /// zones to `def`.
    ///
    /// Exactly one per owning model: every component and dynamic-zone
    /// attribute routes through this table, discriminated by the `field`
    /// column, with `component_type` resolving the concrete component table.
    pub(super) fn synthesize_link_model(&mut self, def: &Definition) {
        let table_name = name::link_table(&def.table_name);
        let owner_table = def.table_name.as_str();

        let mut attributes = IndexMap::new();
        attributes.insert(
            "id".to_string(),
            Attribute::Scalar(ScalarAttribute::increments()),
        );
        attributes.insert(
            "entity_id".to_string(),
            Attribute::Scalar(ScalarAttribute::unsigned_integer()),
        );
        attributes.insert(
            "component_id".to_string(),
            Attribute::Scalar(ScalarAttribute::unsigned_integer()),
        );
        attributes.insert(
            "component_type".to_string(),
            Attribute::Scalar(ScalarAttribute::string()),
        );
        attributes.insert(
            "field".to_string(),
            Attribute::Scalar(ScalarAttribute::string()),
        );
        attributes.insert(
            "order".to_string(),
            Attribute::Scalar(ScalarAttribute::order_column()),
        );

        let indexes = vec![
            Index::plain(&format!("{owner_table}_field_index"), &["field"]),
            Index::plain(
                &format!("{owner_table}_component_type_index"),
                &["component_type"],
            ),
            Index::plain(&format!("{owner_table}_entity_fk"), &["entity_id"]),
            Index::unique(
                &format!("{owner_table}_unique"),
                &["entity_id", "component_id", "field", "component_type"],
            ),
        ];

        let foreign_keys = vec![ForeignKey::cascade(
            &format!("{owner_table}_entity_fk"),
            "entity_id",
            owner_table,
            "id",
        )];

        self.insert_synthesized(table_name, attributes, indexes, foreign_keys);
    }
}
