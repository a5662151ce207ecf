//! The relation metadata compiler.
//!
//! Dispatches on relation kind, decides ownership and storage strategy, and
//! emits join-table or join-column metadata, mutating both sides of
//! bidirectional relations consistently. All mutation goes through registry
//! indexes; each wiring writes a whole new attribute record.

use super::BuildCtx;
use crate::schema::def::RelationKind;
use crate::schema::model::{
    Attribute, ForeignKey, Index, Join, JoinColumn, JoinTable, MorphColumn, OrderBy,
    RelationAttribute, ScalarAttribute, TypeColumn,
};
use crate::schema::name;
use crate::{ConfigurationError, Error, Result};

use indexmap::IndexMap;

/// Pseudo-field carrying the target-type discriminator in query input for
/// free-form morph relations.
const MORPH_TYPE_FIELD: &str = "__type";

/// One side of a relation, snapshotted from the registry so the registry can
/// be mutated while the names are in use.
struct Side {
    uid: String,
    table_name: String,
    singular_name: String,
}

impl BuildCtx<'_> {
    pub(super) fn compile_relation(
        &mut self,
        model_index: usize,
        attr_index: usize,
    ) -> Result<()> {
        match self.relation_at(model_index, attr_index).kind {
            RelationKind::OneToOne => self.compile_one_to_one(model_index, attr_index),
            RelationKind::OneToMany => self.compile_one_to_many(model_index, attr_index),
            RelationKind::ManyToOne => self.compile_many_to_one(model_index, attr_index),
            RelationKind::ManyToMany => self.compile_many_to_many(model_index, attr_index),
            RelationKind::MorphToOne => self.compile_morph_to_one(model_index, attr_index),
            RelationKind::MorphToMany => self.compile_morph_to_many(model_index, attr_index),
            RelationKind::MorphOne | RelationKind::MorphMany => {
                self.compile_morph_reference(model_index, attr_index)
            }
        }
    }

    fn compile_one_to_one(&mut self, model_index: usize, attr_index: usize) -> Result<()> {
        let relation = self.relation_at(model_index, attr_index);

        if !relation.is_owner() {
            // Resolved passively when the owner wires the inverse side.
            return Ok(());
        }

        if relation.use_join_table {
            self.create_join_table(model_index, attr_index)
        } else {
            self.create_join_column(model_index, attr_index)
        }
    }

    fn compile_one_to_many(&mut self, model_index: usize, attr_index: usize) -> Result<()> {
        let relation = self.relation_at(model_index, attr_index);

        if !relation.is_bidirectional() {
            return self.create_join_table(model_index, attr_index);
        }

        if relation.is_owner() {
            // The "many" side stores the keys; the "one" side cannot own.
            return Err(Error::configuration(ConfigurationError::InvalidOwner {
                attribute: self.attribute_name(model_index, attr_index),
                kind: RelationKind::OneToMany,
            }));
        }

        Ok(())
    }

    fn compile_many_to_one(&mut self, model_index: usize, attr_index: usize) -> Result<()> {
        let relation = self.relation_at(model_index, attr_index);

        if !relation.is_owner() {
            return Err(Error::configuration(ConfigurationError::MissingOwner {
                attribute: self.attribute_name(model_index, attr_index),
                kind: RelationKind::ManyToOne,
            }));
        }

        if relation.use_join_table {
            self.create_join_table(model_index, attr_index)
        } else {
            self.create_join_column(model_index, attr_index)
        }
    }

    fn compile_many_to_many(&mut self, model_index: usize, attr_index: usize) -> Result<()> {
        let relation = self.relation_at(model_index, attr_index);

        if relation.is_owner() {
            return self.create_join_table(model_index, attr_index);
        }

        Ok(())
    }

    /// Embeds a `(target_id, target_type)` column pair on the owner's own
    /// table; the target model is only known at query time.
    fn compile_morph_to_one(&mut self, model_index: usize, attr_index: usize) -> Result<()> {
        let mut relation = self.relation_at(model_index, attr_index);

        relation.owner = true;
        relation.join = Some(Join::MorphColumn(MorphColumn {
            id_column: JoinColumn::new("target_id", "id"),
            type_column: TypeColumn {
                name: "target_type".to_string(),
            },
            type_field: None,
        }));
        self.set_relation(model_index, attr_index, relation);

        Ok(())
    }

    fn compile_morph_to_many(&mut self, model_index: usize, attr_index: usize) -> Result<()> {
        let attribute_name = self.attribute_name(model_index, attr_index);
        let mut relation = self.relation_at(model_index, attr_index);

        // Dynamic zones arrive with their join table preset, routed through
        // the owner's shared link table.
        if relation.join.is_some() {
            relation.owner = true;
            self.set_relation(model_index, attr_index, relation);
            return Ok(());
        }

        let owner = self.side(model_index);
        let table_name = name::morph_table(&owner.table_name, &attribute_name);
        let join_column_name = name::join_column(&owner.singular_name);
        let morph_prefix = name::snake(&attribute_name);
        let id_column_name = format!("{morph_prefix}_id");
        let type_column_name = format!("{morph_prefix}_type");

        let mut attributes = IndexMap::new();
        attributes.insert(
            "id".to_string(),
            Attribute::Scalar(ScalarAttribute::increments()),
        );
        attributes.insert(
            join_column_name.clone(),
            Attribute::Scalar(ScalarAttribute::unsigned_integer()),
        );
        attributes.insert(
            id_column_name.clone(),
            Attribute::Scalar(ScalarAttribute::unsigned_integer()),
        );
        attributes.insert(
            type_column_name.clone(),
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
            Index::plain(&format!("{table_name}_fk"), &[&join_column_name]),
            Index::plain(&format!("{table_name}_order_index"), &["order"]),
            Index::plain(&format!("{table_name}_id_column_index"), &[&id_column_name]),
        ];

        // Only the owning side can carry a foreign key; the morph side is
        // polymorphic.
        let foreign_keys = vec![ForeignKey::cascade(
            &format!("{table_name}_fk"),
            &join_column_name,
            &owner.table_name,
            "id",
        )];

        self.insert_synthesized(table_name.clone(), attributes, indexes, foreign_keys);

        relation.owner = true;
        relation.join = Some(Join::Table(JoinTable {
            name: table_name,
            join_column: JoinColumn::referencing(&join_column_name, "id", &owner.table_name),
            inverse_join_column: None,
            morph_column: Some(MorphColumn {
                id_column: JoinColumn::new(&id_column_name, "id"),
                type_column: TypeColumn {
                    name: type_column_name.clone(),
                },
                type_field: Some(MORPH_TYPE_FIELD.to_string()),
            }),
            order_column_name: None,
            order_by: Some(OrderBy::asc("order")),
            inverse_order_column_name: None,
            pivot_columns: vec![join_column_name, type_column_name, id_column_name],
            on: IndexMap::new(),
        }));
        self.set_relation(model_index, attr_index, relation);

        Ok(())
    }

    /// `morphOne`/`morphMany` are passive: the morph target's `morphBy`
    /// attribute holds the join metadata. Only validate it is wired up.
    fn compile_morph_reference(&mut self, model_index: usize, attr_index: usize) -> Result<()> {
        let relation = self.relation_at(model_index, attr_index);

        let target_uid = relation
            .target
            .ok_or_else(|| Error::configuration(ConfigurationError::MissingTarget))?;
        let Some(target) = self.models.get(&target_uid) else {
            return Err(Error::configuration(ConfigurationError::UnknownTarget {
                target: target_uid,
            }));
        };

        let morph_by = relation
            .morph_by
            .ok_or_else(|| Error::configuration(ConfigurationError::MissingMorphBy))?;

        match target.attributes.get(&morph_by) {
            None => Err(Error::configuration(ConfigurationError::MorphByNotFound {
                attribute: morph_by,
                target: target_uid,
            })),
            Some(Attribute::Scalar(_)) => Err(Error::configuration(
                ConfigurationError::MorphByNotRelation {
                    attribute: morph_by,
                    target: target_uid,
                },
            )),
            Some(Attribute::Relation(_)) => Ok(()),
        }
    }

    /// Synthesizes the auxiliary join table shared by the four relational
    /// kinds and wires the descriptor onto the owner — mirrored onto the
    /// inverse attribute when bidirectional.
    fn create_join_table(&mut self, model_index: usize, attr_index: usize) -> Result<()> {
        let attribute_name = self.attribute_name(model_index, attr_index);
        let mut relation = self.relation_at(model_index, attr_index);
        let owner = self.side(model_index);

        let target_uid = relation
            .target
            .clone()
            .ok_or_else(|| Error::configuration(ConfigurationError::MissingTarget))?;
        let Some(target_index) = self.models.get_index_of(&target_uid) else {
            return Err(Error::configuration(ConfigurationError::UnknownTarget {
                target: target_uid,
            }));
        };

        // Attributes that arrive with join metadata preset (component
        // attributes) keep it; the shared link table already covers them.
        if relation.join.is_some() {
            relation.owner = true;
            self.set_relation(model_index, attr_index, relation);
            return Ok(());
        }

        let target = self.side(target_index);

        let table_name = name::join_table(&owner.table_name, &attribute_name);
        let join_column_name = name::join_column(&owner.singular_name);
        let inverse_join_column_name = name::disambiguate_inverse(
            &join_column_name,
            name::join_column(&target.singular_name),
        );
        // Order-column names are disambiguated before deciding which of the
        // two actually exists, so self-referencing relations stay
        // collision-free.
        let order_column_name = name::order_column(&target.singular_name);
        let inverse_order_column_name = name::disambiguate_inverse(
            &order_column_name,
            name::order_column(&owner.singular_name),
        );

        let has_order_column = relation.kind.is_any_to_many();
        let has_inverse_order_column =
            relation.is_bidirectional() && relation.kind.is_many_to_any();

        let mut attributes = IndexMap::new();
        attributes.insert(
            "id".to_string(),
            Attribute::Scalar(ScalarAttribute::increments()),
        );
        attributes.insert(
            join_column_name.clone(),
            Attribute::Scalar(ScalarAttribute::unsigned_integer()),
        );
        attributes.insert(
            inverse_join_column_name.clone(),
            Attribute::Scalar(ScalarAttribute::unsigned_integer()),
        );
        if has_order_column {
            attributes.insert(
                order_column_name.clone(),
                Attribute::Scalar(ScalarAttribute::order_column()),
            );
        }
        if has_inverse_order_column {
            attributes.insert(
                inverse_order_column_name.clone(),
                Attribute::Scalar(ScalarAttribute::order_column()),
            );
        }

        let indexes = vec![
            Index::plain(&format!("{table_name}_fk"), &[&join_column_name]),
            Index::plain(&format!("{table_name}_inv_fk"), &[&inverse_join_column_name]),
            Index::unique(
                &format!("{table_name}_unique"),
                &[&join_column_name, &inverse_join_column_name],
            ),
        ];

        let foreign_keys = vec![
            ForeignKey::cascade(
                &format!("{table_name}_fk"),
                &join_column_name,
                &owner.table_name,
                "id",
            ),
            ForeignKey::cascade(
                &format!("{table_name}_inv_fk"),
                &inverse_join_column_name,
                &target.table_name,
                "id",
            ),
        ];

        self.insert_synthesized(table_name.clone(), attributes, indexes, foreign_keys);

        let join_table = JoinTable {
            name: table_name,
            join_column: JoinColumn::referencing(&join_column_name, "id", &owner.table_name),
            inverse_join_column: Some(JoinColumn::referencing(
                &inverse_join_column_name,
                "id",
                &target.table_name,
            )),
            morph_column: None,
            order_column_name: has_order_column.then(|| order_column_name.clone()),
            order_by: has_order_column.then(|| OrderBy::asc(&order_column_name)),
            inverse_order_column_name: has_inverse_order_column
                .then(|| inverse_order_column_name.clone()),
            pivot_columns: vec![join_column_name, inverse_join_column_name],
            on: IndexMap::new(),
        };

        if let Some(inverse_name) = relation.inversed_by.clone() {
            self.mirror_join_table(
                &join_table,
                target_index,
                &inverse_name,
                &target.uid,
                &inverse_order_column_name,
            )?;
        }

        relation.owner = true;
        relation.join = Some(Join::Table(join_table));
        self.set_relation(model_index, attr_index, relation);

        Ok(())
    }

    /// Writes the owner's descriptor onto the inverse attribute with the
    /// column roles swapped, so both directions resolve through the same
    /// physical table.
    fn mirror_join_table(
        &mut self,
        join_table: &JoinTable,
        target_index: usize,
        inverse_name: &str,
        target_uid: &str,
        inverse_order_column_name: &str,
    ) -> Result<()> {
        let inverse = self.inverse_relation_mut(target_index, inverse_name, target_uid)?;

        let mut mirrored = JoinTable {
            name: join_table.name.clone(),
            join_column: join_table
                .inverse_join_column
                .clone()
                .expect("relational join tables always carry an inverse join column"),
            inverse_join_column: Some(join_table.join_column.clone()),
            morph_column: None,
            order_column_name: None,
            order_by: None,
            inverse_order_column_name: None,
            pivot_columns: join_table.pivot_columns.clone(),
            on: IndexMap::new(),
        };

        // Seen from the inverse side, the inverse order column is the one
        // that orders its rows.
        if inverse.kind.is_any_to_many() {
            mirrored.order_column_name = Some(inverse_order_column_name.to_string());
            mirrored.order_by = Some(OrderBy::asc(inverse_order_column_name));
        }
        if join_table.order_column_name.is_some() && inverse.kind.is_many_to_any() {
            mirrored.inverse_order_column_name = join_table.order_column_name.clone();
        }

        inverse.join = Some(Join::Table(mirrored));

        Ok(())
    }

    /// Stores the relation as a foreign-key column on the owner's own table.
    fn create_join_column(&mut self, model_index: usize, attr_index: usize) -> Result<()> {
        let attribute_name = self.attribute_name(model_index, attr_index);
        let mut relation = self.relation_at(model_index, attr_index);
        let owner = self.side(model_index);

        let target_uid = relation
            .target
            .clone()
            .ok_or_else(|| Error::configuration(ConfigurationError::MissingTarget))?;
        let Some(target_index) = self.models.get_index_of(&target_uid) else {
            return Err(Error::configuration(ConfigurationError::UnknownTarget {
                target: target_uid,
            }));
        };
        let target = self.side(target_index);

        let column_name = name::join_column(&attribute_name);
        let join_column = JoinColumn::referencing(&column_name, "id", &target.table_name);

        if let Some(inverse_name) = relation.inversed_by.clone() {
            // The inverse side reads the owner's column through its own id.
            let mirrored = JoinColumn::referencing("id", &column_name, &owner.table_name);
            let inverse =
                self.inverse_relation_mut(target_index, &inverse_name, &target.uid)?;
            inverse.join = Some(Join::Column(mirrored));
        }

        relation.owner = true;
        relation.join = Some(Join::Column(join_column));
        self.set_relation(model_index, attr_index, relation);

        Ok(())
    }

    fn inverse_relation_mut(
        &mut self,
        target_index: usize,
        attribute: &str,
        target_uid: &str,
    ) -> Result<&mut RelationAttribute> {
        let target_model = &mut self.models[target_index];

        match target_model.attributes.get_mut(attribute) {
            None => Err(Error::configuration(ConfigurationError::InverseNotFound {
                attribute: attribute.to_string(),
                target: target_uid.to_string(),
            })),
            Some(Attribute::Scalar(_)) => Err(Error::configuration(
                ConfigurationError::InverseNotRelation {
                    attribute: attribute.to_string(),
                    target: target_uid.to_string(),
                },
            )),
            Some(Attribute::Relation(relation)) => Ok(relation),
        }
    }

    fn side(&self, model_index: usize) -> Side {
        let model = &self.models[model_index];
        Side {
            uid: model.uid.clone(),
            table_name: model.table_name.clone(),
            singular_name: model.singular_name.clone(),
        }
    }

    fn attribute_name(&self, model_index: usize, attr_index: usize) -> String {
        let (attr_name, _) = self.models[model_index]
            .attributes
            .get_index(attr_index)
            .expect("attribute index in range");
        attr_name.clone()
    }

    fn relation_at(&self, model_index: usize, attr_index: usize) -> RelationAttribute {
        let (_, attribute) = self.models[model_index]
            .attributes
            .get_index(attr_index)
            .expect("attribute index in range");

        match attribute {
            Attribute::Relation(relation) => relation.clone(),
            Attribute::Scalar(_) => panic!("expected a relation attribute"),
        }
    }

    fn set_relation(
        &mut self,
        model_index: usize,
        attr_index: usize,
        relation: RelationAttribute,
    ) {
        let model = &mut self.models[model_index];
        let (_, attribute) = model
            .attributes
            .get_index_mut(attr_index)
            .expect("attribute index in range");
        *attribute = Attribute::Relation(relation);
    }
}
