mod link;
mod relation;
mod transform;

use super::def::{DefKind, Definition};
use super::model::{Attribute, ForeignKey, Index, Lifecycles, Model, ModelKind, ScalarAttribute};
use super::{name, Schema};
use crate::{err, ConfigurationError, Error, Result};
use indexmap::IndexMap;

/// Reserved for the identity attributes injected into every model.
const RESERVED_ATTRIBUTE_NAMES: &[&str] = &["id", "document_id", "documentId"];

const DEFAULT_MEDIA_TARGET: &str = "media.file";

#[derive(Debug)]
pub struct Builder {
    /// Uid of the model media attributes resolve to.
    media_target: String,
}

/// Used to track state during the build process.
///
/// Owns the model registry exclusively for the duration of the two passes;
/// the registry is frozen into a [`Schema`] on return and never mutated
/// afterwards.
struct BuildCtx<'a> {
    /// Build options
    builder: &'a Builder,

    /// Models as they are built, keyed by uid. Insertion order is the
    /// deterministic output order.
    models: IndexMap<String, Model>,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            media_target: DEFAULT_MEDIA_TARGET.to_string(),
        }
    }

    pub fn media_target(&mut self, uid: &str) -> &mut Self {
        self.media_target = uid.to_string();
        self
    }

    /// Compiles the declared definitions into storage metadata.
    ///
    /// Pass 1 materializes one bare model per definition (identity attributes
    /// injected, media/component/dynamic-zone attributes rewritten to
    /// relation descriptors, link models synthesized). Pass 2 walks the
    /// registry and wires every relation, which may append further join-table
    /// models and mutate inverse-side attributes. Two passes are required
    /// because wiring needs the target's table and singular names to already
    /// exist in the registry.
    pub fn build(&self, definitions: &[Definition]) -> Result<Schema> {
        let mut cx = BuildCtx {
            builder: self,
            models: IndexMap::new(),
        };

        for def in definitions {
            cx.define_model(def)?;
        }

        // Index-based iteration: join-table models appended during the pass
        // are visited too (their attributes are plain scalars), and mutating
        // arbitrary models while iterating would otherwise hold a borrow of
        // the registry.
        let mut curr = 0;
        while curr < cx.models.len() {
            for attr_index in 0..cx.models[curr].attributes.len() {
                cx.compile_attribute(curr, attr_index)?;
            }
            curr += 1;
        }

        Ok(Schema::from_registry(cx.models))
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildCtx<'_> {
    fn define_model(&mut self, def: &Definition) -> Result<()> {
        for attr_name in def.attributes.keys() {
            if RESERVED_ATTRIBUTE_NAMES.contains(&attr_name.as_str()) {
                return Err(Error::configuration(
                    ConfigurationError::ReservedAttributeName {
                        name: attr_name.clone(),
                    },
                )
                .context(err!(
                    "error on attribute `{}` in model `{}`",
                    attr_name,
                    def.uid
                )));
            }
        }

        if self.models.contains_key(&def.uid) {
            return Err(Error::configuration(ConfigurationError::DuplicateUid {
                uid: def.uid.clone(),
            }));
        }

        let mut attributes = IndexMap::new();
        attributes.insert(
            "id".to_string(),
            Attribute::Scalar(ScalarAttribute::increments()),
        );
        if def.is_content_type() {
            attributes.insert(
                "documentId".to_string(),
                Attribute::Scalar(ScalarAttribute::string().with_column_name("document_id")),
            );
        }

        let kind = match def.kind {
            DefKind::ContentType => ModelKind::ContentType,
            DefKind::Component => ModelKind::Component,
        };

        self.models.insert(
            def.uid.clone(),
            Model {
                uid: def.uid.clone(),
                singular_name: def.singular_name.clone(),
                table_name: def.table_name.clone(),
                kind,
                attributes,
                indexes: vec![],
                foreign_keys: vec![],
                lifecycles: Lifecycles::default(),
            },
        );

        if def.attributes.values().any(transform::needs_link_model) {
            self.synthesize_link_model(def);
        }

        for (attr_name, spec) in &def.attributes {
            let attribute =
                transform::attribute(attr_name, spec, def, &self.builder.media_target);
            let model = self
                .models
                .get_mut(&def.uid)
                .expect("model was inserted above");
            model.attributes.insert(attr_name.clone(), attribute);
        }

        Ok(())
    }

    fn compile_attribute(&mut self, model_index: usize, attr_index: usize) -> Result<()> {
        let (attr_name, is_relation) = {
            let model = &self.models[model_index];
            let (attr_name, attribute) = model
                .attributes
                .get_index(attr_index)
                .expect("attribute index in range");
            (attr_name.clone(), attribute.is_relation())
        };

        if is_relation {
            let uid = self.models[model_index].uid.clone();
            return self
                .compile_relation(model_index, attr_index)
                .map_err(|err| {
                    err.context(err!("error on attribute `{attr_name}` in model `{uid}`"))
                });
        }

        // Scalars keep their declared kind; they only gain a default column
        // name here.
        let column_name = name::snake(&attr_name);
        if let Some((_, Attribute::Scalar(scalar))) =
            self.models[model_index].attributes.get_index_mut(attr_index)
        {
            scalar.column_name.get_or_insert(column_name);
        }

        Ok(())
    }

    /// Appends a synthesized auxiliary model. Its table name doubles as uid
    /// and singular name, matching how downstream layers address it.
    fn insert_synthesized(
        &mut self,
        table_name: String,
        attributes: IndexMap<String, Attribute>,
        indexes: Vec<Index>,
        foreign_keys: Vec<ForeignKey>,
    ) {
        let model = Model {
            uid: table_name.clone(),
            singular_name: table_name.clone(),
            table_name: table_name.clone(),
            kind: ModelKind::JoinTable,
            attributes,
            indexes,
            foreign_keys,
            lifecycles: Lifecycles::default(),
        };
        self.models.insert(table_name, model);
    }
}
