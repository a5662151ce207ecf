pub mod def;

mod builder;
pub use builder::Builder;

pub mod model;
pub use model::Model;

mod name;

use indexmap::IndexMap;

/// The compiled schema: one [`Model`] per definition plus every synthesized
/// link and join table.
///
/// Produced once at boot by [`Schema::compile`] and immutable afterwards, so
/// it can be shared read-only across any number of threads. Models iterate in
/// registry insertion order, which is deterministic for a given input.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    models: IndexMap<String, Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Compiles definitions with default options.
    pub fn compile(definitions: &[def::Definition]) -> crate::Result<Self> {
        Builder::new().build(definitions)
    }

    pub fn model(&self, uid: &str) -> Option<&Model> {
        self.models.get(uid)
    }

    pub fn models(&self) -> impl ExactSizeIterator<Item = &Model> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub(crate) fn from_registry(models: IndexMap<String, Model>) -> Self {
        Self { models }
    }
}
