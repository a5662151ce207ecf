use indexmap::IndexMap;

/// Resolved storage strategy for a relation attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Join {
    /// An auxiliary table holds keys for both sides.
    Table(JoinTable),

    /// A foreign-key column on the owner's own table.
    Column(JoinColumn),

    /// A morph column pair on the owner's own table (`morphToOne`).
    MorphColumn(MorphColumn),
}

/// Describes an auxiliary join table from the perspective of one relation
/// attribute. Bidirectional relations carry this descriptor on both sides,
/// with the column roles swapped on the inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinTable {
    pub name: String,

    /// Column referencing the declaring model's row.
    pub join_column: JoinColumn,

    /// Column referencing the related row. Absent on morph join tables,
    /// where [`Self::morph_column`] takes its place.
    pub inverse_join_column: Option<JoinColumn>,

    pub morph_column: Option<MorphColumn>,

    pub order_column_name: Option<String>,

    pub order_by: Option<OrderBy>,

    pub inverse_order_column_name: Option<String>,

    /// Columns identifying the related rows, as opposed to metadata like
    /// ordering.
    pub pivot_columns: Vec<String>,

    /// Fixed pivot filters. Component link tables pin `field` to the
    /// attribute name so one table serves every component attribute of the
    /// owner.
    pub on: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinColumn {
    pub name: String,

    pub referenced_column: String,

    pub referenced_table: Option<String>,
}

/// A `(id, type)` column pair resolving a polymorphic reference.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphColumn {
    pub id_column: JoinColumn,

    pub type_column: TypeColumn,

    /// Name of the pseudo-field carrying the discriminator in query input,
    /// e.g. `__component` for dynamic zones.
    pub type_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeColumn {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl JoinColumn {
    pub fn new(name: &str, referenced_column: &str) -> Self {
        Self {
            name: name.to_string(),
            referenced_column: referenced_column.to_string(),
            referenced_table: None,
        }
    }

    pub fn referencing(name: &str, referenced_column: &str, referenced_table: &str) -> Self {
        Self {
            name: name.to_string(),
            referenced_column: referenced_column.to_string(),
            referenced_table: Some(referenced_table.to_string()),
        }
    }
}

impl OrderBy {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            order: SortOrder::Asc,
        }
    }
}
