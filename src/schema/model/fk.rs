/// A foreign key on a synthesized table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub name: String,

    pub columns: Vec<String>,

    pub referenced_table: String,

    pub referenced_columns: Vec<String>,

    pub on_delete: Option<ReferentialAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
}

impl ForeignKey {
    /// A single-column foreign key that deletes dependent rows with their
    /// parent. Every synthesized join and link table uses this shape.
    pub fn cascade(name: &str, column: &str, referenced_table: &str, referenced_column: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: vec![column.to_string()],
            referenced_table: referenced_table.to_string(),
            referenced_columns: vec![referenced_column.to_string()],
            on_delete: Some(ReferentialAction::Cascade),
        }
    }
}
