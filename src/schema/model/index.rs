/// An index on a synthesized table.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    /// Index name, unique within the schema.
    pub name: String,

    pub columns: Vec<String>,

    pub kind: IndexKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Plain,
    Unique,
}

impl Index {
    pub fn plain(name: &str, columns: &[&str]) -> Self {
        Self::new(name, columns, IndexKind::Plain)
    }

    pub fn unique(name: &str, columns: &[&str]) -> Self {
        Self::new(name, columns, IndexKind::Unique)
    }

    fn new(name: &str, columns: &[&str], kind: IndexKind) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            kind,
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(self.kind, IndexKind::Unique)
    }
}
