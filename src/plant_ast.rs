use std::collections::HashMap;

use crate::sql_ast::Column;

/// One `entity "name" { ... }` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    pub name: String,
    columns: Vec<ColumnDecl>,
    pub foreign_keys: Vec<ForeignKeyRef>,
    /// Trimmed `INDEX ...` lines, parsed when the table is built.
    pub indexes: Vec<String>,
    column_index: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDecl {
    /// A trimmed `[*]name: TYPE ...` line as written in the source.
    Declared(String),
    /// A column synthesized for a foreign key during resolution.
    Synthesized(Column),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub target_table: String,
    pub target_column: String,
}

impl ForeignKeyRef {
    pub fn column_name(&self) -> String {
        format!("{}_{}", self.target_table, self.target_column)
    }
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a column and points the name lookup at it; a repeated name
    /// keeps both columns but resolves to the later one.
    pub fn push_column(&mut self, name: &str, decl: ColumnDecl) {
        self.column_index.insert(name.to_string(), self.columns.len());
        self.columns.push(decl);
    }

    pub fn columns(&self) -> &[ColumnDecl] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDecl> {
        self.column_index
            .get(name)
            .and_then(|&i| self.columns.get(i))
    }
}
