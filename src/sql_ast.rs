use std::fmt;

/// Rendered in place of a type that could not be recognized.
pub const UNKNOWN_TYPE_PLACEHOLDER: &str = "[[WARNING!! UNKNOWN_DATA_TYPE]]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    TinyInt,
    Decimal,
    Varchar,
    Char,
    Text,
    MediumText,
    DateTime,
    Timestamp,
}

impl DataType {
    pub const ALL: [DataType; 9] = [
        DataType::Int,
        DataType::TinyInt,
        DataType::Decimal,
        DataType::Varchar,
        DataType::Char,
        DataType::Text,
        DataType::MediumText,
        DataType::DateTime,
        DataType::Timestamp,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            DataType::Int => "INT",
            DataType::TinyInt => "TINYINT",
            DataType::Decimal => "DECIMAL",
            DataType::Varchar => "VARCHAR",
            DataType::Char => "CHAR",
            DataType::Text => "TEXT",
            DataType::MediumText => "MEDIUMTEXT",
            DataType::DateTime => "DATETIME",
            DataType::Timestamp => "TIMESTAMP",
        }
    }
}

/// A recognized type with its optional size/precision and `UNSIGNED` modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub data_type: DataType,
    /// Text between the parentheses, e.g. `11` or `10,2`.
    pub size: Option<String>,
    pub unsigned: bool,
}

impl TypeSpec {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            size: None,
            unsigned: false,
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data_type.keyword())?;
        if let Some(size) = &self.size {
            write!(f, "({size})")?;
        }
        if self.unsigned {
            f.write_str(" UNSIGNED")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnType {
    Known(TypeSpec),
    #[default]
    Unknown,
}

impl ColumnType {
    pub fn is_unknown(&self) -> bool {
        matches!(self, ColumnType::Unknown)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Known(spec) => spec.fmt(f),
            ColumnType::Unknown => f.write_str(UNKNOWN_TYPE_PLACEHOLDER),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub auto_increment: bool,
    pub primary_key: bool,
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Local column, always `{target_table}_{target_column}`.
    pub column: String,
    pub target_table: String,
    pub target_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    /// The declaration line the index was built from.
    pub declaration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub primary_keys: Vec<String>,
    pub uniques: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
}
