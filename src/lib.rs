pub mod column_parser;
pub mod error;
pub mod plant_ast;
pub mod plant_parser;
pub mod resolver;
pub mod sql_ast;
pub mod sql_renderer;
pub mod table_builder;

use std::path::Path;

pub use error::{Error, SchemaError, Warning};

pub const DEFAULT_SCHEMA: &str = "defaultschema";
pub const DEFAULT_TABLE_OPTIONS: &str =
    "ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE utf8mb4_unicode_ci";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub schema: String,
    /// Appended after the closing parenthesis of every table; empty omits it.
    pub table_options: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            table_options: DEFAULT_TABLE_OPTIONS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub tables: Vec<sql_ast::Table>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub sql: String,
    pub warnings: Vec<Warning>,
}

pub fn generate(input: &str, options: &Options) -> Result<Generated, Error> {
    let schema = build_schema(input)?;
    let sql = sql_renderer::render(&schema.tables, &options.schema, &options.table_options);
    Ok(Generated {
        sql,
        warnings: schema.warnings,
    })
}

pub fn generate_file(path: &Path, options: &Options) -> Result<Generated, Error> {
    let input = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    generate(&input, options)
}

/// Extracts every entity, resolves foreign keys against the complete set, then
/// builds each table. Errors are reported per phase: every dangling reference,
/// or, when all references resolve, every malformed index.
pub fn build_schema(input: &str) -> Result<Schema, Error> {
    let entities = plant_parser::extract_entities(input);
    if entities.is_empty() {
        tracing::warn!("no entities found");
    }

    let mut warnings = Vec::new();
    let resolved = resolver::resolve(&entities, &mut warnings).map_err(Error::Schema)?;

    let mut tables = Vec::with_capacity(resolved.len());
    let mut errors = Vec::new();
    for entity in &resolved {
        match table_builder::build_table(entity, &mut warnings) {
            Ok(table) => tables.push(table),
            Err(mut errs) => errors.append(&mut errs),
        }
    }

    if !errors.is_empty() {
        return Err(Error::Schema(errors));
    }

    Ok(Schema { tables, warnings })
}
