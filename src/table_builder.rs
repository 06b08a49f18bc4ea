use winnow::prelude::*;
use winnow::ascii::{Caseless, space0, space1};
use winnow::combinator::separated;
use winnow::token::take_while;

use crate::column_parser::{identifier, parse_column};
use crate::error::{SchemaError, Warning};
use crate::plant_ast::*;
use crate::sql_ast::*;

/// Converts a resolved entity into its table model.
///
/// Column problems are reported as warnings; a malformed index line fails the
/// table.
pub fn build_table(
    entity: &Entity,
    warnings: &mut Vec<Warning>,
) -> Result<Table, Vec<SchemaError>> {
    let mut table = Table {
        name: entity.name.clone(),
        ..Table::default()
    };

    for decl in entity.columns() {
        let column = match decl {
            ColumnDecl::Declared(declaration) => {
                declared_column(&entity.name, declaration, warnings)
            }
            ColumnDecl::Synthesized(column) => column.clone(),
        };
        if column.primary_key {
            table.primary_keys.push(column.name.clone());
        }
        if column.unique {
            table.uniques.push(column.name.clone());
        }
        table.columns.push(column);
    }

    table.foreign_keys = entity
        .foreign_keys
        .iter()
        .map(|fk| ForeignKey {
            column: fk.column_name(),
            target_table: fk.target_table.clone(),
            target_column: fk.target_column.clone(),
        })
        .collect();

    let mut errors = Vec::new();
    for line in &entity.indexes {
        match parse_index(line) {
            Some(index) => table.indexes.push(index),
            None => errors.push(SchemaError::MalformedIndex {
                table: entity.name.clone(),
                line: line.clone(),
            }),
        }
    }

    if errors.is_empty() {
        Ok(table)
    } else {
        Err(errors)
    }
}

fn declared_column(table: &str, declaration: &str, warnings: &mut Vec<Warning>) -> Column {
    let parsed = parse_column(declaration);
    if parsed.column.column_type.is_unknown() {
        let warning = Warning::UnknownDataType {
            table: table.to_string(),
            column: parsed.column.name.clone(),
            declaration: declaration.to_string(),
        };
        tracing::warn!("{warning}");
        warnings.push(warning);
    }
    if let Some(text) = parsed.unparsed {
        let warning = Warning::UnparsedConstraints {
            table: table.to_string(),
            column: parsed.column.name.clone(),
            text: text.to_string(),
        };
        tracing::warn!("{warning}");
        warnings.push(warning);
    }
    parsed.column
}

/// `INDEX name col_a, col_b, ...`
pub fn parse_index(line: &str) -> Option<Index> {
    index_declaration
        .parse(line.trim())
        .ok()
        .map(|(name, columns)| Index {
            name,
            columns,
            declaration: line.trim().to_string(),
        })
}

fn index_declaration(input: &mut &str) -> winnow::Result<(String, Vec<String>)> {
    Caseless("INDEX").parse_next(input)?;
    space1.parse_next(input)?;
    let name = identifier.parse_next(input)?;
    space1.parse_next(input)?;
    let columns: Vec<String> =
        separated(1.., index_member, (space0, ',', space0)).parse_next(input)?;
    space0.parse_next(input)?;
    Ok((name.to_string(), columns))
}

/// A column name, or `table.column` for a synthesized foreign-key column.
fn index_member(input: &mut &str) -> winnow::Result<String> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '.')
        .map(|s: &str| s.to_string())
        .parse_next(input)
}
