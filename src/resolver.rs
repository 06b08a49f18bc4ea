use std::collections::HashMap;

use crate::column_parser::parse_column;
use crate::error::{SchemaError, Warning};
use crate::plant_ast::*;
use crate::sql_ast::Column;

/// Read-only name lookup over the entities extracted in the first pass.
///
/// When two entities share a name, the one closed last wins.
#[derive(Debug)]
pub struct Catalog<'a> {
    entities: HashMap<&'a str, &'a Entity>,
}

impl<'a> Catalog<'a> {
    pub fn new(entities: &'a [Entity]) -> Self {
        Self {
            entities: entities.iter().map(|e| (e.name.as_str(), e)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&'a Entity> {
        self.entities.get(name).copied()
    }
}

/// Resolves every entity against the full set, collecting all dangling
/// references rather than stopping at the first.
pub fn resolve(
    entities: &[Entity],
    warnings: &mut Vec<Warning>,
) -> Result<Vec<Entity>, Vec<SchemaError>> {
    let catalog = Catalog::new(entities);
    let mut resolved = Vec::with_capacity(entities.len());
    let mut errors = Vec::new();

    for entity in entities {
        match resolve_entity(entity, &catalog, warnings) {
            Ok(entity) => resolved.push(entity),
            Err(mut errs) => errors.append(&mut errs),
        }
    }

    if errors.is_empty() {
        Ok(resolved)
    } else {
        Err(errors)
    }
}

/// Returns a copy of `entity` with one synthesized column appended per
/// foreign key, in declaration order.
pub fn resolve_entity(
    entity: &Entity,
    catalog: &Catalog<'_>,
    warnings: &mut Vec<Warning>,
) -> Result<Entity, Vec<SchemaError>> {
    let mut resolved = entity.clone();
    let mut errors = Vec::new();

    for fk in &entity.foreign_keys {
        match foreign_key_column(&entity.name, fk, catalog) {
            Ok(column) => {
                if column.column_type.is_unknown() {
                    let warning = Warning::UnknownDataType {
                        table: entity.name.clone(),
                        column: column.name.clone(),
                        declaration: target_declaration(fk, catalog),
                    };
                    tracing::warn!("{warning}");
                    warnings.push(warning);
                }
                tracing::debug!(
                    entity = %entity.name,
                    column = %column.name,
                    column_type = %column.column_type,
                    "foreign key column synthesized"
                );
                let name = column.name.clone();
                resolved.push_column(&name, ColumnDecl::Synthesized(column));
            }
            Err(err) => errors.push(err),
        }
    }

    if errors.is_empty() {
        Ok(resolved)
    } else {
        Err(errors)
    }
}

fn foreign_key_column(
    table: &str,
    fk: &ForeignKeyRef,
    catalog: &Catalog<'_>,
) -> Result<Column, SchemaError> {
    let target = catalog
        .get(&fk.target_table)
        .ok_or_else(|| SchemaError::DanglingTable {
            table: table.to_string(),
            target_table: fk.target_table.clone(),
        })?;

    // Only declared columns are valid targets, even when the catalog was built
    // over already-resolved entities.
    let column_type = match target.column(&fk.target_column) {
        Some(ColumnDecl::Declared(declaration)) => parse_column(declaration).column.column_type,
        Some(ColumnDecl::Synthesized(_)) | None => {
            return Err(SchemaError::DanglingColumn {
                table: table.to_string(),
                target_table: fk.target_table.clone(),
                target_column: fk.target_column.clone(),
            });
        }
    };

    // Only the type carries over; nullability and key flags belong to the
    // referencing side.
    Ok(Column {
        name: fk.column_name(),
        column_type,
        not_null: true,
        ..Column::default()
    })
}

fn target_declaration(fk: &ForeignKeyRef, catalog: &Catalog<'_>) -> String {
    match catalog
        .get(&fk.target_table)
        .and_then(|e| e.column(&fk.target_column))
    {
        Some(ColumnDecl::Declared(declaration)) => declaration.clone(),
        _ => format!("{}.{}", fk.target_table, fk.target_column),
    }
}
