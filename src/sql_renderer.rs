use crate::sql_ast::*;

/// Renders `CREATE TABLE` statements for MySQL, one per table, separated by a
/// blank line.
pub fn render(tables: &[Table], schema: &str, table_options: &str) -> String {
    tables
        .iter()
        .map(|table| render_table(table, schema, table_options))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_table(table: &Table, schema: &str, table_options: &str) -> String {
    let mut entries: Vec<String> = table.columns.iter().map(render_column).collect();

    if !table.primary_keys.is_empty() {
        let keys: Vec<String> = table.primary_keys.iter().map(|k| quote(k)).collect();
        entries.push(format!("\tPRIMARY KEY ({})", keys.join(",")));
    }

    for column in &table.uniques {
        entries.push(format!(
            "\tUNIQUE INDEX {} ({} ASC)",
            quote(&format!("UQ_{}_{column}", table.name)),
            quote(column)
        ));
    }

    for index in &table.indexes {
        let columns: Vec<String> = index
            .columns
            .iter()
            .map(|c| quote(&c.replace('.', "_")))
            .collect();
        entries.push(format!("\tINDEX {} ({})", quote(&index.name), columns.join(",")));
    }

    for fk in &table.foreign_keys {
        entries.push(render_foreign_key(&table.name, fk, schema));
    }

    let options = if table_options.is_empty() {
        String::new()
    } else {
        format!(" {table_options}")
    };

    format!(
        "CREATE TABLE IF NOT EXISTS {}.{}(\n{}\n){options};",
        quote(schema),
        quote(&table.name),
        entries.join(",\n")
    )
}

fn render_column(column: &Column) -> String {
    let mut parts = vec![quote(&column.name), column.column_type.to_string()];
    parts.push(if column.not_null { "NOT NULL" } else { "NULL" }.to_string());
    if let Some(default) = &column.default_value {
        parts.push(format!("DEFAULT {default}"));
    }
    if column.auto_increment {
        parts.push("AUTO_INCREMENT".to_string());
    }
    format!("\t{}", parts.join(" "))
}

fn render_foreign_key(table: &str, fk: &ForeignKey, schema: &str) -> String {
    format!(
        "\tCONSTRAINT {}\n\t\tFOREIGN KEY ({})\n\t\tREFERENCES {}.{} ({})",
        quote(&format!("FK_{table}_{}", fk.column)),
        quote(&fk.column),
        quote(schema),
        quote(&fk.target_table),
        quote(&fk.target_column)
    )
}

fn quote(identifier: &str) -> String {
    format!("`{identifier}`")
}
