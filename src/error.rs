use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", join_lines(.0))]
    Schema(Vec<SchemaError>),
}

/// A structural problem that stops one table from being generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("table `{table}` references unknown table `{target_table}`")]
    DanglingTable { table: String, target_table: String },

    #[error("table `{table}` references unknown column `{target_table}.{target_column}`")]
    DanglingColumn {
        table: String,
        target_table: String,
        target_column: String,
    },

    #[error("table `{table}` has a malformed index declaration: `{line}`")]
    MalformedIndex { table: String, line: String },
}

/// A non-fatal finding; generation continues with a visible placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    UnknownDataType {
        table: String,
        column: String,
        declaration: String,
    },
    UnparsedConstraints {
        table: String,
        column: String,
        text: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownDataType {
                table,
                column,
                declaration,
            } => write!(f, "unknown data type for `{table}.{column}`: `{declaration}`"),
            Warning::UnparsedConstraints {
                table,
                column,
                text,
            } => write!(f, "ignored constraints on `{table}.{column}`: `{text}`"),
        }
    }
}

fn join_lines(errors: &[SchemaError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_errors_are_reported_one_per_line() {
        let err = Error::Schema(vec![
            SchemaError::DanglingTable {
                table: "posts".into(),
                target_table: "users".into(),
            },
            SchemaError::MalformedIndex {
                table: "posts".into(),
                line: "INDEX".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "table `posts` references unknown table `users`\n\
             table `posts` has a malformed index declaration: `INDEX`"
        );
    }

    #[test]
    fn warning_names_the_column() {
        let warning = Warning::UnparsedConstraints {
            table: "users".into(),
            column: "id".into(),
            text: "AI".into(),
        };
        assert_eq!(warning.to_string(), "ignored constraints on `users.id`: `AI`");
    }
}
