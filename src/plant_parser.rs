use winnow::prelude::*;
use winnow::ascii::{Caseless, space0, space1};
use winnow::combinator::{alt, delimited, opt};
use winnow::token::{rest, take_while};

use crate::column_parser::{column_head, identifier};
use crate::plant_ast::*;

/// Scans the source line by line and returns every closed entity block in
/// source order. Lines that fit no directive are skipped, as are member lines
/// outside a block.
pub fn extract_entities(input: &str) -> Vec<Entity> {
    let mut entities: Vec<Entity> = Vec::new();
    let mut open: Option<Entity> = None;

    for (number, line) in input.lines().enumerate() {
        let Some(directive) = directive(line) else {
            continue;
        };
        match directive {
            Directive::EntityStart(name) => {
                tracing::debug!(line = number + 1, entity = %name, "entity opened");
                if let Some(abandoned) = open.replace(Entity::new(name)) {
                    tracing::warn!(entity = %abandoned.name, "entity was never closed; discarding it");
                }
            }
            Directive::EntityEnd => {
                if let Some(entity) = open.take() {
                    tracing::debug!(line = number + 1, entity = %entity.name, "entity closed");
                    entities.push(entity);
                }
            }
            Directive::Column(name) => {
                if let Some(entity) = open.as_mut() {
                    entity.push_column(&name, ColumnDecl::Declared(line.trim().to_string()));
                }
            }
            Directive::ForeignKey(fk) => {
                if let Some(entity) = open.as_mut() {
                    entity.foreign_keys.push(fk);
                }
            }
            Directive::Index => {
                if let Some(entity) = open.as_mut() {
                    entity.indexes.push(line.trim().to_string());
                }
            }
        }
    }

    if let Some(abandoned) = open {
        tracing::warn!(entity = %abandoned.name, "entity was never closed; discarding it");
    }

    entities
}

#[derive(Debug, PartialEq)]
enum Directive {
    EntityStart(String),
    EntityEnd,
    Column(String),
    ForeignKey(ForeignKeyRef),
    Index,
}

fn directive(line: &str) -> Option<Directive> {
    alt((
        entity_start.map(Directive::EntityStart),
        entity_end.map(|_| Directive::EntityEnd),
        column_line.map(Directive::Column),
        foreign_key_line.map(Directive::ForeignKey),
        index_line.map(|_| Directive::Index),
    ))
    .parse(line)
    .ok()
}

/// `entity "name" [as alias] {`
fn entity_start(input: &mut &str) -> winnow::Result<String> {
    space0.parse_next(input)?;
    Caseless("entity").parse_next(input)?;
    space1.parse_next(input)?;
    let name = delimited('"', identifier, '"').parse_next(input)?;
    space0.parse_next(input)?;
    opt((Caseless("as"), space1, identifier, space0)).parse_next(input)?;
    "{".parse_next(input)?;
    space0.parse_next(input)?;
    Ok(name.to_string())
}

fn entity_end(input: &mut &str) -> winnow::Result<()> {
    (space0, "}", space0).void().parse_next(input)
}

/// `[*]name: TYPE ...`; an empty type part still declares the column.
fn column_line(input: &mut &str) -> winnow::Result<String> {
    let (_, name) = column_head.parse_next(input)?;
    rest.parse_next(input)?;
    Ok(name.to_string())
}

/// `[*]table.column <<FK>>`; the required marker carries no meaning here.
fn foreign_key_line(input: &mut &str) -> winnow::Result<ForeignKeyRef> {
    space0.parse_next(input)?;
    opt('*').parse_next(input)?;
    space0.parse_next(input)?;
    let target_table = identifier.parse_next(input)?;
    '.'.parse_next(input)?;
    let target_column = identifier.parse_next(input)?;
    space0.parse_next(input)?;
    Caseless("<<FK>>").parse_next(input)?;
    space0.parse_next(input)?;
    Ok(ForeignKeyRef {
        target_table: target_table.to_string(),
        target_column: target_column.to_string(),
    })
}

/// `INDEX` followed by name, member and separator characters only, so prose
/// that happens to start with the word stays free text. The exact index
/// grammar is enforced when the table is built.
fn index_line(input: &mut &str) -> winnow::Result<()> {
    (space0, Caseless("INDEX"), space1, take_while(1.., is_index_char))
        .void()
        .parse_next(input)
}

fn is_index_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | ',' | ' ' | '\t')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(entities: &[Entity]) -> Vec<&str> {
        entities.iter().map(|e| e.name.as_str()).collect()
    }

    fn fk(table: &str, column: &str) -> ForeignKeyRef {
        ForeignKeyRef {
            target_table: table.into(),
            target_column: column.into(),
        }
    }

    #[test]
    fn directive_entity_start() {
        assert_eq!(
            directive("entity \"bs_users\" as bu {"),
            Some(Directive::EntityStart("bs_users".into()))
        );
        assert_eq!(
            directive("  ENTITY \"posts\"{  "),
            Some(Directive::EntityStart("posts".into()))
        );
    }

    #[test]
    fn directive_entity_start_requires_quotes() {
        assert_eq!(directive("entity posts {"), None);
    }

    #[test]
    fn directive_entity_end() {
        assert_eq!(directive("}"), Some(Directive::EntityEnd));
        assert_eq!(directive("  \t}  "), Some(Directive::EntityEnd));
        assert_eq!(directive("} extra"), None);
    }

    #[test]
    fn directive_column() {
        assert_eq!(
            directive("    *id: INT(11) UNSIGNED AI <<PK>>"),
            Some(Directive::Column("id".into()))
        );
        assert_eq!(
            directive("title: VARCHAR(255)"),
            Some(Directive::Column("title".into()))
        );
        assert_eq!(
            directive("title:   "),
            Some(Directive::Column("title".into()))
        );
    }

    #[test]
    fn directive_foreign_key() {
        assert_eq!(
            directive("  *board_settings.id <<FK>>"),
            Some(Directive::ForeignKey(fk("board_settings", "id")))
        );
        assert_eq!(
            directive("users.id <<fk>>"),
            Some(Directive::ForeignKey(fk("users", "id")))
        );
    }

    #[test]
    fn directive_index() {
        assert_eq!(
            directive("  INDEX idx_author author_id"),
            Some(Directive::Index)
        );
        assert_eq!(directive("index idx a, b"), Some(Directive::Index));
        assert_eq!(directive("INDEX"), None);
    }

    #[test]
    fn directive_index_skips_prose() {
        assert_eq!(directive("index of users (see docs)"), None);
        assert_eq!(directive("INDEX: rebuilt nightly"), None);
        assert_eq!(directive("INDEX idx_a a; b"), None);
    }

    #[test]
    fn directive_other_lines() {
        assert_eq!(directive(""), None);
        assert_eq!(directive("@startuml"), None);
        assert_eq!(directive("' a comment"), None);
        assert_eq!(directive("--"), None);
    }

    #[test]
    fn extract_single_entity() {
        let input = "\
@startuml
entity \"users\" as u {
  *id: INT(11) UNSIGNED AI <<PK>>
  --
  *email: VARCHAR(128) <<UQ>>
  nickname: VARCHAR(32)
  INDEX idx_nickname nickname
}
@enduml
";
        let entities = extract_entities(input);
        assert_eq!(names(&entities), vec!["users"]);
        let users = &entities[0];
        assert_eq!(
            users.columns(),
            vec![
                ColumnDecl::Declared("*id: INT(11) UNSIGNED AI <<PK>>".into()),
                ColumnDecl::Declared("*email: VARCHAR(128) <<UQ>>".into()),
                ColumnDecl::Declared("nickname: VARCHAR(32)".into()),
            ]
        );
        assert_eq!(users.indexes, vec!["INDEX idx_nickname nickname"]);
        assert!(users.column("email").is_some());
    }

    #[test]
    fn extract_keeps_source_order() {
        let input = "\
entity \"b\" {
  *id: INT
}
entity \"a\" {
  *id: INT
  *b.id <<FK>>
}
";
        let entities = extract_entities(input);
        assert_eq!(names(&entities), vec!["b", "a"]);
        assert_eq!(entities[1].foreign_keys, vec![fk("b", "id")]);
    }

    #[test]
    fn unclosed_entity_is_discarded() {
        let input = "\
entity \"lost\" {
  *id: INT
entity \"kept\" {
  *id: INT
}
entity \"tail\" {
  *id: INT
";
        let entities = extract_entities(input);
        assert_eq!(names(&entities), vec!["kept"]);
        assert_eq!(entities[0].columns().len(), 1);
    }

    #[test]
    fn stray_close_and_members_outside_blocks_are_ignored() {
        let input = "\
}
*id: INT
*users.id <<FK>>
INDEX idx id
entity \"t\" {
}
";
        let entities = extract_entities(input);
        assert_eq!(names(&entities), vec!["t"]);
        assert!(entities[0].columns().is_empty());
        assert!(entities[0].foreign_keys.is_empty());
        assert!(entities[0].indexes.is_empty());
    }

    #[test]
    fn extract_keeps_column_with_empty_type() {
        let input = "entity \"t\" {\n  *id: INT\n  title: \n}\n";
        let entities = extract_entities(input);
        assert_eq!(
            entities[0].columns(),
            [
                ColumnDecl::Declared("*id: INT".into()),
                ColumnDecl::Declared("title:".into()),
            ]
        );
        assert!(entities[0].column("title").is_some());
    }

    #[test]
    fn extract_handles_crlf() {
        let input = "entity \"t\" {\r\n  *id: INT\r\n}\r\n";
        let entities = extract_entities(input);
        assert_eq!(names(&entities), vec!["t"]);
        assert_eq!(
            entities[0].columns(),
            [ColumnDecl::Declared("*id: INT".into())]
        );
    }
}
