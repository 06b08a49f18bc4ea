use winnow::prelude::*;
use winnow::ascii::{Caseless, space0, space1};
use winnow::combinator::{alt, delimited, eof, not, opt, peek, preceded, repeat_till, terminated};
use winnow::error::{ContextError, ParserError};
use winnow::token::{any, one_of, take_while};

use crate::sql_ast::*;

/// A column parsed from its declaration, plus whatever trailed the last
/// marker the grammar could capture.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedColumn<'s> {
    pub column: Column,
    pub unparsed: Option<&'s str>,
}

/// Parses `[*]name: TYPE[(size)][ UNSIGNED][ DEFAULT v][ AI][ <<PK>>][ <<UQ>>]`.
///
/// Never fails. An unrecognized type yields [`ColumnType::Unknown`] with every
/// flag cleared. Markers are only captured in the order above; once one is out
/// of place, it and everything after it lands in `unparsed`.
pub fn parse_column(declaration: &str) -> ParsedColumn<'_> {
    let trimmed = declaration.trim();
    let mut input = trimmed;
    let Ok((required, name)) = column_head.parse_next(&mut input) else {
        return ParsedColumn {
            column: Column::default(),
            unparsed: Some(trimmed).filter(|s| !s.is_empty()),
        };
    };

    let constraints = constraints.parse_next(&mut input).unwrap_or_default();
    let rest = input.trim();
    let unparsed = if constraints.column_type.is_unknown() || rest.is_empty() {
        None
    } else {
        Some(rest)
    };

    ParsedColumn {
        column: Column {
            name: name.to_string(),
            column_type: constraints.column_type,
            not_null: required,
            default_value: constraints.default_value,
            auto_increment: constraints.auto_increment,
            primary_key: constraints.primary_key,
            unique: constraints.unique,
        },
        unparsed,
    }
}

/// `[*]name:` up to the start of the type. Returns the required marker and the name.
pub(crate) fn column_head<'s>(input: &mut &'s str) -> winnow::Result<(bool, &'s str)> {
    space0.parse_next(input)?;
    let required = opt('*').parse_next(input)?.is_some();
    let name = identifier.parse_next(input)?;
    space0.parse_next(input)?;
    ':'.parse_next(input)?;
    space0.parse_next(input)?;
    Ok((required, name))
}

pub(crate) fn identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., is_ident_char).parse_next(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[derive(Debug, Default)]
struct Constraints {
    column_type: ColumnType,
    default_value: Option<String>,
    auto_increment: bool,
    primary_key: bool,
    unique: bool,
}

fn constraints(input: &mut &str) -> winnow::Result<Constraints> {
    let Some(spec) = opt(type_spec).parse_next(input)? else {
        return Ok(Constraints::default());
    };

    let default_value = opt(preceded(
        (space1, alt((keyword("DEFAULT"), keyword("DF"))), space1),
        default_value,
    ))
    .parse_next(input)?;
    let auto_increment = opt(preceded(space1, keyword("AI"))).parse_next(input)?.is_some();
    let primary_key = opt(preceded(space1, Caseless("<<PK>>")))
        .parse_next(input)?
        .is_some();
    let unique = opt(preceded(space1, Caseless("<<UQ>>")))
        .parse_next(input)?
        .is_some();

    Ok(Constraints {
        column_type: ColumnType::Known(spec),
        default_value,
        auto_increment,
        primary_key,
        unique,
    })
}

fn type_spec(input: &mut &str) -> winnow::Result<TypeSpec> {
    let data_type = data_type.parse_next(input)?;
    let size = opt(delimited('(', take_while(1.., |c: char| c != ')'), ')')).parse_next(input)?;
    let unsigned = opt(preceded(space1, keyword("UNSIGNED")))
        .parse_next(input)?
        .is_some();

    Ok(TypeSpec {
        data_type,
        size: size.map(|s: &str| s.to_string()),
        unsigned,
    })
}

fn data_type(input: &mut &str) -> winnow::Result<DataType> {
    let word = identifier.parse_next(input)?;
    match DataType::ALL
        .into_iter()
        .find(|t| t.keyword().eq_ignore_ascii_case(word))
    {
        Some(data_type) => Ok(data_type),
        None => Err(ParserError::from_input(input)),
    }
}

fn keyword<'s>(word: &'static str) -> impl Parser<&'s str, &'s str, ContextError> {
    terminated(Caseless(word), not(one_of(is_ident_char)))
}

fn default_value(input: &mut &str) -> winnow::Result<String> {
    let (value, _): (String, ()) = repeat_till(1.., any, peek(default_end)).parse_next(input)?;
    Ok(value)
}

fn default_end(input: &mut &str) -> winnow::Result<()> {
    alt(((space1, marker).void(), (space0, eof).void())).parse_next(input)
}

fn marker<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    alt((keyword("AI"), Caseless("<<PK>>"), Caseless("<<UQ>>"))).parse_next(input)
}
