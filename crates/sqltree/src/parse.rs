//! Parser for reduction scripts
//!
//! A reduction script spells out the `(code args…)` productions a grammar
//! engine would hand to the node factory:
//!
//! ```text
//! (DELETE @orders
//!     (SELECT (RESULT_COLUMN_LIST)
//!             (FROM_LIST (FROM_BASE_TABLE @orders null))
//!             null));
//! (DROP_VIEW @app.v 1)
//! ```
//!
//! Argument forms: nested productions, `null`, `true`/`false`, integers,
//! floats, `'strings'` (`''` escapes a quote), `@name` / `@schema.name`
//! (either part may be quoted, as in `@'my table'`),
//! `{key = 'value', …}` property maps, `[a, b]` name lists,
//! `privileges[SELECT, UPDATE(a, b)]` and `function(@f, [INT])` /
//! `procedure(@p)` routine designators. A code is a node-type name or a raw
//! `#n`.

use std::ops::Range;

use thiserror::Error;
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated, terminated};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::LocatingSlice;
use winnow::token::{none_of, one_of, take_while};

use crate::ast::{PrivilegeAction, Properties, RoutineDesignator, TableName, TablePrivilege};
use crate::factory::NodeArg;
use crate::node_types::NodeType;

type Input<'a> = LocatingSlice<&'a str>;
type PResult<T> = winnow::ModalResult<T>;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (line {line}, column {column}, offset {offset})")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// How a production names its node type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRef {
    Named(NodeType),
    /// `#n`; resolved by the registry, which may not know it
    Raw(u16),
}

impl CodeRef {
    pub fn code(self) -> u16 {
        match self {
            CodeRef::Named(node_type) => node_type.code(),
            CodeRef::Raw(code) => code,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptArg {
    Production(Production),
    Value(NodeArg),
}

/// One reduced production with the byte range it spans
#[derive(Debug, Clone, PartialEq)]
pub struct Production {
    pub code: CodeRef,
    pub args: Vec<ScriptArg>,
    pub span: Range<usize>,
}

/// Parse a `;`-separated sequence of productions
pub fn parse_script(input: &str) -> Result<Vec<Production>, ParseError> {
    let mut stream = LocatingSlice::new(input);
    let mut productions = Vec::new();

    loop {
        skip_ws(&mut stream);
        if stream.is_empty() {
            break;
        }
        match production.parse_next(&mut stream) {
            Ok(parsed) => productions.push(parsed),
            Err(e) => {
                let offset = input.len() - stream.len();
                return Err(build_parse_error(error_message(e), input, offset));
            }
        }
        skip_ws(&mut stream);
        if stream.is_empty() {
            break;
        }
        if stream.starts_with(';') {
            let _: PResult<char> = ';'.parse_next(&mut stream);
        } else {
            let offset = input.len() - stream.len();
            return Err(build_parse_error(
                "expected `;` between statements".to_string(),
                input,
                offset,
            ));
        }
    }

    Ok(productions)
}

/// Parse exactly one production
pub fn parse_production(input: &str) -> Result<Production, ParseError> {
    let mut productions = parse_script(input)?;
    match productions.len() {
        1 => Ok(productions.remove(0)),
        n => Err(build_parse_error(
            format!("expected one production, found {n}"),
            input,
            0,
        )),
    }
}

fn skip_ws(stream: &mut Input<'_>) {
    let _: PResult<()> = ws.parse_next(stream);
}

fn error_message(e: ErrMode<ContextError>) -> String {
    match e {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => {
            let message = ctx.to_string();
            if message.is_empty() {
                "invalid production".to_string()
            } else {
                message.replace('\n', "; ")
            }
        }
        ErrMode::Incomplete(_) => "incomplete input".to_string(),
    }
}

fn build_parse_error(message: String, input: &str, offset: usize) -> ParseError {
    let (line, column) = offset_to_line_column(input, offset);
    ParseError {
        message,
        offset,
        line,
        column,
    }
}

fn offset_to_line_column(input: &str, offset: usize) -> (usize, usize) {
    let bounded = offset.min(input.len());
    let mut line = 1usize;
    let mut column = 1usize;

    for ch in input[..bounded].chars() {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

// ============ Productions ============

fn production(input: &mut Input<'_>) -> PResult<Production> {
    (
        preceded(('(', ws), code),
        repeat(0.., preceded(ws, arg)),
        preceded(
            ws,
            cut_err(')').context(StrContext::Expected(StrContextValue::CharLiteral(')'))),
        ),
    )
        .with_span()
        .map(|((code, args, _), span)| Production { code, args, span })
        .parse_next(input)
}

fn code(input: &mut Input<'_>) -> PResult<CodeRef> {
    cut_err(alt((
        preceded('#', digit1.try_map(|s: &str| s.parse::<u16>())).map(CodeRef::Raw),
        ident
            .verify_map(NodeType::from_name)
            .map(CodeRef::Named),
    )))
    .context(StrContext::Label("node type"))
    .parse_next(input)
}

fn arg(input: &mut Input<'_>) -> PResult<ScriptArg> {
    alt((
        production.map(ScriptArg::Production),
        value.map(ScriptArg::Value),
    ))
    .parse_next(input)
}

fn value(input: &mut Input<'_>) -> PResult<NodeArg> {
    alt((
        "null".value(NodeArg::Null),
        "true".value(NodeArg::Bool(true)),
        "false".value(NodeArg::Bool(false)),
        privilege_list.map(NodeArg::Privileges),
        routine.map(NodeArg::Routine),
        float_lit.map(NodeArg::Float),
        int_lit.map(NodeArg::Int),
        string_lit.map(NodeArg::Str),
        table_name.map(NodeArg::Name),
        properties.map(NodeArg::Properties),
        name_list.map(NodeArg::Names),
    ))
    .context(StrContext::Label("argument"))
    .parse_next(input)
}

// ============ Names ============

fn ident<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn table_name(input: &mut Input<'_>) -> PResult<TableName> {
    preceded('@', (name_item, opt(preceded('.', name_item))))
        .map(|(first, second)| match second {
            Some(table) => TableName::qualified(first, table),
            None => TableName::new(first),
        })
        .parse_next(input)
}

fn name_item(input: &mut Input<'_>) -> PResult<String> {
    alt((ident.map(str::to_string), string_lit)).parse_next(input)
}

fn name_list(input: &mut Input<'_>) -> PResult<Vec<String>> {
    delimited(
        ('[', ws),
        terminated(separated(0.., name_item, (ws, ',', ws)), opt((ws, ','))),
        (ws, ']'),
    )
    .parse_next(input)
}

fn properties(input: &mut Input<'_>) -> PResult<Properties> {
    let entries: Vec<(String, String)> = delimited(
        ('{', ws),
        terminated(
            separated(
                0..,
                (name_item, ws, '=', ws, string_lit).map(|(k, _, _, _, v)| (k, v)),
                (ws, ',', ws),
            ),
            opt((ws, ',')),
        ),
        (ws, '}'),
    )
    .parse_next(input)?;
    Ok(entries.into_iter().collect())
}

// ============ Privileges ============

fn privilege_list(input: &mut Input<'_>) -> PResult<Vec<TablePrivilege>> {
    preceded(
        "privileges",
        delimited(
            ('[', ws),
            separated(0.., table_privilege, (ws, ',', ws)),
            (ws, ']'),
        ),
    )
    .parse_next(input)
}

fn table_privilege(input: &mut Input<'_>) -> PResult<TablePrivilege> {
    (
        ident.verify_map(PrivilegeAction::from_name),
        opt(preceded(
            ws,
            delimited(
                ('(', ws),
                separated(0.., name_item, (ws, ',', ws)),
                (ws, ')'),
            ),
        )),
    )
        .map(|(action, columns)| TablePrivilege { action, columns })
        .parse_next(input)
}

fn routine(input: &mut Input<'_>) -> PResult<RoutineDesignator> {
    (
        alt(("function".value(true), "procedure".value(false))),
        delimited(
            ('(', ws),
            (table_name, opt(preceded((ws, ',', ws), name_list))),
            (ws, ')'),
        ),
    )
        .map(|(is_function, (name, param_types))| RoutineDesignator {
            name,
            is_function,
            param_types,
        })
        .parse_next(input)
}

// ============ Literals ============

fn int_lit(input: &mut Input<'_>) -> PResult<i64> {
    (opt('-'), digit1)
        .take()
        .try_map(|s: &str| s.parse::<i64>())
        .parse_next(input)
}

fn float_lit(input: &mut Input<'_>) -> PResult<f64> {
    (opt('-'), digit1, '.', digit1)
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

fn string_lit(input: &mut Input<'_>) -> PResult<String> {
    delimited(
        '\'',
        repeat(0.., alt(("''".value('\''), none_of('\'')))),
        cut_err('\'').context(StrContext::Expected(StrContextValue::CharLiteral('\''))),
    )
    .parse_next(input)
}

// ============ Whitespace ============

fn ws(input: &mut Input<'_>) -> PResult<()> {
    multispace0.void().parse_next(input)
}
