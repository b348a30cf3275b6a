//! Path compiler.
//!
//! ```text
//! Path      := '$' Segment*
//! Segment   := '.' Ident | '.*' | '..' (Ident | '*' | Bracket) | Bracket
//! Bracket   := '[' ( '*' | Integer | Quoted | '?(' Condition ')' ) ']'
//! Condition := Term (('&&' | '||') Term)*
//! Term      := '(' Condition ')' | '@' ('.' Ident)* (CompareOp Literal)?
//! ```

use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1, take_while_m_n},
    character::complete::{char, i64 as integer, multispace0 as s, satisfy},
    combinator::{cut, map, map_opt, opt, value},
    error::{context, VerboseError, VerboseErrorKind},
    multi::{fold_many0, many0},
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated},
    Finish, IResult, Offset,
};

use crate::ast::*;
use crate::config::DEFAULT_MAX_DEPTH;

/// Maximum height of a filter condition tree. Each parenthesized group and
/// each `&&` or `||` operand adds one level.
const MAX_CONDITION_DEPTH: usize = DEFAULT_MAX_DEPTH;

type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

impl CompiledPath {
    /// Compiles a path from string without consulting any cache.
    ///
    /// The empty string compiles to the root path, like `$`.
    pub fn compile(path: &str) -> Result<Self, Error> {
        let (rest, segments) = segments(path)
            .finish()
            .map_err(|e| Error::from_verbose_error(path, e))?;
        if !rest.is_empty() {
            return Err(Error::new(path, rest, "unexpected trailing characters"));
        }
        Ok(CompiledPath {
            path: path.into(),
            segments,
        })
    }
}

impl FromStr for CompiledPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

/// The error type returned when compiling a malformed path.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("at position {position}, unexpected {}: {message}", describe_token(.token))]
pub struct Error {
    position: usize,
    token: Box<str>,
    message: Box<str>,
}

impl Error {
    /// Byte offset of the offending token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The offending token, empty at end of input.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn new(input: &str, rest: &str, message: &str) -> Self {
        Self {
            position: input.offset(rest),
            token: token_at(rest).into(),
            message: message.into(),
        }
    }

    fn from_verbose_error(input: &str, err: VerboseError<&str>) -> Self {
        // the innermost context describes the failure best
        let context = err.errors.iter().find_map(|(rest, kind)| match kind {
            VerboseErrorKind::Context(ctx) => Some((*rest, *ctx)),
            _ => None,
        });
        match context {
            Some((rest, message)) => Self::new(input, rest, message),
            None => {
                let rest = err.errors.first().map_or(input, |(rest, _)| *rest);
                Self::new(input, rest, "invalid syntax")
            }
        }
    }
}

/// Returns the run of identifier characters at the start of `rest`, or its
/// first character.
fn token_at(rest: &str) -> &str {
    let Some(first) = rest.chars().next() else {
        return "";
    };
    let len = if is_identifier_char(first) {
        rest.find(|c| !is_identifier_char(c)).unwrap_or(rest.len())
    } else {
        first.len_utf8()
    };
    &rest[..len]
}

fn describe_token(token: &str) -> String {
    if token.is_empty() {
        "end of input".into()
    } else {
        format!("'{token}'")
    }
}

fn segments(input: &str) -> Res<'_, Vec<Segment>> {
    if input.is_empty() {
        return Ok((input, vec![]));
    }
    preceded(
        context("path must start with '$'", char('$')),
        fold_many0(segment, Vec::new, |mut acc, segs| {
            acc.extend(segs);
            acc
        }),
    )(input)
}

fn segment(input: &str) -> Res<'_, Vec<Segment>> {
    alt((
        preceded(tag(".."), cut(descendant)),
        map(preceded(char('.'), cut(dot_member)), |seg| vec![seg]),
        map(bracket, |seg| vec![seg]),
    ))(input)
}

fn descendant(input: &str) -> Res<'_, Vec<Segment>> {
    map(
        context(
            "expected member name, '*' or '[' after '..'",
            alt((
                value(Segment::Wildcard, char('*')),
                map(identifier, Segment::Property),
                bracket,
            )),
        ),
        |seg| vec![Segment::RecursiveDescent, seg],
    )(input)
}

fn dot_member(input: &str) -> Res<'_, Segment> {
    context(
        "expected member name or '*' after '.'",
        alt((
            value(Segment::Wildcard, char('*')),
            map(identifier, Segment::Property),
        )),
    )(input)
}

fn bracket(input: &str) -> Res<'_, Segment> {
    preceded(
        char('['),
        cut(terminated(
            delimited(s, bracket_selector, s),
            context("unterminated bracket, expected ']'", char(']')),
        )),
    )(input)
}

fn bracket_selector(input: &str) -> Res<'_, Segment> {
    alt((
        value(Segment::Wildcard, char('*')),
        map(filter, |pred| Segment::Filter(Box::new(pred))),
        map(string, Segment::Property),
        context(
            "array index must be an integer or a quoted name",
            map(integer, Segment::Index),
        ),
    ))(input)
}

fn filter(input: &str) -> Res<'_, Predicate> {
    preceded(
        char('?'),
        cut(delimited(
            pair(context("expected '(' after '?'", char('(')), s),
            |input| condition(input, 0),
            pair(s, context("expected ')' to close the filter", char(')'))),
        )),
    )(input)
}

/// Parses `||`-separated conjunctions. `depth` bounds the height of the
/// resulting predicate tree.
fn condition(input: &str, depth: usize) -> Res<'_, Predicate> {
    let (mut input, mut left) = conjunction(input, depth)?;
    let mut depth = depth;
    while let (rest, Some(_)) = opt(or_op)(input)? {
        depth = nested(rest, depth)?;
        let (rest, right) = cut(move |input| conjunction(input, depth))(rest)?;
        left = Predicate::Or(Box::new(left), Box::new(right));
        input = rest;
    }
    Ok((input, left))
}

fn conjunction(input: &str, depth: usize) -> Res<'_, Predicate> {
    let (mut input, mut left) = term(input, depth)?;
    let mut depth = depth;
    while let (rest, Some(_)) = opt(and_op)(input)? {
        depth = nested(rest, depth)?;
        let (rest, right) = cut(move |input| term(input, depth))(rest)?;
        left = Predicate::And(Box::new(left), Box::new(right));
        input = rest;
    }
    Ok((input, left))
}

fn or_op(input: &str) -> Res<'_, &str> {
    delimited(s, tag("||"), s)(input)
}

fn and_op(input: &str) -> Res<'_, &str> {
    delimited(s, tag("&&"), s)(input)
}

fn term(input: &str, depth: usize) -> Res<'_, Predicate> {
    let Ok((rest, _)) = open_paren(input) else {
        return context("expected a condition starting with '@' or '('", comparison)(input);
    };
    let depth = nested(input, depth)?;
    delimited(
        s,
        move |input| condition(input, depth),
        pair(s, context("expected ')'", char(')'))),
    )(rest)
}

fn open_paren(input: &str) -> Res<'_, char> {
    char('(')(input)
}

/// Enters one more level of condition nesting, failing past the limit.
fn nested(input: &str, depth: usize) -> Result<usize, nom::Err<VerboseError<&str>>> {
    if depth >= MAX_CONDITION_DEPTH {
        return Err(nom::Err::Failure(VerboseError {
            errors: vec![(input, VerboseErrorKind::Context("condition nested too deeply"))],
        }));
    }
    Ok(depth + 1)
}

fn comparison(input: &str) -> Res<'_, Predicate> {
    map(
        pair(
            field_path,
            opt(pair(
                delimited(s, compare_op, s),
                cut(context(
                    "expected a literal: string, number, true, false or null",
                    literal,
                )),
            )),
        ),
        |(field, cmp)| match cmp {
            Some((op, literal)) => Predicate::Compare(field, op, literal),
            None => Predicate::Exists(field),
        },
    )(input)
}

fn field_path(input: &str) -> Res<'_, FieldPath> {
    map(
        preceded(
            char('@'),
            many0(preceded(
                char('.'),
                cut(context("expected member name after '.'", identifier)),
            )),
        ),
        FieldPath,
    )(input)
}

fn compare_op(input: &str) -> Res<'_, CompareOp> {
    alt((
        value(CompareOp::Eq, tag("==")),
        value(CompareOp::Ne, tag("!=")),
        value(CompareOp::Le, tag("<=")),
        value(CompareOp::Lt, char('<')),
        value(CompareOp::Ge, tag(">=")),
        value(CompareOp::Gt, char('>')),
    ))(input)
}

fn literal(input: &str) -> Res<'_, Literal> {
    alt((
        value(Literal::Null, tag("null")),
        value(Literal::Bool(true), tag("true")),
        value(Literal::Bool(false), tag("false")),
        map(string, Literal::String),
        map(double, Literal::Number),
    ))(input)
}

fn identifier(input: &str) -> Res<'_, String> {
    map(take_while1(is_identifier_char), str::to_owned)(input)
}

fn string(input: &str) -> Res<'_, String> {
    alt((quoted('"'), quoted('\'')))(input)
}

fn quoted<'a>(quote: char) -> impl FnMut(&'a str) -> Res<'a, String> {
    delimited(
        char(quote),
        fold_many0(
            alt((
                satisfy(move |c| c != quote && c != '\\'),
                preceded(char('\\'), cut(context("invalid escape sequence", escape))),
            )),
            String::new,
            |mut s, c| {
                s.push(c);
                s
            },
        ),
        cut(context("unterminated string", char(quote))),
    )
}

fn escape(input: &str) -> Res<'_, char> {
    alt((
        value('\\', char('\\')),
        value('\'', char('\'')),
        value('"', char('"')),
        value('/', char('/')),
        value('\n', char('n')),
        value('\r', char('r')),
        value('\t', char('t')),
        value('\u{8}', char('b')),
        value('\u{c}', char('f')),
        preceded(
            char('u'),
            map_opt(
                take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()),
                |hex| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
            ),
        ),
    ))(input)
}
