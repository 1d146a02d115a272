// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Parser for the keyword-based design format.
//!
//! ```text
//! TECHNOLOGY mocmos ;
//! LIBRARY demo ;
//! CELL inv VIEW lay ;
//!   NODE in PROTO metal-1-pin AT 0 0 SIZE 3 3 ;
//!   ARC w1 PROTO metal-1 FROM in TO out WIDTH 3 ;
//!   EXPORT a NODE in CHARACTERISTIC in BODYONLY ;
//! END inv
//! END LIBRARY
//! ```
//!
//! Nodes must be declared before the arcs and exports that use them.

use std::fmt;

use log::warn;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace1, not_line_ending, u32 as parse_u32},
    combinator::{cut, map, map_res, opt, value},
    multi::{count, many0, many1},
    number::complete::double,
    sequence::{pair, preceded},
    IResult, Parser,
};

use super::{
    is_name_char, ArcInst, Cell, ColorIndex, Database, Export, Look, NodeInst, OutlineStyle,
    Point, PortCharacteristic, Technology, View,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: Option<usize>,
    pub message: String,
}

impl ParseError {
    fn new(message: String) -> Self {
        Self {
            line: None,
            message,
        }
    }

    fn at(text: &str, rest: &str, message: String) -> Self {
        let offset = text.len().saturating_sub(rest.len());
        let line = text[..offset].matches('\n').count() + 1;
        Self {
            line: Some(line),
            message,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

struct RawNode<'a> {
    name: &'a str,
    proto: &'a str,
    center: (f64, f64),
    size: (f64, f64),
    outline: Option<Vec<(f64, f64)>>,
    look: Look,
}

struct RawArc<'a> {
    name: &'a str,
    proto: &'a str,
    head: &'a str,
    tail: &'a str,
    width: f64,
    look: Look,
}

struct RawExport<'a> {
    name: &'a str,
    node: &'a str,
    characteristic: &'a str,
    attrs: Vec<ExportAttr<'a>>,
}

enum Statement<'a> {
    Node(RawNode<'a>),
    Arc(RawArc<'a>),
    Export(RawExport<'a>),
}

struct RawCell<'a> {
    name: &'a str,
    view: &'a str,
    statements: Vec<Statement<'a>>,
    end_name: &'a str,
}

struct RawDesign<'a> {
    technology: &'a str,
    library: &'a str,
    cells: Vec<RawCell<'a>>,
}

#[derive(Clone)]
enum LookAttr {
    Color(u32),
    Pattern([u16; 16]),
    Style(u32),
}

#[derive(Clone)]
enum ExportAttr<'a> {
    Reference(&'a str),
    BodyOnly,
    AlwaysDrawn,
}

/// Skips whitespace and `#` comments.
fn ws(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(char('#'), not_line_ending)),
        ))),
    )
    .parse(input)
}

fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        let (input, _) = ws(input)?;
        tag(kw).parse(input)
    }
}

fn token(input: &str) -> IResult<&str, &str> {
    let (input, _) = ws(input)?;
    take_while1(is_name_char).parse(input)
}

fn number(input: &str) -> IResult<&str, f64> {
    let (input, _) = ws(input)?;
    double(input)
}

fn unsigned(input: &str) -> IResult<&str, u32> {
    let (input, _) = ws(input)?;
    parse_u32(input)
}

fn end_stmt(input: &str) -> IResult<&str, ()> {
    let (input, _) = ws(input)?;
    let (input, _) = char(';').parse(input)?;
    Ok((input, ()))
}

fn point(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, _) = ws(input)?;
    let (input, _) = char('(').parse(input)?;
    let (input, x) = number(input)?;
    let (input, y) = number(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = char(')').parse(input)?;
    Ok((input, (x, y)))
}

fn hex_word(input: &str) -> IResult<&str, u16> {
    map_res(token, |s: &str| u16::from_str_radix(s, 16)).parse(input)
}

fn look_attr(input: &str) -> IResult<&str, LookAttr> {
    alt((
        map(preceded(keyword("COLOR"), unsigned), LookAttr::Color),
        map(
            preceded(keyword("PATTERN"), count(hex_word, 16)),
            |words: Vec<u16>| {
                let mut pattern = [0u16; 16];
                pattern.copy_from_slice(&words);
                LookAttr::Pattern(pattern)
            },
        ),
        map(preceded(keyword("STYLE"), unsigned), LookAttr::Style),
    ))
    .parse(input)
}

fn look(input: &str) -> IResult<&str, Look> {
    let (input, attrs) = many0(look_attr).parse(input)?;
    let mut look = Look::default();
    for attr in attrs {
        match attr {
            LookAttr::Color(index) => look.color = Some(ColorIndex(index)),
            LookAttr::Pattern(pattern) => look.pattern = Some(pattern),
            LookAttr::Style(index) => {
                look.outline_style = OutlineStyle::from_index(index);
                if look.outline_style.is_none() {
                    warn!("Ignoring unknown outline style {}", index);
                }
            }
        }
    }
    Ok((input, look))
}

fn node_body(input: &str) -> IResult<&str, RawNode<'_>> {
    let (input, name) = token(input)?;
    let (input, _) = keyword("PROTO")(input)?;
    let (input, proto) = token(input)?;
    let (input, _) = keyword("AT")(input)?;
    let (input, x) = number(input)?;
    let (input, y) = number(input)?;
    let (input, _) = keyword("SIZE")(input)?;
    let (input, width) = number(input)?;
    let (input, height) = number(input)?;
    let (input, outline) = opt(preceded(keyword("OUTLINE"), many1(point))).parse(input)?;
    let (input, look) = look(input)?;
    let (input, _) = end_stmt(input)?;

    Ok((
        input,
        RawNode {
            name,
            proto,
            center: (x, y),
            size: (width, height),
            outline,
            look,
        },
    ))
}

fn arc_body(input: &str) -> IResult<&str, RawArc<'_>> {
    let (input, name) = token(input)?;
    let (input, _) = keyword("PROTO")(input)?;
    let (input, proto) = token(input)?;
    let (input, _) = keyword("FROM")(input)?;
    let (input, head) = token(input)?;
    let (input, _) = keyword("TO")(input)?;
    let (input, tail) = token(input)?;
    let (input, _) = keyword("WIDTH")(input)?;
    let (input, width) = number(input)?;
    let (input, look) = look(input)?;
    let (input, _) = end_stmt(input)?;

    Ok((
        input,
        RawArc {
            name,
            proto,
            head,
            tail,
            width,
            look,
        },
    ))
}

fn export_attr(input: &str) -> IResult<&str, ExportAttr<'_>> {
    alt((
        map(preceded(keyword("REFERENCE"), token), ExportAttr::Reference),
        value(ExportAttr::BodyOnly, keyword("BODYONLY")),
        value(ExportAttr::AlwaysDrawn, keyword("ALWAYSDRAWN")),
    ))
    .parse(input)
}

fn export_body(input: &str) -> IResult<&str, RawExport<'_>> {
    let (input, name) = token(input)?;
    let (input, _) = keyword("NODE")(input)?;
    let (input, node) = token(input)?;
    let (input, _) = keyword("CHARACTERISTIC")(input)?;
    let (input, characteristic) = token(input)?;
    let (input, attrs) = many0(export_attr).parse(input)?;
    let (input, _) = end_stmt(input)?;

    Ok((
        input,
        RawExport {
            name,
            node,
            characteristic,
            attrs,
        },
    ))
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        map(preceded(keyword("NODE"), cut(node_body)), Statement::Node),
        map(preceded(keyword("ARC"), cut(arc_body)), Statement::Arc),
        map(preceded(keyword("EXPORT"), cut(export_body)), Statement::Export),
    ))
    .parse(input)
}

fn cell_body(input: &str) -> IResult<&str, RawCell<'_>> {
    let (input, name) = token(input)?;
    let (input, _) = keyword("VIEW")(input)?;
    let (input, view) = token(input)?;
    let (input, _) = end_stmt(input)?;
    let (input, statements) = many0(statement).parse(input)?;
    let (input, _) = keyword("END")(input)?;
    let (input, end_name) = token(input)?;

    Ok((
        input,
        RawCell {
            name,
            view,
            statements,
            end_name,
        },
    ))
}

fn design(input: &str) -> IResult<&str, RawDesign<'_>> {
    let (input, _) = keyword("TECHNOLOGY")(input)?;
    let (input, technology) = token(input)?;
    let (input, _) = end_stmt(input)?;
    let (input, _) = keyword("LIBRARY")(input)?;
    let (input, library) = token(input)?;
    let (input, _) = end_stmt(input)?;
    let (input, cells) = many0(preceded(keyword("CELL"), cut(cell_body))).parse(input)?;
    let (input, _) = keyword("END")(input)?;
    let (input, _) = keyword("LIBRARY")(input)?;
    let (input, _) = ws(input)?;

    Ok((
        input,
        RawDesign {
            technology,
            library,
            cells,
        },
    ))
}

/// Parses a design file into a database.
pub fn parse_design(text: &str) -> Result<Database, ParseError> {
    let raw = match design(text) {
        Ok((rest, raw)) => {
            if !rest.is_empty() {
                return Err(ParseError::at(
                    text,
                    rest,
                    "unexpected content after END LIBRARY".to_string(),
                ));
            }
            raw
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(ParseError::at(
                text,
                e.input,
                format!("syntax error ({:?})", e.code),
            ));
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(ParseError::new("incomplete design file".to_string()));
        }
    };
    build_database(raw)
}

fn build_database(raw: RawDesign<'_>) -> Result<Database, ParseError> {
    let technology = Technology::by_name(raw.technology)
        .ok_or_else(|| ParseError::new(format!("unknown technology '{}'", raw.technology)))?;
    let mut db = Database::new(technology, raw.library);

    for raw_cell in raw.cells {
        if raw_cell.end_name != raw_cell.name {
            return Err(ParseError::new(format!(
                "END {} does not close cell {}",
                raw_cell.end_name, raw_cell.name
            )));
        }
        let view = View::from_abbreviation(raw_cell.view).ok_or_else(|| {
            ParseError::new(format!(
                "cell {}: unknown view '{}'",
                raw_cell.name, raw_cell.view
            ))
        })?;
        if db.find_cell(raw_cell.name, view).is_some() {
            return Err(ParseError::new(format!(
                "cell {}{{{}}} defined twice",
                raw_cell.name, raw_cell.view
            )));
        }
        let cell = build_cell(&db.technology, raw_cell.name, view, raw_cell.statements)?;
        db.add_cell(cell);
    }

    Ok(db)
}

fn build_cell(
    tech: &Technology,
    name: &str,
    view: View,
    statements: Vec<Statement<'_>>,
) -> Result<Cell, ParseError> {
    let mut cell = Cell::new(name, view);
    let context = cell.describe();
    let error = |message: String| ParseError::new(format!("{}: {}", context, message));

    for statement in statements {
        match statement {
            Statement::Node(raw) => {
                if tech.find_primitive(raw.proto).is_none() {
                    return Err(error(format!(
                        "node {} uses unknown primitive '{}'",
                        raw.name, raw.proto
                    )));
                }
                if cell.find_node(raw.name).is_some() {
                    return Err(error(format!("node {} declared twice", raw.name)));
                }
                let mut node = NodeInst::new(
                    raw.name,
                    raw.proto,
                    Point::new(raw.center.0, raw.center.1),
                    raw.size.0,
                    raw.size.1,
                );
                node.outline = raw
                    .outline
                    .map(|points| points.into_iter().map(|(x, y)| Point::new(x, y)).collect());
                node.look = raw.look;
                cell.add_node(node);
            }
            Statement::Arc(raw) => {
                if tech.find_arc_kind(raw.proto).is_none() {
                    return Err(error(format!(
                        "arc {} uses unknown arc kind '{}'",
                        raw.name, raw.proto
                    )));
                }
                let head = cell
                    .find_node(raw.head)
                    .ok_or_else(|| error(format!("arc {}: no node {}", raw.name, raw.head)))?;
                let tail = cell
                    .find_node(raw.tail)
                    .ok_or_else(|| error(format!("arc {}: no node {}", raw.name, raw.tail)))?;
                cell.add_arc(ArcInst {
                    name: raw.name.to_string(),
                    proto: raw.proto.to_string(),
                    head,
                    tail,
                    width: raw.width,
                    look: raw.look,
                });
            }
            Statement::Export(raw) => {
                let node = cell
                    .find_node(raw.node)
                    .ok_or_else(|| error(format!("export {}: no node {}", raw.name, raw.node)))?;
                if cell.find_export(raw.name).is_some() {
                    return Err(error(format!("export {} declared twice", raw.name)));
                }
                let characteristic = PortCharacteristic::from_short_name(raw.characteristic)
                    .ok_or_else(|| {
                        error(format!(
                            "export {}: unknown characteristic '{}'",
                            raw.name, raw.characteristic
                        ))
                    })?;
                let mut export = Export::new(raw.name, node, characteristic);
                for attr in raw.attrs {
                    match attr {
                        ExportAttr::Reference(reference) => {
                            export.reference_name = Some(reference.to_string())
                        }
                        ExportAttr::BodyOnly => export.body_only = true,
                        ExportAttr::AlwaysDrawn => export.always_drawn = true,
                    }
                }
                cell.add_export(export);
            }
        }
    }

    Ok(cell)
}
