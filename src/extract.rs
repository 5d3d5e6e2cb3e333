// src/extract.rs
// Streaming extraction of run rows from an overview page. A small state
// machine (Outside / InRow / InColumn) driven by the pull tokenizer in
// html.rs. Rows are recognized purely by their status class; columns are
// walked positionally and mapped through a per-schema field table.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::error::Error;
use crate::html::{Token, Tokenizer};

/// Named output columns, in portal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Id,
    Result,
    User,
    Type,
    Project,
    ProjectVersion,
    Component,
    ComponentVersion,
    Start,
    Duration,
    Description,
    Platforms,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Id,
        Field::Result,
        Field::User,
        Field::Type,
        Field::Project,
        Field::ProjectVersion,
        Field::Component,
        Field::ComponentVersion,
        Field::Start,
        Field::Duration,
        Field::Description,
        Field::Platforms,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Result => "result",
            Field::User => "user",
            Field::Type => "type",
            Field::Project => "project",
            Field::ProjectVersion => "project_version",
            Field::Component => "component",
            Field::ComponentVersion => "component_version",
            Field::Start => "start",
            Field::Duration => "duration",
            Field::Description => "description",
            Field::Platforms => "platforms",
        }
    }

    fn convert(self, text: &str) -> Result<Value, Error> {
        let bad = || Error::FieldConversion {
            field: self.name(),
            text: s!(text),
        };
        match self {
            Field::Id => parse_id(text).map(Value::Int).ok_or_else(bad),
            Field::Start => NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .map(Value::Time)
                .map_err(|_| bad()),
            Field::Duration => parse_duration(text).map(Value::Int).ok_or_else(bad),
            Field::Result | Field::Description | Field::Platforms => {
                Ok(Value::Text(text.replace('\u{a0}', " ")))
            }
            _ => Ok(Value::Text(s!(text))),
        }
    }
}

/// One typed cell. `Null` means the column was present but empty, or absent
/// from the page's layout altogether.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Time(NaiveDateTime),
    Text(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }
}

/// Which positional layout the page uses. `Auto` decides per row from the
/// observed column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Auto,
    Legacy,
    Versioned,
}

/// Row classes that mark run rows: seven run states, each in two
/// alternating-stripe variants. Anything else (header rows, spacers) never
/// enters the row state.
pub const STATUS_CLASSES: [&str; 14] = [
    "inprogress",
    "inprogress2",
    "succeeded",
    "succeeded2",
    "failed",
    "failed2",
    "removed",
    "removed2",
    "notcompleted",
    "notcompleted2",
    "error",
    "error2",
    "timedout",
    "timedout2",
];

/// Column position → field, legacy layout. Position 0 is the status icon,
/// position 6 an unnamed filler column between project and start.
const LEGACY_FIELDS: [Option<Field>; 11] = [
    None,
    Some(Field::Id),
    Some(Field::Result),
    Some(Field::User),
    Some(Field::Type),
    Some(Field::Project),
    None,
    Some(Field::Start),
    Some(Field::Duration),
    Some(Field::Description),
    Some(Field::Platforms),
];

/// Column position → field, versioned layout (adds project_version,
/// component, component_version between project and start).
const VERSIONED_FIELDS: [Option<Field>; 13] = [
    None,
    Some(Field::Id),
    Some(Field::Result),
    Some(Field::User),
    Some(Field::Type),
    Some(Field::Project),
    Some(Field::ProjectVersion),
    Some(Field::Component),
    Some(Field::ComponentVersion),
    Some(Field::Start),
    Some(Field::Duration),
    Some(Field::Description),
    Some(Field::Platforms),
];

/// Under `Schema::Auto`, rows with at least this many columns are taken to
/// use the versioned layout.
const VERSIONED_MIN_COLUMNS: usize = VERSIONED_FIELDS.len();

/// Per-page result: every field keyed, arrays aligned by row index.
pub type PageColumns = BTreeMap<Field, Vec<Value>>;

fn is_status_row(class: Option<&str>) -> bool {
    let Some(class) = class else { return false };
    class
        .split_whitespace()
        .any(|c| STATUS_CLASSES.iter().any(|s| c.eq_ignore_ascii_case(s)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    InRow,
    InColumn,
}

/// The scanner itself. `feed` accepts one token at a time, so tests can
/// drive synthetic token sequences without any markup.
pub struct RowExtractor {
    schema: Schema,
    state: State,
    col: i32,
    acc: BTreeMap<usize, String>,
    out: PageColumns,
    rows: usize,
}

impl RowExtractor {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            state: State::Outside,
            col: -1,
            acc: BTreeMap::new(),
            out: Field::ALL.iter().map(|&f| (f, Vec::new())).collect(),
            rows: 0,
        }
    }

    pub fn feed(&mut self, token: &Token) -> Result<(), Error> {
        match token {
            Token::Open { tag, class } if tag == "tr" => {
                if self.state == State::Outside && is_status_row(class.as_deref()) {
                    self.state = State::InRow;
                    self.col = -1;
                    self.acc.clear();
                }
            }
            Token::Open { tag, .. } if tag == "td" || tag == "th" => {
                if self.state != State::Outside {
                    // a column opening while one is still open closes it implicitly
                    self.state = State::InColumn;
                    self.col += 1;
                }
            }
            Token::Text(text) => {
                if self.state == State::InColumn {
                    // text nodes fragment around nested tags and entities;
                    // concatenate, never replace
                    self.acc
                        .entry(self.col as usize)
                        .or_default()
                        .push_str(text);
                }
            }
            Token::Close(tag) if tag == "td" || tag == "th" => {
                // an unmatched column close outside a row is dropped
                if self.state == State::InColumn {
                    self.state = State::InRow;
                }
            }
            Token::Close(tag) if tag == "tr" => {
                // tolerate a still-open column at row end
                if self.state != State::Outside {
                    self.close_row()?;
                    self.state = State::Outside;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Map the accumulated row through the field table and push one value
    /// per field. Runs at row close so `Auto` can see the full column count.
    fn close_row(&mut self) -> Result<(), Error> {
        let ncols = (self.col + 1).max(0) as usize;
        let fields: &[Option<Field>] = match self.schema {
            Schema::Legacy => &LEGACY_FIELDS,
            Schema::Versioned => &VERSIONED_FIELDS,
            Schema::Auto => {
                if ncols >= VERSIONED_MIN_COLUMNS {
                    &VERSIONED_FIELDS
                } else {
                    &LEGACY_FIELDS
                }
            }
        };

        // Convert everything first; a conversion failure must not leave a
        // half-pushed row behind.
        let mut converted = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            let pos = fields.iter().position(|slot| *slot == Some(field));
            let text = pos
                .and_then(|p| self.acc.get(&p))
                .map(|t| t.trim())
                .unwrap_or("");
            let value = if text.is_empty() {
                Value::Null
            } else {
                field.convert(text)?
            };
            converted.push((field, value));
        }
        for (field, value) in converted {
            self.out.entry(field).or_default().push(value);
        }
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(self) -> PageColumns {
        self.out
    }
}

/// Parse one cached overview page into aligned per-field value arrays.
pub fn extract_page(html: &str, schema: Schema) -> Result<PageColumns, Error> {
    let mut extractor = RowExtractor::new(schema);
    for token in Tokenizer::new(html) {
        extractor.feed(&token)?;
    }
    Ok(extractor.finish())
}

fn parse_id(text: &str) -> Option<i64> {
    // markup may survive entity decoding as literal <a ...>NNN</a>; take the
    // span between the first '>' and the following '<'
    let inner = match text.find('>') {
        Some(g) => {
            let rest = &text[g + 1..];
            &rest[..rest.find('<').unwrap_or(rest.len())]
        }
        None => text,
    };
    inner.trim().parse().ok()
}

/// "1:02:03" → 3723. Components are hours, minutes, seconds left to right;
/// "2:03" style values fold the same way.
fn parse_duration(text: &str) -> Option<i64> {
    let mut total = 0i64;
    for part in text.split(':') {
        total = total * 60 + part.trim().parse::<i64>().ok()?;
    }
    Some(total)
}
