// src/table.rs

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::extract::{Field, PageColumns, Value};

/// Ordered, column-aligned collection of run records spanning one or more
/// months. Pages are appended in range order; no deduplication, sorting or
/// cross-page validation happens here.
#[derive(Debug)]
pub struct RunTable {
    columns: BTreeMap<Field, Vec<Value>>,
    len: usize,
}

impl RunTable {
    pub fn new() -> Self {
        Self {
            columns: Field::ALL.iter().map(|&f| (f, Vec::new())).collect(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append one page's aligned columns, preserving row order.
    pub fn append(&mut self, mut page: PageColumns) {
        let added = page.values().map(Vec::len).max().unwrap_or(0);
        for field in Field::ALL {
            let mut incoming = page.remove(&field).unwrap_or_default();
            incoming.resize(added, Value::Null);
            self.columns.entry(field).or_default().append(&mut incoming);
        }
        self.len += added;
    }

    pub fn column(&self, field: Field) -> &[Value] {
        self.columns.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Typed view of row `k`, or None past the end.
    pub fn record(&self, k: usize) -> Option<RunRecord> {
        if k >= self.len {
            return None;
        }
        let text = |f: Field| self.column(f)[k].as_text().map(String::from);
        Some(RunRecord {
            id: self.column(Field::Id)[k].as_int(),
            result: text(Field::Result),
            user: text(Field::User),
            run_type: text(Field::Type),
            project: text(Field::Project),
            project_version: text(Field::ProjectVersion),
            component: text(Field::Component),
            component_version: text(Field::ComponentVersion),
            start: self.column(Field::Start)[k].as_time(),
            duration: self.column(Field::Duration)[k].as_int(),
            description: text(Field::Description),
            platforms: text(Field::Platforms),
        })
    }
}

impl Default for RunTable {
    fn default() -> Self {
        Self::new()
    }
}

/// One run, fully typed. Every field is optional: pages elide cells, and the
/// legacy layout has no version columns at all.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub id: Option<i64>,
    pub result: Option<String>,
    pub user: Option<String>,
    pub run_type: Option<String>,
    pub project: Option<String>,
    pub project_version: Option<String>,
    pub component: Option<String>,
    pub component_version: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub duration: Option<i64>,
    pub description: Option<String>,
    pub platforms: Option<String>,
}
