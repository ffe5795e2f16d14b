//! Plain-text tables

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::duration::time_ago;
use super::events::EventRow;
use super::links::source_ref;
use crate::inventory::{ResolvedResource, creation_timestamp, is_ready};

const COLUMN_GAP: &str = "   ";

/// A table of string cells, rendered with space-aligned columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|h| h.as_ref().to_uppercase())
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; short rows are padded with empty cells
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len().max(row.len()), String::new());
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, widths: &[usize], cells: &[String]) -> fmt::Result {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(&format!("{:<width$}", cell, width = widths[i]));
    }
    writeln!(f, "{}", line.trim_end())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_line(f, &widths, &self.headers)?;
        for row in &self.rows {
            write_line(f, &widths, row)?;
        }
        Ok(())
    }
}

fn ready_cell(ready: bool) -> String {
    let label = if ready { "True" } else { "False" };
    label.to_string()
}

fn age_cell(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    created
        .map(|t| time_ago(t, now))
        .unwrap_or_else(|| "-".to_string())
}

/// Resolved inventory: name, namespace, kind, ready, age
pub fn inventory_table(resources: &[ResolvedResource], now: DateTime<Utc>) -> Table {
    let mut table = Table::new(["name", "namespace", "kind", "ready", "age"]);
    for resource in resources {
        table.push_row(vec![
            resource.metadata.name.clone(),
            resource.metadata.namespace.clone().unwrap_or_default(),
            resource.display_kind().to_string(),
            ready_cell(resource.is_ready()),
            age_cell(resource.metadata.creation_timestamp, now),
        ]);
    }
    table
}

/// Flux objects of one kind: name, namespace, source, ready, age
pub fn flux_objects_table(objects: &[Value], now: DateTime<Utc>) -> Table {
    let mut table = Table::new(["name", "namespace", "source", "ready", "age"]);
    for obj in objects {
        let text = |pointer: &str| {
            obj.pointer(pointer)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let namespace = text("/metadata/namespace");
        let source = source_ref(obj)
            .map(|s| s.display(Some(namespace.as_str())))
            .unwrap_or_else(|| "-".to_string());

        table.push_row(vec![
            text("/metadata/name"),
            namespace,
            source,
            ready_cell(is_ready(obj)),
            age_cell(creation_timestamp(obj), now),
        ]);
    }
    table
}

/// Event rows: type, reason, from, age, message
pub fn events_table(rows: &[EventRow]) -> Table {
    let mut table = Table::new(["type", "reason", "from", "age", "message"]);
    for row in rows {
        table.push_row(vec![
            row.event_type.clone(),
            row.reason.clone(),
            row.from.clone(),
            row.age.clone(),
            row.message.clone(),
        ]);
    }
    table
}
