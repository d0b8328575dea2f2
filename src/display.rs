//! Module for turning protocols into table rows.
//!
//! Rendering is done by [prettytable]. Cells are coloured through cell
//! styles, so colour only shows up when printing to a terminal, and the
//! [fmt::Display] output of a [StatusTable] stays plain.

use std::{fmt, io::Write};

use prettytable::{color, format, Attr, Cell, Row, Table};

use crate::{DisplayEntry, NameMap, ProtocolState, Result};

/// Placeholder for columns that don't apply to a protocol
pub const EMPTY_VALUE: &str = "-";

/// How a state or info value should be highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
    InProgress,
    Plain,
}

fn is_success(s: &str) -> bool {
    s == "up" || s == "Established"
}

fn is_failure(s: &str) -> bool {
    s == "down" || s.contains("Error")
}

fn is_in_progress(s: &str) -> bool {
    s == "start" || s.contains("Connect")
}

/// Classification rules, checked in order. The first match wins.
///
/// The substring checks also hit operator written info text that merely
/// mentions `Error` or `Connect`.
const STATUS_RULES: [(fn(&str) -> bool, Status); 3] = [
    (is_success, Status::Success),
    (is_failure, Status::Failure),
    (is_in_progress, Status::InProgress),
];

impl Status {
    /// Classifies a state or info value
    pub fn of(value: &str) -> Status {
        STATUS_RULES
            .iter()
            .find(|(rule, _)| rule(value))
            .map(|(_, status)| *status)
            .unwrap_or(Status::Plain)
    }

    fn color(self) -> Option<color::Color> {
        match self {
            Status::Success => Some(color::GREEN),
            Status::Failure => Some(color::RED),
            Status::InProgress => Some(color::YELLOW),
            Status::Plain => None,
        }
    }
}

/// A cell holding `value`, coloured by its [Status]
fn status_cell(value: &str) -> Cell {
    let cell = Cell::new(value);
    match Status::of(value).color() {
        Some(c) => cell.with_style(Attr::ForegroundColor(c)),
        None => cell,
    }
}

/// Route counts bird didn't report are left blank
fn count_string(count: Option<u32>) -> String {
    count.map(|c| c.to_string()).unwrap_or_default()
}

/// One protocol, as shown in the status table
pub struct StatusRow<'a> {
    pub protocol: &'a ProtocolState,
    pub entry: DisplayEntry<'a>,
}

impl<'a> StatusRow<'a> {
    pub fn new(protocol: &'a ProtocolState, names: &'a NameMap) -> Self {
        StatusRow {
            protocol,
            entry: names.lookup(&protocol.name),
        }
    }

    pub fn columns(show_tags: bool) -> Row {
        let mut titles = vec!["Peer", "AS", "Neighbor", "State", "In", "Out", "Since", "Info"];
        if show_tags {
            titles.push("Tags");
        }
        Row::new(titles.into_iter().map(Cell::new).collect())
    }

    pub fn to_row(&self, show_tags: bool) -> Row {
        let p = self.protocol;
        let (neighbor_as, neighbor_address) = match &p.bgp {
            Some(bgp) => (bgp.neighbor_as.to_string(), bgp.neighbor_address.as_str()),
            None => (EMPTY_VALUE.to_owned(), EMPTY_VALUE),
        };
        let mut cells = vec![
            Cell::new(self.entry.name),
            Cell::new(&neighbor_as),
            Cell::new(neighbor_address),
            status_cell(&p.state),
            Cell::new(&count_string(p.routes.imported)),
            Cell::new(&count_string(p.routes.exported)),
            Cell::new(&p.since),
            status_cell(&p.info),
        ];
        if show_tags {
            cells.push(Cell::new(&self.entry.tags.join(", ")));
        }
        Row::new(cells)
    }
}

/// The status table, with its header row
pub struct StatusTable {
    inner: Table,
    show_tags: bool,
}

impl StatusTable {
    pub fn new(show_tags: bool) -> Self {
        let format = format::FormatBuilder::new()
            .padding(1, 1)
            .separator(
                format::LinePosition::Title,
                format::LineSeparator::new('-', '-', '-', '-'),
            )
            .build();
        let mut table = Table::new();
        table.set_format(format);
        table.set_titles(StatusRow::columns(show_tags));
        StatusTable {
            inner: table,
            show_tags,
        }
    }

    /// Builds a table with a row for each of `protocols`, in order
    pub fn from_protocols(protocols: &[&ProtocolState], names: &NameMap, show_tags: bool) -> Self {
        let mut table = Self::new(show_tags);
        for protocol in protocols {
            table.add_row(&StatusRow::new(protocol, names));
        }
        table
    }

    pub fn add_row(&mut self, row: &StatusRow) {
        self.inner.add_row(row.to_row(self.show_tags));
    }

    /// Number of protocol rows, not counting the header
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Cell contents of row `idx`, without styling
    pub fn row_values(&self, idx: usize) -> Option<Vec<String>> {
        self.inner
            .get_row(idx)
            .map(|row| row.iter().map(Cell::get_content).collect())
    }

    /// Prints to stdout, in colour if stdout is a terminal
    pub fn print(&self) -> Result<()> {
        self.inner.print_tty(false)?;
        Ok(())
    }

    /// Writes the table to `out`, without colour
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        self.inner.print(out)?;
        Ok(())
    }
}

impl fmt::Display for StatusTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}
