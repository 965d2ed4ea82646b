//! Text rendering of the tape window shown by the interactive session.
//!
//! ```text
//! State: [ 0 | 3 | 0 | 0 | 0 | ...  | 0  ]
//! Index:   0   1   2   3   4   5-28   29
//! Point:       ^
//! ```
//!
//! The first and last cells are always shown. Between them a window of
//! `radius` cells on each side of the pointer is drawn, and every run of
//! hidden cells collapses into a `...` column annotated with its index range.

use std::fmt;

use nu_ansi_term::Style;

use crate::theme::catppuccin::Mocha;

/// Cells shown on each side of the pointer unless configured otherwise.
pub const DEFAULT_RADIUS: usize = 4;

const ELISION: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Cell(usize),
    Elided { from: usize, to: usize },
}

/// Read-only view over a tape and its data pointer.
#[derive(Debug, Clone, Copy)]
pub struct TapeView<'a> {
    cells: &'a [i64],
    pointer: usize,
    radius: usize,
}

impl<'a> TapeView<'a> {
    pub fn new(cells: &'a [i64], pointer: usize) -> Self {
        Self {
            cells,
            pointer,
            radius: DEFAULT_RADIUS,
        }
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    fn columns(&self) -> Vec<Column> {
        let size = self.cells.len();
        if size <= 2 {
            return (0..size).map(Column::Cell).collect();
        }

        let last = size - 1;
        let mut lo = self.pointer.saturating_sub(self.radius).max(1);
        let mut hi = self.pointer.saturating_add(self.radius).min(last - 1);
        // Eliding a single cell takes more room than drawing it.
        if lo == 2 {
            lo = 1;
        }
        if hi + 2 == last {
            hi = last - 1;
        }

        let mut columns = vec![Column::Cell(0)];
        if lo > 1 {
            columns.push(Column::Elided { from: 1, to: lo - 1 });
        }
        columns.extend((lo..=hi).map(Column::Cell));
        if hi < last - 1 {
            columns.push(Column::Elided { from: hi + 1, to: last - 1 });
        }
        columns.push(Column::Cell(last));
        columns
    }

    pub fn render(&self) -> RenderedTape {
        let mut state = String::from("[");
        let mut index = String::from(" ");
        let mut point = String::from(" ");

        let columns = self.columns();
        for (n, column) in columns.iter().enumerate() {
            let (value, label, here) = match *column {
                Column::Cell(i) => (self.cells[i].to_string(), i.to_string(), i == self.pointer),
                Column::Elided { from, to } => (ELISION.to_string(), format!("{from}-{to}"), false),
            };
            let width = value.len().max(label.len()) + 2;
            let marker = if here { "^" } else { "" };
            let separator = if n + 1 == columns.len() { ']' } else { '|' };

            state.push_str(&format!("{value:^width$}{separator}"));
            index.push_str(&format!("{label:^width$} "));
            point.push_str(&format!("{marker:^width$} "));
        }

        RenderedTape {
            state,
            index: index.trim_end().to_string(),
            point: point.trim_end().to_string(),
        }
    }
}

/// The three rows of a rendered tape window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTape {
    pub state: String,
    pub index: String,
    pub point: String,
}

impl RenderedTape {
    /// Rows with ANSI colors: dim labels and a highlighted pointer marker.
    pub fn styled(&self) -> String {
        let label = Style::new().fg(Mocha::SURFACE2);
        let value = Style::new().fg(Mocha::TEXT);
        let marker = Style::new().fg(Mocha::YELLOW).bold();
        format!(
            "\n\t{}{}\n\t{}{}\n\t{}{}\n",
            label.paint("State: "),
            value.paint(&self.state),
            label.paint("Index: "),
            label.paint(&self.index),
            label.paint("Point: "),
            marker.paint(&self.point),
        )
    }
}

impl fmt::Display for RenderedTape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "\tState: {}", self.state)?;
        writeln!(f, "\tIndex: {}", self.index)?;
        writeln!(f, "\tPoint: {}", self.point)
    }
}
