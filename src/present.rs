//! Result presentation for unidb.
//!
//! Renders result sets as delimited text, optionally padded so columns
//! line up. The writer is destination-agnostic; the CLI decides whether
//! the rendered text goes to stdout or a file.

use crate::driver::Row;
use crate::typemap::quote_literal;
use std::io::Write;

/// Renders rows as separator-joined text.
///
/// Column headers are centered over their column and underlined with
/// dashes; data cells are left-aligned when alignment is on. Null cells
/// render as the empty string. Cells containing the separator are
/// single-quoted with embedded quotes doubled, so the output stays
/// splittable on the separator.
#[derive(Debug, Clone)]
pub struct RowWriter {
    align: bool,
    separator: String,
}

impl Default for RowWriter {
    fn default() -> Self {
        Self {
            align: true,
            separator: ",".to_string(),
        }
    }
}

impl RowWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_alignment(mut self, align: bool) -> Self {
        self.align = align;
        self
    }

    /// Renders the rows to a string.
    ///
    /// `col_names = None` means no header and no dash line; column widths
    /// then start from the first data row.
    pub fn format_rows(&self, rows: &[Row], col_names: Option<&[String]>) -> String {
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|v| self.render_cell(&v.to_display_string())).collect())
            .collect();

        let mut widths: Vec<usize> = match col_names {
            Some(names) => names.iter().map(|n| n.chars().count()).collect(),
            None => match cells.first() {
                Some(first) => first.iter().map(|c| c.chars().count()).collect(),
                None => return String::new(),
            },
        };
        if self.align {
            for row in &cells {
                for (width, cell) in widths.iter_mut().zip(row) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut lines = Vec::with_capacity(cells.len() + 2);
        if let Some(names) = col_names {
            lines.push(
                names
                    .iter()
                    .zip(&widths)
                    .map(|(name, width)| pad_center(name, *width))
                    .collect::<Vec<_>>()
                    .join(&self.separator),
            );
            lines.push(
                widths
                    .iter()
                    .map(|width| "-".repeat(*width))
                    .collect::<Vec<_>>()
                    .join(&self.separator),
            );
        }
        for row in &cells {
            let line = if self.align {
                row.iter()
                    .zip(&widths)
                    .map(|(cell, width)| pad_left_aligned(cell, *width))
                    .collect::<Vec<_>>()
                    .join(&self.separator)
            } else {
                row.join(&self.separator)
            };
            lines.push(line);
        }
        lines.join("\n")
    }

    /// Renders and writes the rows, with a trailing newline.
    pub fn write_rows(
        &self,
        out: &mut dyn Write,
        rows: &[Row],
        col_names: Option<&[String]>,
    ) -> std::io::Result<()> {
        let text = self.format_rows(rows, col_names);
        writeln!(out, "{text}")
    }

    /// Quotes a cell when it would otherwise split on the separator.
    fn render_cell(&self, text: &str) -> String {
        if !self.separator.is_empty() && text.contains(&self.separator) {
            quote_literal(text)
        } else {
            text.to_string()
        }
    }
}

fn pad_left_aligned(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

fn pad_center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let total = width - len;
    let left = total / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(total - left))
}
