//! Table rendering utilities for CLI outputs.

use unicode_width::UnicodeWidthStr;

pub struct Column {
    pub header: String,
    pub right_align: bool,
}

impl Column {
    pub fn left(header: &str) -> Self {
        Self {
            header: header.to_string(),
            right_align: false,
        }
    }

    pub fn right(header: &str) -> Self {
        Self {
            header: header.to_string(),
            right_align: true,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| UnicodeWidthStr::width(c.as_str()))
                    .chain(std::iter::once(UnicodeWidthStr::width(col.header.as_str())))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        // Header
        for (col, w) in self.columns.iter().zip(&widths) {
            out.push_str(&pad(&col.header, *w, col.right_align));
            out.push(' ');
        }
        out.push('\n');

        let total: usize = widths.iter().map(|w| w + 1).sum();
        out.push_str(&"-".repeat(total.saturating_sub(1)));
        out.push('\n');

        // Rows
        for row in &self.rows {
            for (i, (col, w)) in self.columns.iter().zip(&widths).enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&pad(cell, *w, col.right_align));
                out.push(' ');
            }
            out.push('\n');
        }

        out
    }
}

fn pad(s: &str, width: usize, right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(UnicodeWidthStr::width(s)));
    if right {
        format!("{fill}{s}")
    } else {
        format!("{s}{fill}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_grow_to_widest_cell() {
        let mut t = Table::new(vec![Column::left("Name"), Column::right("Rate")]);
        t.add_row(vec!["Acme Corporation".into(), "50.00".into()]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], format!("Name{}Rate ", " ".repeat(14)));
        assert_eq!(lines[2], "Acme Corporation 50.00 ");
    }
}
