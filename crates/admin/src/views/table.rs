//! Fixed-width text tables.

use std::io::{self, Write};

/// Cell alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Column definition for a text table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Key used to mark the sorted column.
    pub key: &'static str,
    /// Header text.
    pub label: &'static str,
    pub align: Align,
    pub sortable: bool,
}

impl TableColumn {
    /// A left-aligned column that cannot be sorted.
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            align: Align::Left,
            sortable: false,
        }
    }

    /// A left-aligned sortable column.
    #[must_use]
    pub const fn sortable(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            align: Align::Left,
            sortable: true,
        }
    }

    #[must_use]
    pub const fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }
}

/// A table collected row by row, then rendered at once so every column is
/// as wide as its widest cell.
#[derive(Debug, Clone)]
pub struct TextTable {
    columns: Vec<TableColumn>,
    rows: Vec<Vec<String>>,
    sorted: Option<(&'static str, bool)>,
    empty_title: String,
}

impl TextTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            sorted: None,
            empty_title: "No items found".to_string(),
        }
    }

    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Mark `key` as the sorted column.
    #[must_use]
    pub const fn sorted_by(mut self, key: &'static str, ascending: bool) -> Self {
        self.sorted = Some((key, ascending));
        self
    }

    #[must_use]
    pub fn empty_state(mut self, title: &str) -> Self {
        self.empty_title = title.to_string();
        self
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn header(&self, column: &TableColumn) -> String {
        match self.sorted {
            Some((key, ascending)) if column.sortable && key == column.key => {
                format!("{} {}", column.label, if ascending { '▲' } else { '▼' })
            }
            _ => column.label.to_string(),
        }
    }

    /// Render the table, or the empty-state line when it has no rows.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        if self.rows.is_empty() {
            return writeln!(out, "{}", self.empty_title);
        }

        let headers: Vec<String> = self.columns.iter().map(|c| self.header(c)).collect();
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        self.line(out, &headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "{}", rule.join("  "))?;
        for row in &self.rows {
            self.line(out, row, &widths)?;
        }
        Ok(())
    }

    fn line(&self, out: &mut impl Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
        let mut parts = Vec::with_capacity(widths.len());
        for (i, width) in widths.iter().enumerate() {
            let cell = cells.get(i).map_or("", String::as_str);
            let pad = width.saturating_sub(cell.chars().count());
            let align = self.columns.get(i).map_or(Align::Left, |c| c.align);
            parts.push(match align {
                Align::Left => format!("{cell}{}", " ".repeat(pad)),
                Align::Right => format!("{}{cell}", " ".repeat(pad)),
            });
        }
        writeln!(out, "{}", parts.join("  ").trim_end())
    }
}

impl Default for TextTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::views::render_to_string;

    #[test]
    fn test_columns_align() {
        let mut table = TextTable::new()
            .column(TableColumn::sortable("user", "User"))
            .column(TableColumn::new("amount", "Amount").right())
            .sorted_by("user", true);
        table.row(vec!["Ivan".to_string(), "₽5,000".to_string()]);
        table.row(vec!["Maria Sidorova".to_string(), "₽12,000".to_string()]);

        let text = render_to_string(|out| table.render(out));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "User ▲           Amount");
        assert_eq!(lines[2], "Ivan             ₽5,000");
        assert_eq!(lines[3], "Maria Sidorova  ₽12,000");
    }

    #[test]
    fn test_empty_state() {
        let table = TextTable::new()
            .column(TableColumn::new("id", "ID"))
            .empty_state("No withdrawal requests");
        assert_eq!(render_to_string(|out| table.render(out)), "No withdrawal requests\n");
    }
}
