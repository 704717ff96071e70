//! Untyped tabular input as handed over by a data adapter.
//!
//! Cells stay as optional strings until validation so that a missing value is
//! distinguishable from a malformed one.

/// Columns every price table must carry, in observation field order.
pub const REQUIRED_COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawTable {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with missing cells, long rows are
    /// truncated to the header width.
    pub fn push_row(&mut self, mut cells: Vec<Option<String>>) {
        cells.resize(self.columns.len(), None);
        self.rows.push(cells);
    }

    /// Convenience for literal rows: empty strings become missing cells.
    pub fn push_str_row(&mut self, cells: &[&str]) {
        let cells = cells
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
            .collect();
        self.push_row(cells);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive, whitespace-tolerant header lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(name))
    }

    /// The cell's text, or `None` when the cell holds a missing marker.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)?
            .get(column)?
            .as_deref()
            .filter(|raw| !is_missing(raw))
    }

    /// Overwrite a cell by column name. Returns false if the row or column
    /// does not exist.
    pub fn set_cell(&mut self, row: usize, column: &str, value: Option<&str>) -> bool {
        let Some(col) = self.column_index(column) else {
            return false;
        };
        match self.rows.get_mut(row) {
            Some(cells) => {
                cells[col] = value.map(str::to_string);
                true
            }
            None => false,
        }
    }
}

/// Empty text and the usual null spellings count as missing.
pub fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || ["nan", "null", "na", "none"]
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}
