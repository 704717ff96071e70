//! CSV file data adapter.
//!
//! Reads any CSV with a header row into a [`RawTable`]. Column presence and
//! cell contents are checked later by price series validation.

use crate::domain::error::SimtraderError;
use crate::domain::raw_table::RawTable;
use crate::ports::data_port::DataPort;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    /// Relative sources resolve against `base_path`; absolute ones are used as is.
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, source: &Path) -> PathBuf {
        self.base_path.join(source)
    }

    pub fn parse(content: &str) -> Result<RawTable, SimtraderError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| SimtraderError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let mut table = RawTable::new(headers.iter());

        for result in rdr.records() {
            let record = result.map_err(|e| SimtraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            table.push_row(record.iter().map(|cell| Some(cell.to_string())).collect());
        }

        Ok(table)
    }
}

impl DataPort for CsvAdapter {
    fn load_table(&self, source: &Path) -> Result<RawTable, SimtraderError> {
        let path = self.csv_path(source);
        let content = fs::read_to_string(&path).map_err(|e| SimtraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }
}
