//! Data access port trait.
//!
//! Adapters only load raw tables; validation into a price series happens in
//! the domain so every source gets the same hygiene rules.

use crate::domain::error::SimtraderError;
use crate::domain::raw_table::RawTable;
use std::path::Path;

pub trait DataPort {
    fn load_table(&self, source: &Path) -> Result<RawTable, SimtraderError>;
}
