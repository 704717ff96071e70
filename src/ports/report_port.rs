//! Report generation port trait.

use crate::domain::engine::SimulationReport;
use crate::domain::error::SimtraderError;
use std::path::Path;

/// Port for writing simulation results.
pub trait ReportPort {
    fn write(&self, report: &SimulationReport, output_path: &Path) -> Result<(), SimtraderError>;
}
