//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{build_simulation_config, SimulationConfig};
use crate::domain::engine::{SimulationEngine, SimulationReport};
use crate::domain::error::SimtraderError;
use crate::domain::performance;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "simtrader", about = "Single-instrument strategy replay simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a price series against a configured strategy
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Price CSV; overrides [simulation] data
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Write per-observation valuations to this CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        initial_investment: Option<f64>,
    },
    /// Validate a price CSV without simulating
    Validate {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run {
            config,
            data,
            output,
            initial_investment,
        } => run_simulation(
            &config,
            data.as_deref(),
            output.as_deref(),
            initial_investment,
        ),
        Command::Validate { data } => run_validate(&data),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<SimulationConfig, SimtraderError> {
    let adapter = FileConfigAdapter::from_file(path)?;
    build_simulation_config(&adapter)
}

/// Resolve where the price data lives: the command line wins, otherwise the
/// config's `data` key, taken relative to the config file.
pub fn resolve_data_path(
    config_path: &Path,
    config: &SimulationConfig,
    data_override: Option<&Path>,
) -> Result<PathBuf, SimtraderError> {
    if let Some(path) = data_override {
        return Ok(path.to_path_buf());
    }
    let data = config
        .data_path
        .as_ref()
        .ok_or_else(|| SimtraderError::ConfigMissing {
            section: "simulation".into(),
            key: "data".into(),
        })?;
    let base = config_path.parent().unwrap_or_else(|| Path::new(""));
    Ok(base.join(data))
}

/// Load, validate, and replay. Validation errors surface before the
/// strategy sees any observation.
pub fn simulate(
    config: &SimulationConfig,
    data_port: &dyn DataPort,
    source: &Path,
) -> Result<SimulationReport, SimtraderError> {
    let table = data_port.load_table(source)?;
    let series = PriceSeries::validate(&table)?;
    info!(
        "loaded {} observations from {}",
        series.len(),
        source.display()
    );

    let mut strategy = config.strategy.build()?;
    let mut engine = SimulationEngine::new(series, config.guard);
    engine.run(&mut *strategy, config.initial_investment)
}

fn run_simulation(
    config_path: &Path,
    data_override: Option<&Path>,
    output_path: Option<&Path>,
    investment_override: Option<f64>,
) -> Result<(), SimtraderError> {
    eprintln!("Loading config from {}", config_path.display());
    let mut config = load_config(config_path)?;
    if let Some(amount) = investment_override {
        config.initial_investment = amount;
    }

    let source = resolve_data_path(config_path, &config, data_override)?;
    eprintln!("Loading data from {}", source.display());

    let report = simulate(&config, &CsvAdapter::new(PathBuf::new()), &source)?;
    print_summary(&report, config.risk_free_rate);

    if let Some(output) = output_path {
        CsvReportAdapter.write(&report, output)?;
        eprintln!("\nValuations written to: {}", output.display());
    }
    Ok(())
}

fn print_summary(report: &SimulationReport, risk_free_rate: f64) {
    eprintln!("\n=== Simulation Results ===");
    eprintln!("Observations:       {}", report.valuations.len());
    eprintln!("Initial Investment: {:.2}", report.initial_investment);
    eprintln!(
        "Final Valuation:    {:.2}",
        report.final_valuation().unwrap_or(report.initial_investment)
    );
    eprintln!("Final Cash:         {:.2}", report.final_cash);
    eprintln!("Final Shares:       {:.6}", report.final_shares);
    eprintln!("Fills:              {}", report.fills.len());
    eprintln!("Strategy Failures:  {}", report.strategy_failures);

    if let Some(summary) = performance::summarize(&report.valuations, risk_free_rate) {
        eprintln!("Total Return:       {:.2}%", summary.total_return * 100.0);
        eprintln!("Max Drawdown:       -{:.1}%", summary.max_drawdown * 100.0);
        match summary.sharpe_ratio {
            Some(sharpe) => eprintln!("Sharpe (per obs):   {:.4}", sharpe),
            None => eprintln!("Sharpe (per obs):   n/a"),
        }
    }
}

fn run_validate(data_path: &Path) -> Result<(), SimtraderError> {
    let table = CsvAdapter::new(PathBuf::new()).load_table(data_path)?;
    let rows = table.len();
    let series = PriceSeries::validate(&table)?;

    eprintln!("Data is valid: {}", data_path.display());
    eprintln!("  Rows read:    {}", rows);
    eprintln!("  Observations: {}", series.len());
    if let (Some(first), Some(last)) = (series.first_timestamp(), series.last_timestamp()) {
        eprintln!("  Range:        {} to {}", first, last);
    }
    Ok(())
}
