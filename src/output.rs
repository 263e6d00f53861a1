//! The module responsible for writing output data to disk.
use crate::lcoa::Evaluation;
use crate::scenario::Scenario;
use crate::sweep::{SweepParameter, SweepPoint};
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "amlevel_results";

/// The output file name for the one-row summary of inputs and headline results
const SUMMARY_FILE_NAME: &str = "summary.csv";

/// The output file name for capital cost components
const CAPEX_FILE_NAME: &str = "capex.csv";

/// The output file name for operating cost components
const OPEX_FILE_NAME: &str = "opex.csv";

/// The output file name for the per-tonne cost breakdown
const LCOA_BREAKDOWN_FILE_NAME: &str = "lcoa_breakdown.csv";

/// The output file name for sensitivity sweeps
const SWEEP_FILE_NAME: &str = "sweep.csv";

/// Get the output folder for the scenario at the specified path.
///
/// The folder is named after the scenario file's stem; when the file is simply called
/// `scenario.toml`, the containing folder's name is used instead.
pub fn get_output_dir(scenario_path: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified something like "."
    let scenario_path = scenario_path
        .canonicalize()
        .context("Could not resolve path to scenario")?;

    let stem = scenario_path
        .file_stem()
        .context("Scenario path has no file name")?
        .to_str()
        .context("Invalid chars in scenario file name")?;

    let name = if stem == "scenario" {
        scenario_path
            .parent()
            .and_then(Path::file_name)
            .context("Scenario cannot be in root folder")?
            .to_str()
            .context("Invalid chars in scenario folder name")?
    } else {
        stem
    };

    Ok([OUTPUT_DIRECTORY_ROOT, name].iter().collect())
}

/// Create a new output directory for a run.
///
/// # Returns
///
/// Whether an existing directory is being overwritten, or an error if the directory exists and
/// `overwrite` was not given.
pub fn create_output_directory(output_dir: &Path, overwrite: bool) -> Result<bool> {
    let existing = output_dir.is_dir();
    if existing && !overwrite {
        bail!(
            "Output directory {} already exists. Re-run with --overwrite to replace it.",
            output_dir.display()
        );
    }

    fs::create_dir_all(output_dir)?;

    Ok(existing)
}

/// A row of the summary CSV file: key inputs and headline results for one run.
#[derive(Serialize, Debug, PartialEq)]
struct SummaryRow {
    supply_strategy: String,
    capacity_kw: Option<f64>,
    capacity_factor: f64,
    target_production_tonnes: Option<f64>,
    discount_rate: f64,
    plant_lifetime_years: u32,
    annual_h2_kg: f64,
    annual_nh3_tonnes: f64,
    annual_energy_kwh: f64,
    electrolyzer_capacity_kw: f64,
    renewable_capacity_kw: f64,
    electrolyzer_utilisation: f64,
    total_capex: f64,
    total_annual_opex: f64,
    annualized_capex: f64,
    total_annual_cost: f64,
    production_cost_per_tonne: f64,
    transport_cost_per_tonne: f64,
    final_lcoa_per_tonne: f64,
}

impl SummaryRow {
    /// Create a new [`SummaryRow`]
    fn new(scenario: &Scenario, evaluation: &Evaluation) -> Self {
        Self {
            supply_strategy: scenario.supply.name().to_string(),
            capacity_kw: scenario.plant.capacity_kw.map(|c| c.value()),
            capacity_factor: scenario.plant.capacity_factor.value(),
            target_production_tonnes: scenario
                .plant
                .target_production_tonnes
                .map(|t| t.value()),
            discount_rate: scenario.finance.discount_rate.value(),
            plant_lifetime_years: scenario.finance.plant_lifetime_years,
            annual_h2_kg: evaluation.production.hydrogen.value(),
            annual_nh3_tonnes: evaluation.production.ammonia.value(),
            annual_energy_kwh: evaluation.annual_energy.value(),
            electrolyzer_capacity_kw: evaluation.sizing.electrolyzer_capacity.value(),
            renewable_capacity_kw: evaluation.sizing.renewable_capacity.value(),
            electrolyzer_utilisation: evaluation.sizing.utilisation.value(),
            total_capex: evaluation.capex.total.value(),
            total_annual_opex: evaluation.opex.total.value(),
            annualized_capex: evaluation.lcoa.annualized_capex.value(),
            total_annual_cost: evaluation.lcoa.total_annual_cost.value(),
            production_cost_per_tonne: evaluation.lcoa.production_cost_per_tonne.value(),
            transport_cost_per_tonne: evaluation.lcoa.transport_cost_per_tonne.value(),
            final_lcoa_per_tonne: evaluation.lcoa.final_cost_per_tonne.value(),
        }
    }
}

/// A row of a cost-component CSV file
#[derive(Serialize, Debug, PartialEq)]
struct ComponentRow {
    component: String,
    cost: f64,
}

/// A row of the sweep CSV file
#[derive(Serialize, Debug, PartialEq)]
struct SweepRow {
    parameter: String,
    value: f64,
    annual_nh3_tonnes: f64,
    total_capex: f64,
    total_annual_opex: f64,
    production_cost_per_tonne: f64,
    final_lcoa_per_tonne: f64,
}

/// Write the results of a single run to CSV files.
///
/// # Arguments
///
/// * `output_path` - Folder where files will be saved
/// * `scenario` - The evaluated scenario
/// * `evaluation` - The pipeline results
pub fn write_results(
    output_path: &Path,
    scenario: &Scenario,
    evaluation: &Evaluation,
) -> Result<()> {
    let mut summary_writer = csv::Writer::from_path(output_path.join(SUMMARY_FILE_NAME))?;
    summary_writer.serialize(SummaryRow::new(scenario, evaluation))?;
    summary_writer.flush()?;

    write_components(
        &output_path.join(CAPEX_FILE_NAME),
        evaluation
            .capex
            .components
            .iter()
            .map(|(component, cost)| (component.to_string(), cost.value()))
            .chain([("total".to_string(), evaluation.capex.total.value())]),
    )?;

    write_components(
        &output_path.join(OPEX_FILE_NAME),
        evaluation
            .opex
            .components
            .iter()
            .map(|(component, cost)| (component.to_string(), cost.value()))
            .chain([
                ("fixed".to_string(), evaluation.opex.fixed.value()),
                ("variable".to_string(), evaluation.opex.variable.value()),
                ("total".to_string(), evaluation.opex.total.value()),
            ]),
    )?;

    write_components(
        &output_path.join(LCOA_BREAKDOWN_FILE_NAME),
        evaluation
            .lcoa
            .breakdown
            .iter()
            .map(|(share, cost)| (share.to_string(), cost.value())),
    )?;

    Ok(())
}

/// Write name/cost pairs to the specified CSV file
fn write_components<I>(file_path: &Path, components: I) -> Result<()>
where
    I: Iterator<Item = (String, f64)>,
{
    let mut writer = csv::Writer::from_path(file_path)?;
    for (component, cost) in components {
        writer.serialize(ComponentRow { component, cost })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the results of a sensitivity sweep to a CSV file.
pub fn write_sweep(
    output_path: &Path,
    parameter: SweepParameter,
    points: &[SweepPoint],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path.join(SWEEP_FILE_NAME))?;
    for point in points {
        writer.serialize(SweepRow {
            parameter: parameter.to_string(),
            value: point.value,
            annual_nh3_tonnes: point.evaluation.production.ammonia.value(),
            total_capex: point.evaluation.capex.total.value(),
            total_annual_opex: point.evaluation.opex.total.value(),
            production_cost_per_tonne: point
                .evaluation
                .lcoa
                .production_cost_per_tonne
                .value(),
            final_lcoa_per_tonne: point.evaluation.lcoa.final_cost_per_tonne.value(),
        })?;
    }
    writer.flush()?;

    Ok(())
}
