//! Integration tests for the `run` and `sweep` commands.
use amlevel::cli::{RunOpts, handle_run_command, handle_sweep_command};
use amlevel::settings::Settings;
use amlevel::sweep::SweepParameter;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Write a minimal grid scenario file to the given directory
fn write_scenario(dir: &Path) -> PathBuf {
    let file_path = dir.join("my_plant.toml");
    let mut file = File::create(&file_path).unwrap();
    write!(
        file,
        "[plant]
capacity_kw = 1000000.0
capacity_factor = 0.9

[supply]
strategy = \"grid\"
electricity_price = 0.05
"
    )
    .unwrap();

    file_path
}

#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("AMLEVEL_LOG_LEVEL", "off") };

    let dir = tempdir().unwrap();
    let scenario_path = write_scenario(dir.path());
    let output_dir = dir.path().join("out");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
    };

    handle_run_command(&scenario_path, &opts, Some(Settings::default())).unwrap();

    for file_name in ["summary.csv", "capex.csv", "opex.csv", "lcoa_breakdown.csv"] {
        assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
    }

    // The summary holds one row with a positive final cost
    let mut reader = csv::Reader::from_path(output_dir.join("summary.csv")).unwrap();
    let lcoa_idx = reader
        .headers()
        .unwrap()
        .iter()
        .position(|h| h == "final_lcoa_per_tonne")
        .unwrap();
    let record = reader.records().next().unwrap().unwrap();
    let lcoa: f64 = record[lcoa_idx].parse().unwrap();
    assert!(lcoa > 0.0);

    // A second run into the same folder fails without --overwrite
    assert!(handle_run_command(&scenario_path, &opts, Some(Settings::default())).is_err());
    let opts = RunOpts {
        output_dir: Some(output_dir),
        overwrite: true,
    };
    handle_run_command(&scenario_path, &opts, Some(Settings::default())).unwrap();
}

#[test]
fn test_handle_sweep_command() {
    unsafe { std::env::set_var("AMLEVEL_LOG_LEVEL", "off") };

    let dir = tempdir().unwrap();
    let scenario_path = write_scenario(dir.path());
    let output_dir = dir.path().join("sweep_out");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
    };

    handle_sweep_command(
        &scenario_path,
        SweepParameter::ElectricityPrice,
        0.01,
        0.1,
        5,
        &opts,
        Some(Settings::default()),
    )
    .unwrap();

    let mut reader = csv::Reader::from_path(output_dir.join("sweep.csv")).unwrap();
    assert_eq!(reader.records().count(), 5);
}
