//! Common functionality for amlevel, a levelized cost of ammonia calculator.
#![warn(missing_docs)]
pub mod capacity;
pub mod capex;
pub mod cli;
pub mod finance;
pub mod input;
pub mod lcoa;
pub mod log;
pub mod opex;
pub mod output;
pub mod production;
pub mod scenario;
pub mod settings;
pub mod sweep;
pub mod units;

use std::path::PathBuf;

/// The name of the per-user configuration directory for the program
const CONFIG_DIR_NAME: &str = "amlevel";

/// Get the path to the program's per-user configuration directory
pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push(CONFIG_DIR_NAME);

    path
}
