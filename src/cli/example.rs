//! Code related to the example scenarios and the CLI commands for interacting with them.
use super::{RunOpts, handle_run_command};
use crate::settings::Settings;
use anyhow::{Context, Result, ensure};
use clap::Subcommand;
use include_dir::{Dir, DirEntry, include_dir};
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The directory containing the example scenarios.
const SCENARIOS_DIR: Dir = include_dir!("scenarios");

/// The available subcommands for managing example scenarios.
#[derive(Subcommand)]
pub enum ExampleSubcommands {
    /// List available examples.
    List,
    /// Provide information about the specified example.
    Info {
        /// The name of the example.
        name: String,
    },
    /// Extract an example scenario to a new directory.
    Extract {
        /// The name of the example to extract.
        name: String,
        /// The destination folder for the example.
        new_path: Option<PathBuf>,
    },
    /// Run an example.
    Run {
        /// The name of the example to run.
        name: String,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl ExampleSubcommands {
    /// Execute the supplied example subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => handle_example_list_command(),
            Self::Info { name } => handle_example_info_command(&name)?,
            Self::Extract {
                name,
                new_path: dest,
            } => handle_example_extract_command(&name, dest.as_deref())?,
            Self::Run { name, opts } => handle_example_run_command(&name, &opts, None)?,
        }

        Ok(())
    }
}

/// Handle the `example list` command.
fn handle_example_list_command() {
    for entry in SCENARIOS_DIR
        .dirs()
        .map(|entry| entry.path().display().to_string())
        .sorted()
    {
        println!("{entry}");
    }
}

/// Handle the `example info` command.
fn handle_example_info_command(name: &str) -> Result<()> {
    let path: PathBuf = [name, "README.txt"].iter().collect();
    let readme = SCENARIOS_DIR
        .get_file(path)
        .context("Example not found.")?
        .contents_utf8()
        .expect("README.txt is not UTF-8 encoded");

    println!("{}", readme);

    Ok(())
}

/// Handle the `example extract` command
fn handle_example_extract_command(name: &str, dest: Option<&Path>) -> Result<()> {
    let dest = dest.unwrap_or(Path::new(name));
    extract_example(name, dest)
}

/// Extract the specified example to a new directory
fn extract_example(name: &str, new_path: &Path) -> Result<()> {
    let sub_dir = SCENARIOS_DIR.get_dir(name).context("Example not found.")?;

    ensure!(
        !new_path.exists(),
        "Destination directory {} already exists",
        new_path.display()
    );

    fs::create_dir(new_path)?;
    for entry in sub_dir.entries() {
        match entry {
            DirEntry::Dir(_) => panic!("Subdirectories in examples not supported"),
            DirEntry::File(f) => {
                let file_name = f.path().file_name().unwrap();
                let file_path = new_path.join(file_name);
                fs::write(&file_path, f.contents())?;
            }
        }
    }

    Ok(())
}

/// Handle the `example run` command.
pub fn handle_example_run_command(
    name: &str,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let scenario_dir = temp_dir.path().join(name);
    extract_example(name, &scenario_dir)?;
    handle_run_command(&scenario_dir.join("scenario.toml"), opts, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_examples_have_readme_and_scenario() {
        for dir in SCENARIOS_DIR.dirs() {
            let name = dir.path().to_str().unwrap();
            assert!(
                SCENARIOS_DIR
                    .get_file([name, "README.txt"].iter().collect::<PathBuf>())
                    .is_some(),
                "{name} has no README.txt"
            );
            assert!(
                SCENARIOS_DIR
                    .get_file([name, "scenario.toml"].iter().collect::<PathBuf>())
                    .is_some(),
                "{name} has no scenario.toml"
            );
        }
    }

    #[test]
    fn test_extract_example() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("grid");
        extract_example("grid", &dest).unwrap();
        assert!(dest.join("scenario.toml").is_file());

        // Destination must not already exist
        assert!(extract_example("grid", &dest).is_err());
    }

    #[test]
    fn test_extract_example_unknown_name() {
        let dir = tempdir().unwrap();
        assert!(extract_example("no_such_example", &dir.path().join("x")).is_err());
    }

    #[test]
    fn test_extracted_examples_validate() {
        let dir = tempdir().unwrap();
        for sub_dir in SCENARIOS_DIR.dirs() {
            let name = sub_dir.path().to_str().unwrap();
            let dest = dir.path().join(name);
            extract_example(name, &dest).unwrap();
            crate::scenario::Scenario::from_path(&dest.join("scenario.toml")).unwrap();
        }
    }
}
