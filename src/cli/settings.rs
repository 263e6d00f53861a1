//! CLI commands for managing the program settings file.
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result};
use std::fs;

/// The available subcommands for managing settings.
#[derive(clap::Subcommand)]
pub enum SettingsSubcommands {
    /// Open the program settings file in a text editor
    Edit,
    /// Print the path the settings file is read from
    Path,
    /// Write the contents of a placeholder `settings.toml` to the console
    DumpDefault,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Edit => handle_edit_command(),
            Self::Path => {
                println!("{}", get_settings_file_path().display());
                Ok(())
            }
            Self::DumpDefault => {
                print!("{}", Settings::default_file_contents());
                Ok(())
            }
        }
    }
}

/// Handle the `settings edit` command.
///
/// A placeholder settings file is created first if none exists, so the user always has
/// something to edit.
fn handle_edit_command() -> Result<()> {
    let file_path = get_settings_file_path();
    if !file_path.is_file() {
        if let Some(dir_path) = file_path.parent() {
            fs::create_dir_all(dir_path)
                .with_context(|| format!("Failed to create directory: {}", dir_path.display()))?;
        }
        fs::write(&file_path, Settings::default_file_contents())?;
    }

    println!("Opening settings file for editing: {}", file_path.display());
    edit::edit_file(&file_path)?;

    Ok(())
}
