//! Common routines for reading input files.
use crate::units::Dimensionless;
use anyhow::{Context, Result};
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fs;
use std::path::Path;

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// The deserialised TOML data or an error if the file is invalid.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path)
        .with_context(|| format!("Could not read file {}", file_path.display()))?;

    toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))
}

/// Format an error message to include the file path.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a proportion, checking that it is between 0 and 1 inclusive.
pub fn deserialise_proportion<'de, D>(deserialiser: D) -> Result<Dimensionless, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !(0.0..=1.0).contains(&value) {
        Err(serde::de::Error::custom("Value must be between 0 and 1"))?;
    }

    Ok(Dimensionless(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        #[serde(deserialize_with = "deserialise_proportion")]
        fraction: Dimensionless,
    }

    #[test]
    fn test_read_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("data.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "fraction = 0.5").unwrap();
        }

        let record: Record = read_toml(&file_path).unwrap();
        assert_eq!(record.fraction, Dimensionless(0.5));
    }

    #[test]
    fn test_read_toml_missing_file() {
        let dir = tempdir().unwrap();
        assert!(read_toml::<Record>(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_deserialise_proportion() {
        // Valid proportions
        assert_eq!(
            toml::from_str::<Record>("fraction = 0.0").unwrap().fraction,
            Dimensionless(0.0)
        );
        assert_eq!(
            toml::from_str::<Record>("fraction = 1.0").unwrap().fraction,
            Dimensionless(1.0)
        );

        // Invalid proportions
        assert!(toml::from_str::<Record>("fraction = -0.5").is_err());
        assert!(toml::from_str::<Record>("fraction = 1.5").is_err());
    }
}
