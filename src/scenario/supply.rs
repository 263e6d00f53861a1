//! The energy-supply strategy section of a scenario file.
//!
//! Exactly one strategy applies per calculation, selected by the `strategy` field of the
//! `[supply]` table. Sub-parameters belong to their strategy and are only required (or
//! meaningful) when that strategy is active.
use crate::units::{Dimensionless, Hours, MoneyPerEnergy};
use anyhow::{Result, ensure};
use serde::Deserialize;

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

define_unit_param_default!(default_grid_topup_fraction, Dimensionless, 0.0);
define_unit_param_default!(default_topup_electricity_price, MoneyPerEnergy, 0.0);
define_unit_param_default!(default_ess_cost_per_kwh, MoneyPerEnergy, 400.0);
define_unit_param_default!(default_ess_storage_hours_min, Hours, 4.0);
define_unit_param_default!(default_ess_storage_hours_max, Hours, 12.0);

/// The energy-supply strategy for the plant.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum EnergySupply {
    /// All electricity is purchased from the grid
    Grid(GridSupply),
    /// Dedicated solar/wind generation with a hydrogen buffer, no electrical storage
    Renewable(RenewableSupply),
    /// Dedicated solar/wind generation balanced by an energy storage system
    RenewableStorage(RenewableStorageSupply),
}

/// Sub-parameters for the grid-only strategy.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GridSupply {
    /// Grid electricity price ($/kWh)
    pub electricity_price: MoneyPerEnergy,
}

/// The renewable generation mix shared by the renewable strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenewableMix {
    /// Solar capacity factor
    pub solar_capacity_factor: Dimensionless,
    /// Wind capacity factor
    pub wind_capacity_factor: Dimensionless,
    /// Share of required energy supplied by solar (the remainder is wind)
    pub solar_ratio: Dimensionless,
}

/// Sub-parameters for the renewable + hydrogen-buffer strategy.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RenewableSupply {
    /// Solar capacity factor
    pub solar_capacity_factor: Dimensionless,
    /// Wind capacity factor
    pub wind_capacity_factor: Dimensionless,
    /// Share of required energy supplied by solar (the remainder is wind)
    pub solar_ratio: Dimensionless,
    /// Fraction of required energy purchased from the grid as a top-up (policy parameter)
    #[serde(default = "default_grid_topup_fraction")]
    pub grid_topup_fraction: Dimensionless,
    /// Electricity price applied to the grid top-up ($/kWh)
    #[serde(default = "default_topup_electricity_price")]
    pub topup_electricity_price: MoneyPerEnergy,
}

/// Sub-parameters for the renewable + energy-storage-system strategy.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RenewableStorageSupply {
    /// Solar capacity factor
    pub solar_capacity_factor: Dimensionless,
    /// Wind capacity factor
    pub wind_capacity_factor: Dimensionless,
    /// Share of required energy supplied by solar (the remainder is wind)
    pub solar_ratio: Dimensionless,
    /// Energy storage system cost ($/kWh of storage capacity)
    #[serde(default = "default_ess_cost_per_kwh")]
    pub ess_cost_per_kwh: MoneyPerEnergy,
    /// Storage duration at the all-wind end of the mix (hours)
    #[serde(default = "default_ess_storage_hours_min")]
    pub ess_storage_hours_min: Hours,
    /// Storage duration at the all-solar end of the mix (hours)
    #[serde(default = "default_ess_storage_hours_max")]
    pub ess_storage_hours_max: Hours,
}

impl RenewableStorageSupply {
    /// The ESS storage duration for this mix, interpolated linearly between the minimum and
    /// maximum durations by the solar share.
    pub fn storage_duration(&self) -> Hours {
        self.ess_storage_hours_min
            + (self.ess_storage_hours_max - self.ess_storage_hours_min) * self.solar_ratio
    }
}

/// Check that a proportion lies between 0 and 1 inclusive
fn check_proportion_valid(name: &str, value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && (Dimensionless(0.0)..=Dimensionless(1.0)).contains(&value),
        "{name} must be between 0 and 1"
    );

    Ok(())
}

/// Check the renewable mix fields common to both renewable strategies
fn check_mix_valid(mix: &RenewableMix) -> Result<()> {
    check_proportion_valid("solar_capacity_factor", mix.solar_capacity_factor)?;
    check_proportion_valid("wind_capacity_factor", mix.wind_capacity_factor)?;
    check_proportion_valid("solar_ratio", mix.solar_ratio)?;

    Ok(())
}

impl EnergySupply {
    /// A short label naming the active strategy, as used in the scenario file
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grid(_) => "grid",
            Self::Renewable(_) => "renewable",
            Self::RenewableStorage(_) => "renewable_storage",
        }
    }

    /// The renewable generation mix, if the active strategy has one
    pub fn renewable_mix(&self) -> Option<RenewableMix> {
        match self {
            Self::Grid(_) => None,
            Self::Renewable(supply) => Some(RenewableMix {
                solar_capacity_factor: supply.solar_capacity_factor,
                wind_capacity_factor: supply.wind_capacity_factor,
                solar_ratio: supply.solar_ratio,
            }),
            Self::RenewableStorage(supply) => Some(RenewableMix {
                solar_capacity_factor: supply.solar_capacity_factor,
                wind_capacity_factor: supply.wind_capacity_factor,
                solar_ratio: supply.solar_ratio,
            }),
        }
    }

    /// Validate the strategy sub-parameters after reading in file
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Grid(supply) => {
                ensure!(
                    supply.electricity_price.is_finite()
                        && supply.electricity_price >= MoneyPerEnergy(0.0),
                    "electricity_price must be a finite, non-negative number"
                );
            }
            Self::Renewable(supply) => {
                check_mix_valid(&self.renewable_mix().unwrap())?;
                check_proportion_valid("grid_topup_fraction", supply.grid_topup_fraction)?;
                ensure!(
                    supply.topup_electricity_price.is_finite()
                        && supply.topup_electricity_price >= MoneyPerEnergy(0.0),
                    "topup_electricity_price must be a finite, non-negative number"
                );
            }
            Self::RenewableStorage(supply) => {
                check_mix_valid(&self.renewable_mix().unwrap())?;
                ensure!(
                    supply.ess_cost_per_kwh.is_finite()
                        && supply.ess_cost_per_kwh >= MoneyPerEnergy(0.0),
                    "ess_cost_per_kwh must be a finite, non-negative number"
                );
                ensure!(
                    supply.ess_storage_hours_min >= Hours(0.0)
                        && supply.ess_storage_hours_max >= supply.ess_storage_hours_min,
                    "ESS storage duration bounds must be non-negative with max >= min"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn storage_supply(solar_ratio: f64) -> RenewableStorageSupply {
        RenewableStorageSupply {
            solar_capacity_factor: Dimensionless(0.18),
            wind_capacity_factor: Dimensionless(0.35),
            solar_ratio: Dimensionless(solar_ratio),
            ess_cost_per_kwh: default_ess_cost_per_kwh(),
            ess_storage_hours_min: default_ess_storage_hours_min(),
            ess_storage_hours_max: default_ess_storage_hours_max(),
        }
    }

    #[test]
    fn test_deserialise_grid() {
        let supply: EnergySupply = toml::from_str(
            "strategy = \"grid\"
electricity_price = 0.12",
        )
        .unwrap();
        assert_eq!(
            supply,
            EnergySupply::Grid(GridSupply {
                electricity_price: MoneyPerEnergy(0.12)
            })
        );
        supply.validate().unwrap();
        assert_eq!(supply.name(), "grid");
        assert!(supply.renewable_mix().is_none());
    }

    #[test]
    fn test_deserialise_renewable_storage_defaults() {
        let supply: EnergySupply = toml::from_str(
            "strategy = \"renewable_storage\"
solar_capacity_factor = 0.18
wind_capacity_factor = 0.35
solar_ratio = 0.5",
        )
        .unwrap();
        supply.validate().unwrap();

        let EnergySupply::RenewableStorage(supply) = supply else {
            panic!("Wrong strategy");
        };
        assert_eq!(supply.ess_cost_per_kwh, MoneyPerEnergy(400.0));
    }

    #[rstest]
    #[case(0.0, 4.0)] // all wind: minimum duration
    #[case(1.0, 12.0)] // all solar: maximum duration
    #[case(0.5, 8.0)] // midpoint
    fn test_storage_duration_interpolation(#[case] solar_ratio: f64, #[case] expected: f64) {
        let supply = storage_supply(solar_ratio);
        assert_approx_eq!(Hours, supply.storage_duration(), Hours(expected));
    }

    #[test]
    fn test_validate_rejects_bad_proportions() {
        let supply = EnergySupply::Renewable(RenewableSupply {
            solar_capacity_factor: Dimensionless(1.2),
            wind_capacity_factor: Dimensionless(0.35),
            solar_ratio: Dimensionless(0.5),
            grid_topup_fraction: Dimensionless(0.0),
            topup_electricity_price: MoneyPerEnergy(0.0),
        });
        assert!(supply.validate().is_err());
    }
}
