//! Defines the [`Scenario`] struct, which represents the contents of a scenario TOML file.
//!
//! A scenario is the flat set of named parameters for one LCOA calculation: plant sizing,
//! technical assumptions, financial assumptions, cost coefficients, transport and the
//! energy-supply strategy. It is immutable for the duration of one pipeline evaluation.
use crate::input::{deserialise_proportion, input_err_msg, read_toml};
use crate::units::{
    Capacity, Dimensionless, EnergyPerMass, Kilometres, MoneyPerCapacity, MoneyPerTonne,
    MoneyPerTonneKm, Tonnes,
};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

pub mod supply;
use supply::EnergySupply;

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_unit_param_default!(default_capacity_factor, Dimensionless, 1.0);
define_unit_param_default!(default_h2_lhv, EnergyPerMass, 33.33);
define_unit_param_default!(default_electrolyzer_efficiency, Dimensionless, 0.70);
define_unit_param_default!(default_nh3_per_h2_mass_ratio, Dimensionless, 5.617);
define_unit_param_default!(default_discount_rate, Dimensionless, 0.08);
define_unit_param_default!(default_inflation_rate, Dimensionless, 0.02);
define_param_default!(default_plant_lifetime_years, u32, 25);
define_param_default!(default_electrolyzer_lifetime_years, u32, 10);
define_unit_param_default!(default_electrolyzer_capex, MoneyPerCapacity, 450.0);
define_unit_param_default!(default_asu_capex, MoneyPerCapacity, 150.0);
define_unit_param_default!(default_hb_capex, MoneyPerCapacity, 550.0);
define_unit_param_default!(default_solar_capex, MoneyPerCapacity, 800.0);
define_unit_param_default!(default_wind_capex, MoneyPerCapacity, 1300.0);
define_unit_param_default!(default_storage_capex, MoneyPerTonne, 500.0);
define_param_default!(default_storage_days, f64, 15.0);
define_unit_param_default!(default_electrolyzer_opex_rate, Dimensionless, 0.015);
define_unit_param_default!(default_asu_opex_rate, Dimensionless, 0.02);
define_unit_param_default!(default_hb_opex_rate, Dimensionless, 0.025);
define_unit_param_default!(default_storage_opex_rate, Dimensionless, 0.01);
define_unit_param_default!(default_solar_opex_rate, Dimensionless, 0.01);
define_unit_param_default!(default_wind_opex_rate, Dimensionless, 0.02);
define_unit_param_default!(default_ess_opex_rate, Dimensionless, 0.01);
define_unit_param_default!(default_transport_distance, Kilometres, 0.0);
define_unit_param_default!(default_transport_cost, MoneyPerTonneKm, 0.05);

/// Represents the contents of an entire scenario file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Scenario {
    /// Plant sizing parameters
    pub plant: Plant,
    /// Technical assumptions for the production chain
    #[serde(default)]
    pub assumptions: Assumptions,
    /// Financial assumptions
    #[serde(default)]
    pub finance: FinanceParameters,
    /// Cost coefficients for plant components
    #[serde(default)]
    pub costs: CostParameters,
    /// Transport of the produced ammonia
    #[serde(default)]
    pub transport: Transport,
    /// The energy-supply strategy and its sub-parameters
    pub supply: EnergySupply,
}

/// Plant sizing: either a nameplate electrical capacity (forward mode) or a target annual
/// ammonia production (reverse mode). Exactly one of the two must be given.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Plant {
    /// Nameplate electrical capacity of the plant (kW)
    pub capacity_kw: Option<Capacity>,
    /// Capacity factor of the plant (forward mode only)
    #[serde(
        default = "default_capacity_factor",
        deserialize_with = "deserialise_proportion"
    )]
    pub capacity_factor: Dimensionless,
    /// Target annual ammonia production (tonnes, reverse mode only)
    pub target_production_tonnes: Option<Tonnes>,
}

/// How the plant size was specified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingMode {
    /// Size production from a given electrical capacity and capacity factor
    Forward {
        /// Nameplate electrical capacity (kW)
        capacity: Capacity,
        /// Capacity factor
        capacity_factor: Dimensionless,
    },
    /// Size equipment from a target annual ammonia production
    Reverse {
        /// Target annual ammonia production (tonnes)
        target: Tonnes,
    },
}

/// Technical assumptions for the hydrogen/ammonia production chain.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Assumptions {
    /// Lower heating value of hydrogen (kWh per kg)
    #[serde(default = "default_h2_lhv")]
    pub h2_lhv_kwh_per_kg: EnergyPerMass,
    /// Electrolyzer conversion efficiency
    #[serde(default = "default_electrolyzer_efficiency")]
    pub electrolyzer_efficiency: Dimensionless,
    /// Mass of ammonia produced per unit mass of hydrogen (molar-mass-ratio derived)
    #[serde(default = "default_nh3_per_h2_mass_ratio")]
    pub nh3_per_h2_mass_ratio: Dimensionless,
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            h2_lhv_kwh_per_kg: default_h2_lhv(),
            electrolyzer_efficiency: default_electrolyzer_efficiency(),
            nh3_per_h2_mass_ratio: default_nh3_per_h2_mass_ratio(),
        }
    }
}

/// Financial assumptions.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FinanceParameters {
    /// Discount rate used for annualisation and present-value calculations
    #[serde(default = "default_discount_rate")]
    pub discount_rate: Dimensionless,
    /// Plant lifetime in years
    #[serde(default = "default_plant_lifetime_years")]
    pub plant_lifetime_years: u32,
    /// Annual inflation rate applied to the electrolyzer replacement
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: Dimensionless,
    /// Electrolyzer stack lifetime in years (replacement horizon)
    #[serde(default = "default_electrolyzer_lifetime_years")]
    pub electrolyzer_lifetime_years: u32,
}

impl Default for FinanceParameters {
    fn default() -> Self {
        FinanceParameters {
            discount_rate: default_discount_rate(),
            plant_lifetime_years: default_plant_lifetime_years(),
            inflation_rate: default_inflation_rate(),
            electrolyzer_lifetime_years: default_electrolyzer_lifetime_years(),
        }
    }
}

/// Cost coefficients for the plant components.
///
/// CAPEX rates are per kW of the relevant capacity, except storage, which is costed per tonne of
/// ammonia held. OPEX rates are annual fractions of the corresponding component CAPEX.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CostParameters {
    /// Electrolyzer CAPEX ($/kW)
    #[serde(default = "default_electrolyzer_capex")]
    pub electrolyzer_capex_per_kw: MoneyPerCapacity,
    /// Air separation unit CAPEX ($/kW)
    #[serde(default = "default_asu_capex")]
    pub asu_capex_per_kw: MoneyPerCapacity,
    /// Haber-Bosch synthesis unit CAPEX ($/kW)
    #[serde(default = "default_hb_capex")]
    pub hb_capex_per_kw: MoneyPerCapacity,
    /// Solar generation CAPEX ($/kW)
    #[serde(default = "default_solar_capex")]
    pub solar_capex_per_kw: MoneyPerCapacity,
    /// Wind generation CAPEX ($/kW)
    #[serde(default = "default_wind_capex")]
    pub wind_capex_per_kw: MoneyPerCapacity,
    /// Ammonia storage CAPEX ($ per tonne of storage capacity)
    #[serde(default = "default_storage_capex")]
    pub storage_capex_per_tonne: MoneyPerTonne,
    /// Days of production held in ammonia storage
    #[serde(default = "default_storage_days")]
    pub storage_days: f64,
    /// Electrolyzer annual OPEX as a fraction of its CAPEX
    #[serde(default = "default_electrolyzer_opex_rate")]
    pub electrolyzer_opex_rate: Dimensionless,
    /// Air separation unit annual OPEX as a fraction of its CAPEX
    #[serde(default = "default_asu_opex_rate")]
    pub asu_opex_rate: Dimensionless,
    /// Haber-Bosch annual OPEX as a fraction of its CAPEX
    #[serde(default = "default_hb_opex_rate")]
    pub hb_opex_rate: Dimensionless,
    /// Ammonia storage annual OPEX as a fraction of its CAPEX
    #[serde(default = "default_storage_opex_rate")]
    pub storage_opex_rate: Dimensionless,
    /// Solar annual OPEX as a fraction of its CAPEX
    #[serde(default = "default_solar_opex_rate")]
    pub solar_opex_rate: Dimensionless,
    /// Wind annual OPEX as a fraction of its CAPEX
    #[serde(default = "default_wind_opex_rate")]
    pub wind_opex_rate: Dimensionless,
    /// Energy storage system annual OPEX as a fraction of its CAPEX
    #[serde(default = "default_ess_opex_rate")]
    pub ess_opex_rate: Dimensionless,
}

impl Default for CostParameters {
    fn default() -> Self {
        toml::from_str("").expect("Cannot create cost parameters from empty TOML")
    }
}

/// Transport of the produced ammonia to its point of sale.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Transport {
    /// Transport distance (km)
    #[serde(default = "default_transport_distance")]
    pub distance_km: Kilometres,
    /// Transport cost ($ per tonne-km)
    #[serde(default = "default_transport_cost")]
    pub cost_per_tonne_km: MoneyPerTonneKm,
}

impl Default for Transport {
    fn default() -> Self {
        Transport {
            distance_km: default_transport_distance(),
            cost_per_tonne_km: default_transport_cost(),
        }
    }
}

/// Check that a rate-like parameter is finite and non-negative
fn check_rate_valid(name: &str, value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && value >= Dimensionless(0.0),
        "{name} must be a finite, non-negative number"
    );

    Ok(())
}

impl Scenario {
    /// Read a scenario from the specified TOML file.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the scenario file
    ///
    /// # Returns
    ///
    /// The scenario contents as a [`Scenario`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(file_path: P) -> Result<Scenario> {
        let scenario: Scenario = read_toml(file_path.as_ref())?;

        scenario
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(scenario)
    }

    /// How the plant size was specified.
    ///
    /// Valid scenarios have exactly one sizing mode; this panics if called before
    /// [`Scenario::validate`] has accepted the scenario.
    pub fn sizing_mode(&self) -> SizingMode {
        match (self.plant.capacity_kw, self.plant.target_production_tonnes) {
            (Some(capacity), None) => SizingMode::Forward {
                capacity,
                capacity_factor: self.plant.capacity_factor,
            },
            (None, Some(target)) => SizingMode::Reverse { target },
            _ => panic!("Scenario not validated: ambiguous plant sizing"),
        }
    }

    /// Validate parameters after reading in file
    pub fn validate(&self) -> Result<()> {
        // plant: exactly one sizing mode
        ensure!(
            self.plant.capacity_kw.is_some() != self.plant.target_production_tonnes.is_some(),
            "Exactly one of capacity_kw and target_production_tonnes must be given"
        );
        if let Some(capacity) = self.plant.capacity_kw {
            ensure!(
                capacity.is_finite() && capacity >= Capacity(0.0),
                "capacity_kw must be a finite, non-negative number"
            );
        }
        if let Some(target) = self.plant.target_production_tonnes {
            ensure!(
                target.is_finite() && target >= Tonnes(0.0),
                "target_production_tonnes must be a finite, non-negative number"
            );
        }

        // assumptions
        check_rate_valid(
            "electrolyzer_efficiency",
            self.assumptions.electrolyzer_efficiency,
        )?;
        ensure!(
            self.assumptions.electrolyzer_efficiency <= Dimensionless(1.0),
            "electrolyzer_efficiency must not exceed 1"
        );
        ensure!(
            self.assumptions.h2_lhv_kwh_per_kg.is_finite()
                && self.assumptions.h2_lhv_kwh_per_kg >= EnergyPerMass(0.0),
            "h2_lhv_kwh_per_kg must be a finite, non-negative number"
        );
        check_rate_valid(
            "nh3_per_h2_mass_ratio",
            self.assumptions.nh3_per_h2_mass_ratio,
        )?;

        // finance
        check_rate_valid("discount_rate", self.finance.discount_rate)?;
        check_rate_valid("inflation_rate", self.finance.inflation_rate)?;

        // costs
        for (name, rate) in [
            ("electrolyzer_opex_rate", self.costs.electrolyzer_opex_rate),
            ("asu_opex_rate", self.costs.asu_opex_rate),
            ("hb_opex_rate", self.costs.hb_opex_rate),
            ("storage_opex_rate", self.costs.storage_opex_rate),
            ("solar_opex_rate", self.costs.solar_opex_rate),
            ("wind_opex_rate", self.costs.wind_opex_rate),
            ("ess_opex_rate", self.costs.ess_opex_rate),
        ] {
            check_rate_valid(name, rate)?;
        }
        ensure!(
            self.costs.storage_days.is_finite() && self.costs.storage_days >= 0.0,
            "storage_days must be a finite, non-negative number"
        );

        // transport
        ensure!(
            self.transport.distance_km.is_finite() && self.transport.distance_km >= Kilometres(0.0),
            "distance_km must be a finite, non-negative number"
        );

        // supply
        self.supply.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    /// A minimal valid forward-mode scenario with a grid supply
    pub fn scenario_toml() -> &'static str {
        "[plant]
capacity_kw = 1000000.0
capacity_factor = 0.9

[supply]
strategy = \"grid\"
electricity_price = 0.05
"
    }

    #[test]
    fn test_scenario_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("scenario.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            write!(file, "{}", scenario_toml()).unwrap();
        }

        let scenario = Scenario::from_path(&file_path).unwrap();
        assert_eq!(scenario.plant.capacity_kw, Some(Capacity(1_000_000.0)));
        assert_eq!(
            scenario.sizing_mode(),
            SizingMode::Forward {
                capacity: Capacity(1_000_000.0),
                capacity_factor: Dimensionless(0.9)
            }
        );

        // Defaults are filled in for omitted sections
        assert_eq!(scenario.assumptions, Assumptions::default());
        assert_eq!(
            scenario.costs.electrolyzer_capex_per_kw,
            MoneyPerCapacity(450.0)
        );
    }

    #[test]
    fn test_scenario_reverse_mode() {
        let toml_str = "[plant]
target_production_tonnes = 100000.0

[supply]
strategy = \"renewable\"
solar_capacity_factor = 0.18
wind_capacity_factor = 0.35
solar_ratio = 0.5
";
        let scenario: Scenario = toml::from_str(toml_str).unwrap();
        scenario.validate().unwrap();
        assert_eq!(
            scenario.sizing_mode(),
            SizingMode::Reverse {
                target: Tonnes(100_000.0)
            }
        );
    }

    #[test]
    fn test_scenario_sizing_must_be_exclusive() {
        // Both sizing modes given
        let toml_str = "[plant]
capacity_kw = 1000.0
target_production_tonnes = 100000.0

[supply]
strategy = \"grid\"
electricity_price = 0.05
";
        let scenario: Scenario = toml::from_str(toml_str).unwrap();
        assert!(scenario.validate().is_err());

        // Neither sizing mode given
        let toml_str = "[plant]

[supply]
strategy = \"grid\"
electricity_price = 0.05
";
        let scenario: Scenario = toml::from_str(toml_str).unwrap();
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_scenario_capacity_factor_range() {
        let toml_str = "[plant]
capacity_kw = 1000.0
capacity_factor = 1.5

[supply]
strategy = \"grid\"
electricity_price = 0.05
";
        assert!(toml::from_str::<Scenario>(toml_str).is_err());
    }

    #[test]
    fn test_check_rate_valid() {
        assert!(check_rate_valid("rate", Dimensionless(0.0)).is_ok());
        assert!(check_rate_valid("rate", Dimensionless(0.5)).is_ok());
        assert!(check_rate_valid("rate", Dimensionless(-0.1)).is_err());
        assert!(check_rate_valid("rate", Dimensionless(f64::NAN)).is_err());
        assert!(check_rate_valid("rate", Dimensionless(f64::INFINITY)).is_err());
    }
}
