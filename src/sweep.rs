//! Sensitivity sweeps: repeated pipeline evaluations over a swept input value.
use crate::lcoa::{self, Evaluation};
use crate::scenario::Scenario;
use crate::scenario::supply::EnergySupply;
use crate::units::{Dimensionless, Kilometres, MoneyPerCapacity, MoneyPerEnergy};
use anyhow::{Result, bail, ensure};

/// The default number of points in a sweep.
pub const DEFAULT_SWEEP_STEPS: u32 = 20;

/// A scenario input that can be swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SweepParameter {
    /// Grid electricity price ($/kWh); applies to the grid and renewable (top-up) strategies
    ElectricityPrice,
    /// Discount rate
    DiscountRate,
    /// Plant capacity factor (forward mode)
    CapacityFactor,
    /// Transport distance (km)
    TransportDistance,
    /// Electrolyzer CAPEX ($/kW)
    ElectrolyzerCapex,
}

/// One point of a sensitivity sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    /// The swept input value
    pub value: f64,
    /// The full pipeline evaluation at this value
    pub evaluation: Evaluation,
}

/// Sets the swept parameter on a scenario copy.
fn apply(scenario: &mut Scenario, parameter: SweepParameter, value: f64) -> Result<()> {
    match parameter {
        SweepParameter::ElectricityPrice => match &mut scenario.supply {
            EnergySupply::Grid(supply) => {
                supply.electricity_price = MoneyPerEnergy(value);
            }
            EnergySupply::Renewable(supply) => {
                supply.topup_electricity_price = MoneyPerEnergy(value);
            }
            EnergySupply::RenewableStorage(_) => {
                bail!(
                    "electricity_price cannot be swept under the renewable_storage supply \
                    strategy (no grid purchases)"
                );
            }
        },
        SweepParameter::DiscountRate => {
            scenario.finance.discount_rate = Dimensionless(value);
        }
        SweepParameter::CapacityFactor => {
            ensure!(
                scenario.plant.capacity_kw.is_some(),
                "capacity_factor can only be swept for a forward-mode (capacity_kw) scenario"
            );
            scenario.plant.capacity_factor = Dimensionless(value);
        }
        SweepParameter::TransportDistance => {
            scenario.transport.distance_km = Kilometres(value);
        }
        SweepParameter::ElectrolyzerCapex => {
            scenario.costs.electrolyzer_capex_per_kw = MoneyPerCapacity(value);
        }
    }

    scenario.validate()
}

/// Runs a sequential sensitivity sweep over the given parameter.
///
/// Each of the `steps` points evaluates an independent copy of the scenario with the swept
/// value set to a linearly spaced value between `from` and `to` inclusive.
pub fn run_sweep(
    scenario: &Scenario,
    parameter: SweepParameter,
    from: f64,
    to: f64,
    steps: u32,
) -> Result<Vec<SweepPoint>> {
    ensure!(steps >= 2, "A sweep requires at least 2 steps");
    ensure!(
        from.is_finite() && to.is_finite(),
        "Sweep bounds must be finite numbers"
    );

    let step = (to - from) / f64::from(steps - 1);
    (0..steps)
        .map(|i| {
            let value = from + step * f64::from(i);
            let mut point_scenario = scenario.clone();
            apply(&mut point_scenario, parameter, value)?;

            Ok(SweepPoint {
                value,
                evaluation: lcoa::evaluate(&point_scenario),
            })
        })
        .collect()
}
