//! The OPEX aggregator: annual operating costs for the sized plant.
use crate::capex::{CapexBreakdown, CostComponent};
use crate::scenario::Scenario;
use crate::scenario::supply::EnergySupply;
use crate::units::{Energy, Money};
use indexmap::IndexMap;

/// Annual operating cost line items and their total.
#[derive(Debug, Clone, PartialEq)]
pub struct OpexBreakdown {
    /// Cost per component, in insertion order
    pub components: IndexMap<CostComponent, Money>,
    /// Sum of the fixed (rate-derived) costs
    pub fixed: Money,
    /// Variable energy-purchase cost
    pub variable: Money,
    /// Fixed plus variable costs
    pub total: Money,
}

impl OpexBreakdown {
    /// The cost of the given component, or zero if it has no line item
    pub fn get(&self, component: CostComponent) -> Money {
        self.components
            .get(&component)
            .copied()
            .unwrap_or(Money(0.0))
    }
}

/// Computes the annual operating cost breakdown.
///
/// Fixed OPEX is the sum over capital components of CAPEX times the component's configured
/// annual rate (the replacement present value carries no operating cost). Variable OPEX depends
/// on the energy-supply strategy: the grid strategy buys all required energy at the grid price,
/// the renewable strategy buys only the configured top-up fraction, and the renewable + storage
/// strategy buys none.
pub fn compute_opex(
    scenario: &Scenario,
    capex: &CapexBreakdown,
    annual_energy: Energy,
) -> OpexBreakdown {
    let costs = &scenario.costs;
    let mut components = IndexMap::new();
    let mut fixed = Money(0.0);

    for (component, rate) in [
        (CostComponent::Electrolyzer, costs.electrolyzer_opex_rate),
        (CostComponent::AirSeparation, costs.asu_opex_rate),
        (CostComponent::HaberBosch, costs.hb_opex_rate),
        (CostComponent::AmmoniaStorage, costs.storage_opex_rate),
        (CostComponent::Solar, costs.solar_opex_rate),
        (CostComponent::Wind, costs.wind_opex_rate),
        (CostComponent::EnergyStorage, costs.ess_opex_rate),
    ] {
        // Only components with a capital line item incur fixed OPEX
        let Some(&capex_value) = capex.components.get(&component) else {
            continue;
        };
        let cost = capex_value * rate;
        fixed += cost;
        components.insert(component, cost);
    }

    let variable = match &scenario.supply {
        EnergySupply::Grid(supply) => supply.electricity_price * annual_energy,
        EnergySupply::Renewable(supply) => {
            supply.topup_electricity_price * (annual_energy * supply.grid_topup_fraction)
        }
        EnergySupply::RenewableStorage(_) => Money(0.0),
    };
    if variable > Money(0.0) || matches!(scenario.supply, EnergySupply::Grid(_)) {
        components.insert(CostComponent::GridElectricity, variable);
    }

    OpexBreakdown {
        components,
        fixed,
        variable,
        total: fixed + variable,
    }
}
