//! The CAPEX aggregator: capital cost line items for the sized plant.
use crate::capacity::CapacitySizing;
use crate::finance::replacement_present_value;
use crate::production::Production;
use crate::scenario::Scenario;
use crate::scenario::supply::EnergySupply;
use crate::units::{DAYS_PER_YEAR, Dimensionless, Energy, HOURS_PER_YEAR, Money};
use indexmap::IndexMap;

/// A cost line item in a CAPEX or OPEX breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CostComponent {
    /// The electrolyzer stack
    Electrolyzer,
    /// The air separation unit supplying nitrogen
    AirSeparation,
    /// The Haber-Bosch synthesis unit
    HaberBosch,
    /// Ammonia product storage
    AmmoniaStorage,
    /// Solar generation
    Solar,
    /// Wind generation
    Wind,
    /// The battery energy storage system
    EnergyStorage,
    /// Present value of the mid-life electrolyzer replacement
    ElectrolyzerReplacement,
    /// Electricity purchased from the grid
    GridElectricity,
}

/// Capital cost line items and their total.
#[derive(Debug, Clone, PartialEq)]
pub struct CapexBreakdown {
    /// Cost per component, in insertion order
    pub components: IndexMap<CostComponent, Money>,
    /// Sum of all components
    pub total: Money,
}

impl CapexBreakdown {
    /// The cost of the given component, or zero if it has no line item
    pub fn get(&self, component: CostComponent) -> Money {
        self.components
            .get(&component)
            .copied()
            .unwrap_or(Money(0.0))
    }
}

/// Computes the capital cost breakdown for the sized plant.
///
/// The electrolyzer, air separation and synthesis units are costed per kW of electrolyzer
/// capacity; solar and wind per kW of their sized capacities (renewable strategies only);
/// ammonia storage by a days-of-production policy. The renewable + storage strategy adds an
/// ESS sized as the average power draw times the mix-dependent storage duration. The present
/// value of a one-time mid-life electrolyzer replacement is included as its own line item.
pub fn compute_capex(
    scenario: &Scenario,
    production: &Production,
    sizing: &CapacitySizing,
    annual_energy: Energy,
) -> CapexBreakdown {
    let costs = &scenario.costs;
    let mut components = IndexMap::new();

    let electrolyzer = costs.electrolyzer_capex_per_kw * sizing.electrolyzer_capacity;
    components.insert(CostComponent::Electrolyzer, electrolyzer);
    components.insert(
        CostComponent::AirSeparation,
        costs.asu_capex_per_kw * sizing.electrolyzer_capacity,
    );
    components.insert(
        CostComponent::HaberBosch,
        costs.hb_capex_per_kw * sizing.electrolyzer_capacity,
    );

    // Ammonia storage holds a fixed number of days of production
    let stored_tonnes = production.ammonia / DAYS_PER_YEAR * Dimensionless(costs.storage_days);
    components.insert(
        CostComponent::AmmoniaStorage,
        costs.storage_capex_per_tonne * stored_tonnes,
    );

    if scenario.supply.renewable_mix().is_some() {
        components.insert(
            CostComponent::Solar,
            costs.solar_capex_per_kw * sizing.solar_capacity,
        );
        components.insert(
            CostComponent::Wind,
            costs.wind_capex_per_kw * sizing.wind_capacity,
        );
    }

    if let EnergySupply::RenewableStorage(supply) = &scenario.supply {
        // ESS energy capacity covers the average draw for the storage duration
        let average_draw = annual_energy / HOURS_PER_YEAR;
        let ess_energy = average_draw * supply.storage_duration();
        components.insert(
            CostComponent::EnergyStorage,
            supply.ess_cost_per_kwh * ess_energy,
        );
    }

    components.insert(
        CostComponent::ElectrolyzerReplacement,
        replacement_present_value(
            electrolyzer,
            scenario.finance.electrolyzer_lifetime_years,
            scenario.finance.inflation_rate,
            scenario.finance.discount_rate,
        ),
    );

    let total = components
        .values()
        .copied()
        .fold(Money(0.0), |acc, cost| acc + cost);

    CapexBreakdown { components, total }
}
