//! The LCOA finalizer and the whole-pipeline entry point.
use crate::capacity::{self, CapacitySizing, electrolyzer_utilisation};
use crate::capex::{CapexBreakdown, compute_capex};
use crate::finance::{annualized_capex, capital_recovery_factor};
use crate::opex::{OpexBreakdown, compute_opex};
use crate::production::{
    Production, annual_production, production_for_target, required_energy,
};
use crate::scenario::{Scenario, SizingMode};
use crate::units::{Capacity, Dimensionless, Energy, HOURS_PER_YEAR, Money, MoneyPerTonne, Tonnes};
use indexmap::IndexMap;

/// A per-tonne cost share in the final LCOA breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CostShare {
    /// Annualized capital costs
    AnnualizedCapex,
    /// Annual operating costs
    AnnualOpex,
    /// Transport to the point of sale
    Transport,
}

/// The levelized cost of ammonia and its constituents.
#[derive(Debug, Clone, PartialEq)]
pub struct LcoaResult {
    /// The capital recovery factor applied to the total CAPEX
    pub capital_recovery_factor: Dimensionless,
    /// Total CAPEX annualized over the plant lifetime
    pub annualized_capex: Money,
    /// Annualized CAPEX plus annual OPEX
    pub total_annual_cost: Money,
    /// Production-stage cost per tonne of ammonia
    pub production_cost_per_tonne: MoneyPerTonne,
    /// Transport cost per tonne of ammonia
    pub transport_cost_per_tonne: MoneyPerTonne,
    /// Final levelized cost per tonne, including transport
    pub final_cost_per_tonne: MoneyPerTonne,
    /// Per-tonne cost shares for charting
    pub breakdown: IndexMap<CostShare, MoneyPerTonne>,
}

/// The results of a full pipeline evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Annual production quantities
    pub production: Production,
    /// Total annual electricity requirement (kWh)
    pub annual_energy: Energy,
    /// Sized capacities and electrolyzer utilisation
    pub sizing: CapacitySizing,
    /// Capital cost breakdown
    pub capex: CapexBreakdown,
    /// Operating cost breakdown
    pub opex: OpexBreakdown,
    /// The levelized cost result
    pub lcoa: LcoaResult,
}

/// Computes the levelized cost of ammonia from the aggregated costs.
///
/// The total CAPEX is annualized with the capital recovery factor and combined with the annual
/// OPEX; dividing by the annual production gives the production-stage cost per tonne. Zero
/// production yields a zero figure rather than dividing by zero. Transport is costed per tonne
/// as distance times rate and added to give the final LCOA.
pub fn finalize(
    scenario: &Scenario,
    total_capex: Money,
    total_opex: Money,
    production: Tonnes,
) -> LcoaResult {
    let crf = capital_recovery_factor(
        scenario.finance.plant_lifetime_years,
        scenario.finance.discount_rate,
    );
    let annualized_capex = annualized_capex(
        total_capex,
        scenario.finance.plant_lifetime_years,
        scenario.finance.discount_rate,
    );
    let total_annual_cost = annualized_capex + total_opex;

    let per_tonne = |cost: Money| {
        if production == Tonnes(0.0) {
            return MoneyPerTonne(0.0);
        }
        cost / production
    };

    let production_cost_per_tonne = per_tonne(total_annual_cost);
    let transport_cost_per_tonne =
        scenario.transport.cost_per_tonne_km * scenario.transport.distance_km;
    let final_cost_per_tonne = production_cost_per_tonne + transport_cost_per_tonne;

    let breakdown = IndexMap::from([
        (CostShare::AnnualizedCapex, per_tonne(annualized_capex)),
        (CostShare::AnnualOpex, per_tonne(total_opex)),
        (CostShare::Transport, transport_cost_per_tonne),
    ]);

    LcoaResult {
        capital_recovery_factor: crf,
        annualized_capex,
        total_annual_cost,
        production_cost_per_tonne,
        transport_cost_per_tonne,
        final_cost_per_tonne,
        breakdown,
    }
}

/// Sizes the plant for the scenario's sizing mode and supply strategy.
fn size_plant(scenario: &Scenario, annual_energy: Energy) -> CapacitySizing {
    let electrolyzer_capacity = match scenario.sizing_mode() {
        SizingMode::Forward { capacity, .. } => capacity,
        // A grid-supplied plant runs continuously, so its electrolyzer is sized for the
        // average draw
        SizingMode::Reverse { .. } => annual_energy / HOURS_PER_YEAR,
    };

    match scenario.supply.renewable_mix() {
        None => CapacitySizing {
            electrolyzer_capacity,
            renewable_capacity: Capacity(0.0),
            solar_capacity: Capacity(0.0),
            wind_capacity: Capacity(0.0),
            utilisation: electrolyzer_utilisation(annual_energy, electrolyzer_capacity),
        },
        Some(mix) => {
            let mut sizing = capacity::size_for_energy(annual_energy, &mix);
            if let SizingMode::Forward { capacity, .. } = scenario.sizing_mode() {
                // Forward mode fixes the electrolyzer at the plant's nameplate capacity
                sizing.electrolyzer_capacity = capacity;
                sizing.utilisation = electrolyzer_utilisation(annual_energy, capacity);
            }
            sizing
        }
    }
}

/// Runs the full calculation pipeline for a validated scenario.
///
/// The pipeline is pure and stateless: production sizing, capacity sizing, CAPEX, OPEX and the
/// LCOA finalizer each consume the prior stage's output plus the scenario. Degenerate inputs
/// (zero capacity factors, efficiencies or production) propagate as defined zero results.
pub fn evaluate(scenario: &Scenario) -> Evaluation {
    let production = match scenario.sizing_mode() {
        SizingMode::Forward {
            capacity,
            capacity_factor,
        } => annual_production(&scenario.assumptions, capacity, capacity_factor),
        SizingMode::Reverse { target } => {
            production_for_target(&scenario.assumptions, target)
        }
    };
    let annual_energy = required_energy(&scenario.assumptions, &production);

    let sizing = size_plant(scenario, annual_energy);
    let capex = compute_capex(scenario, &production, &sizing, annual_energy);
    let opex = compute_opex(scenario, &capex, annual_energy);
    let lcoa = finalize(scenario, capex.total, opex.total, production.ammonia);

    Evaluation {
        production,
        annual_energy,
        sizing,
        capex,
        opex,
        lcoa,
    }
}
