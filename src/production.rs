//! Production sizing: annual hydrogen and ammonia masses and the energy needed to make them.
use crate::scenario::Assumptions;
use crate::units::{Capacity, Dimensionless, Energy, EnergyPerMass, HOURS_PER_YEAR, Mass, Tonnes};

/// Annual production quantities for the plant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Production {
    /// Annual hydrogen production (kg)
    pub hydrogen: Mass,
    /// Annual ammonia production (tonnes)
    pub ammonia: Tonnes,
}

impl Production {
    /// A zero-production result, used when inputs are degenerate
    pub fn zero() -> Self {
        Production {
            hydrogen: Mass(0.0),
            ammonia: Tonnes(0.0),
        }
    }
}

/// The electricity needed to produce a kilogram of hydrogen (kWh/kg).
///
/// Returns `None` if the lower heating value or efficiency is zero, so that callers resolve to a
/// zero result instead of dividing by zero.
fn specific_energy(assumptions: &Assumptions) -> Option<EnergyPerMass> {
    if assumptions.h2_lhv_kwh_per_kg == EnergyPerMass(0.0)
        || assumptions.electrolyzer_efficiency == Dimensionless(0.0)
    {
        return None;
    }

    Some(assumptions.h2_lhv_kwh_per_kg / assumptions.electrolyzer_efficiency)
}

/// Calculates annual hydrogen and ammonia production for a plant of the given electrical
/// capacity and capacity factor (forward mode).
///
/// A zero lower heating value or electrolyzer efficiency yields zero production.
pub fn annual_production(
    assumptions: &Assumptions,
    capacity: Capacity,
    capacity_factor: Dimensionless,
) -> Production {
    let Some(specific_energy) = specific_energy(assumptions) else {
        return Production::zero();
    };

    let annual_energy = capacity * capacity_factor * HOURS_PER_YEAR;
    let hydrogen = annual_energy / specific_energy;
    let ammonia = (hydrogen * assumptions.nh3_per_h2_mass_ratio).into_tonnes();

    Production { hydrogen, ammonia }
}

/// Calculates the hydrogen requirement for a target annual ammonia production (reverse mode).
///
/// A zero ammonia-to-hydrogen mass ratio yields zero hydrogen.
pub fn production_for_target(assumptions: &Assumptions, target: Tonnes) -> Production {
    if assumptions.nh3_per_h2_mass_ratio == Dimensionless(0.0) {
        return Production {
            hydrogen: Mass(0.0),
            ammonia: target,
        };
    }

    let hydrogen = target.into_kg() / assumptions.nh3_per_h2_mass_ratio;

    Production {
        hydrogen,
        ammonia: target,
    }
}

/// Calculates the total annual electricity required to produce the given hydrogen mass.
///
/// A zero lower heating value or electrolyzer efficiency yields zero energy.
pub fn required_energy(assumptions: &Assumptions, production: &Production) -> Energy {
    let Some(specific_energy) = specific_energy(assumptions) else {
        return Energy(0.0);
    };

    specific_energy * production.hydrogen
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn assumptions() -> Assumptions {
        Assumptions::default()
    }

    #[test]
    fn test_annual_production() {
        // 1 GW at 90% capacity factor with the default assumptions
        let production =
            annual_production(&assumptions(), Capacity(1_000_000.0), Dimensionless(0.9));

        let expected_h2 = 1_000_000.0 * 0.9 * 8760.0 / (33.33 / 0.70);
        assert_approx_eq!(f64, production.hydrogen.value(), expected_h2, epsilon = 1.0);
        assert_approx_eq!(
            f64,
            production.ammonia.value(),
            expected_h2 * 5.617 / 1000.0,
            epsilon = 1.0
        );
    }

    #[rstest]
    #[case(0.0, 0.70)] // zero LHV
    #[case(33.33, 0.0)] // zero efficiency
    fn test_annual_production_degenerate(#[case] lhv: f64, #[case] efficiency: f64) {
        let assumptions = Assumptions {
            h2_lhv_kwh_per_kg: EnergyPerMass(lhv),
            electrolyzer_efficiency: Dimensionless(efficiency),
            ..assumptions()
        };
        let production =
            annual_production(&assumptions, Capacity(1_000_000.0), Dimensionless(0.9));
        assert_eq!(production, Production::zero());
        assert_eq!(required_energy(&assumptions, &production), Energy(0.0));
    }

    #[test]
    fn test_production_for_target() {
        let production = production_for_target(&assumptions(), Tonnes(100_000.0));
        assert_approx_eq!(
            f64,
            production.hydrogen.value(),
            100_000.0 * 1000.0 / 5.617,
            epsilon = 1e-6
        );
        assert_eq!(production.ammonia, Tonnes(100_000.0));
    }

    #[test]
    fn test_production_for_target_zero_ratio() {
        let assumptions = Assumptions {
            nh3_per_h2_mass_ratio: Dimensionless(0.0),
            ..assumptions()
        };
        let production = production_for_target(&assumptions, Tonnes(100_000.0));
        assert_eq!(production.hydrogen, Mass(0.0));
    }

    #[test]
    fn test_required_energy_matches_forward_mode() {
        // The energy required for forward-mode production is the plant's annual energy input
        let capacity = Capacity(1_000_000.0);
        let capacity_factor = Dimensionless(0.9);
        let production = annual_production(&assumptions(), capacity, capacity_factor);
        let energy = required_energy(&assumptions(), &production);
        assert_approx_eq!(
            f64,
            energy.value(),
            (capacity * capacity_factor * HOURS_PER_YEAR).value(),
            epsilon = 1e-3
        );
    }
}
