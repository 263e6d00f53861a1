//! Reverse-mode capacity sizing: the nameplate capacities needed to supply a given annual
//! energy requirement.
use crate::scenario::supply::RenewableMix;
use crate::units::{Capacity, Dimensionless, Energy, HOURS_PER_YEAR};

/// The sized capacities for a plant and the resulting electrolyzer utilisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacitySizing {
    /// Electrolyzer nameplate capacity (kW)
    pub electrolyzer_capacity: Capacity,
    /// Total renewable nameplate capacity (kW)
    pub renewable_capacity: Capacity,
    /// Solar nameplate capacity (kW)
    pub solar_capacity: Capacity,
    /// Wind nameplate capacity (kW)
    pub wind_capacity: Capacity,
    /// Annual energy throughput as a fraction of the electrolyzer's maximum.
    ///
    /// Deliberately unclamped: values above 1 indicate the required throughput exceeds the
    /// nameplate capacity over a full year. See [`CapacitySizing::exceeds_nameplate`].
    pub utilisation: Dimensionless,
}

impl CapacitySizing {
    /// Whether the required energy throughput exceeds the electrolyzer's maximum possible
    /// annual throughput at full nameplate capacity
    pub fn exceeds_nameplate(&self) -> bool {
        self.utilisation > Dimensionless(1.0)
    }
}

/// The capacity factor of the blended solar/wind mix.
pub fn blended_capacity_factor(mix: &RenewableMix) -> Dimensionless {
    mix.solar_capacity_factor * mix.solar_ratio
        + mix.wind_capacity_factor * (Dimensionless(1.0) - mix.solar_ratio)
}

/// The renewable nameplate capacity required to supply `annual_energy` at the given blended
/// capacity factor.
///
/// A zero capacity factor yields zero capacity.
pub fn required_renewable_capacity(
    annual_energy: Energy,
    capacity_factor: Dimensionless,
) -> Capacity {
    if capacity_factor == Dimensionless(0.0) {
        return Capacity(0.0);
    }

    annual_energy / HOURS_PER_YEAR / capacity_factor
}

/// The electrolyzer's annual energy throughput as a fraction of its maximum possible annual
/// throughput at full nameplate capacity.
///
/// The value is not clamped to 1; a zero capacity yields zero utilisation.
pub fn electrolyzer_utilisation(annual_energy: Energy, capacity: Capacity) -> Dimensionless {
    if capacity == Capacity(0.0) {
        return Dimensionless(0.0);
    }

    annual_energy / (capacity * HOURS_PER_YEAR)
}

/// Sizes renewable generation and the electrolyzer for the given annual energy requirement.
///
/// The electrolyzer is set equal to the blended renewable capacity (co-located, no curtailment
/// modelling). The solar and wind nameplate capacities are sized separately by splitting the
/// energy requirement by the mix ratio, for per-technology costing.
pub fn size_for_energy(annual_energy: Energy, mix: &RenewableMix) -> CapacitySizing {
    let renewable_capacity =
        required_renewable_capacity(annual_energy, blended_capacity_factor(mix));
    let solar_capacity = required_renewable_capacity(
        annual_energy * mix.solar_ratio,
        mix.solar_capacity_factor,
    );
    let wind_capacity = required_renewable_capacity(
        annual_energy * (Dimensionless(1.0) - mix.solar_ratio),
        mix.wind_capacity_factor,
    );

    CapacitySizing {
        electrolyzer_capacity: renewable_capacity,
        renewable_capacity,
        solar_capacity,
        wind_capacity,
        utilisation: electrolyzer_utilisation(annual_energy, renewable_capacity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn mix() -> RenewableMix {
        RenewableMix {
            solar_capacity_factor: Dimensionless(0.18),
            wind_capacity_factor: Dimensionless(0.35),
            solar_ratio: Dimensionless(0.5),
        }
    }

    #[rstest]
    #[case(0.18, 0.35, 0.5, 0.265)]
    #[case(0.18, 0.35, 1.0, 0.18)] // all solar
    #[case(0.18, 0.35, 0.0, 0.35)] // all wind
    fn test_blended_capacity_factor(
        #[case] solar_cf: f64,
        #[case] wind_cf: f64,
        #[case] solar_ratio: f64,
        #[case] expected: f64,
    ) {
        let mix = RenewableMix {
            solar_capacity_factor: Dimensionless(solar_cf),
            wind_capacity_factor: Dimensionless(wind_cf),
            solar_ratio: Dimensionless(solar_ratio),
        };
        assert_approx_eq!(
            Dimensionless,
            blended_capacity_factor(&mix),
            Dimensionless(expected)
        );
    }

    #[test]
    fn test_required_renewable_capacity() {
        let capacity = required_renewable_capacity(Energy(8_760_000.0), Dimensionless(0.5));
        assert_approx_eq!(Capacity, capacity, Capacity(2000.0));

        // Zero capacity factor must not divide by zero
        assert_eq!(
            required_renewable_capacity(Energy(8_760_000.0), Dimensionless(0.0)),
            Capacity(0.0)
        );
    }

    #[test]
    fn test_electrolyzer_utilisation() {
        let utilisation = electrolyzer_utilisation(Energy(4_380_000.0), Capacity(1000.0));
        assert_approx_eq!(Dimensionless, utilisation, Dimensionless(0.5));

        assert_eq!(
            electrolyzer_utilisation(Energy(4_380_000.0), Capacity(0.0)),
            Dimensionless(0.0)
        );
    }

    #[test]
    fn test_utilisation_unclamped() {
        // Throughput above nameplate x 8760 h must be preserved, not clamped
        let sizing = CapacitySizing {
            electrolyzer_capacity: Capacity(1000.0),
            renewable_capacity: Capacity(1000.0),
            solar_capacity: Capacity(0.0),
            wind_capacity: Capacity(0.0),
            utilisation: electrolyzer_utilisation(Energy(10_512_000.0), Capacity(1000.0)),
        };
        assert_approx_eq!(Dimensionless, sizing.utilisation, Dimensionless(1.2));
        assert!(sizing.exceeds_nameplate());
    }

    #[test]
    fn test_size_for_energy() {
        let annual_energy = Energy(8760.0 * 0.265 * 1_000_000.0);
        let sizing = size_for_energy(annual_energy, &mix());

        // Blended total drives the electrolyzer
        assert_approx_eq!(
            Capacity,
            sizing.renewable_capacity,
            Capacity(1_000_000.0),
            epsilon = 1e-3
        );
        assert_eq!(sizing.electrolyzer_capacity, sizing.renewable_capacity);

        // Split capacities cover their share of the energy at their own capacity factor
        assert_approx_eq!(
            f64,
            sizing.solar_capacity.value(),
            annual_energy.value() * 0.5 / (8760.0 * 0.18),
            epsilon = 1e-6
        );
        assert_approx_eq!(
            f64,
            sizing.wind_capacity.value(),
            annual_energy.value() * 0.5 / (8760.0 * 0.35),
            epsilon = 1e-6
        );

        // Utilisation equals the blended capacity factor in reverse mode
        assert_approx_eq!(
            Dimensionless,
            sizing.utilisation,
            Dimensionless(0.265),
            epsilon = 1e-9
        );
    }
}
