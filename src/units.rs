#![allow(missing_docs)]

//! This module defines various unit types and their conversions.

use serde::{Deserialize, Serialize};

/// Kilograms per tonne.
const KG_PER_TONNE: f64 = 1000.0;

/// Represents a dimensionless quantity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::AddAssign,
)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless::new(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless::new(self.0 / rhs.0)
    }
}

impl Dimensionless {
    /// Creates a new instance of the unit type from a f64 value.
    pub fn new(val: f64) -> Self {
        Self(val)
    }

    /// Returns the value of the unit type as a f64.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the value is a finite number.
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Raises the value to a non-negative integer power.
    ///
    /// Exponents above `i32::MAX` saturate rather than wrap.
    pub fn powi(self, rhs: u32) -> Self {
        Dimensionless::new(self.0.powi(i32::try_from(rhs).unwrap_or(i32::MAX)))
    }
}

impl float_cmp::ApproxEq for Dimensionless {
    type Margin = float_cmp::F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        float_cmp::ApproxEq::approx_eq(self.0, other.0, margin.into())
    }
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the value is a finite number.
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name::new(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name::new(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name::new(self.0 / rhs.0)
            }
        }

        impl std::ops::Div<$name> for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless::new(self.0 / rhs.0)
            }
        }

        impl float_cmp::ApproxEq for $name {
            type Margin = float_cmp::F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                float_cmp::ApproxEq::approx_eq(self.0, other.0, margin.into())
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Money);
unit_struct!(Energy);
unit_struct!(Capacity);
unit_struct!(Mass);
unit_struct!(Tonnes);
unit_struct!(Hours);
unit_struct!(Kilometres);

// Derived quantities
unit_struct!(MoneyPerCapacity);
unit_struct!(MoneyPerEnergy);
unit_struct!(MoneyPerTonne);
unit_struct!(MoneyPerTonneKm);
unit_struct!(EnergyPerMass);

// Multiplication rules
impl_mul!(MoneyPerCapacity, Capacity, Money);
impl_mul!(MoneyPerEnergy, Energy, Money);
impl_mul!(MoneyPerTonne, Tonnes, Money);
impl_mul!(MoneyPerTonneKm, Kilometres, MoneyPerTonne);
impl_mul!(EnergyPerMass, Mass, Energy);
impl_mul!(Capacity, Hours, Energy);

// Division rules
impl_div!(Energy, EnergyPerMass, Mass);
impl_div!(Energy, Hours, Capacity);
impl_div!(Energy, Capacity, Hours);
impl_div!(Money, Tonnes, MoneyPerTonne);

/// The number of hours in a (non-leap) year.
pub const HOURS_PER_YEAR: Hours = Hours(8760.0);

/// The number of days in a (non-leap) year.
pub const DAYS_PER_YEAR: Dimensionless = Dimensionless(365.0);

impl Mass {
    /// Converts a mass in kilograms to tonnes.
    pub fn into_tonnes(self) -> Tonnes {
        Tonnes(self.0 / KG_PER_TONNE)
    }
}

impl Tonnes {
    /// Converts a mass in tonnes to kilograms.
    pub fn into_kg(self) -> Mass {
        Mass(self.0 * KG_PER_TONNE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_unit_arithmetic() {
        let cost = MoneyPerCapacity(450.0) * Capacity(1000.0);
        assert_approx_eq!(Money, cost, Money(450_000.0));

        let energy = Capacity(100.0) * HOURS_PER_YEAR;
        assert_approx_eq!(Energy, energy, Energy(876_000.0));

        let utilisation = Energy(438_000.0) / energy;
        assert_approx_eq!(Dimensionless, utilisation, Dimensionless(0.5));
    }

    #[test]
    fn test_powi_large_exponent_saturates() {
        // Exponents above i32::MAX must not wrap to a negative power
        assert!(Dimensionless(2.0).powi(3_000_000_000).value().is_infinite());
        assert_approx_eq!(
            Dimensionless,
            Dimensionless(1.0).powi(u32::MAX),
            Dimensionless(1.0)
        );
    }

    #[test]
    fn test_mass_conversions() {
        assert_approx_eq!(Tonnes, Mass(1500.0).into_tonnes(), Tonnes(1.5));
        assert_approx_eq!(Mass, Tonnes(2.0).into_kg(), Mass(2000.0));
    }
}
