//! General functions related to finance.
use crate::units::{Dimensionless, Money};

/// Calculates the capital recovery factor (CRF) for a given lifetime and discount rate.
///
/// The CRF is used to annualize capital costs over the lifetime of an asset. When the
/// denominator `(1 + r)^n - 1` is zero (a zero lifetime or a zero discount rate), the CRF
/// resolves to zero rather than dividing by zero.
pub fn capital_recovery_factor(lifetime: u32, discount_rate: Dimensionless) -> Dimensionless {
    if lifetime == 0 || discount_rate == Dimensionless(0.0) {
        return Dimensionless(0.0);
    }

    let factor = (Dimensionless(1.0) + discount_rate).powi(lifetime);
    (discount_rate * factor) / (factor - Dimensionless(1.0))
}

/// Calculates the annualized capital cost for the given total CAPEX.
pub fn annualized_capex(
    total_capex: Money,
    lifetime: u32,
    discount_rate: Dimensionless,
) -> Money {
    let crf = capital_recovery_factor(lifetime, discount_rate);
    total_capex * crf
}

/// Calculates the present value of a one-time component replacement at the end of its rated
/// lifetime.
///
/// The replacement's nominal cost is today's cost inflated over the component lifetime; it is
/// then discounted back to present over the same horizon. A discount rate of -1 (a zero
/// discounting base) yields zero rather than dividing by zero.
pub fn replacement_present_value(
    capital_cost: Money,
    lifetime: u32,
    inflation_rate: Dimensionless,
    discount_rate: Dimensionless,
) -> Money {
    let discount_base = Dimensionless(1.0) + discount_rate;
    if discount_base == Dimensionless(0.0) {
        return Money(0.0);
    }

    let nominal = capital_cost * (Dimensionless(1.0) + inflation_rate).powi(lifetime);
    nominal / discount_base.powi(lifetime)
}
