//! Fuel cost arithmetic.
//!
//! Reference efficiencies are stored per gallon while fuel is priced per
//! liter, so every conversion goes through [`LITERS_PER_GALLON`].

use thiserror::Error;

/// Standard US gallon in liters
pub const LITERS_PER_GALLON: f64 = 3.78541;

/// Months used to annualize a monthly figure
pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CalcError {
    #[error("fuel price must be positive, got {0}")]
    NonPositivePrice(f64),

    #[error("fuel efficiency must be positive, got {0}")]
    NonPositiveEfficiency(f64),
}

fn check_price(price_per_liter: f64) -> Result<f64, CalcError> {
    if price_per_liter.is_finite() && price_per_liter > 0.0 {
        Ok(price_per_liter * LITERS_PER_GALLON)
    } else {
        Err(CalcError::NonPositivePrice(price_per_liter))
    }
}

fn check_efficiency(efficiency: f64) -> Result<f64, CalcError> {
    if efficiency.is_finite() && efficiency > 0.0 {
        Ok(efficiency)
    } else {
        Err(CalcError::NonPositiveEfficiency(efficiency))
    }
}

/// Distance covered in a month for a given fuel spend
///
/// `(spend / (price_per_liter * LITERS_PER_GALLON)) * efficiency`
pub fn monthly_distance(
    monthly_spend: f64,
    price_per_liter: f64,
    efficiency: f64,
) -> Result<f64, CalcError> {
    let price_per_gallon = check_price(price_per_liter)?;
    let efficiency = check_efficiency(efficiency)?;
    let gallons = monthly_spend / price_per_gallon;
    Ok(gallons * efficiency)
}

/// Cost for a hybrid to cover `user_distance` at the same fuel price
pub fn hybrid_equivalent_spend(
    user_distance: f64,
    price_per_liter: f64,
    hybrid_efficiency: f64,
) -> Result<f64, CalcError> {
    let price_per_gallon = check_price(price_per_liter)?;
    let hybrid_efficiency = check_efficiency(hybrid_efficiency)?;
    let gallons_needed = user_distance / hybrid_efficiency;
    Ok(gallons_needed * price_per_gallon)
}

/// Raw monthly savings; may be negative, callers clamp before storing
pub fn monthly_savings(user_spend: f64, hybrid_equivalent_spend: f64) -> f64 {
    user_spend - hybrid_equivalent_spend
}

/// Round to two decimals, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Yearly figure for a (already rounded) monthly savings value
pub fn annual_savings(monthly: f64) -> f64 {
    round2(monthly * MONTHS_PER_YEAR)
}
