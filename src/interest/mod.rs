pub mod solver;

pub use solver::{solve_monthly_rate, solve_monthly_rate_detailed, RateSolution, SolveOutcome};

/// below this rate the annuity formulas switch to their series expansion at zero
const SMALL_RATE: f64 = 1e-12;

/// fixed payment that amortizes `principal` over `periods` at `rate` per period
///
/// `P * r / (1 - (1 + r)^-n)`, evaluated through `ln_1p`/`exp_m1` so it stays
/// accurate near zero and finite for large rates. At zero the limit `P / n` applies.
pub fn annuity_payment(principal: f64, rate: f64, periods: f64) -> f64 {
    if rate.abs() < SMALL_RATE {
        return principal / periods * (1.0 + rate * (periods + 1.0) / 2.0);
    }
    let one_minus_discount = -(-periods * rate.ln_1p()).exp_m1();
    principal * rate / one_minus_discount
}

/// derivative of [`annuity_payment`] with respect to the rate
pub fn annuity_payment_derivative(principal: f64, rate: f64, periods: f64) -> f64 {
    if rate.abs() < SMALL_RATE {
        return principal * (periods + 1.0) / (2.0 * periods);
    }
    let exponent = -periods * rate.ln_1p();
    let discount = exponent.exp();
    let one_minus_discount = -exponent.exp_m1();
    let numerator = one_minus_discount - rate * periods * discount / (1.0 + rate);
    principal * numerator / (one_minus_discount * one_minus_discount)
}

/// simple-interest monthly rate implied by paying `payment` for `months` against `principal`
pub fn simple_monthly_rate(principal: f64, payment: f64, months: f64) -> f64 {
    (payment * months - principal) / principal / months
}
