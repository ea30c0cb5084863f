use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::decimal::{Money, Rate};
use crate::interest::{annuity_payment, annuity_payment_derivative, simple_monthly_rate};

/// Derivatives smaller than this stop the iteration.
const MIN_DERIVATIVE: f64 = 1e-15;

/// How the solver arrived at its rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// principal, payment or term was not positive
    Degenerate,
    /// payments add up to the principal, so no interest is charged
    ZeroRate,
    /// the Newton step fell below tolerance
    Converged,
    /// the iteration budget ran out
    IterationLimit,
    /// the function or its derivative stopped being usable
    NonFinite,
}

/// Result of a rate solve with convergence diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSolution {
    /// The solved monthly rate.
    pub rate: Rate,
    /// Number of Newton steps taken.
    pub iterations: u32,
    /// Payment implied by the rate minus the target payment.
    pub residual: f64,
    pub outcome: SolveOutcome,
}

impl RateSolution {
    fn short_circuit(outcome: SolveOutcome) -> Self {
        Self {
            rate: Rate::ZERO,
            iterations: 0,
            residual: 0.0,
            outcome,
        }
    }

    /// true unless the iteration stopped early
    pub fn converged(&self) -> bool {
        !matches!(self.outcome, SolveOutcome::IterationLimit | SolveOutcome::NonFinite)
    }
}

/// Solves for the monthly compounding rate that amortizes `principal` with
/// `term_months` payments of `monthly_payment`.
///
/// Newton-Raphson on `payment = P * r / (1 - (1 + r)^-n)` over `r >= 0`. Never
/// fails: degenerate inputs yield zero and a missed convergence yields the best
/// iterate seen.
///
/// # Example
///
/// ```rust
/// use rto_pricing::{solve_monthly_rate, Money, SolverConfig};
///
/// let rate = solve_monthly_rate(
///     Money::from_major(20_000),
///     Money::from_major(1_000),
///     24,
///     &SolverConfig::default(),
/// );
/// assert!(rate.to_f64() > 0.015 && rate.to_f64() < 0.0152);
/// ```
pub fn solve_monthly_rate(
    principal: Money,
    monthly_payment: Money,
    term_months: u32,
    config: &SolverConfig,
) -> Rate {
    solve_monthly_rate_detailed(principal, monthly_payment, term_months, config).rate
}

/// Same as [`solve_monthly_rate`], returning iteration statistics.
pub fn solve_monthly_rate_detailed(
    principal: Money,
    monthly_payment: Money,
    term_months: u32,
    config: &SolverConfig,
) -> RateSolution {
    let p = principal.to_f64();
    let m = monthly_payment.to_f64();
    let n = f64::from(term_months);

    if !(p > 0.0 && m > 0.0 && term_months > 0) {
        debug!(
            "degenerate rate solve: principal {}, payment {}, term {}",
            principal, monthly_payment, term_months
        );
        return RateSolution::short_circuit(SolveOutcome::Degenerate);
    }

    if (m * n - p).abs() <= config.zero_rate_tolerance {
        debug!("payments repay principal {} exactly, rate is zero", principal);
        return RateSolution::short_circuit(SolveOutcome::ZeroRate);
    }

    let f = |r: f64| annuity_payment(p, r, n) - m;
    let df = |r: f64| annuity_payment_derivative(p, r, n);

    let mut r = simple_monthly_rate(p, m, n);
    if !(r.is_finite() && r > 0.0) {
        r = config.min_initial_guess;
    }

    let mut best = r;
    let mut best_residual = f(r);
    let mut outcome = SolveOutcome::IterationLimit;
    let mut iterations = 0;

    while iterations < config.max_iterations {
        let fx = f(r);
        let dfx = df(r);
        if !(fx.is_finite() && dfx.is_finite()) || dfx.abs() < MIN_DERIVATIVE {
            outcome = SolveOutcome::NonFinite;
            break;
        }

        let next = (r - fx / dfx).max(0.0);
        iterations += 1;
        if !next.is_finite() {
            outcome = SolveOutcome::NonFinite;
            break;
        }

        let step = (next - r).abs();
        r = next;
        trace!("newton step {}: rate {:.12}, step {:.3e}", iterations, r, step);

        let residual = f(r);
        if residual.abs() < best_residual.abs() || !best_residual.is_finite() {
            best = r;
            best_residual = residual;
        }

        if step < config.tolerance {
            best = r;
            best_residual = residual;
            outcome = SolveOutcome::Converged;
            break;
        }
    }

    match outcome {
        SolveOutcome::Converged => debug!(
            "solved monthly rate {:.10} in {} iterations (residual {:.2e})",
            best, iterations, best_residual
        ),
        _ => warn!(
            "rate solve stopped with {:?} after {} iterations, using {:.10} (residual {:.2e})",
            outcome, iterations, best, best_residual
        ),
    }

    RateSolution {
        rate: Rate::from_f64(best),
        iterations,
        residual: best_residual,
        outcome,
    }
}
