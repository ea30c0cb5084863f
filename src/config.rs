use std::collections::BTreeMap;

use log::debug;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, RtoError};

/// Default tolerance on the Newton update step.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default iteration budget for the rate solver.
pub const DEFAULT_MAX_ITERATIONS: u32 = 500;

/// Absolute distance between `payment * term` and principal treated as a zero rate.
pub const DEFAULT_ZERO_RATE_TOLERANCE: f64 = 0.01;

/// Floor applied to the simple-interest starting guess.
pub const DEFAULT_MIN_INITIAL_GUESS: f64 = 0.001;

/// annual rates by term length, with a fallback for unlisted terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub default_rate: Rate,
    #[serde(default)]
    pub terms: BTreeMap<u32, Rate>,
}

impl RateTable {
    pub fn new(default_rate: Rate) -> Self {
        Self {
            default_rate,
            terms: BTreeMap::new(),
        }
    }

    /// add a rate for a specific term
    pub fn with_term_rate(mut self, term_months: u32, rate: Rate) -> Self {
        self.terms.insert(term_months, rate);
        self
    }

    /// annual rate for a term, falling back to the default rate
    pub fn rate_for(&self, term_months: u32) -> Rate {
        self.terms
            .get(&term_months)
            .copied()
            .unwrap_or(self.default_rate)
    }

    /// terms with an explicit rate, ascending
    pub fn listed_terms(&self) -> impl Iterator<Item = u32> + '_ {
        self.terms.keys().copied()
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_rate.is_negative() {
            return Err(RtoError::NegativeRate { rate: self.default_rate });
        }
        if let Some((term, rate)) = self.terms.iter().find(|(_, r)| r.is_negative()) {
            return Err(RtoError::InvalidConfiguration {
                message: format!("negative rate {} for {} month term", rate, term),
            });
        }
        if self.terms.contains_key(&0) {
            return Err(RtoError::InvalidConfiguration {
                message: "rate table cannot contain a zero month term".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for RateTable {
    /// 24% nominal annual rate for every term
    fn default() -> Self {
        RateTable::new(Rate::from_decimal(dec!(0.24)))
    }
}

/// rate solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub tolerance: f64,
    pub max_iterations: u32,
    pub zero_rate_tolerance: f64,
    pub min_initial_guess: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            zero_rate_tolerance: DEFAULT_ZERO_RATE_TOLERANCE,
            min_initial_guess: DEFAULT_MIN_INITIAL_GUESS,
        }
    }
}

impl SolverConfig {
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_zero_rate_tolerance(mut self, zero_rate_tolerance: f64) -> Self {
        self.zero_rate_tolerance = zero_rate_tolerance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(RtoError::InvalidConfiguration {
                message: format!("solver tolerance must be positive, got {}", self.tolerance),
            });
        }
        if self.max_iterations == 0 {
            return Err(RtoError::InvalidConfiguration {
                message: "solver needs at least one iteration".to_string(),
            });
        }
        if !(self.zero_rate_tolerance.is_finite() && self.zero_rate_tolerance >= 0.0) {
            return Err(RtoError::InvalidConfiguration {
                message: format!(
                    "zero rate tolerance must be non-negative, got {}",
                    self.zero_rate_tolerance
                ),
            });
        }
        if !(self.min_initial_guess.is_finite() && self.min_initial_guess > 0.0) {
            return Err(RtoError::InvalidConfiguration {
                message: format!(
                    "minimum initial guess must be positive, got {}",
                    self.min_initial_guess
                ),
            });
        }
        Ok(())
    }
}

/// engine configuration, loaded once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rate_table: RateTable,
    pub solver: SolverConfig,
    /// quoted monthly payments are rounded up to a multiple of this amount
    pub payment_rounding_step: Money,
    /// reject invalid inputs instead of returning zeroed results
    pub strict: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rate_table: RateTable::default(),
            solver: SolverConfig::default(),
            payment_rounding_step: Money::from_major(5),
            strict: false,
        }
    }
}

impl EngineConfig {
    /// parse and validate a json configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!(
            "loaded engine config: default rate {}, {} term rates, strict {}",
            config.rate_table.default_rate,
            config.rate_table.terms.len(),
            config.strict
        );
        Ok(config)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.rate_table.validate()?;
        self.solver.validate()?;
        if self.payment_rounding_step.is_negative() {
            return Err(RtoError::InvalidConfiguration {
                message: format!(
                    "payment rounding step cannot be negative: {}",
                    self.payment_rounding_step
                ),
            });
        }
        Ok(())
    }
}
