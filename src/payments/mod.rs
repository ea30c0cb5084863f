pub mod amortization;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::decimal::{Money, Rate};

pub use amortization::{AmortizationRow, AmortizationSchedule, DatedRow};

/// schedule request for a finalized contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    pub monthly_payment: Money,
    pub term_months: u32,
    /// solved from the other three fields when absent
    #[serde(default)]
    pub monthly_rate: Option<Rate>,
}

impl AmortizationInput {
    pub fn new(principal: Money, monthly_payment: Money, term_months: u32) -> Self {
        Self {
            principal,
            monthly_payment,
            term_months,
            monthly_rate: None,
        }
    }

    pub fn with_monthly_rate(mut self, rate: Rate) -> Self {
        self.monthly_rate = Some(rate);
        self
    }

    /// sum of the nominal payments
    pub fn total_of_payments(&self) -> Money {
        self.monthly_payment * Decimal::from(self.term_months)
    }
}

/// generate the schedule for a request
pub fn generate_schedule(input: &AmortizationInput, solver: &SolverConfig) -> AmortizationSchedule {
    AmortizationSchedule::from_input(input, solver)
}
