use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::interest::SolveOutcome;
use crate::payments::AmortizationSchedule;
use crate::quote::QuoteResult;

/// headline figures of a schedule without the per-period rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub principal: Money,
    pub monthly_payment: Money,
    pub term_months: u32,
    pub monthly_rate_percent: Decimal,
    pub annual_rate_percent: Decimal,
    pub total_interest_paid: Money,
    pub total_paid: Money,
    pub final_payment: Option<Money>,
    pub solver_outcome: Option<SolveOutcome>,
}

impl ScheduleSummary {
    pub fn from_schedule(schedule: &AmortizationSchedule) -> Self {
        ScheduleSummary {
            principal: schedule.principal.round_cents(),
            monthly_payment: schedule.monthly_payment.round_cents(),
            term_months: schedule.term_months,
            monthly_rate_percent: schedule.monthly_rate.as_percentage().round_dp(6),
            annual_rate_percent: schedule.annual_compound_rate_equivalent.as_percentage().round_dp(4),
            total_interest_paid: schedule.total_interest_paid,
            total_paid: schedule.total_paid,
            final_payment: schedule.final_payment(),
            solver_outcome: schedule.rate_solution.map(|s| s.outcome),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// quote figures rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteView {
    pub finance_amount: Money,
    pub total_interest: Money,
    pub total_to_pay: Money,
    pub monthly_payment: Money,
    pub raw_monthly_payment: Money,
    pub annual_rate_percent: Decimal,
    pub effective_rate_percent: Decimal,
}

impl QuoteView {
    pub fn from_quote(quote: &QuoteResult) -> Self {
        QuoteView {
            finance_amount: quote.finance_amount.round_cents(),
            total_interest: quote.total_interest.round_cents(),
            total_to_pay: quote.total_to_pay.round_cents(),
            monthly_payment: quote.monthly_payment.round_cents(),
            raw_monthly_payment: quote.raw_monthly_payment.round_cents(),
            annual_rate_percent: quote.annual_rate_used.as_percentage().normalize(),
            effective_rate_percent: quote.effective_rate_percent.round_dp(2),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
