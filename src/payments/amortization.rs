use chrono::{Months, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::decimal::{Money, Rate};
use crate::interest::{solve_monthly_rate_detailed, RateSolution};
use crate::payments::AmortizationInput;

/// one period of an amortization schedule, rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub beginning_balance: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub payment_amount: Money,
    pub remaining_balance: Money,
}

/// schedule row with its calendar due date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedRow {
    pub due_date: NaiveDate,
    #[serde(flatten)]
    pub row: AmortizationRow,
}

/// declining-balance amortization schedule for a fixed monthly payment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub monthly_payment: Money,
    pub term_months: u32,
    pub monthly_rate: Rate,
    /// `monthly_rate * 12`
    pub annual_compound_rate_equivalent: Rate,
    pub total_interest_paid: Money,
    pub total_paid: Money,
    pub rows: Vec<AmortizationRow>,
    /// present when the rate was solved rather than supplied
    pub rate_solution: Option<RateSolution>,
}

impl AmortizationSchedule {
    /// Build the schedule for `term_months` payments of `monthly_payment` against `principal`.
    ///
    /// Without a `monthly_rate` the rate is solved from the three amounts. The last
    /// period always pays off the whole remaining balance, so the schedule closes at
    /// exactly zero even when the rate is slightly off. Non-positive inputs give an
    /// empty schedule.
    pub fn generate(
        principal: Money,
        monthly_payment: Money,
        term_months: u32,
        monthly_rate: Option<Rate>,
        solver: &SolverConfig,
    ) -> Self {
        if !principal.is_positive() || !monthly_payment.is_positive() || term_months == 0 {
            debug!(
                "empty schedule for principal {}, payment {}, term {}",
                principal, monthly_payment, term_months
            );
            return Self::default();
        }

        let (monthly_rate, rate_solution) = match monthly_rate {
            Some(rate) => (rate, None),
            None => {
                let solution =
                    solve_monthly_rate_detailed(principal, monthly_payment, term_months, solver);
                (solution.rate, Some(solution))
            }
        };

        let mut rows = Vec::with_capacity(term_months as usize);
        let mut balance = principal;
        let mut total_interest = Money::ZERO;

        for period in 1..=term_months {
            let beginning_balance = balance;
            let interest = balance.interest_at(monthly_rate);

            let (principal_portion, payment_amount) = if period == term_months {
                // close out whatever is left, absorbing accumulated drift
                (balance, balance + interest)
            } else {
                (monthly_payment - interest, monthly_payment)
            };

            balance = (balance - principal_portion).max(Money::ZERO);
            total_interest += interest;

            rows.push(AmortizationRow {
                period,
                beginning_balance: beginning_balance.round_cents(),
                principal_portion: principal_portion.round_cents(),
                interest_portion: interest.round_cents(),
                payment_amount: payment_amount.round_cents(),
                remaining_balance: balance.round_cents(),
            });
        }

        debug!(
            "generated {} period schedule at monthly rate {}, total interest {}",
            term_months,
            monthly_rate.as_decimal(),
            total_interest.round_cents()
        );

        Self {
            principal,
            monthly_payment,
            term_months,
            monthly_rate,
            annual_compound_rate_equivalent: monthly_rate.annualized(),
            total_interest_paid: total_interest.round_cents(),
            total_paid: (principal + total_interest).round_cents(),
            rows,
            rate_solution,
        }
    }

    /// build from a request value
    pub fn from_input(input: &AmortizationInput, solver: &SolverConfig) -> Self {
        Self::generate(
            input.principal,
            input.monthly_payment,
            input.term_months,
            input.monthly_rate,
            solver,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// row for a 1-based period
    pub fn row(&self, period: u32) -> Option<&AmortizationRow> {
        let index = period.checked_sub(1)?;
        self.rows.get(index as usize)
    }

    /// remaining balance after a period; period 0 is the opening principal
    pub fn balance_after(&self, period: u32) -> Money {
        match period {
            0 => self.principal.round_cents(),
            _ => self
                .row(period.min(self.term_months))
                .map(|r| r.remaining_balance)
                .unwrap_or(Money::ZERO),
        }
    }

    /// the reconciled closing payment
    pub fn final_payment(&self) -> Option<Money> {
        self.rows.last().map(|r| r.payment_amount)
    }

    /// sum of the rounded interest portions up to and including `period`
    pub fn cumulative_interest_through(&self, period: u32) -> Money {
        self.rows
            .iter()
            .take_while(|r| r.period <= period)
            .map(|r| r.interest_portion)
            .sum()
    }

    /// sum of the rounded payment amounts
    pub fn sum_of_payments(&self) -> Money {
        self.rows.iter().map(|r| r.payment_amount).sum()
    }

    /// attach monthly due dates, starting at `first_due_date`
    ///
    /// Day-of-month is clamped to the end of shorter months.
    pub fn dated(&self, first_due_date: NaiveDate) -> Vec<DatedRow> {
        self.rows
            .iter()
            .map_while(|row| {
                let due_date = first_due_date.checked_add_months(Months::new(row.period - 1))?;
                Some(DatedRow {
                    due_date,
                    row: row.clone(),
                })
            })
            .collect()
    }
}
