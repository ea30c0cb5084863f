use crate::config::{RateTable, SolverConfig};
use crate::decimal::Money;
use crate::errors::{Result, RtoError};
use crate::payments::{AmortizationInput, AmortizationSchedule};
use crate::quote::{quote_with_step, QuoteInput, QuoteResult};

pub fn validate_quote_input(input: &QuoteInput) -> Result<()> {
    if !input.sale_price.is_positive() {
        return Err(RtoError::NonPositiveSalePrice {
            sale_price: input.sale_price,
        });
    }

    if input.term_months == 0 {
        return Err(RtoError::ZeroTerm);
    }

    if input.down_payment.is_negative() {
        return Err(RtoError::NegativeDownPayment {
            down_payment: input.down_payment,
        });
    }

    // the permissive engine clamps this to a zero financed amount
    if input.down_payment > input.sale_price {
        return Err(RtoError::DownPaymentExceedsSalePrice {
            down_payment: input.down_payment,
            sale_price: input.sale_price,
        });
    }

    if let Some(rate) = input.annual_rate.filter(|r| r.is_negative()) {
        return Err(RtoError::NegativeRate { rate });
    }

    Ok(())
}

pub fn validate_amortization_input(input: &AmortizationInput) -> Result<()> {
    if !input.principal.is_positive() {
        return Err(RtoError::NonPositivePrincipal {
            principal: input.principal,
        });
    }

    if !input.monthly_payment.is_positive() {
        return Err(RtoError::NonPositivePayment {
            payment: input.monthly_payment,
        });
    }

    if input.term_months == 0 {
        return Err(RtoError::ZeroTerm);
    }

    if let Some(rate) = input.monthly_rate.filter(|r| r.is_negative()) {
        return Err(RtoError::NegativeRate { rate });
    }

    if input.principal - input.total_of_payments() > Money::CENT {
        return Err(RtoError::PaymentBelowPrincipal {
            principal: input.principal,
            payment: input.monthly_payment,
            term_months: input.term_months,
        });
    }

    Ok(())
}

/// quote only after the input passes validation
///
/// Unlike [`quote_with_step`], bad magnitudes are rejected instead of zeroed.
pub fn quote_strict(input: &QuoteInput, rate_table: &RateTable, rounding_step: Money) -> Result<QuoteResult> {
    validate_quote_input(input)?;
    Ok(quote_with_step(input, rate_table, rounding_step))
}

/// generate a schedule only after the input passes validation
pub fn generate_schedule_strict(input: &AmortizationInput, solver: &SolverConfig) -> Result<AmortizationSchedule> {
    validate_amortization_input(input)?;
    Ok(AmortizationSchedule::from_input(input, solver))
}
