use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RateTable;
use crate::decimal::{Money, Rate};

/// default step quoted payments are rounded up to
pub fn default_rounding_step() -> Money {
    Money::from_major(5)
}

/// quote request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInput {
    pub sale_price: Money,
    pub down_payment: Money,
    pub term_months: u32,
    /// overrides the rate table when present
    #[serde(default)]
    pub annual_rate: Option<Rate>,
}

impl QuoteInput {
    pub fn new(sale_price: Money, down_payment: Money, term_months: u32) -> Self {
        Self {
            sale_price,
            down_payment,
            term_months,
            annual_rate: None,
        }
    }

    pub fn with_annual_rate(mut self, rate: Rate) -> Self {
        self.annual_rate = Some(rate);
        self
    }

    /// amount left to finance; a down payment above the sale price finances nothing
    pub fn finance_amount(&self) -> Money {
        (self.sale_price - self.down_payment).max(Money::ZERO)
    }

    /// annual rate this quote will use, never below zero
    ///
    /// A negative override is quoted at zero here; strict quoting rejects it.
    pub fn resolve_rate(&self, rate_table: &RateTable) -> Rate {
        self.annual_rate
            .unwrap_or_else(|| rate_table.rate_for(self.term_months))
            .max(Rate::ZERO)
    }

    fn is_quotable(&self) -> bool {
        self.term_months > 0 && self.sale_price.is_positive()
    }
}

/// quote result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteResult {
    pub finance_amount: Money,
    pub total_interest: Money,
    pub total_to_pay: Money,
    /// raw payment rounded up to the rounding step
    pub monthly_payment: Money,
    pub raw_monthly_payment: Money,
    pub annual_rate_used: Rate,
    /// total interest as a percentage of the financed amount
    pub effective_rate_percent: Decimal,
}

impl QuoteResult {
    /// true for the all-zero result returned for unquotable input
    pub fn is_degenerate(&self) -> bool {
        *self == QuoteResult::default()
    }
}

/// Quote a sale with the default rounding step of 5.
///
/// # Example
///
/// ```rust
/// use rto_pricing::{quote, Money, QuoteInput, RateTable};
///
/// let input = QuoteInput::new(Money::from_major(40_000), Money::from_major(5_000), 36);
/// let result = quote(&input, &RateTable::default());
///
/// assert_eq!(result.total_to_pay, Money::from_major(60_200));
/// assert_eq!(result.monthly_payment, Money::from_major(1_675));
/// ```
pub fn quote(input: &QuoteInput, rate_table: &RateTable) -> QuoteResult {
    quote_with_step(input, rate_table, default_rounding_step())
}

/// Quote a sale, rounding the monthly payment up to a multiple of `rounding_step`.
///
/// Zero terms and non-positive sale prices produce an all-zero [`QuoteResult`]
/// instead of an error. Callers that persist a quote should go through
/// [`crate::validation::quote_strict`].
pub fn quote_with_step(input: &QuoteInput, rate_table: &RateTable, rounding_step: Money) -> QuoteResult {
    if !input.is_quotable() {
        debug!(
            "unquotable input, returning zero quote: sale price {}, term {}",
            input.sale_price, input.term_months
        );
        return QuoteResult::default();
    }

    let annual_rate = input.resolve_rate(rate_table);
    let finance_amount = input.finance_amount();
    let total_interest = finance_amount.simple_interest(annual_rate, input.term_months);
    let total_to_pay = finance_amount + total_interest;
    let raw_monthly_payment = total_to_pay / Decimal::from(input.term_months);
    let monthly_payment = raw_monthly_payment.ceil_to_multiple(rounding_step);

    let effective_rate_percent = if finance_amount.is_positive() {
        total_interest
            .as_decimal()
            .checked_div(finance_amount.as_decimal())
            .map_or(Decimal::MAX, |ratio| ratio.saturating_mul(Decimal::from(100)))
    } else {
        Decimal::ZERO
    };

    QuoteResult {
        finance_amount,
        total_interest,
        total_to_pay,
        monthly_payment,
        raw_monthly_payment,
        annual_rate_used: annual_rate,
        effective_rate_percent,
    }
}

/// Quote from bare figures against the default 24% table.
pub fn quote_with_defaults(
    sale_price: Money,
    down_payment: Money,
    term_months: u32,
    annual_rate: Option<Rate>,
) -> QuoteResult {
    let input = QuoteInput {
        sale_price,
        down_payment,
        term_months,
        annual_rate,
    };
    quote(&input, &RateTable::default())
}

/// Quote the same sale over several terms, in the order given.
pub fn quote_terms(
    sale_price: Money,
    down_payment: Money,
    terms: &[u32],
    rate_table: &RateTable,
    rounding_step: Money,
) -> Vec<(u32, QuoteResult)> {
    terms
        .iter()
        .map(|&term| {
            let input = QuoteInput::new(sale_price, down_payment, term);
            (term, quote_with_step(&input, rate_table, rounding_step))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn table() -> RateTable {
        RateTable::default()
    }

    #[test]
    fn test_documented_example() {
        let input = QuoteInput::new(Money::from_major(40_000), Money::from_major(5_000), 36);
        let result = quote(&input, &table());

        assert_eq!(result.finance_amount, Money::from_major(35_000));
        assert_eq!(result.total_interest, Money::from_major(25_200));
        assert_eq!(result.total_to_pay, Money::from_major(60_200));
        assert_eq!(result.raw_monthly_payment.round_cents(), Money::from_decimal(dec!(1672.22)));
        assert_eq!(result.monthly_payment, Money::from_major(1_675));
        assert_eq!(result.annual_rate_used, Rate::from_percentage(24));
        assert_eq!(result.effective_rate_percent, dec!(72));
    }

    #[test]
    fn test_degenerate_inputs_give_zero_quote() {
        let zero_price = QuoteInput::new(Money::ZERO, Money::ZERO, 36);
        assert!(quote(&zero_price, &table()).is_degenerate());

        let zero_term = QuoteInput::new(Money::from_major(40_000), Money::ZERO, 0);
        assert!(quote(&zero_term, &table()).is_degenerate());

        let negative_price = QuoteInput::new(Money::from_major(-100), Money::ZERO, 12);
        let result = quote(&negative_price, &table());
        assert_eq!(result, QuoteResult::default());
        assert_eq!(result.annual_rate_used, Rate::ZERO);
    }

    #[test]
    fn test_down_payment_above_price_finances_nothing() {
        let input = QuoteInput::new(Money::from_major(10_000), Money::from_major(12_000), 12);
        let result = quote(&input, &table());

        assert_eq!(result.finance_amount, Money::ZERO);
        assert_eq!(result.total_interest, Money::ZERO);
        assert_eq!(result.monthly_payment, Money::ZERO);
        assert_eq!(result.effective_rate_percent, Decimal::ZERO);
        // the rate is still resolved even though nothing is financed
        assert_eq!(result.annual_rate_used, Rate::from_percentage(24));
    }

    #[test]
    fn test_rate_override_and_table_lookup() {
        let table = RateTable::default().with_term_rate(12, Rate::from_percentage(18));

        let listed = quote(&QuoteInput::new(Money::from_major(12_000), Money::ZERO, 12), &table);
        assert_eq!(listed.annual_rate_used, Rate::from_percentage(18));
        assert_eq!(listed.total_interest, Money::from_major(2_160));

        let overridden = QuoteInput::new(Money::from_major(12_000), Money::ZERO, 12)
            .with_annual_rate(Rate::ZERO);
        let result = quote(&overridden, &table);
        assert_eq!(result.annual_rate_used, Rate::ZERO);
        assert_eq!(result.total_interest, Money::ZERO);
        assert_eq!(result.monthly_payment, Money::from_major(1_000));
    }

    #[test]
    fn test_negative_override_quotes_at_zero() {
        let input = QuoteInput::new(Money::from_major(12_000), Money::ZERO, 12)
            .with_annual_rate(Rate::from_decimal(dec!(-0.05)));
        let result = quote(&input, &table());

        assert_eq!(result.annual_rate_used, Rate::ZERO);
        assert_eq!(result.total_interest, Money::ZERO);
        assert_eq!(result.effective_rate_percent, Decimal::ZERO);
        assert_eq!(result.monthly_payment, Money::from_major(1_000));
    }

    #[test]
    fn test_huge_override_rate_saturates() {
        let rate = Rate::from_decimal(Decimal::from_i128_with_scale(10_i128.pow(27), 0));
        let input = QuoteInput::new(Money::ONE, Money::ZERO, 12).with_annual_rate(rate);
        let result = quote(&input, &table());

        assert_eq!(result.total_interest.as_decimal(), rate.as_decimal());
        assert!(result.monthly_payment >= result.raw_monthly_payment);
        assert_eq!(result.effective_rate_percent, Decimal::MAX);
    }

    #[test]
    fn test_sale_price_near_decimal_max() {
        let input = QuoteInput::new(Money::from_decimal(Decimal::MAX), Money::ZERO, 1)
            .with_annual_rate(Rate::ZERO);
        let result = quote_with_step(&input, &table(), Money::from_major(10));

        assert_eq!(result.total_to_pay, Money::from_decimal(Decimal::MAX));
        assert_eq!(result.monthly_payment, result.raw_monthly_payment);
        assert_eq!(result.effective_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn test_payment_always_rounds_up_to_step() {
        let five = Money::from_major(5);
        for term in [1, 5, 7, 12, 13, 24, 36, 48, 60] {
            for price in [999, 10_001, 37_500, 123_457] {
                let input = QuoteInput::new(Money::from_major(price), Money::from_major(250), term);
                let result = quote(&input, &table());

                assert!(result.monthly_payment >= result.raw_monthly_payment);
                assert!(result.monthly_payment - result.raw_monthly_payment < five);
                assert!((result.monthly_payment.as_decimal() % dec!(5)).is_zero());
                assert_eq!(result.total_to_pay, result.finance_amount + result.total_interest);
            }
        }
    }

    #[test]
    fn test_custom_rounding_step() {
        let input = QuoteInput::new(Money::from_major(40_000), Money::from_major(5_000), 36);

        let tens = quote_with_step(&input, &table(), Money::from_major(10));
        assert_eq!(tens.monthly_payment, Money::from_major(1_680));

        let cents = quote_with_step(&input, &table(), Money::ZERO);
        assert_eq!(cents.monthly_payment, Money::from_decimal(dec!(1672.23)));
    }

    #[test]
    fn test_quote_terms() {
        let quotes = quote_terms(
            Money::from_major(40_000),
            Money::from_major(5_000),
            &[12, 36, 0],
            &table(),
            default_rounding_step(),
        );

        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].0, 12);
        assert_eq!(quotes[0].1.total_interest, Money::from_major(8_400));
        assert_eq!(quotes[1].1.monthly_payment, Money::from_major(1_675));
        assert!(quotes[2].1.is_degenerate());
    }

    #[test]
    fn test_quote_with_defaults() {
        let result = quote_with_defaults(Money::from_major(40_000), Money::from_major(5_000), 36, None);
        assert_eq!(result.monthly_payment, Money::from_major(1_675));

        let overridden = quote_with_defaults(
            Money::from_major(40_000),
            Money::from_major(5_000),
            36,
            Some(Rate::from_percentage(12)),
        );
        assert_eq!(overridden.annual_rate_used, Rate::from_percentage(12));
        assert_eq!(overridden.total_interest, Money::from_major(12_600));
    }
}
