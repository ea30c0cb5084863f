use log::debug;

use crate::config::EngineConfig;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::interest::solve_monthly_rate;
use crate::payments::{AmortizationInput, AmortizationSchedule};
use crate::quote::{quote_terms, quote_with_step, QuoteInput, QuoteResult};
use crate::validation::{generate_schedule_strict, quote_strict};

/// pricing engine bound to one configuration
///
/// In strict mode invalid inputs are rejected; otherwise they produce zeroed
/// results and every call returns `Ok`.
#[derive(Debug, Clone, Default)]
pub struct RtoEngine {
    config: EngineConfig,
}

impl RtoEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self {
            config: EngineConfig::from_json_str(json)?,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_strict(&self) -> bool {
        self.config.strict
    }

    pub fn quote(&self, input: &QuoteInput) -> Result<QuoteResult> {
        let step = self.config.payment_rounding_step;
        if self.config.strict {
            quote_strict(input, &self.config.rate_table, step)
        } else {
            Ok(quote_with_step(input, &self.config.rate_table, step))
        }
    }

    /// quote every term listed in the rate table
    pub fn quote_listed_terms(&self, sale_price: Money, down_payment: Money) -> Vec<(u32, QuoteResult)> {
        let terms: Vec<u32> = self.config.rate_table.listed_terms().collect();
        quote_terms(
            sale_price,
            down_payment,
            &terms,
            &self.config.rate_table,
            self.config.payment_rounding_step,
        )
    }

    pub fn solve_monthly_rate(&self, principal: Money, monthly_payment: Money, term_months: u32) -> Rate {
        solve_monthly_rate(principal, monthly_payment, term_months, &self.config.solver)
    }

    pub fn schedule(&self, input: &AmortizationInput) -> Result<AmortizationSchedule> {
        if self.config.strict {
            generate_schedule_strict(input, &self.config.solver)
        } else {
            Ok(AmortizationSchedule::from_input(input, &self.config.solver))
        }
    }

    /// compound schedule for the financed amount and rounded payment of a quote
    pub fn schedule_for_quote(&self, quote: &QuoteResult, term_months: u32) -> Result<AmortizationSchedule> {
        debug!(
            "scheduling quote: financed {}, payment {}, term {}",
            quote.finance_amount, quote.monthly_payment, term_months
        );
        let input = AmortizationInput::new(quote.finance_amount, quote.monthly_payment, term_months);
        self.schedule(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateTable;
    use crate::errors::RtoError;

    fn strict_engine() -> RtoEngine {
        RtoEngine::new(EngineConfig {
            strict: true,
            ..EngineConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_quote_then_schedule() {
        let engine = RtoEngine::default();
        let input = QuoteInput::new(Money::from_major(40_000), Money::from_major(5_000), 36);

        let quote = engine.quote(&input).unwrap();
        let schedule = engine.schedule_for_quote(&quote, 36).unwrap();

        assert_eq!(schedule.principal, Money::from_major(35_000));
        assert_eq!(schedule.monthly_payment, Money::from_major(1_675));
        assert_eq!(schedule.rows.len(), 36);
        assert_eq!(schedule.balance_after(36), Money::ZERO);

        // the rounded-up payment carries slightly more interest than the quote
        assert!((schedule.total_interest_paid - Money::from_major(25_300)).abs() <= Money::CENT);
        assert!(quote.total_interest < schedule.total_interest_paid);
        // compounding on a declining balance needs a higher rate than the flat 2% per month
        assert!(schedule.monthly_rate.to_f64() > 0.02);
        assert!((schedule.sum_of_payments() - schedule.total_paid).abs() <= Money::CENT);
    }

    #[test]
    fn test_permissive_engine_zeroes_bad_input() {
        let engine = RtoEngine::default();
        let quote = engine
            .quote(&QuoteInput::new(Money::from_major(40_000), Money::ZERO, 0))
            .unwrap();
        assert!(quote.is_degenerate());

        let schedule = engine
            .schedule(&AmortizationInput::new(Money::ZERO, Money::from_major(10), 12))
            .unwrap();
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_strict_engine_rejects_bad_input() {
        let engine = strict_engine();
        assert!(engine.is_strict());
        assert_eq!(
            engine.quote(&QuoteInput::new(Money::from_major(40_000), Money::ZERO, 0)),
            Err(RtoError::ZeroTerm)
        );

        // a zero quote cannot be turned into a contract
        let empty = QuoteResult::default();
        assert!(matches!(
            engine.schedule_for_quote(&empty, 36),
            Err(RtoError::NonPositivePrincipal { .. })
        ));
    }

    #[test]
    fn test_quote_listed_terms() {
        let engine = RtoEngine::new(EngineConfig {
            rate_table: RateTable::default()
                .with_term_rate(36, Rate::from_percentage(24))
                .with_term_rate(12, Rate::from_percentage(18)),
            ..EngineConfig::default()
        })
        .unwrap();

        let quotes = engine.quote_listed_terms(Money::from_major(40_000), Money::from_major(5_000));
        let terms: Vec<u32> = quotes.iter().map(|(t, _)| *t).collect();
        assert_eq!(terms, vec![12, 36]);
        assert_eq!(quotes[0].1.annual_rate_used, Rate::from_percentage(18));
        assert_eq!(quotes[1].1.monthly_payment, Money::from_major(1_675));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig {
            payment_rounding_step: Money::from_major(-5),
            ..EngineConfig::default()
        };
        assert!(RtoEngine::new(config).is_err());
    }

    #[test]
    fn test_from_json() {
        let engine = RtoEngine::from_json_str(r#"{ "strict": true, "payment_rounding_step": "1" }"#).unwrap();
        assert!(engine.is_strict());
        assert_eq!(engine.config().payment_rounding_step, Money::ONE);
        assert_eq!(
            engine.solve_monthly_rate(Money::from_major(12_000), Money::from_major(1_000), 12),
            Rate::ZERO
        );
    }
}
