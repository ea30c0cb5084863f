pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod interest;
pub mod payments;
pub mod quote;
pub mod serialization;
pub mod validation;

// re-export key types
pub use config::{EngineConfig, RateTable, SolverConfig};
pub use decimal::{Money, Rate};
pub use engine::RtoEngine;
pub use errors::{Result, RtoError};
pub use interest::{
    annuity_payment, solve_monthly_rate, solve_monthly_rate_detailed, RateSolution,
    SolveOutcome,
};
pub use payments::{
    generate_schedule, AmortizationInput, AmortizationRow, AmortizationSchedule, DatedRow,
};
pub use quote::{
    quote, quote_terms, quote_with_defaults, quote_with_step, QuoteInput, QuoteResult,
};
pub use serialization::{QuoteView, ScheduleSummary};
pub use validation::{
    generate_schedule_strict, quote_strict, validate_amortization_input, validate_quote_input,
};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
