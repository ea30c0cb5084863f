use thiserror::Error;

use crate::decimal::{Money, Rate};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RtoError {
    #[error("sale price must be positive: {sale_price}")]
    NonPositiveSalePrice {
        sale_price: Money,
    },

    #[error("down payment cannot be negative: {down_payment}")]
    NegativeDownPayment {
        down_payment: Money,
    },

    #[error("down payment exceeds sale price: down payment {down_payment}, sale price {sale_price}")]
    DownPaymentExceedsSalePrice {
        down_payment: Money,
        sale_price: Money,
    },

    #[error("term must be at least one month")]
    ZeroTerm,

    #[error("principal must be positive: {principal}")]
    NonPositivePrincipal {
        principal: Money,
    },

    #[error("monthly payment must be positive: {payment}")]
    NonPositivePayment {
        payment: Money,
    },

    #[error("payments of {payment} over {term_months} months cannot repay principal {principal}")]
    PaymentBelowPrincipal {
        principal: Money,
        payment: Money,
        term_months: u32,
    },

    #[error("interest rate cannot be negative: {rate}")]
    NegativeRate {
        rate: Rate,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl From<serde_json::Error> for RtoError {
    fn from(err: serde_json::Error) -> Self {
        RtoError::InvalidConfiguration {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RtoError>;
