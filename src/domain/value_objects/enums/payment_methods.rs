use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Paypal,
    CreditCard,
    Stripe,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Stripe => "stripe",
            PaymentMethod::Other => "other",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "paypal" => PaymentMethod::Paypal,
            "credit_card" => PaymentMethod::CreditCard,
            "stripe" => PaymentMethod::Stripe,
            _ => PaymentMethod::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::Stripe => "Stripe",
            PaymentMethod::Other => "Other",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
