use serde::{Deserialize, Serialize};

/// One (label, amount) pair within a guest's submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub label: String,
    pub amount: f64,
}

impl Allocation {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }

    /// Zero, negative and NaN amounts carry no signal and are dropped
    /// before encoding and persistence.
    pub fn is_positive(&self) -> bool {
        self.amount > 0.0
    }
}

/// Guest-facing language. Anything that isn't Italian gets the English prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    It,
    En,
}

impl Lang {
    pub fn from_code(code: &str) -> Self {
        if code.eq_ignore_ascii_case("it") {
            Lang::It
        } else {
            Lang::En
        }
    }

    pub fn code_prefix(&self) -> &'static str {
        match self {
            Lang::It => "REGALO",
            Lang::En => "GIFT",
        }
    }
}

/// One persisted ledger row. Field order is the on-disk CSV column order and
/// must stay append-only so older ledgers keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationRecord {
    pub timestamp: i64,
    pub guest_id: String,
    pub lang: Lang,
    pub brand: String,
    pub amount: f64,
    pub code: String,
}

/// One row of the company catalog.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Company {
    pub name: String,
    pub ticker: String,
    pub index: String,
    pub country: String,
    pub sector: String,
    pub subsector: String,
    pub emoji: String,
}
