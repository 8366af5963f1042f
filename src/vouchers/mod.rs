use std::fmt;
use std::str::FromStr;

use getset::Getters;
use rust_decimal::Decimal;
use thiserror::Error;

pub mod builder;
pub mod dates;
pub mod ids;
pub mod mapping;

#[cfg(test)]
mod builder_tests;

#[derive(Debug, PartialEq, Error)]
pub enum VoucherError {
    #[error("unknown voucher type: {0}")]
    UnknownVoucherType(String),
}

/// A single spreadsheet cell as handed over by the ingestion layer.
/// Numeric cells keep their raw value so date serial numbers survive.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Empty in the defaulting sense: blank cells and numeric zero both
    /// fall through to the field default, matching the import template's
    /// truthiness rules.
    pub fn is_falsy(&self) -> bool {
        match self {
            Cell::Number(n) => *n == 0.0,
            _ => self.is_empty(),
        }
    }

    /// Stringified cell value. Whole numbers print without a fraction part.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            },
        }
    }

    /// Numeric interpretation of the cell, `None` when it cannot be parsed.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Decimal::try_from(*n).ok(),
            Cell::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)).ok()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoucherType {
    Sales,
    SalesBusy,
    Purchase,
    PurchaseBusy,
    Receipt,
    Payment,
    Journal,
    Contra,
    CreditNote,
    DebitNote,
}

impl VoucherType {
    pub const ALL: [VoucherType; 10] = [
        VoucherType::Sales,
        VoucherType::SalesBusy,
        VoucherType::Purchase,
        VoucherType::PurchaseBusy,
        VoucherType::Receipt,
        VoucherType::Payment,
        VoucherType::Journal,
        VoucherType::Contra,
        VoucherType::CreditNote,
        VoucherType::DebitNote,
    ];

    /// Name of the voucher type as Tally expects it in the import payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoucherType::Sales => "Sales",
            VoucherType::SalesBusy => "Sales Busy",
            VoucherType::Purchase => "Purchase",
            VoucherType::PurchaseBusy => "Purchase Busy",
            VoucherType::Receipt => "Receipt",
            VoucherType::Payment => "Payment",
            VoucherType::Journal => "Journal",
            VoucherType::Contra => "Contra",
            VoucherType::CreditNote => "Credit Note",
            VoucherType::DebitNote => "Debit Note",
        }
    }
}

impl fmt::Display for VoucherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoucherType {
    type Err = VoucherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        VoucherType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().to_lowercase() == needle)
            .ok_or_else(|| VoucherError::UnknownVoucherType(s.to_string()))
    }
}

/// Per-run settings supplied by the caller alongside the row data.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct RunConfig {
    voucher_type: VoucherType,
    default_godown: String,
    sales_ledger: String,
}

impl RunConfig {
    pub fn new(voucher_type: VoucherType, default_godown: String, sales_ledger: String) -> RunConfig {
        RunConfig {
            voucher_type,
            default_godown,
            sales_ledger,
        }
    }
}

impl Default for RunConfig {
    fn default() -> RunConfig {
        RunConfig::new(VoucherType::Sales, "Main Location".to_string(), "Sales".to_string())
    }
}
