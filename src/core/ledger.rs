use crate::core::params::ContractType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One finalized day of a simulated contract.
///
/// `reference_price` is the price this day's P&L was marked against:
/// the inception price on day 0 (and on every day for a forward), the
/// previous day's spot otherwise. Each row is therefore self-describing:
/// `daily_pnl = (spot - reference_price) * contract_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLedgerRow {
    pub day: u32,
    pub spot: Decimal,
    pub reference_price: Decimal,
    pub daily_pnl: Decimal,
    /// Margin account balance after the margin-call correction.
    /// Zero for the unmargined forward variant.
    pub margin_balance: Decimal,
    /// Net cash movement for the day: the day's P&L under daily
    /// settlement, the collateral top-up on a margin-call day, or zero
    /// for a forward before maturity.
    pub cash_flow: Decimal,
    pub margin_call: bool,
}

/// The full day-by-day ledger of one simulated contract.
///
/// Produced by exactly one margin-engine invocation, immutable afterwards,
/// and recomputed wholesale on any parameter change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLedger {
    contract: ContractType,
    inception_price: Decimal,
    contract_size: u32,
    rows: Vec<DailyLedgerRow>,
}

impl DailyLedger {
    pub(crate) fn new(
        contract: ContractType,
        inception_price: Decimal,
        contract_size: u32,
        rows: Vec<DailyLedgerRow>,
    ) -> Self {
        Self {
            contract,
            inception_price,
            contract_size,
            rows,
        }
    }

    pub fn contract(&self) -> ContractType {
        self.contract
    }

    pub fn inception_price(&self) -> Decimal {
        self.inception_price
    }

    pub fn contract_size(&self) -> u32 {
        self.contract_size
    }

    pub fn rows(&self) -> &[DailyLedgerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Net cash moved over the life of the contract.
    pub fn total_cash_flow(&self) -> Decimal {
        self.rows.iter().map(|r| r.cash_flow).sum()
    }

    /// Sum of daily P&L across all rows.
    ///
    /// For the daily-marked variants this telescopes to
    /// `(final spot - inception price) * contract_size`.
    pub fn cumulative_pnl(&self) -> Decimal {
        self.rows.iter().map(|r| r.daily_pnl).sum()
    }

    /// Number of days on which a margin call fired.
    pub fn margin_call_count(&self) -> usize {
        self.rows.iter().filter(|r| r.margin_call).count()
    }

    /// Mark-to-market value at the final day against the inception price.
    pub fn final_mtm(&self) -> Decimal {
        match self.rows.last() {
            Some(last) => {
                (last.spot - self.inception_price) * Decimal::from(self.contract_size)
            }
            None => Decimal::ZERO,
        }
    }
}

impl std::fmt::Display for DailyLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Daily Ledger: {} ===", self.contract)?;
        writeln!(f, "Days:             {}", self.len())?;
        writeln!(f, "Inception Price:  {}", self.inception_price)?;
        writeln!(f, "Contract Size:    {}", self.contract_size)?;
        writeln!(f, "Margin Calls:     {}", self.margin_call_count())?;
        writeln!(f, "Cumulative PnL:   {}", self.cumulative_pnl())?;
        writeln!(f, "Total Cash Flow:  {}", self.total_cash_flow())?;
        writeln!(f, "Final MTM:        {}", self.final_mtm())?;
        Ok(())
    }
}
