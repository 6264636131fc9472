//! The daily mark-to-market and margin roll-forward.

use crate::core::ledger::{DailyLedger, DailyLedgerRow};
use crate::core::params::{ContractType, SimulationParameters};
use crate::core::series::PriceSeries;
use log::debug;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors arising from the margin roll-forward.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("spot price series is empty; at least one price is required to mark day 0")]
    EmptySeries,
}

/// The core margin engine.
///
/// One canonical daily roll-forward, parameterized by contract type:
/// the margined variants (cleared OTC and exchange-traded futures) share
/// it outright, the uncleared forward replaces daily settlement with a
/// single payment at maturity.
pub struct MarginEngine;

impl MarginEngine {
    /// Roll a contract forward over a spot-price series.
    ///
    /// # Algorithm
    ///
    /// Per day `i` over the series:
    /// 1. The reference price is the inception price on day 0 (and on
    ///    every day for a forward), otherwise the previous day's spot.
    /// 2. `daily_pnl = (spot - reference) * contract_size`.
    /// 3. Margined variants accrue the P&L into the margin balance
    ///    (seeded with the initial margin on day 0).
    /// 4. If the balance falls below the maintenance margin a margin
    ///    call fires: the day's cash flow is the collateral top-up
    ///    `initial_margin - balance` and the balance resets to the
    ///    initial margin. Otherwise the day's P&L settles in cash.
    /// 5. A forward pays nothing until the last day, which settles the
    ///    full accumulated mark-to-market value.
    ///
    /// Failure is all-or-nothing: no partial ledger is ever returned.
    /// An empty series is an error for the margined variants (day 0
    /// cannot be established); a forward yields an empty ledger since
    /// it has no margin account to seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use margin_sim::core::params::{ContractType, SimulationParameters};
    /// use margin_sim::core::series::PriceSeries;
    /// use margin_sim::simulation::margin::MarginEngine;
    /// use rust_decimal_macros::dec;
    ///
    /// let params =
    ///     SimulationParameters::new(100.0, 0.01, 3, 0.0, 1, dec!(10), dec!(5)).unwrap();
    /// let series = PriceSeries::from_spots([dec!(100), dec!(101), dec!(99), dec!(102)]);
    ///
    /// let ledger =
    ///     MarginEngine::simulate(ContractType::Futures, dec!(100), &series, &params).unwrap();
    /// assert_eq!(ledger.len(), 4);
    /// assert_eq!(ledger.margin_call_count(), 0);
    /// assert_eq!(ledger.cumulative_pnl(), dec!(2));
    /// ```
    pub fn simulate(
        contract: ContractType,
        inception_price: Decimal,
        series: &PriceSeries,
        params: &SimulationParameters,
    ) -> Result<DailyLedger, SimulationError> {
        match contract {
            ContractType::Forward => Ok(Self::forward_ledger(inception_price, series, params)),
            ContractType::ClearedOtc | ContractType::Futures => {
                Self::margined_ledger(contract, inception_price, series, params)
            }
        }
    }

    /// Uncleared forward: MTM accrues against the fixed inception price,
    /// cash moves once, at maturity.
    fn forward_ledger(
        inception_price: Decimal,
        series: &PriceSeries,
        params: &SimulationParameters,
    ) -> DailyLedger {
        let size = Decimal::from(params.contract_size());
        let mut rows: Vec<DailyLedgerRow> = series
            .points()
            .iter()
            .map(|point| {
                let mtm = (point.spot - inception_price) * size;
                DailyLedgerRow {
                    day: point.day,
                    spot: point.spot,
                    reference_price: inception_price,
                    daily_pnl: mtm,
                    margin_balance: Decimal::ZERO,
                    cash_flow: Decimal::ZERO,
                    margin_call: false,
                }
            })
            .collect();

        if let Some(last) = rows.last_mut() {
            last.cash_flow = last.daily_pnl;
        }

        DailyLedger::new(
            ContractType::Forward,
            inception_price,
            params.contract_size(),
            rows,
        )
    }

    /// Daily-settled, margined roll-forward shared by the cleared OTC
    /// and futures variants.
    fn margined_ledger(
        contract: ContractType,
        inception_price: Decimal,
        series: &PriceSeries,
        params: &SimulationParameters,
    ) -> Result<DailyLedger, SimulationError> {
        if series.is_empty() {
            return Err(SimulationError::EmptySeries);
        }

        let size = Decimal::from(params.contract_size());
        let mut rows = Vec::with_capacity(series.len());
        let mut reference = inception_price;
        let mut balance = params.initial_margin();

        for point in series.points() {
            let pnl = (point.spot - reference) * size;
            balance += pnl;

            let (cash_flow, margin_call) = if balance < params.maintenance_margin() {
                let top_up = params.initial_margin() - balance;
                debug!(
                    "margin call on day {}: balance {} below maintenance {}, top-up {}",
                    point.day,
                    balance,
                    params.maintenance_margin(),
                    top_up
                );
                balance = params.initial_margin();
                (top_up, true)
            } else {
                (pnl, false)
            };

            rows.push(DailyLedgerRow {
                day: point.day,
                spot: point.spot,
                reference_price: reference,
                daily_pnl: pnl,
                margin_balance: balance,
                cash_flow,
                margin_call,
            });
            reference = point.spot;
        }

        Ok(DailyLedger::new(
            contract,
            inception_price,
            params.contract_size(),
            rows,
        ))
    }
}
