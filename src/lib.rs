//! # margin-sim
//!
//! Cash-flow and margin simulation engine for cleared and uncleared
//! derivatives.
//!
//! Given a synthetic daily spot-price path, this engine rolls a contract
//! forward day by day — mark-to-market P&L, margin-account balance, and
//! realized cash flows under a margin-call policy — for three contract
//! types: uncleared forward, centrally cleared OTC, and exchange-traded
//! futures. It illustrates how central clearing changes the cash-flow and
//! counterparty-risk profile of an otherwise identical position.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: parameters, price series, daily ledger
//! - **pricing** — Cost-of-carry futures pricing at inception
//! - **simulation** — Path generation, the margin roll-forward, heatmap
//!
//! Every operation is a pure function of its explicit inputs plus an
//! injected random source; there is no global state, no I/O, and no
//! persistence inside the engine.

pub mod core;
pub mod pricing;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::ledger::{DailyLedger, DailyLedgerRow};
    pub use crate::core::params::{ContractType, CreditRisk, SimulationParameters};
    pub use crate::core::series::{PriceSeries, RawSeries};
    pub use crate::pricing::cost_of_carry::futures_inception_price;
    pub use crate::simulation::heatmap::{residual_heatmap, HeatmapGrid, HeatmapRange};
    pub use crate::simulation::margin::MarginEngine;
    pub use crate::simulation::path::{generate_spot_path, generate_spot_path_with_seed};
}
