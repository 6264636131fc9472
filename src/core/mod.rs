//! Foundational types: simulation parameters, price series, daily ledger.

pub mod ledger;
pub mod params;
pub mod series;
