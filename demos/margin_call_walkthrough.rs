//! Margin-call anatomy on a fixed price path.
//!
//! Walks a small futures position through a drawdown deep enough to
//! breach the maintenance margin, showing the top-up and reset day by day.

use margin_sim::core::params::{ContractType, SimulationParameters};
use margin_sim::core::series::PriceSeries;
use margin_sim::simulation::margin::MarginEngine;
use rust_decimal_macros::dec;

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  margin-sim: Margin Call Walkthrough       ║");
    println!("╚════════════════════════════════════════════╝\n");

    // 100 units, $1,000 initial margin, $800 maintenance margin.
    let params =
        SimulationParameters::new(100.0, 0.01, 6, 0.0001, 100, dec!(1000), dec!(800)).unwrap();

    // Hand-picked path: day 2 drops hard enough to trigger a call,
    // day 5 recovers most of the loss.
    let series = PriceSeries::from_spots([
        dec!(100),
        dec!(98),
        dec!(95),
        dec!(97),
        dec!(96),
        dec!(99),
        dec!(101),
    ]);

    let ledger =
        MarginEngine::simulate(ContractType::Futures, dec!(100), &series, &params).unwrap();

    println!("━━━ Day-by-Day Ledger ━━━\n");
    println!(
        "{:>4} {:>8} {:>10} {:>11} {:>12} {:>11}  {}",
        "Day", "Spot", "Reference", "Daily PnL", "Margin Bal", "Cash Flow", "Event"
    );
    for row in ledger.rows() {
        println!(
            "{:>4} {:>8} {:>10} {:>11} {:>12} {:>11}  {}",
            row.day,
            row.spot,
            row.reference_price,
            row.daily_pnl,
            row.margin_balance,
            row.cash_flow,
            if row.margin_call {
                "MARGIN CALL — topped up to initial margin"
            } else {
                ""
            }
        );
    }

    println!("\n━━━ Summary ━━━\n");
    println!("{}", ledger);

    println!("On a margin-call day the cash flow is the collateral top-up");
    println!("(initial margin minus the breached balance), and the balance");
    println!("restarts at the initial margin — never below maintenance.");
}
