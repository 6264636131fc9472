use margin_sim::core::ledger::DailyLedger;
use margin_sim::core::params::{ContractType, CreditRisk, SimulationParameters};
use margin_sim::core::series::{quantize_price, PriceSeries, RawSeries, SeriesError};
use margin_sim::pricing::cost_of_carry::futures_inception_price;
use margin_sim::simulation::margin::MarginEngine;
use margin_sim::simulation::path::generate_spot_path_with_seed;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Full pipeline test: parameters → path → validation → pricing →
/// all three contract ledgers.
#[test]
fn full_pipeline_all_contract_types() {
    let params =
        SimulationParameters::new(100.0, 0.015, 60, 0.0001, 100, dec!(1000), dec!(800)).unwrap();

    // Generate and validate the path
    let series = generate_spot_path_with_seed(&params, 42);
    assert_eq!(series.len(), 61);
    let validated = series.to_raw().validate().unwrap();
    assert_eq!(series, validated);

    // Inception pricing: daily rate, maturity in days
    let theoretical = futures_inception_price(
        params.initial_spot(),
        params.risk_free_rate(),
        f64::from(params.days_to_maturity()),
        0.0,
        0.0,
    );
    assert!(theoretical > params.initial_spot());

    let inception = quantize_price(params.initial_spot());

    // Simulate all three variants over the same path
    for contract in ContractType::ALL {
        let ledger = MarginEngine::simulate(contract, inception, &series, &params).unwrap();
        assert_eq!(ledger.len(), series.len());
        assert_eq!(ledger.contract(), contract);

        if contract.is_margined() {
            // Finalized balances never sit below maintenance
            assert!(ledger
                .rows()
                .iter()
                .all(|r| r.margin_balance >= params.maintenance_margin()));
            // Daily P&L telescopes to the final MTM
            assert_eq!(ledger.cumulative_pnl(), ledger.final_mtm());
        } else {
            // Forward: one settlement, at maturity
            let rows = ledger.rows();
            assert!(rows[..rows.len() - 1]
                .iter()
                .all(|r| r.cash_flow == Decimal::ZERO));
            assert_eq!(rows[rows.len() - 1].cash_flow, ledger.final_mtm());
            assert_eq!(ledger.margin_call_count(), 0);
        }
    }
}

/// A series file in the documented JSON schema goes through validation
/// and straight into the engine.
#[test]
fn json_series_replay() {
    let raw: RawSeries = serde_json::from_str(
        r#"{ "day": [0, 1, 2, 3], "spot_price": [100.0, 96.5, 93.25, 97.0] }"#,
    )
    .unwrap();
    let series = raw.validate().unwrap();

    let params =
        SimulationParameters::new(100.0, 0.01, 3, 0.0001, 10, dec!(100), dec!(80)).unwrap();
    let ledger =
        MarginEngine::simulate(ContractType::ClearedOtc, dec!(100), &series, &params).unwrap();

    // Day 1 loses 35 on a 100 margin: call fires, balance resets
    assert!(ledger.rows()[1].margin_call);
    assert_eq!(ledger.rows()[1].margin_balance, dec!(100));
    assert_eq!(ledger.len(), 4);
}

/// Malformed documents are rejected with the specific failure kind.
#[test]
fn json_series_failures_are_specific() {
    let missing_column: RawSeries =
        serde_json::from_str(r#"{ "spot_price": [100.0] }"#).unwrap();
    assert_eq!(
        missing_column.validate().unwrap_err(),
        SeriesError::MissingColumn("day")
    );

    let null_price: RawSeries =
        serde_json::from_str(r#"{ "day": [0, 1], "spot_price": [100.0, null] }"#).unwrap();
    assert_eq!(null_price.validate().unwrap_err(), SeriesError::MissingPrice(1));

    let fractional_day: RawSeries =
        serde_json::from_str(r#"{ "day": [0, 1.5], "spot_price": [100.0, 101.0] }"#).unwrap();
    assert!(matches!(
        fractional_day.validate().unwrap_err(),
        SeriesError::NonIntegralDay { row: 1, .. }
    ));
}

/// Ledger JSON round-trips losslessly.
#[test]
fn ledger_json_round_trip() {
    let params =
        SimulationParameters::new(100.0, 0.02, 20, 0.0001, 100, dec!(1000), dec!(800)).unwrap();
    let series = generate_spot_path_with_seed(&params, 7);
    let ledger =
        MarginEngine::simulate(ContractType::Futures, dec!(100), &series, &params).unwrap();

    let json = serde_json::to_string_pretty(&ledger).unwrap();
    let back: DailyLedger = serde_json::from_str(&json).unwrap();
    assert_eq!(ledger, back);
}

/// The same seed reproduces the same ledger end to end — the property a
/// caller-side memoization layer depends on.
#[test]
fn seeded_runs_are_reproducible() {
    let params = SimulationParameters::default();
    let inception = quantize_price(params.initial_spot());

    let first = MarginEngine::simulate(
        ContractType::Futures,
        inception,
        &generate_spot_path_with_seed(&params, 99),
        &params,
    )
    .unwrap();
    let second = MarginEngine::simulate(
        ContractType::Futures,
        inception,
        &generate_spot_path_with_seed(&params, 99),
        &params,
    )
    .unwrap();
    assert_eq!(first, second);
}

/// Credit risk is a pure function of the contract type.
#[test]
fn credit_risk_by_contract_type() {
    assert_eq!(ContractType::Forward.credit_risk(), CreditRisk::High);
    assert_eq!(ContractType::ClearedOtc.credit_risk(), CreditRisk::Low);
    assert_eq!(ContractType::Futures.credit_risk(), CreditRisk::Low);
    assert!("Bilateral Swap".parse::<ContractType>().is_err());
}

/// An externally numbered series (days from 1) is accepted and its day
/// labels are carried through to the ledger.
#[test]
fn external_day_numbering_is_preserved() {
    let series: PriceSeries = serde_json::from_str::<RawSeries>(
        r#"{ "day": [1, 2, 3], "spot_price": [100.0, 101.0, 102.0] }"#,
    )
    .unwrap()
    .validate()
    .unwrap();

    let params =
        SimulationParameters::new(100.0, 0.01, 2, 0.0001, 1, dec!(10), dec!(5)).unwrap();
    let ledger =
        MarginEngine::simulate(ContractType::Futures, dec!(100), &series, &params).unwrap();

    let days: Vec<u32> = ledger.rows().iter().map(|r| r.day).collect();
    assert_eq!(days, vec![1, 2, 3]);
}
