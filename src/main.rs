//! margin-sim CLI
//!
//! Run derivative cash-flow and margin simulations from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Simulate an exchange-traded futures position on a seeded path
//! margin-sim simulate --contract futures --seed 42
//!
//! # Same run as JSON
//! margin-sim simulate --contract futures --seed 42 --format json
//!
//! # Replay a stored series file through the uncleared-forward rules
//! margin-sim simulate --contract forward --input series.json
//!
//! # Generate a path (feeds back into simulate --input)
//! margin-sim path --days 30 --seed 7 --format json
//!
//! # Cost-of-carry inception price
//! margin-sim price --spot 100 --rate 0.05 --ttm 1
//!
//! # Residual price-difference heatmap
//! margin-sim heatmap --correlation -0.5:0.5 --volatility 0.1:0.4
//! ```

use chrono::{DateTime, Utc};
use margin_sim::core::ledger::{DailyLedger, DailyLedgerRow};
use margin_sim::core::params::{ContractType, SimulationParameters};
use margin_sim::core::series::{quantize_price, PriceSeries, RawSeries};
use margin_sim::pricing::cost_of_carry::futures_inception_price;
use margin_sim::simulation::heatmap::{residual_heatmap, HeatmapRange, DEFAULT_GRID_SIZE};
use margin_sim::simulation::margin::MarginEngine;
use margin_sim::simulation::path::{generate_spot_path, generate_spot_path_with_seed};
use rust_decimal::Decimal;
use std::fs;
use std::process;
use uuid::Uuid;

fn print_usage() {
    eprintln!(
        r#"margin-sim — cash-flow and margin simulation for cleared and uncleared derivatives

USAGE:
    margin-sim <COMMAND> [OPTIONS]

COMMANDS:
    simulate    Roll a contract forward over a spot-price path
    path        Generate a synthetic daily spot-price path
    price       Cost-of-carry futures price at inception
    heatmap     Residual price-difference heatmap (placeholder data)
    help        Show this message

OPTIONS (simulate):
    --contract <TYPE>          forward | cleared-otc | futures (required)
    --spot <N>                 Initial spot price (default: 100)
    --days <N>                 Days to maturity (default: 20)
    --vol <X>                  Daily volatility (default: 0.01)
    --rate <X>                 Daily risk-free rate (default: 0.0001)
    --size <N>                 Contract size (default: 100)
    --initial-margin <N>       Initial margin (default: 1000)
    --maintenance-margin <N>   Maintenance margin (default: 800)
    --pv-income <X>            PV of income for the inception price (default: 0)
    --pv-costs <X>             PV of carry costs for the inception price (default: 0)
    --seed <N>                 RNG seed for a reproducible path
    --input <FILE>             Replay a JSON series file instead of generating
    --format <FORMAT>          text (default) or json

OPTIONS (path):
    --spot, --days, --vol, --rate, --seed, --format as above

OPTIONS (price):
    --spot <N>  --rate <X>  --ttm <X>  [--pv-income <X>] [--pv-costs <X>]
    (--ttm must be in the same period as --rate)

OPTIONS (heatmap):
    --correlation <MIN:MAX>    Correlation range (default: -0.5:0.5)
    --volatility <MIN:MAX>     Volatility range (default: 0.1:0.4)
    --grid <N>                 Points per axis (default: 10)
    --seed <N>, --format as above

EXAMPLES:
    margin-sim simulate --contract futures --days 60 --vol 0.02 --seed 42
    margin-sim simulate --contract forward --input series.json --format json
    margin-sim path --days 30 --seed 7 --format json > series.json
    margin-sim price --spot 100 --rate 0.0001 --ttm 20
    margin-sim heatmap --correlation 0.5:-0.5 --volatility 0.001:0.02"#
    );
}

/// JSON output schema for a full simulation run.
#[derive(serde::Serialize)]
struct SimulationReport<'a> {
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    contract: String,
    credit_risk: String,
    inception_price: Decimal,
    theoretical_futures_price: f64,
    days: usize,
    margin_calls: usize,
    cumulative_pnl: Decimal,
    total_cash_flow: Decimal,
    final_mtm: Decimal,
    rows: &'a [DailyLedgerRow],
}

fn required<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    args.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("{flag} requires a value");
        process::exit(1);
    })
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    let raw = required(args, i, flag);
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid value '{raw}' for {flag}");
        process::exit(1);
    })
}

fn parse_range(args: &[String], i: usize, flag: &str) -> HeatmapRange {
    let raw = required(args, i, flag);
    let parsed = raw.split_once(':').and_then(|(lo, hi)| {
        let lo: f64 = lo.trim().parse().ok()?;
        let hi: f64 = hi.trim().parse().ok()?;
        HeatmapRange::new(lo, hi).ok()
    });
    parsed.unwrap_or_else(|| {
        eprintln!("Invalid range '{raw}' for {flag}; expected MIN:MAX");
        process::exit(1);
    })
}

fn load_series(path: &str) -> PriceSeries {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let raw: RawSeries = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(r#"{{ "day": [0, 1, 2], "spot_price": [100.0, 101.2, 99.8] }}"#);
        process::exit(1);
    });

    raw.validate().unwrap_or_else(|e| {
        eprintln!("Invalid series: {}", e);
        process::exit(1);
    })
}

fn cmd_simulate(args: &[String]) {
    let defaults = SimulationParameters::default();
    let mut contract: Option<ContractType> = None;
    let mut spot = defaults.initial_spot();
    let mut days = defaults.days_to_maturity();
    let mut vol = defaults.volatility();
    let mut rate = defaults.risk_free_rate();
    let mut size = defaults.contract_size();
    let mut initial_margin = defaults.initial_margin();
    let mut maintenance_margin = defaults.maintenance_margin();
    let mut pv_income = 0.0f64;
    let mut pv_costs = 0.0f64;
    let mut seed: Option<u64> = None;
    let mut input: Option<String> = None;
    let mut format = "text".to_string();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--contract" => {
                i += 1;
                let raw = required(args, i, "--contract");
                contract = Some(raw.parse().unwrap_or_else(|e| {
                    eprintln!("{}", e);
                    process::exit(1);
                }));
            }
            "--spot" => {
                i += 1;
                spot = parse_value(args, i, "--spot");
            }
            "--days" => {
                i += 1;
                days = parse_value(args, i, "--days");
            }
            "--vol" => {
                i += 1;
                vol = parse_value(args, i, "--vol");
            }
            "--rate" => {
                i += 1;
                rate = parse_value(args, i, "--rate");
            }
            "--size" => {
                i += 1;
                size = parse_value(args, i, "--size");
            }
            "--initial-margin" => {
                i += 1;
                initial_margin = parse_value(args, i, "--initial-margin");
            }
            "--maintenance-margin" => {
                i += 1;
                maintenance_margin = parse_value(args, i, "--maintenance-margin");
            }
            "--pv-income" => {
                i += 1;
                pv_income = parse_value(args, i, "--pv-income");
            }
            "--pv-costs" => {
                i += 1;
                pv_costs = parse_value(args, i, "--pv-costs");
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_value(args, i, "--seed"));
            }
            "--input" => {
                i += 1;
                input = Some(required(args, i, "--input").to_string());
            }
            "--format" => {
                i += 1;
                format = required(args, i, "--format").to_string();
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let contract = contract.unwrap_or_else(|| {
        eprintln!("Error: --contract <TYPE> is required");
        process::exit(1);
    });

    let params = SimulationParameters::new(
        spot,
        vol,
        days,
        rate,
        size,
        initial_margin,
        maintenance_margin,
    )
    .unwrap_or_else(|e| {
        eprintln!("Invalid parameters: {}", e);
        process::exit(1);
    });

    let series = match &input {
        Some(path) => load_series(path),
        None => match seed {
            Some(seed) => generate_spot_path_with_seed(&params, seed),
            None => generate_spot_path(&params, &mut rand::thread_rng()),
        },
    };

    let inception_price = quantize_price(params.initial_spot());
    let theoretical = futures_inception_price(
        params.initial_spot(),
        params.risk_free_rate(),
        f64::from(params.days_to_maturity()),
        pv_income,
        pv_costs,
    );

    let ledger = MarginEngine::simulate(contract, inception_price, &series, &params)
        .unwrap_or_else(|e| {
            eprintln!("Simulation failed: {}", e);
            process::exit(1);
        });

    if format == "json" {
        let report = SimulationReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            contract: contract.to_string(),
            credit_risk: contract.credit_risk().to_string(),
            inception_price,
            theoretical_futures_price: theoretical,
            days: ledger.len(),
            margin_calls: ledger.margin_call_count(),
            cumulative_pnl: ledger.cumulative_pnl(),
            total_cash_flow: ledger.total_cash_flow(),
            final_mtm: ledger.final_mtm(),
            rows: ledger.rows(),
        };
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        println!("{}", ledger);
        println!("Credit Risk:      {}", contract.credit_risk());
        println!("Theoretical F0:   {:.4}", theoretical);
        println!();
        print_ledger_head(&ledger, 5);
    }
}

fn print_ledger_head(ledger: &DailyLedger, rows: usize) {
    println!(
        "{:>5} {:>12} {:>12} {:>12} {:>14} {:>12}  {}",
        "Day", "Spot", "Reference", "Daily PnL", "Margin Bal", "Cash Flow", "Call"
    );
    for row in ledger.rows().iter().take(rows) {
        println!(
            "{:>5} {:>12} {:>12} {:>12} {:>14} {:>12}  {}",
            row.day,
            row.spot,
            row.reference_price,
            row.daily_pnl,
            row.margin_balance,
            row.cash_flow,
            if row.margin_call { "CALL" } else { "-" }
        );
    }
    if ledger.len() > rows {
        println!("  ... {} more rows", ledger.len() - rows);
    }
}

fn cmd_path(args: &[String]) {
    let defaults = SimulationParameters::default();
    let mut spot = defaults.initial_spot();
    let mut days = defaults.days_to_maturity();
    let mut vol = defaults.volatility();
    let mut rate = defaults.risk_free_rate();
    let mut seed: Option<u64> = None;
    let mut format = "text".to_string();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--spot" => {
                i += 1;
                spot = parse_value(args, i, "--spot");
            }
            "--days" => {
                i += 1;
                days = parse_value(args, i, "--days");
            }
            "--vol" => {
                i += 1;
                vol = parse_value(args, i, "--vol");
            }
            "--rate" => {
                i += 1;
                rate = parse_value(args, i, "--rate");
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_value(args, i, "--seed"));
            }
            "--format" => {
                i += 1;
                format = required(args, i, "--format").to_string();
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let params = SimulationParameters::new(
        spot,
        vol,
        days,
        rate,
        defaults.contract_size(),
        defaults.initial_margin(),
        defaults.maintenance_margin(),
    )
    .unwrap_or_else(|e| {
        eprintln!("Invalid parameters: {}", e);
        process::exit(1);
    });

    let series = match seed {
        Some(seed) => generate_spot_path_with_seed(&params, seed),
        None => generate_spot_path(&params, &mut rand::thread_rng()),
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&series.to_raw()).unwrap());
    } else {
        println!("{:>5} {:>12}", "Day", "Spot");
        for point in series.points() {
            println!("{:>5} {:>12}", point.day, point.spot);
        }
    }
}

fn cmd_price(args: &[String]) {
    let mut spot = 100.0f64;
    let mut rate = 0.0f64;
    let mut ttm = 1.0f64;
    let mut pv_income = 0.0f64;
    let mut pv_costs = 0.0f64;
    let mut format = "text".to_string();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--spot" => {
                i += 1;
                spot = parse_value(args, i, "--spot");
            }
            "--rate" => {
                i += 1;
                rate = parse_value(args, i, "--rate");
            }
            "--ttm" => {
                i += 1;
                ttm = parse_value(args, i, "--ttm");
            }
            "--pv-income" => {
                i += 1;
                pv_income = parse_value(args, i, "--pv-income");
            }
            "--pv-costs" => {
                i += 1;
                pv_costs = parse_value(args, i, "--pv-costs");
            }
            "--format" => {
                i += 1;
                format = required(args, i, "--format").to_string();
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let f0 = futures_inception_price(spot, rate, ttm, pv_income, pv_costs);

    if format == "json" {
        #[derive(serde::Serialize)]
        struct PriceOutput {
            spot: f64,
            rate: f64,
            time_to_maturity: f64,
            pv_income: f64,
            pv_costs: f64,
            futures_price: f64,
        }
        let output = PriceOutput {
            spot,
            rate,
            time_to_maturity: ttm,
            pv_income,
            pv_costs,
            futures_price: f0,
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        println!("Futures price at inception: {:.4}", f0);
    }
}

fn cmd_heatmap(args: &[String]) {
    let mut correlation = HeatmapRange::new(-0.5, 0.5).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });
    let mut volatility = HeatmapRange::new(0.1, 0.4).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });
    let mut grid_size = DEFAULT_GRID_SIZE;
    let mut seed: Option<u64> = None;
    let mut format = "text".to_string();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--correlation" => {
                i += 1;
                correlation = parse_range(args, i, "--correlation");
            }
            "--volatility" => {
                i += 1;
                volatility = parse_range(args, i, "--volatility");
            }
            "--grid" => {
                i += 1;
                grid_size = parse_value(args, i, "--grid");
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_value(args, i, "--seed"));
            }
            "--format" => {
                i += 1;
                format = required(args, i, "--format").to_string();
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    use rand::SeedableRng;
    let grid = match seed {
        Some(seed) => residual_heatmap(
            correlation,
            volatility,
            grid_size,
            &mut rand::rngs::StdRng::seed_from_u64(seed),
        ),
        None => residual_heatmap(correlation, volatility, grid_size, &mut rand::thread_rng()),
    }
    .unwrap_or_else(|e| {
        eprintln!("Heatmap generation failed: {}", e);
        process::exit(1);
    });

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&grid).unwrap());
    } else {
        println!("Residual price differences (placeholder data)");
        print!("{:>8}", "corr\\vol");
        for vol in grid.volatility_axis() {
            print!(" {:>6.3}", vol);
        }
        println!();
        for (row, corr) in grid.cells().iter().zip(grid.correlation_axis()) {
            print!("{:>8.2}", corr);
            for cell in row {
                print!(" {:>6.3}", cell);
            }
            println!();
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "simulate" => cmd_simulate(rest),
        "path" => cmd_path(rest),
        "price" => cmd_price(rest),
        "heatmap" => cmd_heatmap(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
