use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors arising from simulation parameter validation.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("initial spot price must be positive and finite, got {0}")]
    NonPositiveSpot(f64),
    #[error("volatility must be non-negative and finite, got {0}")]
    InvalidVolatility(f64),
    #[error("risk-free rate must be non-negative and finite, got {0}")]
    InvalidRate(f64),
    #[error("days to maturity must be at least 1")]
    ZeroDays,
    #[error("{kind} margin must be non-negative, got {value}")]
    NegativeMargin { kind: &'static str, value: Decimal },
    #[error("maintenance margin {maintenance} exceeds initial margin {initial}")]
    MaintenanceExceedsInitial {
        maintenance: Decimal,
        initial: Decimal,
    },
}

/// Configuration for one simulation run.
///
/// Validated once at construction and then passed by reference to every
/// engine call — there is no ambient session state anywhere in the crate.
/// Rates and volatility are daily quantities: `volatility` is the standard
/// deviation of the daily log-return shock and `risk_free_rate` the daily
/// compounding rate.
///
/// # Examples
///
/// ```
/// use margin_sim::core::params::SimulationParameters;
/// use rust_decimal_macros::dec;
///
/// let params = SimulationParameters::new(
///     100.0,      // initial spot
///     0.01,       // daily volatility
///     20,         // days to maturity
///     0.0001,     // daily risk-free rate
///     100,        // contract size
///     dec!(1000), // initial margin
///     dec!(800),  // maintenance margin
/// )
/// .unwrap();
///
/// assert_eq!(params.days_to_maturity(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Spot price of the underlying at inception. Must be positive.
    initial_spot: f64,
    /// Daily standard deviation of the log-return shock.
    volatility: f64,
    /// Length of the simulation horizon in days.
    days_to_maturity: u32,
    /// Daily risk-free rate used for drift and compounding.
    risk_free_rate: f64,
    /// Units of the underlying per contract.
    contract_size: u32,
    /// Collateral posted when the position is opened.
    initial_margin: Decimal,
    /// Balance floor below which a margin call fires.
    maintenance_margin: Decimal,
}

impl SimulationParameters {
    /// Create a validated parameter set.
    pub fn new(
        initial_spot: f64,
        volatility: f64,
        days_to_maturity: u32,
        risk_free_rate: f64,
        contract_size: u32,
        initial_margin: Decimal,
        maintenance_margin: Decimal,
    ) -> Result<Self, ParameterError> {
        if !initial_spot.is_finite() || initial_spot <= 0.0 {
            return Err(ParameterError::NonPositiveSpot(initial_spot));
        }
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(ParameterError::InvalidVolatility(volatility));
        }
        if !risk_free_rate.is_finite() || risk_free_rate < 0.0 {
            return Err(ParameterError::InvalidRate(risk_free_rate));
        }
        if days_to_maturity == 0 {
            return Err(ParameterError::ZeroDays);
        }
        if initial_margin < Decimal::ZERO {
            return Err(ParameterError::NegativeMargin {
                kind: "initial",
                value: initial_margin,
            });
        }
        if maintenance_margin < Decimal::ZERO {
            return Err(ParameterError::NegativeMargin {
                kind: "maintenance",
                value: maintenance_margin,
            });
        }
        // The post-call floor invariant (balance >= maintenance after a
        // reset to the initial margin) requires maintenance <= initial.
        if maintenance_margin > initial_margin {
            return Err(ParameterError::MaintenanceExceedsInitial {
                maintenance: maintenance_margin,
                initial: initial_margin,
            });
        }
        Ok(Self {
            initial_spot,
            volatility,
            days_to_maturity,
            risk_free_rate,
            contract_size,
            initial_margin,
            maintenance_margin,
        })
    }

    // --- Accessors ---

    pub fn initial_spot(&self) -> f64 {
        self.initial_spot
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn days_to_maturity(&self) -> u32 {
        self.days_to_maturity
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn contract_size(&self) -> u32 {
        self.contract_size
    }

    pub fn initial_margin(&self) -> Decimal {
        self.initial_margin
    }

    pub fn maintenance_margin(&self) -> Decimal {
        self.maintenance_margin
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_spot: 100.0,
            volatility: 0.01,
            days_to_maturity: 20,
            risk_free_rate: 0.0001,
            contract_size: 100,
            initial_margin: dec!(1000),
            maintenance_margin: dec!(800),
        }
    }
}

/// Error for an unrecognized contract-type label.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown contract type '{0}'; expected one of: Non-Centrally Cleared OTC, Centrally Cleared OTC, Exchange-Traded Futures")]
pub struct UnknownContractType(pub String);

/// The three contract variants the engine can simulate.
///
/// The `Display` labels match the scenario names shown to end users;
/// `FromStr` accepts those labels as well as short aliases
/// (`forward`, `cleared-otc`, `futures`) and rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    /// Uncleared bilateral forward: no margin account, a single cash
    /// settlement at maturity.
    Forward,
    /// OTC contract interposed through a central counterparty: daily
    /// settled and margined.
    ClearedOtc,
    /// Exchange-traded futures: daily settled and margined.
    Futures,
}

impl ContractType {
    pub const ALL: [ContractType; 3] =
        [ContractType::Forward, ContractType::ClearedOtc, ContractType::Futures];

    /// The user-facing scenario label.
    pub fn label(&self) -> &'static str {
        match self {
            ContractType::Forward => "Non-Centrally Cleared OTC",
            ContractType::ClearedOtc => "Centrally Cleared OTC",
            ContractType::Futures => "Exchange-Traded Futures",
        }
    }

    /// Whether this variant tracks a margin account.
    pub fn is_margined(&self) -> bool {
        !matches!(self, ContractType::Forward)
    }

    /// Qualitative counterparty credit risk for this variant.
    ///
    /// An uncleared forward carries the full bilateral exposure until
    /// maturity; both cleared variants are margined daily through a
    /// central counterparty.
    ///
    /// # Examples
    ///
    /// ```
    /// use margin_sim::core::params::{ContractType, CreditRisk};
    ///
    /// assert_eq!(ContractType::Forward.credit_risk(), CreditRisk::High);
    /// assert_eq!(ContractType::Futures.credit_risk(), CreditRisk::Low);
    /// ```
    pub fn credit_risk(&self) -> CreditRisk {
        match self {
            ContractType::Forward => CreditRisk::High,
            ContractType::ClearedOtc | ContractType::Futures => CreditRisk::Low,
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ContractType {
    type Err = UnknownContractType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "non-centrally cleared otc" | "forward" => Ok(ContractType::Forward),
            "centrally cleared otc" | "cleared-otc" | "cleared_otc" => Ok(ContractType::ClearedOtc),
            "exchange-traded futures" | "futures" => Ok(ContractType::Futures),
            _ => Err(UnknownContractType(s.to_string())),
        }
    }
}

/// Qualitative counterparty credit risk indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditRisk {
    High,
    Low,
}

impl fmt::Display for CreditRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreditRisk::High => write!(f, "High"),
            CreditRisk::Low => write!(f, "Low"),
        }
    }
}
