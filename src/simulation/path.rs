//! Synthetic daily spot-price paths.
//!
//! Prices follow a geometric random walk: each day's log-return is the
//! risk-neutral drift `r - sigma^2 / 2` plus a `N(0, sigma)` shock. The
//! recursion runs in `f64` and each price is quantized into the exact
//! decimal domain on the way out.

use crate::core::params::SimulationParameters;
use crate::core::series::{quantize_price, PriceSeries, MIN_PRICE};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Generate a daily spot-price path of `days_to_maturity + 1` prices,
/// indexed `0..=days_to_maturity`, starting at `initial_spot`.
///
/// The random source is injected so callers control determinism;
/// concurrent runs must each use an independent RNG instance. With zero
/// volatility the path degenerates to the deterministic drift-only path
/// (constant when the rate is also zero).
///
/// Prices are floored at one price tick: the geometric process cannot
/// reach zero analytically, but extreme volatility can underflow the
/// floating-point recursion.
pub fn generate_spot_path<R: Rng + ?Sized>(
    params: &SimulationParameters,
    rng: &mut R,
) -> PriceSeries {
    let volatility = params.volatility();
    let drift = params.risk_free_rate() - 0.5 * volatility * volatility;

    let mut prices = Vec::with_capacity(params.days_to_maturity() as usize + 1);
    let mut price = params.initial_spot();
    prices.push(price);
    for _ in 0..params.days_to_maturity() {
        let shock: f64 = rng.sample::<f64, _>(StandardNormal) * volatility;
        price = (price * (drift + shock).exp()).max(f64::MIN_POSITIVE);
        prices.push(price);
    }
    debug!(
        "generated {}-day spot path from {} (final spot {})",
        params.days_to_maturity(),
        params.initial_spot(),
        price
    );

    PriceSeries::from_spots(prices.into_iter().map(|p| quantize_price(p).max(MIN_PRICE)))
}

/// Convenience wrapper: generate a path from a fixed seed.
///
/// Two calls with equal parameters and equal seeds produce identical
/// series, which is what caller-side memoization must key on.
pub fn generate_spot_path_with_seed(params: &SimulationParameters, seed: u64) -> PriceSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_spot_path(params, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn params(volatility: f64, days: u32, rate: f64) -> SimulationParameters {
        SimulationParameters::new(100.0, volatility, days, rate, 100, dec!(1000), dec!(800))
            .unwrap()
    }

    #[test]
    fn test_path_length_and_day_indices() {
        let series = generate_spot_path_with_seed(&params(0.01, 30, 0.0001), 7);
        assert_eq!(series.len(), 31);
        for (i, point) in series.points().iter().enumerate() {
            assert_eq!(point.day, i as u32);
        }
    }

    #[test]
    fn test_all_prices_positive() {
        let series = generate_spot_path_with_seed(&params(0.05, 365, 0.0001), 42);
        assert!(series.spots().all(|s| s > Decimal::ZERO));
    }

    #[test]
    fn test_zero_volatility_zero_rate_is_constant() {
        let series = generate_spot_path_with_seed(&params(0.0, 30, 0.0), 1);
        assert!(series.spots().all(|s| s == dec!(100)));
    }

    #[test]
    fn test_zero_volatility_follows_drift() {
        // With no shock each step multiplies by exp(rate).
        let rate = 0.001;
        let series = generate_spot_path_with_seed(&params(0.0, 10, rate), 1);
        let expected_final = quantize_price(100.0 * (rate * 10.0).exp());
        assert_eq!(series.last().unwrap().spot, expected_final);
    }

    #[test]
    fn test_same_seed_same_path() {
        let p = params(0.02, 60, 0.0001);
        assert_eq!(
            generate_spot_path_with_seed(&p, 99),
            generate_spot_path_with_seed(&p, 99)
        );
    }

    #[test]
    fn test_different_seeds_diverge() {
        let p = params(0.02, 60, 0.0001);
        assert_ne!(
            generate_spot_path_with_seed(&p, 1),
            generate_spot_path_with_seed(&p, 2)
        );
    }

    #[test]
    fn test_generated_path_survives_validation() {
        let series = generate_spot_path_with_seed(&params(0.01, 20, 0.0001), 5);
        let validated = series.to_raw().validate().unwrap();
        assert_eq!(series, validated);
    }
}
