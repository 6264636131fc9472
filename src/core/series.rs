use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Decimal places kept when a floating-point price crosses into the
/// exact-arithmetic domain.
pub const PRICE_DECIMALS: u32 = 4;

/// Smallest representable price: one tick at [`PRICE_DECIMALS`] (0.0001).
pub const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, PRICE_DECIMALS);

/// Quantize a floating-point price to the ledger's exact representation.
///
/// Out-of-range values saturate at `Decimal::MAX`; everything downstream
/// of this function works in exact decimal arithmetic.
pub fn quantize_price(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .unwrap_or(Decimal::MAX)
        .round_dp(PRICE_DECIMALS)
}

/// Errors arising from structural validation of a raw price series.
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
    #[error("column lengths differ: {days} day values vs {prices} prices")]
    LengthMismatch { days: usize, prices: usize },
    #[error("day values must be non-negative integers, found {value} at row {row}")]
    NonIntegralDay { row: usize, value: f64 },
    #[error("duplicate day {0} in series")]
    DuplicateDay(u32),
    #[error("missing spot price for day {0}")]
    MissingPrice(u32),
    #[error("spot price for day {day} must be positive and finite, got {value}")]
    NonPositivePrice { day: u32, value: f64 },
}

/// One observation in a spot-price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub day: u32,
    pub spot: Decimal,
}

/// An ordered, validated daily spot-price series.
///
/// Construction guarantees unique day indices and positive prices; the
/// series is immutable afterwards and consumed read-only by the pricing
/// and margin components.
///
/// # Examples
///
/// ```
/// use margin_sim::core::series::PriceSeries;
/// use rust_decimal_macros::dec;
///
/// let series = PriceSeries::from_spots([dec!(100), dec!(101), dec!(99)]);
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.points()[2].day, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from spot prices, numbering days from 0.
    pub fn from_spots<I>(spots: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        Self {
            points: spots
                .into_iter()
                .enumerate()
                .map(|(day, spot)| PricePoint {
                    day: day as u32,
                    spot,
                })
                .collect(),
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Spot prices in series order.
    pub fn spots(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.points.iter().map(|p| p.spot)
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Export to the untyped columnar form, e.g. for JSON interchange.
    pub fn to_raw(&self) -> RawSeries {
        RawSeries {
            day: Some(self.points.iter().map(|p| p.day as f64).collect()),
            spot_price: Some(
                self.points
                    .iter()
                    .map(|p| Some(p.spot.to_f64().unwrap_or(0.0)))
                    .collect(),
            ),
        }
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = PricePoint>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// The untyped columnar form a series takes before validation.
///
/// Mirrors the tabular interchange schema: a `day` column and a
/// `spot_price` column, each optional so that a malformed document can be
/// diagnosed precisely rather than rejected at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSeries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_price: Option<Vec<Option<f64>>>,
}

impl RawSeries {
    /// Validate the raw series into a typed [`PriceSeries`].
    ///
    /// Checks run in a fixed order, each with its own error variant:
    /// required columns, matching column lengths, integral day values,
    /// unique days, no missing prices, positive finite prices.
    ///
    /// Validation is deterministic and side-effect free; the input is
    /// not mutated, and a valid series round-trips unchanged.
    pub fn validate(&self) -> Result<PriceSeries, SeriesError> {
        let days = self
            .day
            .as_ref()
            .ok_or(SeriesError::MissingColumn("day"))?;
        let spots = self
            .spot_price
            .as_ref()
            .ok_or(SeriesError::MissingColumn("spot_price"))?;

        if days.len() != spots.len() {
            return Err(SeriesError::LengthMismatch {
                days: days.len(),
                prices: spots.len(),
            });
        }

        let mut day_indices = Vec::with_capacity(days.len());
        for (row, &value) in days.iter().enumerate() {
            if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64
            {
                return Err(SeriesError::NonIntegralDay { row, value });
            }
            day_indices.push(value as u32);
        }

        let mut seen = HashSet::with_capacity(day_indices.len());
        for &day in &day_indices {
            if !seen.insert(day) {
                return Err(SeriesError::DuplicateDay(day));
            }
        }

        let mut points = Vec::with_capacity(day_indices.len());
        for (&day, spot) in day_indices.iter().zip(spots) {
            let value = spot.ok_or(SeriesError::MissingPrice(day))?;
            if !value.is_finite() || value <= 0.0 {
                return Err(SeriesError::NonPositivePrice { day, value });
            }
            points.push(PricePoint {
                day,
                spot: quantize_price(value),
            });
        }

        Ok(PriceSeries { points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(days: &[f64], spots: &[Option<f64>]) -> RawSeries {
        RawSeries {
            day: Some(days.to_vec()),
            spot_price: Some(spots.to_vec()),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_series() {
        let series = raw(&[1.0, 2.0, 3.0], &[Some(100.0), Some(101.0), Some(102.0)])
            .validate()
            .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.points()[0].day, 1);
        assert_eq!(series.points()[0].spot, dec!(100));
    }

    #[test]
    fn test_validate_rejects_missing_day_column() {
        let raw = RawSeries {
            day: None,
            spot_price: Some(vec![Some(100.0)]),
        };
        assert_eq!(raw.validate().unwrap_err(), SeriesError::MissingColumn("day"));
    }

    #[test]
    fn test_validate_rejects_missing_price_column() {
        let raw = RawSeries {
            day: Some(vec![0.0]),
            spot_price: None,
        };
        assert_eq!(
            raw.validate().unwrap_err(),
            SeriesError::MissingColumn("spot_price")
        );
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let err = raw(&[0.0, 1.0], &[Some(100.0)]).validate().unwrap_err();
        assert_eq!(err, SeriesError::LengthMismatch { days: 2, prices: 1 });
    }

    #[test]
    fn test_validate_rejects_fractional_day() {
        let err = raw(&[0.0, 1.5], &[Some(100.0), Some(101.0)])
            .validate()
            .unwrap_err();
        assert_eq!(err, SeriesError::NonIntegralDay { row: 1, value: 1.5 });
    }

    #[test]
    fn test_validate_rejects_duplicate_day() {
        let err = raw(
            &[1.0, 2.0, 2.0],
            &[Some(100.0), Some(101.0), Some(102.0)],
        )
        .validate()
        .unwrap_err();
        assert_eq!(err, SeriesError::DuplicateDay(2));
    }

    #[test]
    fn test_validate_rejects_missing_price() {
        let err = raw(&[0.0, 1.0, 2.0], &[Some(100.0), None, Some(102.0)])
            .validate()
            .unwrap_err();
        assert_eq!(err, SeriesError::MissingPrice(1));
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let err = raw(&[0.0, 1.0], &[Some(100.0), Some(-5.0)])
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            SeriesError::NonPositivePrice { day: 1, value: -5.0 }
        );
    }

    #[test]
    fn test_validation_is_idempotent_by_result() {
        let raw = raw(&[0.0, 1.0], &[Some(100.25), Some(101.5)]);
        let first = raw.validate().unwrap();
        let second = raw.validate().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_through_raw_form() {
        let series = PriceSeries::from_spots([dec!(100.1234), dec!(99.5), dec!(101)]);
        let round_tripped = series.to_raw().validate().unwrap();
        assert_eq!(series, round_tripped);
    }

    #[test]
    fn test_quantize_price_rounds_to_tick() {
        assert_eq!(quantize_price(100.123456), dec!(100.1235));
        assert_eq!(quantize_price(100.0), dec!(100));
    }

    #[test]
    fn test_min_price_is_one_tick() {
        assert_eq!(MIN_PRICE, dec!(0.0001));
    }
}
