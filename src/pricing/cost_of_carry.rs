//! Cost-of-carry pricing for a futures contract at inception.

/// Theoretical fair futures price at contract inception.
///
/// `F0 = (spot - pv_income + pv_costs) * (1 + rate)^time_to_maturity`
///
/// `pv_income` is the present value of income thrown off by the
/// underlying over the contract's life; `pv_costs` the present value of
/// carrying costs.
///
/// Unit contract: `time_to_maturity` must be expressed in the same
/// period as `rate`. A daily rate takes a maturity in days, an annual
/// rate a maturity in years; this function never rescales.
///
/// # Examples
///
/// ```
/// use margin_sim::pricing::cost_of_carry::futures_inception_price;
///
/// let f0 = futures_inception_price(100.0, 0.05, 1.0, 0.0, 0.0);
/// assert!((f0 - 105.0).abs() < 1e-12);
/// ```
pub fn futures_inception_price(
    spot: f64,
    rate: f64,
    time_to_maturity: f64,
    pv_income: f64,
    pv_costs: f64,
) -> f64 {
    (spot - pv_income + pv_costs) * (1.0 + rate).powf(time_to_maturity)
}
