//! Exponentially-weighted moving average with bias adjustment.
//!
//! Weights decay as `(1 - alpha)^k` for the value k steps back and the sum is
//! normalized by the total weight, so early values are not pulled toward zero:
//!
//! ```text
//! num[t] = x[t] + (1 - alpha) * num[t-1]
//! den[t] = 1    + (1 - alpha) * den[t-1]
//! ewm[t] = num[t] / den[t]
//! ```

/// Adjusted EWM of `values`. Defined from the first element.
///
/// A NaN input poisons every output from that index on.
pub fn ewm_mean(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    let decay = 1.0 - alpha;
    let mut num = 0.0;
    let mut den = 0.0;

    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            return result;
        }
        num = v + decay * num;
        den = 1.0 + decay * den;
        result[i] = num / den;
    }

    result
}
