//! Descriptive statistics over time series and voxel samples.
//!
//! Note: `percentile` reorders the input slice.

use ndarray::ArrayView1;

pub fn mean(values: ArrayView1<'_, f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0;
    for v in values.iter() {
        sum += *v;
    }
    sum / values.len() as f64
}

/// Population standard deviation (ddof = 0), two-pass.
pub fn std_dev(values: ArrayView1<'_, f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let mut acc = 0.0;
    for v in values.iter() {
        let d = *v - m;
        acc += d * d;
    }
    (acc / values.len() as f64).sqrt()
}

/// Ratio with the zero-division policy of the SNR maps: x/0 and 0/0 give 0.
pub fn safe_div(num: f64, denom: f64) -> f64 {
    if denom == 0.0 {
        return 0.0;
    }
    let q = num / denom;
    if q.is_finite() { q } else { 0.0 }
}

/// Percentile `q` in [0, 100] with linear interpolation between closest ranks.
pub fn percentile(values: &mut [f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    let pos = (q.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(values[lo] + (values[hi] - values[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayView1;

    #[test]
    fn std_dev_is_population() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(ArrayView1::from(&v[..])) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_has_exact_zero_std() {
        let v = [100.0; 50];
        assert_eq!(mean(ArrayView1::from(&v[..])), 100.0);
        assert_eq!(std_dev(ArrayView1::from(&v[..])), 0.0);
    }
}
