//! True range and Average True Range.
//!
//! TR[i] = max(H[i]-L[i], |H[i]-C[i-1]|, |L[i]-C[i-1]|), undefined at step 0.
//! ATR(n)[i] = mean(TR[i-n+1..=i]), defined once n true ranges exist (i >= n).

use crate::domain::price::PricePoint;

pub fn true_range(points: &[PricePoint]) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(points.len());
    if !points.is_empty() {
        values.push(None);
    }
    values.extend(points.windows(2).map(|w| Some(w[1].true_range(w[0].close))));
    values
}

pub fn rolling_atr(true_range: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(true_range.len());

    for i in 0..true_range.len() {
        if period == 0 || i + 1 < period {
            values.push(None);
            continue;
        }

        let window = &true_range[i + 1 - period..=i];
        let sum: Option<f64> = window.iter().copied().sum();
        values.push(sum.map(|s| s / period as f64));
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_point(day: u32, high: f64, low: f64, close: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            high,
            low,
            close,
        }
    }

    #[test]
    fn true_range_undefined_at_first_step() {
        let points = vec![
            make_point(1, 110.0, 100.0, 105.0),
            make_point(2, 130.0, 120.0, 125.0),
            make_point(3, 120.0, 110.0, 115.0),
        ];
        let tr = true_range(&points);

        assert_eq!(tr[0], None);
        // gap up: |130 - 105| = 25
        assert_eq!(tr[1], Some(25.0));
        // gap down: |110 - 125| = 15
        assert_eq!(tr[2], Some(15.0));
    }

    #[test]
    fn true_range_empty() {
        assert!(true_range(&[]).is_empty());
    }

    #[test]
    fn atr_waits_for_full_window_of_true_ranges() {
        let points: Vec<PricePoint> = (1..=6)
            .map(|d| make_point(d, 110.0, 90.0, 100.0))
            .collect();
        let atr = rolling_atr(&true_range(&points), 3);

        assert_eq!(atr[0], None);
        assert_eq!(atr[1], None);
        // window [0..=2] contains the undefined first true range
        assert_eq!(atr[2], None);
        assert!(atr[3..].iter().all(Option::is_some));
    }

    #[test]
    fn atr_is_simple_mean() {
        let tr = vec![None, Some(2.0), Some(4.0), Some(6.0), Some(10.0)];
        let atr = rolling_atr(&tr, 3);

        assert_relative_eq!(atr[3].unwrap(), 4.0);
        assert_relative_eq!(atr[4].unwrap(), 20.0 / 3.0);
    }

    #[test]
    fn atr_zero_period() {
        let tr = vec![None, Some(2.0)];
        assert!(rolling_atr(&tr, 0).iter().all(Option::is_none));
    }
}
