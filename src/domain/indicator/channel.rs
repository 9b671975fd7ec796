//! Donchian breakout channel.
//!
//! CHANNEL(n)[i] = (max(H[i-n+1..=i]), min(L[i-n+1..=i]))
//! Warmup: first (n-1) steps are undefined.

use crate::domain::indicator::Channel;
use crate::domain::price::PricePoint;

pub fn donchian(points: &[PricePoint], period: usize) -> Vec<Option<Channel>> {
    let mut values = Vec::with_capacity(points.len());
    if period == 0 {
        values.resize(points.len(), None);
        return values;
    }
    let warmup = period - 1;

    for i in 0..points.len() {
        if i < warmup {
            values.push(None);
            continue;
        }

        let window = &points[i + 1 - period..=i];
        let high = window.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
        let low = window.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
        values.push(Some(Channel { high, low }));
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_points(highs: &[f64], lows: &[f64]) -> Vec<PricePoint> {
        highs
            .iter()
            .zip(lows)
            .enumerate()
            .map(|(i, (&high, &low))| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                high,
                low,
                close: (high + low) / 2.0,
            })
            .collect()
    }

    #[test]
    fn channel_warmup() {
        let points = make_points(&[5.0, 6.0, 7.0, 8.0], &[1.0, 2.0, 3.0, 4.0]);
        let ch = donchian(&points, 3);

        assert!(ch[0].is_none());
        assert!(ch[1].is_none());
        assert!(ch[2].is_some());
        assert!(ch[3].is_some());
    }

    #[test]
    fn channel_tracks_trailing_extremes() {
        let points = make_points(&[5.0, 9.0, 7.0, 6.0, 4.0], &[3.0, 1.0, 4.0, 5.0, 2.0]);
        let ch = donchian(&points, 3);

        // window [0..=2]: highs 5,9,7 lows 3,1,4
        assert_eq!(ch[2], Some(Channel { high: 9.0, low: 1.0 }));
        // window [1..=3]: highs 9,7,6 lows 1,4,5
        assert_eq!(ch[3], Some(Channel { high: 9.0, low: 1.0 }));
        // window [2..=4]: highs 7,6,4 lows 4,5,2
        assert_eq!(ch[4], Some(Channel { high: 7.0, low: 2.0 }));
    }

    #[test]
    fn channel_includes_current_step() {
        let points = make_points(&[5.0, 5.0, 12.0], &[4.0, 4.0, 3.0]);
        let ch = donchian(&points, 2);
        assert_eq!(ch[2], Some(Channel { high: 12.0, low: 3.0 }));
    }

    #[test]
    fn period_longer_than_series() {
        let points = make_points(&[5.0, 6.0], &[4.0, 5.0]);
        let ch = donchian(&points, 5);
        assert_eq!(ch.len(), 2);
        assert!(ch.iter().all(Option::is_none));
    }

    #[test]
    fn zero_period_is_undefined() {
        let points = make_points(&[5.0, 6.0], &[4.0, 5.0]);
        assert!(donchian(&points, 0).iter().all(Option::is_none));
    }
}
