//! Integer-cents money helpers and basis-point share math.
//!
//! Use these for **all** monetary values in the engine (nightly rates,
//! booking totals, expense amounts, allocations) to avoid floating-point
//! drift. Amounts are signed `i64` cents; ownership shares are basis points
//! (`0..=10000`, 1 bps = 0.01%).

use crate::{EngineError, ResultEngine};

/// Basis points in a whole (100.00%).
pub const BPS_SCALE: i64 = 10_000;

/// Renders integer cents as a fixed 2-decimal string (`117000` → `"1170.00"`).
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Converts a percentage (2-decimal precision) into basis points.
///
/// Rounds half away from zero, so `33.335` → `3334` and `-0.005` → `-1`.
#[must_use]
pub fn percent_to_basis_points(percent: f64) -> i64 {
    let scaled = percent * 100.0;
    if scaled < 0.0 {
        -((-scaled + 0.5).floor() as i64)
    } else {
        (scaled + 0.5).floor() as i64
    }
}

/// Converts basis points back into a percentage.
#[must_use]
pub fn basis_points_to_percent(bps: i64) -> f64 {
    bps as f64 / 100.0
}

fn rounded_portion(total: i64, share_bps: i64) -> i64 {
    let numerator = total as i128 * share_bps as i128;
    let half = BPS_SCALE as i128 / 2;
    let rounded = if numerator < 0 {
        (numerator - half) / BPS_SCALE as i128
    } else {
        (numerator + half) / BPS_SCALE as i128
    };
    rounded as i64
}

/// Splits `total` cents across `shares_bps` proportionally.
///
/// Every entry but the last gets its rounded portion
/// (`round(total * bps / 10000)`, half away from zero); the last entry gets
/// the exact remainder so the returned amounts always sum to `total`. The
/// remainder lands on the **last** share in iteration order; callers relying
/// on the split must pass shares in a stable order.
pub fn split_amount(total: i64, shares_bps: &[i64]) -> ResultEngine<Vec<i64>> {
    if shares_bps.is_empty() {
        return Err(EngineError::Validation(
            "cannot split an amount across zero shares".to_string(),
        ));
    }

    let mut out = Vec::with_capacity(shares_bps.len());
    let mut assigned: i64 = 0;
    for share_bps in &shares_bps[..shares_bps.len() - 1] {
        let portion = rounded_portion(total, *share_bps);
        assigned += portion;
        out.push(portion);
    }
    out.push(total - assigned);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_cents_fixed_two_decimals() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(1050), "10.50");
        assert_eq!(format_cents(117_000), "1170.00");
        assert_eq!(format_cents(-1050), "-10.50");
    }

    #[test]
    fn percent_round_trips_at_two_decimals() {
        assert_eq!(percent_to_basis_points(0.0), 0);
        assert_eq!(percent_to_basis_points(100.0), 10_000);
        assert_eq!(percent_to_basis_points(33.33), 3333);
        assert_eq!(percent_to_basis_points(33.335), 3334);
        assert_eq!(basis_points_to_percent(3333), 33.33);
    }

    #[test]
    fn split_three_way_sums_exactly() {
        // 100 cents at 33.33/33.33/33.34 must come back as exactly 100.
        let parts = split_amount(100, &[3333, 3333, 3334]).unwrap();
        assert_eq!(parts.iter().sum::<i64>(), 100);
        assert_eq!(parts, vec![33, 33, 34]);
    }

    #[test]
    fn split_remainder_lands_on_last_share() {
        let parts = split_amount(101, &[5000, 5000]).unwrap();
        // First share rounds to 51, so the last absorbs the -1 drift.
        assert_eq!(parts, vec![51, 50]);
        assert_eq!(parts.iter().sum::<i64>(), 101);
    }

    #[test]
    fn split_single_share_takes_everything() {
        assert_eq!(split_amount(99, &[10_000]).unwrap(), vec![99]);
    }

    #[test]
    fn split_rejects_empty_shares() {
        assert!(split_amount(100, &[]).is_err());
    }

    #[test]
    fn split_handles_zero_share_entries() {
        let parts = split_amount(100, &[0, 10_000]).unwrap();
        assert_eq!(parts, vec![0, 100]);
    }
}
