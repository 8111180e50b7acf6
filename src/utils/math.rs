//! Mathematical utility functions for heuristic scoring
//!
//! Ratio helpers with proper zero-division handling.

/// Ratio of the smaller to the larger of two amounts, in `[0.0, 1.0]`
///
/// Returns 0.0 if either amount is zero.
///
/// # Examples
/// ```
/// use chain_trace::utils::math::balance_ratio;
///
/// assert_eq!(balance_ratio(100, 95), 0.95);
/// assert_eq!(balance_ratio(50, 100), 0.5);
/// assert_eq!(balance_ratio(0, 100), 0.0);  // Zero guard
/// ```
#[inline]
pub fn balance_ratio(a: u64, b: u64) -> f64 {
    if a == 0 || b == 0 {
        0.0
    } else {
        a.min(b) as f64 / a.max(b) as f64
    }
}
