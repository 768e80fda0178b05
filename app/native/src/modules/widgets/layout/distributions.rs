//! Width distribution helpers for the pinned strip.
//!
//! Split resizers between N pinned widgets are fed N-1 cumulative
//! percentages. These helpers convert between per-widget widths and those
//! cumulative resizer positions.

use crate::constants::TOTAL_WIDTH_PERCENT;
use crate::error::LayoutError;

/// Normalizes explicit widths into percentages that sum to 100.
///
/// Widgets without an explicit width get an equal share (`100 / N`) before
/// normalization. If every width is zero the strip is split evenly.
///
/// # Arguments
///
/// * `explicit` - Explicit width per widget, in strip order
///
/// # Returns
///
/// One percentage per widget, in strip order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn normalized_widths(explicit: &[Option<u32>]) -> Vec<f64> {
    if explicit.is_empty() {
        return Vec::new();
    }

    let equal_share = TOTAL_WIDTH_PERCENT / explicit.len() as f64;
    let raw: Vec<f64> = explicit
        .iter()
        .map(|w| w.map_or(equal_share, f64::from))
        .collect();
    let total: f64 = raw.iter().sum();

    if total <= 0.0 {
        return vec![equal_share; explicit.len()];
    }

    raw.iter().map(|w| w / total * TOTAL_WIDTH_PERCENT).collect()
}

/// Formats cumulative resizer positions for the given widths.
///
/// Returns N-1 strings like `"33.3%"`, or nothing for fewer than 2 widths.
#[must_use]
pub fn cumulative_distributions(widths: &[f64]) -> Vec<String> {
    if widths.len() < 2 {
        return Vec::new();
    }

    widths[..widths.len() - 1]
        .iter()
        .scan(0.0, |acc, w| {
            *acc += w;
            Some(format!("{acc:.1}%"))
        })
        .collect()
}

/// Parses cumulative resizer positions back into per-widget widths.
///
/// # Arguments
///
/// * `distributions` - N-1 cumulative percentages (`"40%"`, `"72.5%"`)
/// * `count` - Number of widgets in the strip (N)
///
/// # Returns
///
/// N integer widths; the last widget receives the remainder up to 100.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidDistribution`] if the count does not match,
/// a value does not parse, leaves the 0..=100 range, or decreases.
pub fn widths_from_distributions(
    distributions: &[String],
    count: usize,
) -> Result<Vec<u32>, LayoutError> {
    if count < 2 || distributions.len() != count - 1 {
        return Err(LayoutError::InvalidDistribution(format!(
            "expected {} resizer positions for {count} widgets, got {}",
            count.saturating_sub(1),
            distributions.len()
        )));
    }

    let mut positions = Vec::with_capacity(count);
    let mut previous = 0.0;
    for raw in distributions {
        let value: f64 = raw
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse()
            .map_err(|_| LayoutError::InvalidDistribution(format!("not a percentage: {raw}")))?;

        if !value.is_finite() || !(previous..=TOTAL_WIDTH_PERCENT).contains(&value) {
            return Err(LayoutError::InvalidDistribution(format!(
                "position {raw} is out of order or outside 0-100%"
            )));
        }
        positions.push(value);
        previous = value;
    }
    positions.push(TOTAL_WIDTH_PERCENT);

    let mut last = 0.0;
    let shares: Vec<f64> = positions
        .into_iter()
        .map(|position| {
            let share = position - last;
            last = position;
            share
        })
        .collect();
    Ok(rounded_widths(&shares))
}

/// Rounds percentage shares to integer widths that sum to 100.
///
/// Every share but the last is rounded; the last widget receives the
/// remainder.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rounded_widths(shares: &[f64]) -> Vec<u32> {
    let Some((_, leading)) = shares.split_last() else {
        return Vec::new();
    };

    let mut widths: Vec<u32> = leading.iter().map(|share| share.max(0.0).round() as u32).collect();
    let used: u32 = widths.iter().sum();
    widths.push((TOTAL_WIDTH_PERCENT as u32).saturating_sub(used));
    widths
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

    #[test]
    fn test_normalized_widths_default_to_equal_shares() {
        let widths = normalized_widths(&[None, None, None]);
        assert_eq!(widths.len(), 3);
        assert!(widths.iter().all(|w| approx(*w, 100.0 / 3.0)));
    }

    #[test]
    fn test_normalized_widths_scale_explicit_values() {
        let widths = normalized_widths(&[Some(20), Some(60)]);
        assert!(approx(widths[0], 25.0));
        assert!(approx(widths[1], 75.0));
    }

    #[test]
    fn test_normalized_widths_mix_explicit_and_default() {
        // Default share is 50, so 50 + 50 → 50/50 of 100
        let widths = normalized_widths(&[Some(50), None]);
        assert!(approx(widths[0], 50.0));
        assert!(approx(widths[1], 50.0));
    }

    #[test]
    fn test_normalized_widths_all_zero_split_evenly() {
        let widths = normalized_widths(&[Some(0), Some(0)]);
        assert!(approx(widths[0], 50.0));
        assert!(approx(widths[1], 50.0));
    }

    #[test]
    fn test_cumulative_distributions_two_equal() {
        assert_eq!(cumulative_distributions(&[50.0, 50.0]), vec!["50.0%"]);
    }

    #[test]
    fn test_cumulative_distributions_three_equal() {
        let widths = normalized_widths(&[None, None, None]);
        assert_eq!(cumulative_distributions(&widths), vec!["33.3%", "66.7%"]);
    }

    #[test]
    fn test_cumulative_distributions_single_widget_is_empty() {
        assert!(cumulative_distributions(&[100.0]).is_empty());
        assert!(cumulative_distributions(&[]).is_empty());
    }

    #[test]
    fn test_widths_from_distributions() {
        let widths =
            widths_from_distributions(&["20%".to_string(), "70.0%".to_string()], 3).unwrap();
        assert_eq!(widths, vec![20, 50, 30]);
    }

    #[test]
    fn test_widths_from_distributions_sum_to_full_width() {
        let widths =
            widths_from_distributions(&["33.3%".to_string(), "66.7%".to_string()], 3).unwrap();
        assert_eq!(widths, vec![33, 33, 34]);
        assert_eq!(widths.iter().sum::<u32>(), 100);
    }

    #[test]
    fn test_rounded_widths_give_remainder_to_last() {
        assert_eq!(rounded_widths(&[58.3, 41.7]), vec![58, 42]);
        assert_eq!(rounded_widths(&[100.0 / 3.0; 3]), vec![33, 33, 34]);
        assert_eq!(rounded_widths(&[100.0]), vec![100]);
        assert!(rounded_widths(&[]).is_empty());
    }

    #[test]
    fn test_widths_from_distributions_rejects_wrong_count() {
        let err = widths_from_distributions(&["50%".to_string()], 3).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidDistribution(_)));
    }

    #[test]
    fn test_widths_from_distributions_rejects_garbage() {
        assert!(widths_from_distributions(&["wide".to_string()], 2).is_err());
        assert!(widths_from_distributions(&["120%".to_string()], 2).is_err());
        assert!(widths_from_distributions(&["60%".to_string(), "40%".to_string()], 3).is_err());
    }
}
