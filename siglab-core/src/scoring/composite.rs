//! Composite scorer — weighted fusion of the category scores.

use crate::config::CategoryWeights;
use crate::scoring::{Category, CategoryScores};

/// Weighted sum over the defined categories, re-normalized by the weight
/// mass of those categories.
///
/// Weights are validated to sum to 1.0 at configuration load; at scoring
/// time an undefined category's weight is redistributed proportionally among
/// the defined ones, so missing data never drags the composite toward
/// either end of the scale. Returns `None` when no category is defined (or
/// every defined category carries zero weight).
pub fn composite(scores: &CategoryScores, weights: &CategoryWeights) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut weight_mass = 0.0;
    for category in Category::all() {
        if let Some(score) = scores.get(category) {
            let w = weights.get(category);
            weighted_sum += w * score;
            weight_mass += w;
        }
    }
    if weight_mass == 0.0 {
        return None;
    }
    Some((weighted_sum / weight_mass).clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights() -> CategoryWeights {
        CategoryWeights {
            trend: 0.3,
            oscillators: 0.3,
            volume: 0.2,
            sentiment: 0.2,
        }
    }

    #[test]
    fn all_defined_is_plain_weighted_sum() {
        let scores = CategoryScores {
            trend: Some(70.0),
            oscillators: Some(60.0),
            volume: Some(50.0),
            sentiment: Some(40.0),
        };
        // 0.3*70 + 0.3*60 + 0.2*50 + 0.2*40 = 57
        let c = composite(&scores, &weights()).unwrap();
        assert!((c - 57.0).abs() < 1e-12);
    }

    #[test]
    fn missing_category_weight_is_redistributed() {
        let scores = CategoryScores {
            trend: Some(80.0),
            oscillators: Some(80.0),
            volume: None,
            sentiment: None,
        };
        // Defined mass 0.6 → (0.3*80 + 0.3*80) / 0.6 = 80, not diluted to 48.
        let c = composite(&scores, &weights()).unwrap();
        assert!((c - 80.0).abs() < 1e-12);
    }

    #[test]
    fn all_undefined_yields_none() {
        let scores = CategoryScores::default();
        assert_eq!(composite(&scores, &weights()), None);
    }

    #[test]
    fn single_category_carries_through() {
        let scores = CategoryScores {
            trend: None,
            oscillators: None,
            volume: Some(33.0),
            sentiment: None,
        };
        let c = composite(&scores, &weights()).unwrap();
        assert!((c - 33.0).abs() < 1e-12);
    }

    #[test]
    fn bounds_hold_for_extreme_scores() {
        let scores = CategoryScores {
            trend: Some(100.0),
            oscillators: Some(100.0),
            volume: Some(100.0),
            sentiment: Some(100.0),
        };
        assert_eq!(composite(&scores, &weights()), Some(100.0));

        let scores = CategoryScores {
            trend: Some(0.0),
            oscillators: Some(0.0),
            volume: Some(0.0),
            sentiment: Some(0.0),
        };
        assert_eq!(composite(&scores, &weights()), Some(0.0));
    }
}
