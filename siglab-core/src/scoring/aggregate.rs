//! Category aggregator — one score per indicator family.

use crate::scoring::{Category, ScoreCard};
use serde::{Deserialize, Serialize};

/// Aggregate score per category for one evaluation.
///
/// A category is `None` only when every contributing indicator is undefined
/// (extreme warm-up). The composite stage redistributes its weight to the
/// defined categories instead of treating the hole as a neutral 50.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub trend: Option<f64>,
    pub oscillators: Option<f64>,
    pub volume: Option<f64>,
    pub sentiment: Option<f64>,
}

impl CategoryScores {
    /// Arithmetic mean of the defined sub-scores in each category.
    pub fn aggregate(card: &ScoreCard) -> Self {
        Self {
            trend: mean(card.defined(Category::Trend)),
            oscillators: mean(card.defined(Category::Oscillators)),
            volume: mean(card.defined(Category::Volume)),
            sentiment: mean(card.defined(Category::Sentiment)),
        }
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        match category {
            Category::Trend => self.trend,
            Category::Oscillators => self.oscillators,
            Category::Volume => self.volume,
            Category::Sentiment => self.sentiment,
        }
    }

    pub fn all_undefined(&self) -> bool {
        Category::all().iter().all(|&c| self.get(c).is_none())
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_means_defined_scores() {
        let mut card = ScoreCard::default();
        card.push("a", Category::Trend, Some(60.0));
        card.push("b", Category::Trend, Some(80.0));
        card.push("c", Category::Trend, None);
        card.push("d", Category::Volume, None);

        let scores = CategoryScores::aggregate(&card);
        assert_eq!(scores.trend, Some(70.0));
        assert_eq!(scores.volume, None);
        assert_eq!(scores.oscillators, None);
        assert!(!scores.all_undefined());
    }

    #[test]
    fn undefined_scores_do_not_dilute() {
        // One defined score of 90 must yield 90, not an average with
        // an implicit neutral for the undefined one.
        let mut card = ScoreCard::default();
        card.push("a", Category::Oscillators, Some(90.0));
        card.push("b", Category::Oscillators, None);
        let scores = CategoryScores::aggregate(&card);
        assert_eq!(scores.oscillators, Some(90.0));
    }

    #[test]
    fn empty_card_is_all_undefined() {
        let scores = CategoryScores::aggregate(&ScoreCard::default());
        assert!(scores.all_undefined());
    }
}
