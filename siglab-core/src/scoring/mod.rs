//! Scoring pipeline: normalized sub-scores → category scores → composite.
//!
//! Every stage models "no data" as `None`, never as a neutral 50 — an
//! undefined indicator is excluded from averaging so a short warm-up window
//! cannot drag the composite toward the middle of the range.

pub mod aggregate;
pub mod composite;
pub mod normalize;

pub use aggregate::CategoryScores;
pub use composite::composite;
pub use normalize::Normalizer;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interpretive family an indicator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Trend,
    Oscillators,
    Volume,
    Sentiment,
}

impl Category {
    pub fn all() -> [Category; 4] {
        [
            Category::Trend,
            Category::Oscillators,
            Category::Volume,
            Category::Sentiment,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Trend => "trend",
            Category::Oscillators => "oscillators",
            Category::Volume => "volume",
            Category::Sentiment => "sentiment",
        };
        f.write_str(s)
    }
}

/// One indicator's bullishness sub-score on the common [0,100] scale.
///
/// `value` is `None` while the indicator is inside its warm-up window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedScore {
    pub indicator: String,
    pub category: Category,
    pub value: Option<f64>,
}

/// All sub-scores produced for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub scores: Vec<NormalizedScore>,
}

impl ScoreCard {
    pub fn push(&mut self, indicator: impl Into<String>, category: Category, value: Option<f64>) {
        self.scores.push(NormalizedScore {
            indicator: indicator.into(),
            category,
            value,
        });
    }

    /// Defined sub-scores for one category.
    pub fn defined(&self, category: Category) -> impl Iterator<Item = f64> + '_ {
        self.scores
            .iter()
            .filter(move |s| s.category == category)
            .filter_map(|s| s.value)
    }

    /// Names of every sub-score still undefined (warm-up).
    pub fn undefined_names(&self) -> Vec<String> {
        self.scores
            .iter()
            .filter(|s| s.value.is_none())
            .map(|s| s.indicator.clone())
            .collect()
    }

    /// True when no sub-score is defined at all.
    pub fn all_undefined(&self) -> bool {
        self.scores.iter().all(|s| s.value.is_none())
    }
}
