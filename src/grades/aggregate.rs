//! Weighted final-grade computation.
//!
//! Weights are fractions in `(0, 1]` with two sentinels:
//!
//! - [`EXCLUDED_WEIGHT`] (`-1`): left out of the weighted sum and of the
//!   weight total, but its maximum score still counts toward `max_total`.
//! - [`AUTO_WEIGHT`] (`0`): contributes `score * (1 - total_weight)` in a
//!   second pass. Every auto-weighted entry receives the full residual.

use serde::{Deserialize, Serialize};

/// Weight marking an assessment as excluded from the weighted sum.
pub const EXCLUDED_WEIGHT: f64 = -1.0;

/// Weight marking an assessment as taking the residual weight.
pub const AUTO_WEIGHT: f64 = 0.0;

/// Anything that carries a score, a maximum and a weight.
pub trait GradedAssessment {
    /// Points obtained.
    fn score(&self) -> f64;
    /// Points possible.
    fn max_score(&self) -> f64;
    /// Weight fraction or sentinel.
    fn weight(&self) -> f64;
}

/// A bare assessment, for callers without a full grade record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Points obtained.
    pub score: f64,
    /// Points possible.
    pub max_score: f64,
    /// Weight fraction or sentinel.
    pub weight: f64,
}

impl GradedAssessment for Assessment {
    fn score(&self) -> f64 {
        self.score
    }

    fn max_score(&self) -> f64 {
        self.max_score
    }

    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Aggregated result for one subject grouping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalGrade {
    /// Weighted score.
    pub final_score: f64,
    /// Sum of every assessment's maximum score.
    pub max_total: f64,
    /// `final_score / max_total * 100`. Not finite when `max_total` is zero.
    pub percentage: f64,
}

impl FinalGrade {
    /// Whether a percentage can be shown.
    #[must_use]
    pub fn has_percentage(&self) -> bool {
        self.percentage.is_finite()
    }
}

/// Computes the weighted final score of a set of assessments.
///
/// Malformed inputs (negative weights other than the sentinel, non-positive
/// maxima) are not rejected and flow through the arithmetic.
#[allow(clippy::float_cmp)] // sentinels are exact wire values
#[must_use]
pub fn compute_final_grade<A: GradedAssessment>(assessments: &[A]) -> FinalGrade {
    let mut final_score = 0.0;
    let mut total_weight = 0.0;
    let mut max_total = 0.0;

    for a in assessments {
        if a.weight() != EXCLUDED_WEIGHT {
            final_score += a.score() * a.weight();
            total_weight += a.weight();
        }
        max_total += a.max_score();
    }

    for a in assessments {
        if a.weight() == AUTO_WEIGHT {
            final_score += a.score() * (1.0 - total_weight);
        }
    }

    FinalGrade { final_score, max_total, percentage: final_score / max_total * 100.0 }
}
