//! Rounding, ratio and activity-breakdown helpers.

use crate::model::{ContentInteractionRecord, NormalizationType};
use crate::snapshot::{ActivityBreakdown, ActivityStats, QuizStats};

/// Default score a quiz needs to count as passed.
pub const DEFAULT_QUIZ_PASS_THRESHOLD: f64 = 0.6;

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole` as a percentage, rounded to one decimal. `0.0` when
/// `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 * 100.0 / whole as f64)
}

/// Mean of fractional scores expressed as a percentage, or `None` when empty.
pub fn mean_score_percent(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Some(round1(mean * 100.0))
}

/// Weighted mean of `(value, weight)` pairs, rounded. `0.0` when the
/// weights sum to zero.
pub fn weighted_mean(pairs: &[(f64, usize)]) -> f64 {
    let total_weight: usize = pairs.iter().map(|(_, w)| *w).sum();
    if total_weight == 0 {
        return 0.0;
    }
    let weighted: f64 = pairs.iter().map(|(v, w)| v * *w as f64).sum();
    round1(weighted / total_weight as f64)
}

/// Unweighted mean, rounded. `0.0` when empty.
pub fn simple_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round1(values.iter().sum::<f64>() / values.len() as f64)
}

/// Bucket every record by normalization type in a single pass.
pub fn compute_activity_breakdown(
    records: &[ContentInteractionRecord],
    quiz_pass_threshold: f64,
) -> ActivityBreakdown {
    let mut breakdown = ActivityBreakdown::default();
    let mut quiz_scores = Vec::new();

    for record in records {
        breakdown.total_activities += 1;
        if record.is_completed() {
            breakdown.completed_activities += 1;
        }

        match record.normalization_type {
            NormalizationType::Quiz => {
                breakdown.quizzes.total += 1;
                if let Some(score) = record.score {
                    breakdown.quizzes.completed += 1;
                    quiz_scores.push(score);
                    if score >= quiz_pass_threshold {
                        breakdown.quizzes.passed += 1;
                    }
                }
            }
            NormalizationType::Interactive => tally(&mut breakdown.interactive, record),
            NormalizationType::SlideView => tally(&mut breakdown.slide_views, record),
            NormalizationType::Default => tally(&mut breakdown.other, record),
        }
    }

    finish_quiz(&mut breakdown.quizzes, &quiz_scores);
    for stats in [
        &mut breakdown.interactive,
        &mut breakdown.slide_views,
        &mut breakdown.other,
    ] {
        stats.percentage = percentage(stats.completed, stats.total);
    }

    breakdown
}

fn tally(stats: &mut ActivityStats, record: &ContentInteractionRecord) {
    stats.total += 1;
    if record.is_completed() {
        stats.completed += 1;
    }
}

fn finish_quiz(quizzes: &mut QuizStats, scores: &[f64]) {
    quizzes.percentage = percentage(quizzes.passed, quizzes.total);
    quizzes.average_score = mean_score_percent(scores);
}
