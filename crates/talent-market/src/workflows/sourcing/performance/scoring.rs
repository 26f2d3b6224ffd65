use super::super::domain::{CandidateId, MatchScoreMap};
use super::config::ScoringWeights;

/// Delivery SLA in hours; averages at or beyond it earn no speed points.
pub const DELIVERY_SLA_HOURS: f64 = 24.0;
const SPEED_POINTS_PER_HOUR: f64 = 4.1667;

/// Maps average completion time onto 0..=100 with a linear decay over the SLA:
/// 0 hours scores 100, 24 hours and slower score 0.
///
/// Negative or NaN averages score 0. Sourcers without completed jobs are
/// scored 0 by the engine before this is consulted.
pub fn speed_score(avg_completion_hours: f64) -> f64 {
    if avg_completion_hours.is_nan() || avg_completion_hours < 0.0 {
        return 0.0;
    }

    ((DELIVERY_SLA_HOURS - avg_completion_hours) * SPEED_POINTS_PER_HOUR).clamp(0.0, 100.0)
}

/// Rounded mean of the usable match scores, or `None` without any signal.
pub fn average_match_rating<'a, I>(candidate_ids: I, match_scores: &MatchScoreMap) -> Option<u32>
where
    I: IntoIterator<Item = &'a CandidateId>,
{
    let (sum, count) = candidate_ids
        .into_iter()
        .filter_map(|id| match_scores.get(id).and_then(|score| score.signal()))
        .fold((0.0_f64, 0_usize), |(sum, count), score| (sum + score, count + 1));

    if count == 0 {
        return None;
    }

    Some((sum / count as f64).round() as u32)
}

/// Placeholder acceptance figure: any submission counts as fully accepted.
pub fn acceptance_rate(submitted_candidates: usize) -> u32 {
    if submitted_candidates > 0 {
        100
    } else {
        0
    }
}

/// Weighted composite of speed, quality and capped volume.
///
/// The result is intentionally left unclamped and may exceed 100.
pub fn composite(speed: f64, quality: f64, completed_jobs: usize, weights: &ScoringWeights) -> i64 {
    let volume = (completed_jobs as u64)
        .saturating_mul(u64::from(weights.volume_points_per_job))
        .min(u64::from(weights.volume_cap)) as f64;

    (speed * weights.speed + quality * weights.quality + volume).round() as i64
}
