use crate::core::config::{EngagementWeights, PersonalizationWeights};
use crate::core::types::{Idea, IdeaAnalytics, UserPreferences};

/// Weighted interaction volume, clamped to 1.0.
pub fn engagement_score(analytics: &IdeaAnalytics, weights: &EngagementWeights) -> f64 {
    let raw = analytics.views as f64 * weights.view
        + analytics.saves as f64 * weights.save
        + analytics.shares as f64 * weights.share
        + analytics.implementations as f64 * weights.implement;
    (raw / weights.scale).min(1.0)
}

/// Shares and implementations relative to views, clamped to 1.0.
/// Zero views always scores zero.
pub fn viral_score(analytics: &IdeaAnalytics) -> f64 {
    if analytics.views == 0 {
        return 0.0;
    }
    let raw = (analytics.shares + analytics.implementations * 2) as f64 / analytics.views as f64;
    raw.min(1.0)
}

/// Preference fit for a user: a flat base plus weighted category and
/// audience affinity, clamped to 1.0.
pub fn personalization_score(
    idea: &Idea,
    preferences: &UserPreferences,
    weights: &PersonalizationWeights,
) -> f64 {
    let mut score = weights.base;
    if let Some(w) = preferences.category_weights.get(&idea.category) {
        score += w * weights.category_factor;
    }
    if let Some(w) = preferences.audience_weights.get(&idea.target_audience) {
        score += w * weights.audience_factor;
    }
    score.min(1.0)
}

pub fn is_trending(analytics: &IdeaAnalytics, threshold: f64) -> bool {
    analytics.viral_score > threshold
}

/// Recompute both derived scores in place. The only sanctioned way to
/// write `engagement_score` / `viral_score`.
pub fn refresh_derived_scores(analytics: &mut IdeaAnalytics, weights: &EngagementWeights) {
    analytics.engagement_score = engagement_score(analytics, weights);
    analytics.viral_score = viral_score(analytics);
}
