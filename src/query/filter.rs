use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{Idea, IdeaStatus};

/// Inclusive numeric range. No validation happens here: an inverted
/// range simply matches nothing, which is the required degradation for
/// malformed caller input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Compound filter. Every present predicate must hold (conjunction).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdeaFilter {
    pub user_id: Option<String>,
    pub category: Option<String>,
    pub status: Option<IdeaStatus>,
    pub target_audience: Option<String>,
    /// trending ⇔ viral score above the configured threshold.
    pub trending: Option<bool>,
    pub min_rating: Option<u8>,
    pub max_rating: Option<u8>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub implemented_only: Option<bool>,
    /// Any-match over the idea's tags.
    pub tags: Option<Vec<String>>,
    pub cost_range: Option<Range>,
    pub personalized_score_range: Option<Range>,
    /// Routed through the search engine over the filtered candidates.
    pub search_text: Option<String>,
}

impl IdeaFilter {
    /// Evaluate every predicate except `search_text`, which needs the
    /// search engine and is applied by the executor.
    pub fn matches(&self, idea: &Idea, trending_threshold: f64) -> bool {
        if let Some(user_id) = &self.user_id {
            if &idea.user_id != user_id {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &idea.category != category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if idea.status != status {
                return false;
            }
        }
        if let Some(audience) = &self.target_audience {
            if &idea.target_audience != audience {
                return false;
            }
        }
        if let Some(trending) = self.trending {
            if (idea.analytics.viral_score > trending_threshold) != trending {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if idea.rating().map_or(true, |r| r < min) {
                return false;
            }
        }
        if let Some(max) = self.max_rating {
            if idea.rating().map_or(true, |r| r > max) {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if idea.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if idea.created_at > before {
                return false;
            }
        }
        if self.implemented_only == Some(true) && !idea.is_implemented() {
            return false;
        }
        if let Some(tags) = &self.tags {
            if !tags.iter().any(|t| idea.tags.contains(t)) {
                return false;
            }
        }
        if let Some(range) = self.cost_range {
            if !range.contains(idea.ai_metadata.cost) {
                return false;
            }
        }
        if let Some(range) = self.personalized_score_range {
            if !range.contains(idea.ai_metadata.personalized_score) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Rating,
    EngagementScore,
    ViralScore,
    PersonalizedScore,
    Cost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOptions {
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub offset: usize,
    pub limit: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            offset: 0,
            limit: 20,
        }
    }
}

impl SortField {
    /// Numeric sort key for an idea. Timestamps compare by epoch millis;
    /// missing ratings sort as zero.
    pub fn key(&self, idea: &Idea) -> f64 {
        match self {
            SortField::CreatedAt => idea.created_at.timestamp_millis() as f64,
            SortField::Rating => idea.rating().unwrap_or(0) as f64,
            SortField::EngagementScore => idea.analytics.engagement_score,
            SortField::ViralScore => idea.analytics.viral_score,
            SortField::PersonalizedScore => idea.ai_metadata.personalized_score,
            SortField::Cost => idea.ai_metadata.cost,
        }
    }
}
