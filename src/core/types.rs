use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdeaId(pub Uuid);

impl IdeaId {
    pub fn new() -> Self {
        IdeaId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for IdeaId {
    fn default() -> Self {
        IdeaId::new()
    }
}

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status. The engine enforces no transition rules; any value
/// is accepted and workflow policy lives with the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    #[default]
    Generated,
    Reviewed,
    Implemented,
    Archived,
}

/// Provenance of the generation step that produced an idea.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiMetadata {
    pub model: String,
    pub tokens_used: u32,
    pub cost: f64,
    /// Model confidence, 0..=1.
    pub confidence: f64,
    /// Personalization fit against the requesting profile, 0..=1.
    pub personalized_score: f64,
    pub trending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserFeedback {
    /// 1..=5 when present.
    pub rating: Option<u8>,
    pub feedback: Option<String>,
    pub implemented: bool,
    pub implementation_date: Option<DateTime<Utc>>,
    pub implementation_results: Option<String>,
}

/// Raw engagement counters plus the scores derived from them.
///
/// `engagement_score` and `viral_score` are never written by callers;
/// they are recomputed by the scoring module whenever a counter changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdeaAnalytics {
    pub views: u64,
    pub saves: u64,
    pub shares: u64,
    pub implementations: u64,
    pub engagement_score: f64,
    pub viral_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: IdeaId,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub target_audience: String,
    pub implementation: String,
    /// Set semantics: order-insensitive, compared as a set on update.
    pub tags: Vec<String>,
    pub ai_metadata: AiMetadata,
    pub user_feedback: Option<UserFeedback>,
    pub analytics: IdeaAnalytics,
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    pub fn rating(&self) -> Option<u8> {
        self.user_feedback.as_ref().and_then(|f| f.rating)
    }

    pub fn is_implemented(&self) -> bool {
        self.user_feedback
            .as_ref()
            .map(|f| f.implemented)
            .unwrap_or(false)
    }

    pub fn tag_set(&self) -> HashSet<&str> {
        self.tags.iter().map(|t| t.as_str()).collect()
    }
}

/// Creation payload. The store assigns id, timestamps, default analytics
/// and feedback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdeaDraft {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub target_audience: String,
    pub implementation: String,
    pub tags: Vec<String>,
    pub ai_metadata: AiMetadata,
    pub status: Option<IdeaStatus>,
}

/// Partial update. The id is deliberately not representable here, so an
/// update can never reassign it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdeaPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_audience: Option<String>,
    pub implementation: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<IdeaStatus>,
    pub user_feedback: Option<UserFeedback>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementKind {
    View,
    Save,
    Share,
    Implement,
}

/// Preference map supplied by the personalization collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    pub category_weights: HashMap<String, f64>,
    pub audience_weights: HashMap<String, f64>,
}
