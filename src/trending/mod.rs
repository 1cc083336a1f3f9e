use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::Idea;
use crate::store::IdeaStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    pub fn window(&self) -> Duration {
        match self {
            Timeframe::Daily => Duration::days(1),
            Timeframe::Weekly => Duration::days(7),
            Timeframe::Monthly => Duration::days(30),
        }
    }
}

/// Recency-windowed ranking by viral score.
#[derive(Debug)]
pub struct TrendingEngine {
    limit: usize,
}

impl TrendingEngine {
    pub fn new(limit: usize) -> Self {
        TrendingEngine { limit }
    }

    pub fn trending(
        &self,
        store: &IdeaStore,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Vec<Idea> {
        let cutoff = now - timeframe.window();
        let mut recent: Vec<&Idea> = store
            .iter()
            .filter(|idea| idea.created_at >= cutoff)
            .collect();
        recent.sort_by(|a, b| {
            b.analytics
                .viral_score
                .partial_cmp(&a.analytics.viral_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        recent.into_iter().take(self.limit).cloned().collect()
    }
}
