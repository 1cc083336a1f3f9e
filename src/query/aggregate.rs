use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::types::Idea;

/// Aggregate statistics over a filtered (pre-pagination) idea set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Aggregations {
    pub category_distribution: HashMap<String, usize>,
    /// Mean over rated ideas only; zero when nothing is rated.
    pub average_rating: f64,
    /// Implemented count / total; zero on an empty set.
    pub implementation_rate: f64,
    pub total_cost: f64,
    pub trending_count: usize,
    pub totals: EngagementTotals,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngagementTotals {
    pub views: u64,
    pub saves: u64,
    pub shares: u64,
    pub implementations: u64,
}

/// One of the top categories by idea count, annotated with the average
/// rating inside that category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInsight {
    pub category: String,
    pub idea_count: usize,
    pub average_rating: f64,
}

pub fn aggregate(ideas: &[&Idea], trending_threshold: f64) -> Aggregations {
    let mut agg = Aggregations::default();
    let mut rated = 0usize;
    let mut rating_sum = 0u64;
    let mut implemented = 0usize;

    for idea in ideas {
        *agg.category_distribution
            .entry(idea.category.clone())
            .or_insert(0) += 1;
        if let Some(rating) = idea.rating() {
            rated += 1;
            rating_sum += rating as u64;
        }
        if idea.is_implemented() {
            implemented += 1;
        }
        if idea.analytics.viral_score > trending_threshold {
            agg.trending_count += 1;
        }
        agg.total_cost += idea.ai_metadata.cost;
        agg.totals.views += idea.analytics.views;
        agg.totals.saves += idea.analytics.saves;
        agg.totals.shares += idea.analytics.shares;
        agg.totals.implementations += idea.analytics.implementations;
    }

    if rated > 0 {
        agg.average_rating = rating_sum as f64 / rated as f64;
    }
    if !ideas.is_empty() {
        agg.implementation_rate = implemented as f64 / ideas.len() as f64;
    }
    agg
}

/// Top `limit` categories by idea count, each with its in-category
/// average rating.
pub fn top_category_insights(ideas: &[&Idea], limit: usize) -> Vec<CategoryInsight> {
    let mut per_category: HashMap<&str, (usize, u64, usize)> = HashMap::new();
    for idea in ideas {
        let entry = per_category.entry(idea.category.as_str()).or_insert((0, 0, 0));
        entry.0 += 1;
        if let Some(rating) = idea.rating() {
            entry.1 += rating as u64;
            entry.2 += 1;
        }
    }

    let mut insights: Vec<CategoryInsight> = per_category
        .into_iter()
        .map(|(category, (count, rating_sum, rated))| CategoryInsight {
            category: category.to_string(),
            idea_count: count,
            average_rating: if rated > 0 {
                rating_sum as f64 / rated as f64
            } else {
                0.0
            },
        })
        .collect();

    insights.sort_by(|a, b| {
        b.idea_count
            .cmp(&a.idea_count)
            .then_with(|| a.category.cmp(&b.category))
    });
    insights.truncate(limit);
    insights
}
