use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{Idea, IdeaId};

/// Ranked search output plus the per-idea relevance scores that produced
/// the ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub ideas: Vec<Idea>,
    pub metadata: SearchMetadata,
    pub scores: HashMap<IdeaId, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMetadata {
    pub query: String,
    pub total_matches: usize,
    pub search_time_ms: u64,
    /// Up to N distinct categories from the result set, in result order.
    /// Callers use these as "did you mean" hints.
    pub suggestions: Vec<String>,
}

impl SearchResults {
    pub fn empty(query: &str) -> Self {
        SearchResults {
            ideas: Vec::new(),
            metadata: SearchMetadata {
                query: query.to_string(),
                total_matches: 0,
                search_time_ms: 0,
                suggestions: Vec::new(),
            },
            scores: HashMap::new(),
        }
    }
}
