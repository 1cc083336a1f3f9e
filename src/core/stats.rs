use crate::cache::CacheStats;

/// Point-in-time engine counters, for observability endpoints.
#[derive(Debug, Clone)]
pub struct EngineStats {
    pub total_ideas: usize,
    pub text_terms: usize,
    pub categories: usize,
    pub owners: usize,
    pub tags: usize,
    pub cache: CacheStats,
}
