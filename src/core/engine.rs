use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use crate::analysis::tokenizer::Tokenizer;
use crate::cache::IdeaCache;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::stats::EngineStats;
use crate::core::types::{
    EngagementKind, Idea, IdeaDraft, IdeaId, IdeaPatch, UserPreferences,
};
use crate::index::manager::{IndexManager, IndexOp};
use crate::query::executor::{QueryExecutor, QueryResults};
use crate::query::filter::{IdeaFilter, QueryOptions};
use crate::scoring::scorer;
use crate::search::engine::SearchEngine;
use crate::search::results::SearchResults;
use crate::store::{IdeaRepository, IdeaStore};
use crate::trending::{Timeframe, TrendingEngine};

/// Store and indexes move together: every mutation updates both under
/// one write lock so no reader observes them out of sync.
struct EngineState {
    store: IdeaStore,
    indexes: IndexManager,
}

/// The engine facade: canonical idea store, derived indexes, scoring,
/// search, filtered queries, trending and a TTL point-lookup cache
/// behind one narrow API.
///
/// All state is instance-local; independent engines never interfere.
pub struct IdeaEngine {
    config: Config,
    state: RwLock<EngineState>,
    cache: IdeaCache,
    search: SearchEngine,
    executor: QueryExecutor,
    trending: TrendingEngine,
}

impl IdeaEngine {
    pub fn new(config: Config) -> Self {
        let tokenizer = Tokenizer::new(config.min_token_len);
        let search = SearchEngine::new(
            tokenizer.clone(),
            config.relevance.clone(),
            config.suggestion_limit,
        );
        let executor = QueryExecutor::new(config.trending_threshold);
        let trending = TrendingEngine::new(config.trending_limit);
        let cache = IdeaCache::new(
            config.cache_capacity,
            Duration::from_secs(config.cache_ttl_secs),
        );
        IdeaEngine {
            state: RwLock::new(EngineState {
                store: IdeaStore::new(),
                indexes: IndexManager::new(tokenizer),
            }),
            cache,
            search,
            executor,
            trending,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn create(&self, draft: IdeaDraft) -> Idea {
        let mut state = self.state.write();
        let idea = state.store.create(draft);
        state.indexes.apply(&idea, IndexOp::Insert);
        debug!(id = %idea.id, "idea created");
        idea
    }

    /// Cached point lookup. Misses fall through to the store and
    /// repopulate the cache.
    pub fn find_by_id(&self, id: &IdeaId) -> Option<Idea> {
        if let Some(idea) = self.cache.get(id) {
            return Some(idea);
        }
        let state = self.state.read();
        let idea = state.store.find(id)?.clone();
        self.cache.put(idea.clone());
        Some(idea)
    }

    /// Apply a partial update. Indexes are rebuilt for this idea only
    /// when a searchable field actually changed.
    pub fn update(&self, id: &IdeaId, patch: IdeaPatch) -> Result<Idea> {
        let mut state = self.state.write();
        let old = state
            .store
            .find(id)
            .cloned()
            .ok_or_else(|| Error::not_found(id))?;
        let updated = state.store.update(id, patch)?;

        if IndexManager::needs_reindex(&old, &updated) {
            state.indexes.apply(&old, IndexOp::Remove);
            state.indexes.apply(&updated, IndexOp::Insert);
            debug!(id = %id, "idea reindexed");
        }
        self.cache.invalidate(id);
        Ok(updated)
    }

    pub fn delete(&self, id: &IdeaId) -> bool {
        let mut state = self.state.write();
        let Some(idea) = state.store.find(id).cloned() else {
            return false;
        };
        state.indexes.apply(&idea, IndexOp::Remove);
        state.store.delete(id);
        self.cache.invalidate(id);
        debug!(id = %id, "idea deleted");
        true
    }

    pub fn search(&self, query: &str) -> SearchResults {
        let state = self.state.read();
        self.search.search(query, &state.store, &state.indexes, None)
    }

    /// Search restricted to a caller-supplied candidate scope.
    pub fn search_scoped(&self, query: &str, scope: &HashSet<IdeaId>) -> SearchResults {
        let state = self.state.read();
        self.search
            .search(query, &state.store, &state.indexes, Some(scope))
    }

    pub fn find_many(&self, filter: &IdeaFilter, options: &QueryOptions) -> QueryResults {
        let state = self.state.read();
        self.executor
            .execute(filter, options, &state.store, &state.indexes, &self.search)
    }

    pub fn get_trending(&self, timeframe: Timeframe) -> Vec<Idea> {
        let state = self.state.read();
        self.trending.trending(&state.store, timeframe, Utc::now())
    }

    /// Bump one engagement counter and recompute the derived scores.
    /// Counters never index, so this path skips the index diff.
    pub fn update_engagement(
        &self,
        id: &IdeaId,
        kind: EngagementKind,
        delta: u64,
    ) -> Result<Idea> {
        let mut state = self.state.write();
        let idea = state
            .store
            .get_mut(id)
            .ok_or_else(|| Error::not_found(id))?;

        match kind {
            EngagementKind::View => idea.analytics.views += delta,
            EngagementKind::Save => idea.analytics.saves += delta,
            EngagementKind::Share => idea.analytics.shares += delta,
            EngagementKind::Implement => idea.analytics.implementations += delta,
        }
        scorer::refresh_derived_scores(&mut idea.analytics, &self.config.engagement);
        idea.updated_at = Utc::now();
        let updated = idea.clone();

        self.cache.invalidate(id);
        debug!(id = %id, ?kind, delta, "engagement recorded");
        Ok(updated)
    }

    /// Ideas from other users ranked by personalization fit, most recent
    /// first among ties.
    pub fn get_recommendations(
        &self,
        user_id: &str,
        preferences: &UserPreferences,
        limit: usize,
    ) -> Vec<Idea> {
        let state = self.state.read();
        let mut scored: Vec<(&Idea, f64)> = state
            .store
            .iter()
            .filter(|idea| idea.user_id != user_id)
            .map(|idea| {
                let score =
                    scorer::personalization_score(idea, preferences, &self.config.personalization);
                (idea, score)
            })
            .collect();

        scored.sort_by(|(a, sa), (b, sb)| {
            sb.partial_cmp(sa)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        scored
            .into_iter()
            .take(limit)
            .map(|(idea, _)| idea.clone())
            .collect()
    }

    pub fn stats(&self) -> EngineStats {
        let state = self.state.read();
        EngineStats {
            total_ideas: state.store.len(),
            text_terms: state.indexes.term_count(),
            categories: state.indexes.category_count(),
            owners: state.indexes.owner_count(),
            tags: state.indexes.tag_count(),
            cache: self.cache.stats(),
        }
    }
}

impl Default for IdeaEngine {
    fn default() -> Self {
        IdeaEngine::new(Config::default())
    }
}
