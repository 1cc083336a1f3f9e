use std::collections::{HashMap, HashSet};
use std::time::Instant;

use tracing::debug;

use crate::analysis::tokenizer::Tokenizer;
use crate::core::config::RelevanceWeights;
use crate::core::types::{Idea, IdeaId};
use crate::index::manager::IndexManager;
use crate::search::results::{SearchMetadata, SearchResults};
use crate::store::{IdeaRepository, IdeaStore};

/// Relevance-ranked full-text search over the store, backed by the text
/// index with a substring fallback for queries the index misses.
#[derive(Debug)]
pub struct SearchEngine {
    tokenizer: Tokenizer,
    weights: RelevanceWeights,
    suggestion_limit: usize,
}

impl SearchEngine {
    pub fn new(tokenizer: Tokenizer, weights: RelevanceWeights, suggestion_limit: usize) -> Self {
        SearchEngine {
            tokenizer,
            weights,
            suggestion_limit,
        }
    }

    /// Execute a query against the store, optionally restricted to a
    /// candidate scope. Index hits that no longer resolve to a live idea
    /// are dropped silently.
    pub fn search(
        &self,
        query: &str,
        store: &IdeaStore,
        indexes: &IndexManager,
        scope: Option<&HashSet<IdeaId>>,
    ) -> SearchResults {
        let started = Instant::now();
        if query.trim().is_empty() {
            return SearchResults::empty(query);
        }

        let in_scope = |id: &IdeaId| scope.map_or(true, |s| s.contains(id));

        // Exact term matches via the text index, counting how many query
        // terms each idea satisfies.
        let mut scores: HashMap<IdeaId, f64> = HashMap::new();
        for term in self.tokenizer.query_terms(query) {
            if let Some(ids) = indexes.text_matches(&term) {
                for id in ids {
                    if in_scope(id) {
                        *scores.entry(*id).or_insert(0.0) += 1.0;
                    }
                }
            }
        }

        // Substring fallback over title + description for ideas the index
        // did not capture.
        let query_lower = query.to_lowercase();
        for idea in store.iter() {
            if scores.contains_key(&idea.id) || !in_scope(&idea.id) {
                continue;
            }
            let haystack = format!("{} {}", idea.title, idea.description).to_lowercase();
            if haystack.contains(&query_lower) {
                scores.insert(idea.id, 0.0);
            }
        }

        // Layer the field-match bonuses over the term-count base.
        let mut matched: Vec<(&Idea, f64)> = Vec::with_capacity(scores.len());
        for (id, base) in &scores {
            // Stale index entries resolve to nothing and are skipped.
            let Some(idea) = store.find(id) else { continue };
            let score = base + self.field_bonus(idea, &query_lower);
            matched.push((idea, score));
        }

        matched.sort_by(|(a, sa), (b, sb)| {
            sb.partial_cmp(sa)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let suggestions = self.category_suggestions(&matched);
        let scores: HashMap<IdeaId, f64> =
            matched.iter().map(|(idea, score)| (idea.id, *score)).collect();
        let ideas: Vec<Idea> = matched.into_iter().map(|(idea, _)| idea.clone()).collect();

        debug!(query, matches = ideas.len(), "search executed");

        SearchResults {
            metadata: SearchMetadata {
                query: query.to_string(),
                total_matches: ideas.len(),
                search_time_ms: started.elapsed().as_millis() as u64,
                suggestions,
            },
            ideas,
            scores,
        }
    }

    /// Additive substring bonuses, each field checked independently
    /// against the raw query.
    fn field_bonus(&self, idea: &Idea, query_lower: &str) -> f64 {
        let mut bonus = 0.0;
        if idea.title.to_lowercase().contains(query_lower) {
            bonus += self.weights.title;
        }
        if idea.description.to_lowercase().contains(query_lower) {
            bonus += self.weights.description;
        }
        if idea.category.to_lowercase().contains(query_lower) {
            bonus += self.weights.category;
        }
        if idea
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(query_lower))
        {
            bonus += self.weights.tag;
        }
        bonus
    }

    /// Distinct categories drawn from the ranked results, capped.
    fn category_suggestions(&self, matched: &[(&Idea, f64)]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut suggestions = Vec::new();
        for (idea, _) in matched {
            if suggestions.len() >= self.suggestion_limit {
                break;
            }
            if seen.insert(idea.category.as_str()) {
                suggestions.push(idea.category.clone());
            }
        }
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{IdeaDraft, IdeaPatch};
    use crate::index::manager::IndexOp;

    fn engine() -> SearchEngine {
        SearchEngine::new(Tokenizer::default(), RelevanceWeights::default(), 3)
    }

    fn seed(
        store: &mut IdeaStore,
        indexes: &mut IndexManager,
        title: &str,
        description: &str,
        category: &str,
    ) -> IdeaId {
        let idea = store.create(IdeaDraft {
            user_id: "u1".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            target_audience: "everyone".to_string(),
            ..IdeaDraft::default()
        });
        indexes.apply(&idea, IndexOp::Insert);
        idea.id
    }

    #[test]
    fn title_match_outranks_description_match() {
        let mut store = IdeaStore::new();
        let mut indexes = IndexManager::default();
        let in_title = seed(&mut store, &mut indexes, "Fitness coach", "daily routines", "health");
        let in_desc = seed(&mut store, &mut indexes, "Meal planner", "fitness focused menus", "health");

        let results = engine().search("fitness", &store, &indexes, None);
        assert_eq!(results.ideas[0].id, in_title);
        assert_eq!(results.ideas[1].id, in_desc);
        assert!(results.scores[&in_title] > results.scores[&in_desc]);
    }

    #[test]
    fn fuzzy_fallback_catches_short_terms() {
        let mut store = IdeaStore::new();
        let mut indexes = IndexManager::default();
        // "ai" is below the token length cutoff, so only the substring
        // fallback can find it.
        let id = seed(&mut store, &mut indexes, "AI tutor", "adaptive lessons", "education");

        let results = engine().search("ai", &store, &indexes, None);
        assert_eq!(results.ideas.len(), 1);
        assert_eq!(results.ideas[0].id, id);
    }

    #[test]
    fn scope_restricts_candidates() {
        let mut store = IdeaStore::new();
        let mut indexes = IndexManager::default();
        let a = seed(&mut store, &mut indexes, "Garden robot", "weeding", "robotics");
        let _b = seed(&mut store, &mut indexes, "Garden app", "plant care", "mobile");

        let scope: HashSet<IdeaId> = [a].into_iter().collect();
        let results = engine().search("garden", &store, &indexes, Some(&scope));
        assert_eq!(results.ideas.len(), 1);
        assert_eq!(results.ideas[0].id, a);
    }

    #[test]
    fn stale_index_entries_are_dropped_silently() {
        let mut store = IdeaStore::new();
        let mut indexes = IndexManager::default();
        let id = seed(&mut store, &mut indexes, "Orphaned idea", "gone", "misc");
        // Delete from the store without touching the indexes.
        store.delete(&id);

        let results = engine().search("orphaned", &store, &indexes, None);
        assert!(results.ideas.is_empty());
        assert_eq!(results.metadata.total_matches, 0);
    }

    #[test]
    fn suggestions_are_distinct_categories_in_result_order() {
        let mut store = IdeaStore::new();
        let mut indexes = IndexManager::default();
        for (title, category) in [
            ("Budget tracker", "finance"),
            ("Budget planner", "finance"),
            ("Budget course", "education"),
            ("Budget podcast", "media"),
            ("Budget newsletter", "publishing"),
        ] {
            seed(&mut store, &mut indexes, title, "about budgets", category);
        }

        let results = engine().search("budget", &store, &indexes, None);
        assert_eq!(results.metadata.suggestions.len(), 3);
        let distinct: HashSet<&String> = results.metadata.suggestions.iter().collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn empty_query_matches_nothing() {
        let mut store = IdeaStore::new();
        let mut indexes = IndexManager::default();
        seed(&mut store, &mut indexes, "Anything", "at all", "misc");

        let results = engine().search("   ", &store, &indexes, None);
        assert!(results.ideas.is_empty());
    }

    #[test]
    fn old_title_stops_matching_after_reindex() {
        let mut store = IdeaStore::new();
        let mut indexes = IndexManager::default();
        let id = seed(&mut store, &mut indexes, "Legacy name", "unchanged", "misc");

        let old = store.find(&id).unwrap().clone();
        let updated = store
            .update(
                &id,
                IdeaPatch {
                    title: Some("Modern name".to_string()),
                    ..IdeaPatch::default()
                },
            )
            .unwrap();
        assert!(IndexManager::needs_reindex(&old, &updated));
        indexes.apply(&old, IndexOp::Remove);
        indexes.apply(&updated, IndexOp::Insert);

        let eng = engine();
        assert!(eng.search("legacy", &store, &indexes, None).ideas.is_empty());
        assert_eq!(eng.search("modern", &store, &indexes, None).ideas.len(), 1);
    }
}
