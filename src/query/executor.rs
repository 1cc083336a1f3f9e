use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{Idea, IdeaId};
use crate::index::manager::IndexManager;
use crate::query::aggregate::{self, Aggregations, CategoryInsight};
use crate::query::filter::{IdeaFilter, QueryOptions, SortOrder};
use crate::search::engine::SearchEngine;
use crate::store::{IdeaRepository, IdeaStore};

/// How many categories the insight list reports.
const INSIGHT_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResults {
    pub ideas: Vec<Idea>,
    /// Size of the filtered set before pagination.
    pub total: usize,
    pub has_more: bool,
    pub aggregations: Aggregations,
    pub insights: Vec<CategoryInsight>,
}

/// Compound filtered queries: index-assisted candidate narrowing,
/// conjunctive predicate scan, optional text search, sort, pagination
/// and aggregation.
#[derive(Debug)]
pub struct QueryExecutor {
    trending_threshold: f64,
}

impl QueryExecutor {
    pub fn new(trending_threshold: f64) -> Self {
        QueryExecutor { trending_threshold }
    }

    pub fn execute(
        &self,
        filter: &IdeaFilter,
        options: &QueryOptions,
        store: &IdeaStore,
        indexes: &IndexManager,
        search: &SearchEngine,
    ) -> QueryResults {
        // Owner/category indexes shrink the candidate set before the
        // remaining predicates scan it.
        let seed = self.seed_candidates(filter, indexes);
        let mut filtered: Vec<&Idea> = match &seed {
            Some(ids) => ids
                .iter()
                .filter_map(|id| store.find(id))
                .filter(|idea| filter.matches(idea, self.trending_threshold))
                .collect(),
            None => store
                .iter()
                .filter(|idea| filter.matches(idea, self.trending_threshold))
                .collect(),
        };

        // Free-text search runs over the already-filtered candidates, not
        // the full store.
        if let Some(text) = filter.search_text.as_deref() {
            let scope: HashSet<IdeaId> = filtered.iter().map(|idea| idea.id).collect();
            let hits: HashSet<IdeaId> = search
                .search(text, store, indexes, Some(&scope))
                .ideas
                .iter()
                .map(|idea| idea.id)
                .collect();
            filtered.retain(|idea| hits.contains(&idea.id));
        }

        let aggregations = aggregate::aggregate(&filtered, self.trending_threshold);
        let insights = aggregate::top_category_insights(&filtered, INSIGHT_LIMIT);

        filtered.sort_by(|a, b| {
            let ka = options.sort_by.key(a);
            let kb = options.sort_by.key(b);
            let ordering = ka.partial_cmp(&kb).unwrap_or(Ordering::Equal);
            match options.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = filtered.len();
        let has_more = options.offset + options.limit < total;
        let ideas: Vec<Idea> = filtered
            .into_iter()
            .skip(options.offset)
            .take(options.limit)
            .cloned()
            .collect();

        debug!(total, page = ideas.len(), has_more, "filter query executed");

        QueryResults {
            ideas,
            total,
            has_more,
            aggregations,
            insights,
        }
    }

    /// Intersected owner/category index lookup when either predicate is
    /// present. `None` means a full store scan is required.
    fn seed_candidates(
        &self,
        filter: &IdeaFilter,
        indexes: &IndexManager,
    ) -> Option<Vec<IdeaId>> {
        let owner_ids = filter
            .user_id
            .as_deref()
            .map(|u| indexes.by_owner(u).cloned().unwrap_or_default());
        let category_ids = filter
            .category
            .as_deref()
            .map(|c| indexes.by_category(c).cloned().unwrap_or_default());

        match (owner_ids, category_ids) {
            (Some(a), Some(b)) => Some(a.intersection(&b).copied().collect()),
            (Some(a), None) | (None, Some(a)) => Some(a.into_iter().collect()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::Tokenizer;
    use crate::core::config::RelevanceWeights;
    use crate::core::types::{IdeaDraft, IdeaPatch, UserFeedback};
    use crate::index::manager::IndexOp;
    use crate::query::filter::{Range, SortField};

    struct Fixture {
        store: IdeaStore,
        indexes: IndexManager,
        search: SearchEngine,
        executor: QueryExecutor,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                store: IdeaStore::new(),
                indexes: IndexManager::default(),
                search: SearchEngine::new(Tokenizer::default(), RelevanceWeights::default(), 3),
                executor: QueryExecutor::new(0.7),
            }
        }

        fn seed(&mut self, user_id: &str, title: &str, category: &str) -> IdeaId {
            let idea = self.store.create(IdeaDraft {
                user_id: user_id.to_string(),
                title: title.to_string(),
                description: "description".to_string(),
                category: category.to_string(),
                target_audience: "everyone".to_string(),
                ..IdeaDraft::default()
            });
            self.indexes.apply(&idea, IndexOp::Insert);
            idea.id
        }

        fn run(&self, filter: &IdeaFilter, options: &QueryOptions) -> QueryResults {
            self.executor
                .execute(filter, options, &self.store, &self.indexes, &self.search)
        }
    }

    #[test]
    fn owner_and_category_predicates_conjoin() {
        let mut fx = Fixture::new();
        let target = fx.seed("alice", "Recipe box", "food");
        fx.seed("alice", "Tax helper", "finance");
        fx.seed("bob", "Meal kit", "food");

        let filter = IdeaFilter {
            user_id: Some("alice".to_string()),
            category: Some("food".to_string()),
            ..IdeaFilter::default()
        };
        let results = fx.run(&filter, &QueryOptions::default());
        assert_eq!(results.total, 1);
        assert_eq!(results.ideas[0].id, target);
    }

    #[test]
    fn pagination_reports_has_more() {
        let mut fx = Fixture::new();
        for i in 0..25 {
            fx.seed("alice", &format!("Idea {i}"), "misc");
        }
        let filter = IdeaFilter::default();

        let page2 = fx.run(
            &filter,
            &QueryOptions {
                offset: 10,
                limit: 10,
                ..QueryOptions::default()
            },
        );
        assert_eq!(page2.total, 25);
        assert_eq!(page2.ideas.len(), 10);
        assert!(page2.has_more);

        let page3 = fx.run(
            &filter,
            &QueryOptions {
                offset: 20,
                limit: 10,
                ..QueryOptions::default()
            },
        );
        assert_eq!(page3.ideas.len(), 5);
        assert!(!page3.has_more);
    }

    #[test]
    fn inverted_range_degrades_to_empty() {
        let mut fx = Fixture::new();
        fx.seed("alice", "Anything", "misc");

        let filter = IdeaFilter {
            cost_range: Some(Range { min: 5.0, max: 1.0 }),
            ..IdeaFilter::default()
        };
        let results = fx.run(&filter, &QueryOptions::default());
        assert_eq!(results.total, 0);
        assert!(results.ideas.is_empty());
    }

    #[test]
    fn search_text_scopes_to_filtered_set() {
        let mut fx = Fixture::new();
        let hit = fx.seed("alice", "Solar charger", "hardware");
        fx.seed("bob", "Solar garden", "hardware");

        let filter = IdeaFilter {
            user_id: Some("alice".to_string()),
            search_text: Some("solar".to_string()),
            ..IdeaFilter::default()
        };
        let results = fx.run(&filter, &QueryOptions::default());
        assert_eq!(results.total, 1);
        assert_eq!(results.ideas[0].id, hit);
    }

    #[test]
    fn sort_by_rating_ascending() {
        let mut fx = Fixture::new();
        let low = fx.seed("alice", "Low", "misc");
        let high = fx.seed("alice", "High", "misc");
        for (id, rating) in [(low, 2), (high, 5)] {
            fx.store
                .update(
                    &id,
                    IdeaPatch {
                        user_feedback: Some(UserFeedback {
                            rating: Some(rating),
                            ..UserFeedback::default()
                        }),
                        ..IdeaPatch::default()
                    },
                )
                .unwrap();
        }

        let results = fx.run(
            &IdeaFilter::default(),
            &QueryOptions {
                sort_by: SortField::Rating,
                sort_order: SortOrder::Asc,
                ..QueryOptions::default()
            },
        );
        assert_eq!(results.ideas[0].id, low);
        assert_eq!(results.ideas[1].id, high);
    }

    #[test]
    fn aggregations_cover_pre_pagination_set() {
        let mut fx = Fixture::new();
        for i in 0..10 {
            let category = if i % 2 == 0 { "even" } else { "odd" };
            fx.seed("alice", &format!("Idea {i}"), category);
        }

        let results = fx.run(
            &IdeaFilter::default(),
            &QueryOptions {
                limit: 3,
                ..QueryOptions::default()
            },
        );
        assert_eq!(results.ideas.len(), 3);
        assert_eq!(results.aggregations.category_distribution["even"], 5);
        assert_eq!(results.aggregations.category_distribution["odd"], 5);
        assert_eq!(results.insights.len(), 2);
    }
}
