use std::collections::{HashMap, HashSet};

use crate::analysis::tokenizer::Tokenizer;
use crate::core::types::{Idea, IdeaId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOp {
    Insert,
    Remove,
}

/// Four inverted indexes derived from the store: text (token → ids),
/// category, owner and tag (literal value → ids).
///
/// Invariant: an idea present in the store has entries in every index its
/// searchable fields qualify it for, and a deleted idea resolves in none.
#[derive(Debug)]
pub struct IndexManager {
    text: HashMap<String, HashSet<IdeaId>>,
    category: HashMap<String, HashSet<IdeaId>>,
    owner: HashMap<String, HashSet<IdeaId>>,
    tag: HashMap<String, HashSet<IdeaId>>,
    tokenizer: Tokenizer,
}

impl IndexManager {
    pub fn new(tokenizer: Tokenizer) -> Self {
        IndexManager {
            text: HashMap::new(),
            category: HashMap::new(),
            owner: HashMap::new(),
            tag: HashMap::new(),
            tokenizer,
        }
    }

    /// Symmetric insert/remove of one idea across all four indexes.
    pub fn apply(&mut self, idea: &Idea, op: IndexOp) {
        for token in self.tokenizer.tokenize(&Self::searchable_text(idea)) {
            Self::apply_entry(&mut self.text, token, idea.id, op);
        }
        Self::apply_entry(&mut self.category, idea.category.clone(), idea.id, op);
        Self::apply_entry(&mut self.owner, idea.user_id.clone(), idea.id, op);
        for tag in &idea.tags {
            Self::apply_entry(&mut self.tag, tag.clone(), idea.id, op);
        }
    }

    /// Whether an update changed any field the indexes are built from.
    /// Feedback-only and analytics-only updates skip reindexing.
    pub fn needs_reindex(old: &Idea, new: &Idea) -> bool {
        old.title != new.title
            || old.description != new.description
            || old.category != new.category
            || old.tag_set() != new.tag_set()
    }

    pub fn text_matches(&self, term: &str) -> Option<&HashSet<IdeaId>> {
        self.text.get(term)
    }

    pub fn by_category(&self, category: &str) -> Option<&HashSet<IdeaId>> {
        self.category.get(category)
    }

    pub fn by_owner(&self, user_id: &str) -> Option<&HashSet<IdeaId>> {
        self.owner.get(user_id)
    }

    pub fn by_tag(&self, tag: &str) -> Option<&HashSet<IdeaId>> {
        self.tag.get(tag)
    }

    pub fn term_count(&self) -> usize {
        self.text.len()
    }

    pub fn category_count(&self) -> usize {
        self.category.len()
    }

    pub fn owner_count(&self) -> usize {
        self.owner.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tag.len()
    }

    /// Concatenation of the fields the text index covers.
    fn searchable_text(idea: &Idea) -> String {
        let mut text = String::with_capacity(
            idea.title.len() + idea.description.len() + idea.implementation.len() + 32,
        );
        text.push_str(&idea.title);
        text.push(' ');
        text.push_str(&idea.description);
        text.push(' ');
        text.push_str(&idea.implementation);
        for tag in &idea.tags {
            text.push(' ');
            text.push_str(tag);
        }
        text
    }

    fn apply_entry(
        index: &mut HashMap<String, HashSet<IdeaId>>,
        key: String,
        id: IdeaId,
        op: IndexOp,
    ) {
        match op {
            IndexOp::Insert => {
                index.entry(key).or_default().insert(id);
            }
            IndexOp::Remove => {
                if let Some(ids) = index.get_mut(&key) {
                    ids.remove(&id);
                    // Clean up empty postings
                    if ids.is_empty() {
                        index.remove(&key);
                    }
                }
            }
        }
    }
}

impl Default for IndexManager {
    fn default() -> Self {
        IndexManager::new(Tokenizer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::core::types::{AiMetadata, IdeaAnalytics, IdeaStatus};

    fn sample_idea(title: &str, tags: &[&str]) -> Idea {
        let now = Utc::now();
        Idea {
            id: IdeaId::new(),
            user_id: "owner-1".to_string(),
            title: title.to_string(),
            description: "helps people stay organized".to_string(),
            category: "productivity".to_string(),
            target_audience: "professionals".to_string(),
            implementation: "mobile app".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ai_metadata: AiMetadata::default(),
            user_feedback: None,
            analytics: IdeaAnalytics::default(),
            status: IdeaStatus::Generated,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_populates_all_indexes() {
        let mut indexes = IndexManager::default();
        let idea = sample_idea("Smart planner", &["planning"]);
        indexes.apply(&idea, IndexOp::Insert);

        assert!(indexes.text_matches("smart").unwrap().contains(&idea.id));
        assert!(indexes.text_matches("planning").unwrap().contains(&idea.id));
        assert!(indexes.by_category("productivity").unwrap().contains(&idea.id));
        assert!(indexes.by_owner("owner-1").unwrap().contains(&idea.id));
        assert!(indexes.by_tag("planning").unwrap().contains(&idea.id));
    }

    #[test]
    fn remove_is_symmetric_and_cleans_empty_postings() {
        let mut indexes = IndexManager::default();
        let idea = sample_idea("Smart planner", &["planning"]);
        indexes.apply(&idea, IndexOp::Insert);
        indexes.apply(&idea, IndexOp::Remove);

        assert!(indexes.text_matches("smart").is_none());
        assert!(indexes.by_category("productivity").is_none());
        assert!(indexes.by_owner("owner-1").is_none());
        assert!(indexes.by_tag("planning").is_none());
        assert_eq!(indexes.term_count(), 0);
    }

    #[test]
    fn reindex_diff_ignores_tag_order() {
        let a = sample_idea("Same", &["one", "two"]);
        let mut b = a.clone();
        b.tags = vec!["two".to_string(), "one".to_string()];
        assert!(!IndexManager::needs_reindex(&a, &b));

        b.tags.push("three".to_string());
        assert!(IndexManager::needs_reindex(&a, &b));
    }

    #[test]
    fn reindex_diff_ignores_feedback_fields() {
        let a = sample_idea("Same", &[]);
        let mut b = a.clone();
        b.analytics.views = 100;
        b.user_feedback = Some(Default::default());
        assert!(!IndexManager::needs_reindex(&a, &b));

        b.title = "Different".to_string();
        assert!(IndexManager::needs_reindex(&a, &b));
    }
}
