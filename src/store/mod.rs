use std::collections::HashMap;

use chrono::Utc;

use crate::core::error::{Error, Result};
use crate::core::types::{Idea, IdeaAnalytics, IdeaDraft, IdeaId, IdeaPatch};

/// Generic repository contract over the idea store. One concrete
/// implementation exists; the trait marks the seam a persistent backend
/// would plug into.
pub trait IdeaRepository {
    fn create(&mut self, draft: IdeaDraft) -> Idea;
    fn find(&self, id: &IdeaId) -> Option<&Idea>;
    fn update(&mut self, id: &IdeaId, patch: IdeaPatch) -> Result<Idea>;
    fn delete(&mut self, id: &IdeaId) -> bool;
}

/// Canonical in-memory map of ideas. Sole source of truth; indexes and
/// caches are derived from it.
#[derive(Debug, Default)]
pub struct IdeaStore {
    ideas: HashMap<IdeaId, Idea>,
}

impl IdeaStore {
    pub fn new() -> Self {
        IdeaStore {
            ideas: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ideas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Idea> {
        self.ideas.values()
    }

    /// Direct mutable access for the engagement path, which edits
    /// counters rather than patch fields.
    pub(crate) fn get_mut(&mut self, id: &IdeaId) -> Option<&mut Idea> {
        self.ideas.get_mut(id)
    }
}

#[cfg(test)]
impl IdeaStore {
    /// Overwrite a record wholesale, bypassing patch semantics. Unit
    /// tests use this to fabricate timestamps and counters.
    pub(crate) fn replace_for_test(&mut self, idea: Idea) {
        self.ideas.insert(idea.id, idea);
    }
}

impl IdeaRepository for IdeaStore {
    fn create(&mut self, draft: IdeaDraft) -> Idea {
        let now = Utc::now();
        let idea = Idea {
            id: IdeaId::new(),
            user_id: draft.user_id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            target_audience: draft.target_audience,
            implementation: draft.implementation,
            tags: draft.tags,
            ai_metadata: draft.ai_metadata,
            user_feedback: None,
            analytics: IdeaAnalytics::default(),
            status: draft.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.ideas.insert(idea.id, idea.clone());
        idea
    }

    fn find(&self, id: &IdeaId) -> Option<&Idea> {
        self.ideas.get(id)
    }

    fn update(&mut self, id: &IdeaId, patch: IdeaPatch) -> Result<Idea> {
        let idea = self
            .ideas
            .get_mut(id)
            .ok_or_else(|| Error::not_found(id))?;

        if let Some(title) = patch.title {
            idea.title = title;
        }
        if let Some(description) = patch.description {
            idea.description = description;
        }
        if let Some(category) = patch.category {
            idea.category = category;
        }
        if let Some(target_audience) = patch.target_audience {
            idea.target_audience = target_audience;
        }
        if let Some(implementation) = patch.implementation {
            idea.implementation = implementation;
        }
        if let Some(tags) = patch.tags {
            idea.tags = tags;
        }
        if let Some(status) = patch.status {
            idea.status = status;
        }
        if let Some(feedback) = patch.user_feedback {
            idea.user_feedback = Some(feedback);
        }
        idea.updated_at = Utc::now();

        Ok(idea.clone())
    }

    fn delete(&mut self, id: &IdeaId) -> bool {
        self.ideas.remove(id).is_some()
    }
}
