//! In-memory idea indexing, search and scoring engine.
//!
//! The [`core::engine::IdeaEngine`] facade owns the canonical idea store
//! and keeps four inverted indexes (text, category, owner, tag), derived
//! engagement/viral scores and a TTL point-lookup cache synchronized
//! with it. Reads go through search, filtered queries or the cache;
//! every mutation updates store, indexes and cache as one unit.

pub mod analysis;
pub mod cache;
pub mod core;
pub mod index;
pub mod query;
pub mod scoring;
pub mod search;
pub mod store;
pub mod trending;
