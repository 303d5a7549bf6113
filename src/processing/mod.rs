//! Matching and scoring core

pub mod normalizer;
pub mod taxonomy;
pub mod keywords;
pub mod fuzzy;
pub mod skill_matcher;
pub mod embeddings;
pub mod embedding_manager;
pub mod analyzer;
