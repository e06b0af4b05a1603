//! Storage collaborator contracts.

pub mod documents;
