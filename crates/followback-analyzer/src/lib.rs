//! Analysis pipeline for followback.
//!
//! Walks the profile adapters until one yields a valid snapshot, resolves the
//! follower/following lists, degrades to profile-only or estimated data, and
//! memoizes results per normalized username.

pub mod cache;
pub mod error;
pub mod estimate;
pub mod orchestrator;
pub mod pipeline;
pub mod resolver;

pub use cache::ResultCache;
pub use error::AnalyzeError;
pub use estimate::{estimate, Archetype};
pub use orchestrator::SourceChain;
pub use pipeline::{Analyzer, AnalyzerSettings};
pub use resolver::RelationshipResolver;
