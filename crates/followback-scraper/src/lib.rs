pub mod client;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod relationships;
mod retry;
pub mod sources;
pub mod types;

pub use client::InstagramClient;
pub use error::{FailureKind, SourceError};
pub use pagination::{collect_pages, Page, PaginationLimits};
pub use relationships::{default_relationship_sources, RelationshipLists, RelationshipSource};
pub use sources::{default_profile_sources, Endpoints, ProfileSource, ScraperSettings};
