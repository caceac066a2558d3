pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod relevance;

pub use enrich::{enrich, AffiliateLink};
pub use error::SetupError;
pub use pipeline::SearchPipeline;
pub use relevance::{filter_and_score, RelevanceRules, ScoredListing};
