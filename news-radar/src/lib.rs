pub mod config;
pub mod digest;
pub mod fetcher;
pub mod parser;
pub mod pipeline;
pub mod processing;
pub mod sources;
pub mod state;
pub mod traits;
pub mod types;
pub mod utils;

pub use types::*;
pub use config::RadarConfig;
pub use digest::DigestRenderer;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use pipeline::{RadarPipeline, RunPhase, RunReport, SourceHealth};
pub use processing::RelevanceScorer;
pub use sources::{GovBrListingSource, RssFeedSource};
pub use state::{JsonStateFile, MemoryState, SeenStateStore};
pub use traits::PullFeed;
