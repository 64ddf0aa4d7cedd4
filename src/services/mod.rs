pub mod fetcher;
pub mod parser;
pub mod providers;
pub mod recommender;
pub mod selection;

pub use fetcher::CandidateFetcher;
pub use parser::ResponseParser;
pub use recommender::{Recommender, RecommenderSettings};
pub use selection::SelectionPolicy;
