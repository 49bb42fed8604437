pub mod providers;
pub mod recommender;

pub use recommender::RecommendationService;
