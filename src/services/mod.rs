pub mod content_search;
pub mod liked;
pub mod providers;
pub mod search_recorder;
pub mod trending;

pub use content_search::ContentSearch;
pub use liked::LikedRepository;
pub use providers::{ContentProvider, TmdbProvider};
pub use search_recorder::{RecordOutcome, SearchRecorder};
pub use trending::TrendingSampler;
