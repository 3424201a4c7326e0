pub mod engine;
pub mod session;

pub use engine::{CrawlEngine, EngineOptions};
pub use session::CrawlSession;
