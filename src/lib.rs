// Research Vibe Navigator - scores a research idea or abstract and maps it to venues, papers and a roadmap

pub mod analysis;
pub mod config;
pub mod llm;
pub mod tui; // Terminal User Interface
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use analysis::{AnalysisClient, AnalysisMode, AnalysisRequest, AnalysisResult, Analyzer};
pub use config::Config;
