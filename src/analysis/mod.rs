//! Research analysis core.
//!
//! A submission flows through [`prompt::compose`], one structured call in
//! [`client::AnalysisClient`], validation against the contract in [`schema`],
//! and normalization into [`model::AnalysisResult`].

pub mod client;
pub mod links;
pub mod model;
pub mod prompt;
pub mod schema;

pub use client::{AnalysisClient, AnalysisError, Analyzer};
pub use model::{
    AnalysisMode, AnalysisRequest, AnalysisResult, ConferenceRecommendation, Methodology, Paper,
    RadarMetric, RoadmapStep, ScoreBand, ValidAnalysis,
};
pub use schema::{ContractValidator, SchemaViolation};
