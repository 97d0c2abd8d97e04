//! Analysis data model: the wire payload and the normalized result.

use serde::{Deserialize, Serialize};

use crate::types::{AppError, AppResult};

/// What the user is submitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// A terse topic; the model writes an abstract first
    #[default]
    Idea,
    /// A finished abstract, evaluated as-is
    Abstract,
}

impl AnalysisMode {
    pub fn toggle(self) -> Self {
        match self {
            AnalysisMode::Idea => AnalysisMode::Abstract,
            AnalysisMode::Abstract => AnalysisMode::Idea,
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisMode::Idea => write!(f, "idea"),
            AnalysisMode::Abstract => write!(f, "abstract"),
        }
    }
}

/// One submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    input: String,
    mode: AnalysisMode,
    fast_track: bool,
}

impl AnalysisRequest {
    /// Fails on empty or whitespace-only input
    pub fn new(input: impl Into<String>, mode: AnalysisMode, fast_track: bool) -> AppResult<Self> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "research input must not be empty".to_string(),
            ));
        }
        Ok(Self {
            input,
            mode,
            fast_track,
        })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn fast_track(&self) -> bool {
        self.fast_track
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Methodology {
    pub mermaid_code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub title: String,
    pub year: i32,
    pub one_liner: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub github: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceRecommendation {
    pub name: String,
    pub url: String,
    pub reason: String,
    pub relevant_papers: Vec<Paper>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarMetric {
    pub metric: String,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub phase: String,
    pub description: String,
    pub timeline: String,
}

/// Raw payload as the model returns it, after schema validation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAnalysis {
    pub is_valid: bool,
    #[serde(default)]
    pub validation_feedback: Option<String>,
    #[serde(default)]
    pub generated_abstract: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// The validator accepts an integral float such as `72.0` as an integer;
    /// decoding rejects it, so it surfaces as a decode error.
    #[serde(default)]
    pub trend_match_score: Option<u8>,
    #[serde(default)]
    pub one_liner: Option<String>,
    #[serde(default)]
    pub methodology: Option<Methodology>,
    #[serde(default)]
    pub conferences: Option<Vec<ConferenceRecommendation>>,
    #[serde(default)]
    pub metrics: Option<Vec<RadarMetric>>,
    #[serde(default)]
    pub roadmap: Option<Vec<RoadmapStep>>,
}

/// Normalized content of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidAnalysis {
    pub generated_abstract: Option<String>,
    pub keywords: Vec<String>,
    pub trend_match_score: Option<u8>,
    pub one_liner: String,
    pub methodology: Methodology,
    pub conferences: Vec<ConferenceRecommendation>,
    pub metrics: Vec<RadarMetric>,
    pub roadmap: Vec<RoadmapStep>,
}

/// Outcome of one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisResult {
    Valid(ValidAnalysis),
    /// The backend judged the input not to be a research topic or abstract
    Invalid { feedback: Option<String> },
}

impl AnalysisResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, AnalysisResult::Valid(_))
    }

    pub fn as_valid(&self) -> Option<&ValidAnalysis> {
        match self {
            AnalysisResult::Valid(analysis) => Some(analysis),
            AnalysisResult::Invalid { .. } => None,
        }
    }
}

impl From<WireAnalysis> for AnalysisResult {
    fn from(wire: WireAnalysis) -> Self {
        if !wire.is_valid {
            // Content fields are dropped here, whatever the model sent
            return AnalysisResult::Invalid {
                feedback: non_blank(wire.validation_feedback),
            };
        }

        let conferences = wire
            .conferences
            .unwrap_or_default()
            .into_iter()
            .map(|mut conference| {
                for paper in &mut conference.relevant_papers {
                    paper.github = non_blank(paper.github.take());
                }
                conference
            })
            .collect();

        AnalysisResult::Valid(ValidAnalysis {
            generated_abstract: non_blank(wire.generated_abstract),
            keywords: wire.keywords.unwrap_or_default(),
            trend_match_score: wire.trend_match_score,
            one_liner: wire.one_liner.unwrap_or_default(),
            methodology: wire.methodology.unwrap_or_default(),
            conferences,
            metrics: wire.metrics.unwrap_or_default(),
            roadmap: wire.roadmap.unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Coarse reading of the trend match score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// Above 80
    Hot,
    /// Above 50
    Balanced,
    Cold,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score > 80 {
            ScoreBand::Hot
        } else if score > 50 {
            ScoreBand::Balanced
        } else {
            ScoreBand::Cold
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ScoreBand::Hot => "🔥",
            ScoreBand::Balanced => "⚖️",
            ScoreBand::Cold => "❄️",
        }
    }
}
