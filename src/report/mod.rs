use serde::Serialize;

use crate::{AnalysisResult, metadata::MetadataSummary};

/// Verdict regrouped per hypothesis, with the metadata probe alongside.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorReport {
    pub is_authentic: bool,
    pub confidence: u32,
    pub reasoning: String,
    pub indicators: Indicators,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub ai_generation: HypothesisIndicator,
    pub manipulation: HypothesisIndicator,
    pub metadata: MetadataSummary,
}

#[derive(Debug, Serialize)]
pub struct HypothesisIndicator {
    pub detected: bool,
    pub confidence: u32,
    pub evidence: Vec<String>,
}

impl IndicatorReport {
    pub fn new(result: &AnalysisResult, metadata: MetadataSummary) -> Self {
        Self {
            is_authentic: result.is_authentic,
            confidence: result.confidence,
            reasoning: result.reasoning.clone(),
            indicators: Indicators {
                ai_generation: HypothesisIndicator {
                    detected: result.ai_generation_detected,
                    confidence: result.ai_generation_confidence,
                    evidence: result.ai_generation_evidence.clone(),
                },
                manipulation: HypothesisIndicator {
                    detected: result.manipulation_detected,
                    confidence: result.manipulation_confidence,
                    evidence: result.manipulation_evidence.clone(),
                },
                metadata,
            },
        }
    }
}

impl From<&AnalysisResult> for IndicatorReport {
    fn from(result: &AnalysisResult) -> Self {
        Self::new(result, MetadataSummary::default())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub error: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
