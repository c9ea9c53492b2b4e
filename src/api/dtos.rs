use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, BadgeStatus, TabId};
use crate::extractor::PageData;
use crate::linkcheck::{LinkReport, LinkVerdict};
use crate::settings::Settings;

/// Body for page analysis and bare extraction: the tab's URL plus the live
/// document HTML as serialized by the browser shim.
#[derive(Debug, Deserialize)]
pub struct PagePayload {
    pub url: String,
    pub html: String,
}

/// Envelope for analyze calls. Failed analyses are still HTTP 200; the
/// shim switches on `success` exactly as the message-passing version did.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub cached: bool,
    pub in_progress: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    pub fn fresh(result: AnalysisResult) -> Self {
        Self {
            success: true,
            cached: false,
            in_progress: false,
            result: Some(result),
            error: None,
        }
    }

    pub fn cached(result: AnalysisResult) -> Self {
        Self {
            success: true,
            cached: true,
            in_progress: false,
            result: Some(result),
            error: None,
        }
    }

    pub fn in_progress() -> Self {
        Self {
            success: true,
            cached: false,
            in_progress: true,
            result: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            cached: false,
            in_progress: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub result: Option<AnalysisResult>,
    pub is_analyzing: bool,
}

#[derive(Debug, Serialize)]
pub struct BadgeResponse {
    pub status: BadgeStatus,
    pub text: String,
    pub color: String,
}

impl From<BadgeStatus> for BadgeResponse {
    fn from(status: BadgeStatus) -> Self {
        Self {
            status,
            text: status.text().to_string(),
            color: status.color().to_string(),
        }
    }
}

/// Tab lifecycle event from the shim: content script ready, or a completed
/// navigation. The URL decides whether auto-analysis applies.
#[derive(Debug, Deserialize)]
pub struct TabEvent {
    pub url: String,
}

/// Whether the shim should schedule an automatic analysis, and after how
/// long. The delay gives the page time to finish rendering.
#[derive(Debug, Serialize)]
pub struct TabEventResponse {
    pub schedule_analysis: bool,
    pub delay_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: Settings,
}

#[derive(Debug, Serialize)]
pub struct UpdateSettingsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub setup_complete: bool,
}

#[derive(Debug, Deserialize)]
pub struct LinkAnalyzeRequest {
    pub url: String,
    pub tab_id: TabId,
}

#[derive(Debug, Serialize)]
pub struct LinkAnalyzeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<LinkReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkResultQuery {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct LinkResultResponse {
    pub result: Option<LinkVerdict>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PageData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
