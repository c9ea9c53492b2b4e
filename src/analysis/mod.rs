//! Page-analysis coordination: per-tab result cache, per-tab in-flight
//! registry, and badge state.
//!
//! The in-flight registry is keyed by tab so analyses for different tabs
//! never disturb each other's visibility, and a repeated request for a tab
//! that is already being analyzed is answered without issuing a duplicate
//! LLM call.

pub mod badge;

pub use badge::BadgeStatus;

use crate::extractor::{self, ExtractError};
use crate::llm::{LlmConnector, LlmError, clickbait_prompt};
use crate::verdict::parse_verdict;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub type TabId = u64;

/// Verdict for one tab's currently loaded page. Held in memory only and
/// dropped when the tab navigates.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub is_clickbait: bool,
    pub explanation: String,
    pub raw_response: String,
    pub url: String,
}

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Local LLM is not available. Please ensure it is running.")]
    ProviderUnavailable,

    #[error("content extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("generation failed: {0}")]
    Generate(#[from] LlmError),
}

/// How an analyze request was answered.
#[derive(Debug)]
pub enum AnalyzeOutcome {
    /// A fresh verdict was produced and cached.
    Fresh(AnalysisResult),
    /// The cached verdict for this tab was returned; no network traffic.
    Cached(AnalysisResult),
    /// An analysis for this tab is already running.
    InProgress,
}

pub struct Coordinator {
    results: DashMap<TabId, AnalysisResult>,
    badges: DashMap<TabId, BadgeStatus>,
    in_flight: DashMap<TabId, DateTime<Utc>>,
}

/// Releases a tab's in-flight slot on drop, so a cancelled analysis (the
/// handler future dropped on client disconnect) cannot wedge the tab.
struct InFlightGuard<'a> {
    registry: &'a DashMap<TabId, DateTime<Utc>>,
    tab_id: TabId,
    started: DateTime<Utc>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.remove(&self.tab_id);
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            results: DashMap::new(),
            badges: DashMap::new(),
            in_flight: DashMap::new(),
        }
    }

    /// Analyze the page a tab currently shows. `html` is the live document
    /// as shipped by the browser shim; `url` is the tab's address.
    pub async fn analyze(
        &self,
        tab_id: TabId,
        url: &str,
        html: &str,
        connector: &LlmConnector,
    ) -> Result<AnalyzeOutcome, AnalyzeError> {
        if let Some(cached) = self.results.get(&tab_id) {
            debug!(tab_id, "returning cached verdict");
            return Ok(AnalyzeOutcome::Cached(cached.clone()));
        }

        // Claim the in-flight slot for this tab atomically. The guard frees
        // it again however this future ends, including cancellation.
        let guard = match self.in_flight.entry(tab_id) {
            Entry::Occupied(_) => return Ok(AnalyzeOutcome::InProgress),
            Entry::Vacant(slot) => {
                let started = Utc::now();
                slot.insert(started);
                InFlightGuard {
                    registry: &self.in_flight,
                    tab_id,
                    started,
                }
            }
        };

        self.set_badge(tab_id, BadgeStatus::Analyzing);
        let outcome = self.run_pipeline(tab_id, url, html, connector).await;
        let elapsed_ms = (Utc::now() - guard.started).num_milliseconds();
        drop(guard);

        match outcome {
            Ok(result) => {
                let status = if result.is_clickbait {
                    BadgeStatus::Clickbait
                } else {
                    BadgeStatus::Legitimate
                };
                self.set_badge(tab_id, status);
                self.results.insert(tab_id, result.clone());
                info!(
                    tab_id,
                    clickbait = result.is_clickbait,
                    elapsed_ms,
                    "analysis finished"
                );
                Ok(AnalyzeOutcome::Fresh(result))
            }
            Err(err) => {
                warn!(tab_id, error = %err, "analysis failed");
                self.set_badge(tab_id, BadgeStatus::Error);
                Err(err)
            }
        }
    }

    async fn run_pipeline(
        &self,
        tab_id: TabId,
        url: &str,
        html: &str,
        connector: &LlmConnector,
    ) -> Result<AnalysisResult, AnalyzeError> {
        if !connector.check_availability().await {
            return Err(AnalyzeError::ProviderUnavailable);
        }

        let page = extractor::extract(html, url)?;
        debug!(tab_id, title = %page.title, chars = page.content.len(), "page extracted");

        let prompt = clickbait_prompt(&page);
        let response = connector.generate(&prompt).await?;
        let verdict = parse_verdict(&response);

        Ok(AnalysisResult {
            is_clickbait: verdict.is_clickbait,
            explanation: verdict.explanation,
            raw_response: verdict.raw_response,
            url: page.url,
        })
    }

    /// A tab finished loading a new page: its old verdict no longer applies,
    /// analyzed or not. Any stale in-flight marker goes with it.
    pub fn navigation_complete(&self, tab_id: TabId) {
        self.results.remove(&tab_id);
        self.badges.remove(&tab_id);
        self.in_flight.remove(&tab_id);
        debug!(tab_id, "navigation cleared cached verdict");
    }

    pub fn cached_result(&self, tab_id: TabId) -> Option<AnalysisResult> {
        self.results.get(&tab_id).map(|r| r.clone())
    }

    pub fn is_analyzing(&self, tab_id: TabId) -> bool {
        self.in_flight.contains_key(&tab_id)
    }

    pub fn badge(&self, tab_id: TabId) -> BadgeStatus {
        self.badges
            .get(&tab_id)
            .map(|b| *b)
            .unwrap_or(BadgeStatus::Idle)
    }

    pub fn set_badge(&self, tab_id: TabId, status: BadgeStatus) {
        self.badges.insert(tab_id, status);
    }
}
