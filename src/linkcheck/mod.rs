//! Context-menu link analysis: check a link for clickbait without visiting.
//!
//! This pipeline fetches the target page itself rather than going through a
//! browser tab, runs the same extraction, and talks to the provider through
//! a fresh connector built from the settings as they are right now. Progress
//! and verdicts surface as notifications; the verdict also lands in the
//! persistent by-URL cache.

pub mod cache;

pub use cache::{LinkCache, LinkCacheError, LinkVerdict, MAX_ENTRIES};

use crate::analysis::{BadgeStatus, Coordinator, TabId};
use crate::extractor::{self, ExtractError};
use crate::fetcher::{self, FetchError};
use crate::llm::{LlmConnector, LlmError, clickbait_prompt};
use crate::notify::Notifier;
use crate::settings::SettingsStore;
use crate::verdict::parse_verdict;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LinkAnalyzeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("content extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Local LLM is not available. Please ensure it is running.")]
    ProviderUnavailable,

    #[error("generation failed: {0}")]
    Generate(#[from] LlmError),
}

/// What the caller gets back for a link analysis.
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub url: String,
    pub title: String,
    pub is_clickbait: bool,
    pub explanation: String,
}

pub struct LinkAnalyzer {
    settings: Arc<SettingsStore>,
    notifier: Arc<Notifier>,
    cache: LinkCache,
}

impl LinkAnalyzer {
    pub fn new(settings: Arc<SettingsStore>, notifier: Arc<Notifier>, cache: LinkCache) -> Self {
        Self {
            settings,
            notifier,
            cache,
        }
    }

    pub fn cache(&self) -> &LinkCache {
        &self.cache
    }

    /// Analyze `url` on behalf of the tab that opened the context menu.
    /// The invoking tab's badge reflects progress and outcome.
    pub async fn analyze(
        &self,
        url: &str,
        tab_id: TabId,
        coordinator: &Coordinator,
    ) -> Result<LinkReport, LinkAnalyzeError> {
        let notify = self.settings.settings().options.show_notifications;

        coordinator.set_badge(tab_id, BadgeStatus::Analyzing);
        if notify {
            self.notifier
                .send("Analyzing Link", "Checking if the link is clickbait...")
                .await;
        }

        match self.run_pipeline(url).await {
            Ok(report) => {
                let status = if report.is_clickbait {
                    BadgeStatus::Clickbait
                } else {
                    BadgeStatus::Legitimate
                };
                coordinator.set_badge(tab_id, status);

                if notify {
                    let (title, wording) = if report.is_clickbait {
                        ("Clickbait Detected!", "appears to be clickbait")
                    } else {
                        ("Not Clickbait", "does not appear to be clickbait")
                    };
                    self.notifier
                        .send(
                            title,
                            &format!(
                                "\"{}\" {}. {}",
                                report.title, wording, report.explanation
                            ),
                        )
                        .await;
                }

                // A verdict that cannot be persisted is still a verdict.
                if let Err(err) = self.cache.insert(
                    url,
                    LinkVerdict {
                        is_clickbait: report.is_clickbait,
                        title: report.title.clone(),
                        explanation: report.explanation.clone(),
                        timestamp: Utc::now(),
                    },
                ) {
                    warn!(%url, error = %err, "failed to persist link verdict");
                }

                info!(%url, clickbait = report.is_clickbait, "link analyzed");
                Ok(report)
            }
            Err(err) => {
                warn!(%url, error = %err, "link analysis failed");
                coordinator.set_badge(tab_id, BadgeStatus::Error);
                if notify {
                    self.notifier
                        .send(
                            "Analysis Error",
                            &format!("Failed to analyze the link: {err}"),
                        )
                        .await;
                }
                Err(err)
            }
        }
    }

    async fn run_pipeline(&self, url: &str) -> Result<LinkReport, LinkAnalyzeError> {
        let page = fetcher::fetch(url).await?;
        let data = extractor::extract(&page.body, url)?;

        // Fresh connector: settings changes apply immediately here.
        let connector = LlmConnector::new(self.settings.settings());
        if !connector.check_availability().await {
            return Err(LinkAnalyzeError::ProviderUnavailable);
        }

        let prompt = clickbait_prompt(&data);
        let response = connector.generate(&prompt).await?;
        let verdict = parse_verdict(&response);

        Ok(LinkReport {
            url: url.to_string(),
            title: data.title,
            is_clickbait: verdict.is_clickbait,
            explanation: verdict.explanation,
        })
    }
}
