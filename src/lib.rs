//! baitcheck: a local daemon that judges whether a page title is clickbait.
//!
//! A browser shim reports tab events and page HTML over a JSON API; the
//! daemon extracts the main content, asks a locally hosted LLM (Ollama or
//! KoboldAI) for a verdict, caches verdicts per tab, and tracks per-tab
//! badge state. A second pipeline analyzes links the user has not visited
//! by fetching them directly.

pub mod analysis;
pub mod api;
pub mod app_state;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod linkcheck;
pub mod llm;
pub mod notify;
pub mod settings;
pub mod verdict;
