//! Persistent by-URL verdict cache for the link analyzer.
//!
//! Unlike the per-tab cache this one survives restarts; it is a single JSON
//! document capped at `MAX_ENTRIES`, evicting the oldest timestamps first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use thiserror::Error;

pub const MAX_ENTRIES: usize = 100;
const CACHE_FILE: &str = "analyzed-links.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkVerdict {
    pub is_clickbait: bool,
    pub title: String,
    pub explanation: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum LinkCacheError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed link cache file: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub struct LinkCache {
    path: PathBuf,
    entries: RwLock<HashMap<String, LinkVerdict>>,
}

impl LinkCache {
    /// Open the cache file under `data_dir`; a missing file is an empty cache.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, LinkCacheError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        let path = data_dir.join(CACHE_FILE);

        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn get(&self, url: &str) -> Option<LinkVerdict> {
        self.entries
            .read()
            .expect("link cache lock poisoned")
            .get(url)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("link cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a verdict, evicting oldest-timestamp entries beyond the cap,
    /// then persist the whole document.
    pub fn insert(&self, url: &str, verdict: LinkVerdict) -> Result<(), LinkCacheError> {
        let snapshot = {
            let mut entries = self.entries.write().expect("link cache lock poisoned");
            entries.insert(url.to_string(), verdict);

            while entries.len() > MAX_ENTRIES {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, v)| v.timestamp)
                    .map(|(url, _)| url.clone());
                match oldest {
                    Some(url) => entries.remove(&url),
                    None => break,
                };
            }

            entries.clone()
        };

        let raw = serde_json::to_string(&snapshot)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
