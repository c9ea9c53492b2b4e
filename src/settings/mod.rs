//! Persisted analysis settings.
//!
//! The whole settings object is stored as a single JSON document, loaded at
//! startup and rewritten on every update. Updates merge shallowly: a
//! top-level section present in the update replaces that section wholesale.
//! There is no schema versioning.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use tracing::info;

const SETTINGS_FILE: &str = "settings.json";
const SETUP_MARKER_FILE: &str = "setup-complete";

/// Which local LLM backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Ollama,
    Koboldai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaParameters {
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
    pub parameters: OllamaParameters,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama2".to_string(),
            parameters: OllamaParameters {
                temperature: 0.3,
                max_tokens: 500,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KoboldParameters {
    pub temperature: f32,
    pub max_length: u32,
    pub max_context_length: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KoboldSettings {
    pub base_url: String,
    pub parameters: KoboldParameters,
}

impl Default for KoboldSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_string(),
            parameters: KoboldParameters {
                temperature: 0.7,
                max_length: 500,
                max_context_length: 2048,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Analyze pages automatically after navigation.
    pub auto_analyze: bool,
    /// Emit notifications for link-analysis verdicts.
    pub show_notifications: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            auto_analyze: false,
            show_notifications: true,
        }
    }
}

/// The full persisted settings object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub provider: Provider,
    pub ollama: OllamaSettings,
    pub koboldai: KoboldSettings,
    pub options: AnalysisOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: Provider::Ollama,
            ollama: OllamaSettings::default(),
            koboldai: KoboldSettings::default(),
            options: AnalysisOptions::default(),
        }
    }
}

/// A partial settings object: only the sections present are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub provider: Option<Provider>,
    pub ollama: Option<OllamaSettings>,
    pub koboldai: Option<KoboldSettings>,
    pub options: Option<AnalysisOptions>,
}

impl Settings {
    /// Shallow merge: each section in the update replaces the existing
    /// section as a whole.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(provider) = update.provider {
            self.provider = provider;
        }
        if let Some(ollama) = update.ollama {
            self.ollama = ollama;
        }
        if let Some(koboldai) = update.koboldai {
            self.koboldai = koboldai;
        }
        if let Some(options) = update.options {
            self.options = options;
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// File-backed settings store with an in-memory copy for reads.
///
/// Also owns the setup-complete flag, which is a marker file so that it
/// survives independently of the settings document.
pub struct SettingsStore {
    data_dir: PathBuf,
    current: RwLock<Settings>,
}

impl SettingsStore {
    /// Open the store under `data_dir`, creating the directory if needed.
    /// A missing settings file means defaults; a malformed one is an error
    /// rather than a silent reset.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        let path = data_dir.join(SETTINGS_FILE);
        let current = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            Settings::default()
        };

        Ok(Self {
            data_dir,
            current: RwLock::new(current),
        })
    }

    pub fn settings(&self) -> Settings {
        self.current.read().expect("settings lock poisoned").clone()
    }

    /// Apply a shallow update and persist the merged document.
    pub fn update(&self, update: SettingsUpdate) -> Result<Settings, SettingsError> {
        let mut guard = self.current.write().expect("settings lock poisoned");
        guard.apply(update);
        let merged = guard.clone();
        drop(guard);

        self.save(&merged)?;
        info!(provider = ?merged.provider, "settings updated");
        Ok(merged)
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let path = self.data_dir.join(SETTINGS_FILE);
        let raw = serde_json::to_string_pretty(settings)?;
        fs::write(path, raw)?;
        Ok(())
    }

    pub fn setup_complete(&self) -> bool {
        self.data_dir.join(SETUP_MARKER_FILE).exists()
    }

    pub fn mark_setup_complete(&self) -> Result<(), SettingsError> {
        fs::write(self.data_dir.join(SETUP_MARKER_FILE), b"")?;
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
