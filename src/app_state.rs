use crate::analysis::Coordinator;
use crate::config::Config;
use crate::linkcheck::{LinkAnalyzer, LinkCache};
use crate::llm::LlmConnector;
use crate::notify::Notifier;
use crate::settings::{Settings, SettingsError, SettingsStore, SettingsUpdate};
use std::sync::{Arc, RwLock};

/// Everything the handlers share. All interior state is explicitly owned
/// here; nothing lives in module globals.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<SettingsStore>,
    pub coordinator: Arc<Coordinator>,
    pub link_analyzer: Arc<LinkAnalyzer>,
    connector: Arc<RwLock<Arc<LlmConnector>>>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let settings = Arc::new(SettingsStore::open(config.data_dir())?);
        let notifier = Arc::new(Notifier::new(
            config.notify_webhook().map(|s| s.to_string()),
        ));
        let link_cache = LinkCache::open(config.data_dir())?;

        let connector = Arc::new(RwLock::new(Arc::new(LlmConnector::new(
            settings.settings(),
        ))));

        Ok(Self {
            coordinator: Arc::new(Coordinator::new()),
            link_analyzer: Arc::new(LinkAnalyzer::new(
                settings.clone(),
                notifier,
                link_cache,
            )),
            settings,
            connector,
        })
    }

    /// The shared connector used by page analysis. Rebuilt on settings
    /// updates; the link analyzer builds its own fresh instances instead.
    pub fn connector(&self) -> Arc<LlmConnector> {
        self.connector.read().expect("connector lock poisoned").clone()
    }

    /// Persist a settings update and swap in a connector built from the
    /// merged settings.
    pub fn update_settings(&self, update: SettingsUpdate) -> Result<Settings, SettingsError> {
        let merged = self.settings.update(update)?;
        let fresh = Arc::new(LlmConnector::new(merged.clone()));
        *self.connector.write().expect("connector lock poisoned") = fresh;
        Ok(merged)
    }
}
