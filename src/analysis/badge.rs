use serde::Serialize;

/// Per-tab badge, mirroring the last analysis outcome for that tab.
/// Each state maps to a fixed (text, color) pair rendered by the shim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStatus {
    #[default]
    Idle,
    Analyzing,
    Clickbait,
    Legitimate,
    Error,
}

impl BadgeStatus {
    pub fn text(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Analyzing => "...",
            Self::Clickbait => "CB!",
            Self::Legitimate => "OK",
            Self::Error => "ERR",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Idle | Self::Analyzing => "#888888",
            Self::Clickbait => "#E53935",
            Self::Legitimate => "#43A047",
            Self::Error => "#FF9800",
        }
    }
}
