//! Dashboard tabs and their stable view names.

use crate::badge::controller::MESSAGES_VIEW;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardTab {
    #[default]
    Overview,
    Projects,
    Reports,
    Analytics,
    Messages,
    Team,
    Settings,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 7] = [
        Self::Overview,
        Self::Projects,
        Self::Reports,
        Self::Analytics,
        Self::Messages,
        Self::Team,
        Self::Settings,
    ];

    /// View name reported to focus-driven controllers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Projects => "projects",
            Self::Reports => "reports",
            Self::Analytics => "analytics",
            Self::Messages => MESSAGES_VIEW,
            Self::Team => "team",
            Self::Settings => "settings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == normalized)
    }
}
