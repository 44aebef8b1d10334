//! `AppDirectory` - the app's root-level navigation domains.

use lodestar::Directory;

/// Every root-level navigation domain in the app.
///
/// Each variant owns one URL path segment and maps to exactly one root
/// container (see [`AppDirectory::root`]). The set is closed; adding a
/// directory means adding a variant here and a handler arm in
/// [`handler_for`](crate::handler_for), and the compiler points at every
/// match that needs updating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppDirectory {
    /// Launch screen, shown while startup work completes.
    Launch,
    /// First-run onboarding flow.
    Onboarding,
    /// Main portfolio overview.
    Home,
    /// Wallet and transactions.
    Wallet,
    /// App settings.
    Settings,
    /// Price and news alerts.
    Alerts,
}

impl Directory for AppDirectory {
    fn segment(&self) -> &'static str {
        match self {
            Self::Launch => "launch",
            Self::Onboarding => "onboarding",
            Self::Home => "home",
            Self::Wallet => "wallet",
            Self::Settings => "settings",
            Self::Alerts => "alerts",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "launch" => Some(Self::Launch),
            "onboarding" => Some(Self::Onboarding),
            "home" => Some(Self::Home),
            "wallet" => Some(Self::Wallet),
            "settings" => Some(Self::Settings),
            "alerts" => Some(Self::Alerts),
            _ => None,
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Launch,
            Self::Onboarding,
            Self::Home,
            Self::Wallet,
            Self::Settings,
            Self::Alerts,
        ]
    }
}
