//! Per-directory route enums and the `DirectoryRoute` trait.
//!
//! A route is one screen within a directory. Its raw value is the URL
//! segment that names it; the default route of every directory has the
//! empty raw value, so `sauron://wallet` and `sauron://wallet/` both mean
//! "wallet, main screen".
//!
//! Raw values are raw, not URL-encoded: [`HomeRoute::EditPortfolio`] is
//! literally `"edit portfolio"`, and only its encoded form
//! `edit%20portfolio` appears in a well-formed URL. A URL carrying the
//! unencoded-looking segment `edit_portfolio` names no route and fails
//! dispatch.

use std::fmt::Debug;

/// One directory's closed set of routes.
///
/// `path_to` yields the full navigation stack for a route, root screen
/// first. Jumping straight to a deep screen still pushes the intermediate
/// stack, so back navigation lands where the user expects.
pub trait DirectoryRoute: Copy + Eq + Debug + Send + Sync + 'static {
    /// The raw URL segment naming this route. Empty for the default route.
    fn segment(&self) -> &'static str;

    /// Resolve a raw segment to a route. `""` resolves to the default
    /// route; anything unrecognized is `None`, never a fallback.
    fn from_segment(segment: &str) -> Option<Self>;

    /// The navigation stack for this route, starting at the directory's
    /// default screen.
    fn path_to(self) -> Vec<Self>;
}

macro_rules! single_route {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            /// The directory's only screen.
            Main,
        }

        impl DirectoryRoute for $name {
            fn segment(&self) -> &'static str {
                ""
            }

            fn from_segment(segment: &str) -> Option<Self> {
                (segment.is_empty()).then_some(Self::Main)
            }

            fn path_to(self) -> Vec<Self> {
                vec![Self::Main]
            }
        }
    };
}

single_route! {
    /// Routes within the launch directory.
    LaunchRoute
}

single_route! {
    /// Routes within the wallet directory.
    WalletRoute
}

single_route! {
    /// Routes within the alerts directory.
    AlertsRoute
}

/// Routes within the onboarding directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OnboardingRoute {
    /// Onboarding entry screen.
    Main,
    /// Guided portfolio curation step.
    PortfolioCuration,
}

impl DirectoryRoute for OnboardingRoute {
    fn segment(&self) -> &'static str {
        match self {
            Self::Main => "",
            Self::PortfolioCuration => "portfolio_curation",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "" => Some(Self::Main),
            "portfolio_curation" => Some(Self::PortfolioCuration),
            _ => None,
        }
    }

    fn path_to(self) -> Vec<Self> {
        match self {
            Self::Main => vec![Self::Main],
            Self::PortfolioCuration => vec![Self::Main, Self::PortfolioCuration],
        }
    }
}

/// Routes within the home directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeRoute {
    /// Portfolio overview.
    Main,
    /// Portfolio editor. Raw value contains a space, so its URL form is
    /// `edit%20portfolio`.
    EditPortfolio,
}

impl DirectoryRoute for HomeRoute {
    fn segment(&self) -> &'static str {
        match self {
            Self::Main => "",
            Self::EditPortfolio => "edit portfolio",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "" => Some(Self::Main),
            "edit portfolio" => Some(Self::EditPortfolio),
            _ => None,
        }
    }

    fn path_to(self) -> Vec<Self> {
        match self {
            Self::Main => vec![Self::Main],
            Self::EditPortfolio => vec![Self::Main, Self::EditPortfolio],
        }
    }
}

/// Routes within the settings directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsRoute {
    /// Settings overview.
    Main,
    /// Hand-off screen into the OS-level app settings.
    System,
}

impl DirectoryRoute for SettingsRoute {
    fn segment(&self) -> &'static str {
        match self {
            Self::Main => "",
            Self::System => "system",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "" => Some(Self::Main),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    fn path_to(self) -> Vec<Self> {
        match self {
            Self::Main => vec![Self::Main],
            Self::System => vec![Self::Main, Self::System],
        }
    }
}
