//! lodestar-sauron - the Sauron app's navigation domain.
//!
//! Binds the engine in `lodestar` to the app's concrete vocabulary: the
//! six [`AppDirectory`] domains, their route enums, the three [`Root`]
//! containers, and the handler chain that routes raw URLs into an owned
//! [`AppShell`].
//!
//! # Example
//!
//! ```
//! use lodestar::FnProbe;
//! use lodestar_sauron::{
//!     default_codec, first_run_tree, AppShell, Navigator, OnboardingRoute, Root,
//! };
//!
//! let tree = first_run_tree(Box::new(FnProbe::new("first_run", || true)));
//! let mut nav = Navigator::new(AppShell::new(default_codec(), tree));
//! nav.shell_mut().complete_launch();
//!
//! let outcome = nav.manage("sauron://onboarding/portfolio_curation/?q=bitcoin");
//! assert!(outcome.is_handled());
//! assert_eq!(nav.shell().current_root(), Root::Onboarding);
//! assert_eq!(
//!     nav.shell().onboarding.current(),
//!     Some(OnboardingRoute::PortfolioCuration)
//! );
//! assert_eq!(nav.shell().onboarding.search_query(), Some("bitcoin"));
//! ```

mod directory;
mod handlers;
mod route;
mod shell;
mod system;

pub use directory::AppDirectory;
pub use handlers::{build_chain, handler_for, DirectoryHandler};
pub use route::{
    AlertsRoute, DirectoryRoute, HomeRoute, LaunchRoute, OnboardingRoute, SettingsRoute,
    WalletRoute,
};
pub use shell::{first_run_tree, AppShell, Destination, Navigator, Root};
pub use system::{RecordingLinker, SystemLink, SystemLinker};

use lodestar::LinkCodec;

/// The app-internal URL scheme.
pub const SCHEME: &str = "sauron";

/// The universal-link host the app claims.
pub const UNIVERSAL_HOST: &str = "sauron.app";

/// Query key carrying a search term into a destination.
pub const PARAM_SEARCH: &str = "q";

/// Query key toggling the home portfolio filter. Only the literal value
/// `true` turns it on.
pub const PARAM_PORTFOLIO_FILTER: &str = "pcf";

/// Storage key under which the last dispatched link is persisted.
pub const LAST_LINK_KEY: &str = "navigation.last_active_link";

/// The codec for the app's two dialects:
/// `sauron://...` and `https://sauron.app/...`.
#[must_use]
pub fn default_codec() -> LinkCodec {
    LinkCodec::new(SCHEME, UNIVERSAL_HOST)
}
