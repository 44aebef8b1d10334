//! Per-directory link handlers and chain construction.
//!
//! One handler exists per [`AppDirectory`] variant, constructed through an
//! exhaustive match in [`handler_for`], so a new directory without a
//! handler is a compile error, not a silently dead URL. The chain is kept
//! as a screening layer: `can_open` is a literal prefix test against the
//! directory's two dialect prefixes, and all parsing happens only after a
//! handler has claimed the URL.

use lodestar::{
    DeepLink, DispatchChain, DispatchError, Directory, LinkCodec, LinkHandler, SchemeKind,
};

use crate::directory::AppDirectory;
use crate::route::{
    AlertsRoute, DirectoryRoute, HomeRoute, LaunchRoute, OnboardingRoute, SettingsRoute,
    WalletRoute,
};
use crate::shell::AppShell;
use crate::system::SystemLink;
use crate::{PARAM_PORTFOLIO_FILTER, PARAM_SEARCH};

/// The handler for one directory.
///
/// Claims URLs by prefix, parses them on open, resolves the route segment
/// against the directory's route enum, and applies the navigation side
/// effects in a fixed order: root switch, parameter extraction, link
/// record, route navigation. A URL that fails parsing or route resolution
/// mutates nothing.
#[derive(Debug)]
pub struct DirectoryHandler {
    directory: AppDirectory,
    codec: LinkCodec,
    internal_prefix: String,
    universal_prefix: String,
}

impl DirectoryHandler {
    fn new(directory: AppDirectory, codec: LinkCodec) -> Self {
        let internal_prefix = codec.internal_prefix(directory);
        let universal_prefix = codec.universal_prefix(directory);
        Self {
            directory,
            codec,
            internal_prefix,
            universal_prefix,
        }
    }

    fn parse_route<Rt: DirectoryRoute>(
        &self,
        raw: &str,
    ) -> Result<(DeepLink<AppDirectory>, Rt), DispatchError> {
        let (link, _) = self.codec.parse::<AppDirectory>(raw)?;
        // A route is a single segment; anything left after it names no
        // destination and must fail, not dispatch as the shorter route.
        if link.segments().len() > 1 {
            return Err(DispatchError::RouteUnrecognized {
                directory: self.directory.segment(),
                segment: link.segments().join("/"),
            });
        }
        let segment = link.route_segment();
        let route = Rt::from_segment(segment).ok_or_else(|| DispatchError::RouteUnrecognized {
            directory: self.directory.segment(),
            segment: segment.to_string(),
        })?;
        Ok((link, route))
    }
}

impl LinkHandler<AppShell> for DirectoryHandler {
    fn name(&self) -> &'static str {
        self.directory.segment()
    }

    fn can_open(&self, raw: &str) -> bool {
        match self.codec.scheme_of(raw) {
            Some(SchemeKind::Internal) => raw.starts_with(&self.internal_prefix),
            Some(SchemeKind::Universal) => raw.starts_with(&self.universal_prefix),
            None => false,
        }
    }

    fn open(&self, raw: &str, shell: &mut AppShell) -> Result<(), DispatchError> {
        match self.directory {
            AppDirectory::Launch => {
                let (_, route) = self.parse_route::<LaunchRoute>(raw)?;
                shell.switch_root(self.directory.root());
                shell.record_link(raw);
                shell.launch.navigate(route);
            }
            AppDirectory::Onboarding => {
                let (link, route) = self.parse_route::<OnboardingRoute>(raw)?;
                shell.switch_root(self.directory.root());
                let query = link.param_value(PARAM_SEARCH).map(str::to_string);
                shell.onboarding.set_search_query(query);
                shell.record_link(raw);
                shell.onboarding.navigate(route);
            }
            AppDirectory::Home => {
                let (link, route) = self.parse_route::<HomeRoute>(raw)?;
                shell.switch_root(self.directory.root());
                let query = link.param_value(PARAM_SEARCH).map(str::to_string);
                shell.home.set_search_query(query);
                // Anything but the literal "true" leaves the filter off.
                let filter = link.param_value(PARAM_PORTFOLIO_FILTER) == Some("true");
                shell.home.set_portfolio_filter(filter);
                shell.record_link(raw);
                shell.home.navigate(route);
            }
            AppDirectory::Wallet => {
                let (_, route) = self.parse_route::<WalletRoute>(raw)?;
                shell.switch_root(self.directory.root());
                shell.record_link(raw);
                shell.wallet.navigate(route);
            }
            AppDirectory::Settings => {
                let (_, route) = self.parse_route::<SettingsRoute>(raw)?;
                shell.switch_root(self.directory.root());
                shell.record_link(raw);
                shell.settings.navigate(route);
                if route == SettingsRoute::System {
                    shell.open_system_link(SystemLink::AppSettings);
                }
            }
            AppDirectory::Alerts => {
                let (_, route) = self.parse_route::<AlertsRoute>(raw)?;
                shell.switch_root(self.directory.root());
                shell.record_link(raw);
                shell.alerts.navigate(route);
            }
        }
        Ok(())
    }
}

/// The handler for one directory. Exhaustive by construction.
#[must_use]
pub fn handler_for(
    directory: AppDirectory,
    codec: &LinkCodec,
) -> Box<dyn LinkHandler<AppShell>> {
    Box::new(DirectoryHandler::new(directory, codec.clone()))
}

/// The full chain, one handler per directory in registration order.
#[must_use]
pub fn build_chain(codec: LinkCodec) -> DispatchChain<AppShell> {
    let mut chain = DispatchChain::new();
    for directory in AppDirectory::all() {
        chain.push(handler_for(*directory, &codec));
    }
    chain
}
