//! `AppShell` - the app's navigation state, assembled as one owned graph.
//!
//! Everything lives in plain structs threaded explicitly: the shell owns
//! the root selector, the codec, and one [`Destination`] per directory;
//! the [`Navigator`] owns the shell plus the dispatch chain that mutates
//! it. There are no globals and no hidden registries, so tests construct
//! as many independent shells as they like.

use lodestar::{
    DecisionNode, DecisionTree, DeepLink, DispatchChain, DispatchError, DispatchOutcome,
    DispatchTrace, LaunchGate, LinkCodec, LinkError, Probe, RootSelector, SchemeKind,
    SwitchOutcome,
};

use crate::directory::AppDirectory;
use crate::handlers::build_chain;
use crate::route::{
    AlertsRoute, DirectoryRoute, HomeRoute, LaunchRoute, OnboardingRoute, SettingsRoute,
    WalletRoute,
};
use crate::system::{SystemLink, SystemLinker};

/// The mutually exclusive top-level containers.
///
/// Exactly one is active at any time; several directories can share one
/// root (every post-onboarding directory lives under [`Root::Main`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Root {
    /// Startup splash, active until launch completes.
    LaunchScreen,
    /// First-run onboarding flow.
    Onboarding,
    /// The main app shell with its tab-style directories.
    Main,
}

impl AppDirectory {
    /// The root container this directory lives under.
    #[must_use]
    pub fn root(self) -> Root {
        match self {
            Self::Launch => Root::LaunchScreen,
            Self::Onboarding => Root::Onboarding,
            Self::Home | Self::Wallet | Self::Settings | Self::Alerts => Root::Main,
        }
    }
}

/// The first-run gate: onboarding for a fresh install, the main shell
/// otherwise. A probe that cannot answer falls through to the selector's
/// default root.
#[must_use]
pub fn first_run_tree(first_run: Box<dyn Probe>) -> DecisionTree<Root> {
    DecisionTree::new(DecisionNode::branch(
        first_run,
        DecisionNode::leaf(Root::Onboarding),
        DecisionNode::leaf(Root::Main),
    ))
}

/// One directory's navigation context: its route stack and the link
/// parameters its handler consumed.
///
/// `navigate` replaces the stack with the target's full path, so jumping
/// deep into a directory still leaves sensible back navigation, and
/// navigating to the already-current route is naturally idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination<Rt: DirectoryRoute> {
    stack: Vec<Rt>,
    search_query: Option<String>,
    portfolio_filter: bool,
}

impl<Rt: DirectoryRoute> Destination<Rt> {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            search_query: None,
            portfolio_filter: false,
        }
    }

    /// Replace the stack with the full path to `route`.
    pub fn navigate(&mut self, route: Rt) {
        self.stack = route.path_to();
        tracing::debug!(route = ?route, "destination navigated");
    }

    /// The current stack, root screen first. Empty until the first
    /// navigation.
    #[must_use]
    pub fn stack(&self) -> &[Rt] {
        &self.stack
    }

    /// The screen on top of the stack.
    #[must_use]
    pub fn current(&self) -> Option<Rt> {
        self.stack.last().copied()
    }

    /// Store the search query extracted from a link.
    pub fn set_search_query(&mut self, query: Option<String>) {
        self.search_query = query;
    }

    /// The last extracted search query.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    /// Store the portfolio-filter flag extracted from a link.
    pub fn set_portfolio_filter(&mut self, on: bool) {
        self.portfolio_filter = on;
    }

    /// The last extracted portfolio-filter flag.
    #[must_use]
    pub fn portfolio_filter(&self) -> bool {
        self.portfolio_filter
    }
}

impl<Rt: DirectoryRoute> Default for Destination<Rt> {
    fn default() -> Self {
        Self::new()
    }
}

/// The whole navigation state of one app instance.
///
/// Root containers are materialized at most once, on the first switch into
/// them; switching back reuses the existing container. The per-root
/// materialization count is observable via [`times_realized`]
/// (always 0 or 1).
///
/// [`times_realized`]: AppShell::times_realized
#[derive(Debug)]
pub struct AppShell {
    selector: RootSelector<Root>,
    codec: LinkCodec,
    realized: Vec<Root>,
    system_linker: Option<Box<dyn SystemLinker>>,
    /// Launch directory context.
    pub launch: Destination<LaunchRoute>,
    /// Onboarding directory context.
    pub onboarding: Destination<OnboardingRoute>,
    /// Home directory context.
    pub home: Destination<HomeRoute>,
    /// Wallet directory context.
    pub wallet: Destination<WalletRoute>,
    /// Settings directory context.
    pub settings: Destination<SettingsRoute>,
    /// Alerts directory context.
    pub alerts: Destination<AlertsRoute>,
}

impl AppShell {
    /// A fresh shell starting on the launch screen, with `tree` choosing
    /// the post-launch root.
    #[must_use]
    pub fn new(codec: LinkCodec, tree: DecisionTree<Root>) -> Self {
        Self {
            selector: RootSelector::new(Root::LaunchScreen, tree, Root::Main),
            codec,
            // The launch screen is up from the start.
            realized: vec![Root::LaunchScreen],
            system_linker: None,
            launch: Destination::new(),
            onboarding: Destination::new(),
            home: Destination::new(),
            wallet: Destination::new(),
            settings: Destination::new(),
            alerts: Destination::new(),
        }
    }

    /// Persist the last dispatched link through `store` under `key`.
    #[must_use]
    pub fn with_store(
        mut self,
        store: Box<dyn lodestar::KeyValueStore>,
        key: impl Into<String>,
    ) -> Self {
        self.selector = self.selector.with_store(store, key);
        self
    }

    /// Attach the OS hand-off implementation.
    #[must_use]
    pub fn with_system_linker(mut self, linker: Box<dyn SystemLinker>) -> Self {
        self.system_linker = Some(linker);
        self
    }

    /// The shell's codec.
    #[must_use]
    pub fn codec(&self) -> &LinkCodec {
        &self.codec
    }

    /// The currently active root.
    #[must_use]
    pub fn current_root(&self) -> Root {
        self.selector.current_root()
    }

    /// Register a `(from, to)` callback for actual root changes.
    pub fn subscribe_roots(&mut self, subscriber: impl FnMut(Root, Root) + Send + 'static) {
        self.selector.subscribe(subscriber);
    }

    /// Finish launch: evaluate the decision tree and switch to the chosen
    /// root.
    pub fn complete_launch(&mut self) -> Root {
        let root = self.selector.complete_launch();
        self.mark_realized(root);
        root
    }

    /// Finish launch once `gate` allows it. `None` if the gate did not
    /// fire.
    pub fn complete_launch_after(&mut self, gate: &mut dyn LaunchGate) -> Option<Root> {
        let root = self.selector.complete_launch_after(gate)?;
        self.mark_realized(root);
        Some(root)
    }

    /// Switch the active root, materializing it on first activation.
    pub fn switch_root(&mut self, to: Root) -> SwitchOutcome<Root> {
        let outcome = self.selector.switch_active_root(to);
        if outcome.changed() {
            self.mark_realized(to);
        }
        outcome
    }

    /// How many times a root container has been materialized. At most 1.
    #[must_use]
    pub fn times_realized(&self, root: Root) -> usize {
        self.realized.iter().filter(|r| **r == root).count()
    }

    fn mark_realized(&mut self, root: Root) {
        if !self.realized.contains(&root) {
            self.realized.push(root);
            tracing::debug!(root = ?root, "root container materialized");
        }
    }

    /// Render a link in the internal dialect.
    ///
    /// # Errors
    ///
    /// Propagates any structural [`LinkError`] from the codec.
    pub fn build_internal_link(&self, link: &DeepLink<AppDirectory>) -> Result<String, LinkError> {
        self.codec.build(link, SchemeKind::Internal)
    }

    /// Render a link in the universal dialect.
    ///
    /// # Errors
    ///
    /// Propagates any structural [`LinkError`] from the codec.
    pub fn build_universal_link(&self, link: &DeepLink<AppDirectory>) -> Result<String, LinkError> {
        self.codec.build(link, SchemeKind::Universal)
    }

    /// Record a successfully dispatched link.
    pub fn record_link(&mut self, raw: &str) {
        self.selector.record_link(raw);
    }

    /// The most recently dispatched link.
    #[must_use]
    pub fn last_active_link(&self) -> Option<&str> {
        self.selector.last_active_link()
    }

    /// Hand off to an OS destination, if a linker is attached.
    pub fn open_system_link(&mut self, link: SystemLink) {
        match &mut self.system_linker {
            Some(linker) => linker.open(link),
            None => tracing::warn!(link = ?link, "no system linker attached, hand-off dropped"),
        }
    }
}

/// The shell plus its dispatch chain: the one entry point for raw URLs.
///
/// The chain borrows the shell mutably on each dispatch, so the two are
/// owned side by side here instead of one inside the other.
#[derive(Debug)]
pub struct Navigator {
    chain: DispatchChain<AppShell>,
    shell: AppShell,
}

impl Navigator {
    /// Wire the full handler chain around `shell`.
    #[must_use]
    pub fn new(shell: AppShell) -> Self {
        let chain = build_chain(shell.codec().clone());
        Self { chain, shell }
    }

    /// Dispatch a raw URL.
    ///
    /// URLs in neither dialect are rejected before any handler is probed.
    /// Every outcome short of `Handled` leaves the shell untouched.
    pub fn manage(&mut self, raw: &str) -> DispatchOutcome {
        if self.shell.codec().scheme_of(raw).is_none() {
            let scheme = scheme_text(raw);
            tracing::warn!(url = raw, scheme = scheme, "deep link scheme not recognized");
            return DispatchOutcome::Rejected(DispatchError::SchemeMismatch {
                scheme: scheme.to_string(),
            });
        }
        self.chain.manage(raw, &mut self.shell)
    }

    /// Like [`manage`](Self::manage), recording every handler probe.
    pub fn manage_with_trace(&mut self, raw: &str) -> DispatchTrace {
        if self.shell.codec().scheme_of(raw).is_none() {
            return DispatchTrace {
                outcome: DispatchOutcome::Rejected(DispatchError::SchemeMismatch {
                    scheme: scheme_text(raw).to_string(),
                }),
                probed: Vec::new(),
            };
        }
        self.chain.manage_with_trace(raw, &mut self.shell)
    }

    /// The owned shell.
    #[must_use]
    pub fn shell(&self) -> &AppShell {
        &self.shell
    }

    /// Mutable access to the owned shell.
    pub fn shell_mut(&mut self) -> &mut AppShell {
        &mut self.shell
    }

    /// The handler chain (read-only; its order is fixed at construction).
    #[must_use]
    pub fn chain(&self) -> &DispatchChain<AppShell> {
        &self.chain
    }
}

fn scheme_text(raw: &str) -> &str {
    raw.split_once("://")
        .or_else(|| raw.split_once(':'))
        .map_or("", |(scheme, _)| scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_codec;
    use lodestar::FnProbe;

    fn shell(first_run: bool) -> AppShell {
        let tree = first_run_tree(Box::new(FnProbe::new("first_run", move || first_run)));
        AppShell::new(default_codec(), tree)
    }

    #[test]
    fn directories_map_to_roots() {
        assert_eq!(AppDirectory::Launch.root(), Root::LaunchScreen);
        assert_eq!(AppDirectory::Onboarding.root(), Root::Onboarding);
        for dir in [
            AppDirectory::Home,
            AppDirectory::Wallet,
            AppDirectory::Settings,
            AppDirectory::Alerts,
        ] {
            assert_eq!(dir.root(), Root::Main);
        }
    }

    #[test]
    fn first_run_goes_to_onboarding() {
        let mut shell = shell(true);
        assert_eq!(shell.current_root(), Root::LaunchScreen);
        assert_eq!(shell.complete_launch(), Root::Onboarding);
    }

    #[test]
    fn returning_user_goes_to_main() {
        let mut shell = shell(false);
        assert_eq!(shell.complete_launch(), Root::Main);
    }

    #[test]
    fn roots_materialize_once() {
        let mut shell = shell(false);
        shell.complete_launch();
        assert_eq!(shell.times_realized(Root::Main), 1);

        shell.switch_root(Root::Onboarding);
        shell.switch_root(Root::Main);
        shell.switch_root(Root::Main); // no-op
        assert_eq!(shell.times_realized(Root::Main), 1);
        assert_eq!(shell.times_realized(Root::Onboarding), 1);
        assert_eq!(shell.times_realized(Root::LaunchScreen), 1);
    }

    #[test]
    fn navigate_replaces_the_stack() {
        let mut dest: Destination<HomeRoute> = Destination::default();
        assert_eq!(dest.current(), None);

        dest.navigate(HomeRoute::EditPortfolio);
        assert_eq!(dest.stack(), [HomeRoute::Main, HomeRoute::EditPortfolio]);
        assert_eq!(dest.current(), Some(HomeRoute::EditPortfolio));

        dest.navigate(HomeRoute::Main);
        assert_eq!(dest.stack(), [HomeRoute::Main]);
    }

    #[test]
    fn shell_builds_both_dialects() {
        let shell = shell(false);
        let link = DeepLink::new(AppDirectory::Onboarding)
            .segment("portfolio_curation")
            .param("q", "bitcoin");
        assert_eq!(
            shell.build_internal_link(&link).unwrap(),
            "sauron://onboarding/portfolio_curation/?q=bitcoin"
        );
        assert_eq!(
            shell.build_universal_link(&link).unwrap(),
            "https://sauron.app/onboarding/portfolio_curation/?q=bitcoin"
        );
    }

    #[test]
    fn missing_system_linker_drops_the_hand_off() {
        let mut shell = shell(false);
        // Must not panic.
        shell.open_system_link(SystemLink::AppSettings);
    }
}
