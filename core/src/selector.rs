//! `RootSelector` - decides and owns the active root container.
//!
//! The app has a small closed set of mutually exclusive roots (launch
//! screen, onboarding, main shell). At startup the selector evaluates a
//! [`DecisionTree`] over app state to pick the post-launch root; afterward
//! it guards every switch so re-selecting the active root is a no-op and
//! interested parties observe changes through subscriber callbacks.

use std::fmt::{self, Debug};

use crate::{DecisionTree, KeyValueStore};

/// Gate between "the app asked to finish launch" and "the launch
/// presentation is done".
///
/// The selector must not evaluate its tree while the launch screen is
/// still up. A gate invokes `ready` exactly once, when it is safe to
/// proceed; a gate with nothing to wait for may invoke it before
/// returning.
pub trait LaunchGate: Send + Debug {
    /// Arrange for `ready` to run once the launch presentation finishes.
    fn notify_when_done(&mut self, ready: Box<dyn FnOnce() + Send + '_>);
}

/// A gate that is always ready; for tests and headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateGate;

impl LaunchGate for ImmediateGate {
    fn notify_when_done(&mut self, ready: Box<dyn FnOnce() + Send + '_>) {
        ready();
    }
}

/// Result of asking the selector to switch roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome<R> {
    /// The active root changed; subscribers were notified.
    Switched {
        /// Root that was active before.
        from: R,
        /// Root that is active now.
        to: R,
    },
    /// The requested root was already active; nothing happened.
    AlreadyActive(R),
}

impl<R> SwitchOutcome<R> {
    /// Whether the active root actually changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self, Self::Switched { .. })
    }
}

/// Owns the active root, the selection tree, and the last-link record.
///
/// `R` is the domain's closed root enum. The selector is plain owned
/// state, constructed once and threaded explicitly; nothing here is
/// global.
pub struct RootSelector<R: Copy + Eq + Debug + Send + Sync + 'static> {
    tree: DecisionTree<R>,
    default_root: R,
    current: R,
    last_link: Option<String>,
    store: Option<Box<dyn KeyValueStore>>,
    store_key: String,
    subscribers: Vec<Box<dyn FnMut(R, R) + Send>>,
}

impl<R: Copy + Eq + Debug + Send + Sync + 'static> RootSelector<R> {
    /// Create a selector starting at `initial` (normally the launch
    /// screen), with `tree` choosing the post-launch root and
    /// `default_root` covering a tree that yields no answer.
    #[must_use]
    pub fn new(initial: R, tree: DecisionTree<R>, default_root: R) -> Self {
        Self {
            tree,
            default_root,
            current: initial,
            last_link: None,
            store: None,
            store_key: String::new(),
            subscribers: Vec::new(),
        }
    }

    /// Attach a persistence backend for the last dispatched link under
    /// `key`. A previously persisted link is loaded immediately.
    #[must_use]
    pub fn with_store(mut self, store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        self.store_key = key.into();
        self.last_link = store.get_string(&self.store_key);
        self.store = Some(store);
        self
    }

    /// Register a callback invoked as `(from, to)` after every actual
    /// root change. Never invoked for a no-op switch.
    pub fn subscribe(&mut self, subscriber: impl FnMut(R, R) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// The currently active root.
    #[must_use]
    pub fn current_root(&self) -> R {
        self.current
    }

    /// Evaluate the tree and switch to the chosen root.
    ///
    /// A tree that falls off without producing a root yields the default
    /// root; that is an expected outcome, logged but not an error.
    pub fn complete_launch(&mut self) -> R {
        let root = match self.tree.evaluate() {
            Some(root) => root,
            None => {
                tracing::warn!(
                    default = ?self.default_root,
                    "root decision tree produced no root, using default"
                );
                self.default_root
            }
        };
        self.switch_active_root(root);
        root
    }

    /// Like [`complete_launch`](Self::complete_launch), but held behind a
    /// [`LaunchGate`]. Returns `None` if the gate did not fire.
    pub fn complete_launch_after(&mut self, gate: &mut dyn LaunchGate) -> Option<R> {
        let mut chosen = None;
        let slot = &mut chosen;
        let this = &mut *self;
        gate.notify_when_done(Box::new(move || {
            *slot = Some(this.complete_launch());
        }));
        chosen
    }

    /// Switch the active root, if it differs from the current one.
    ///
    /// Equality-guarded: switching to the already-active root does
    /// nothing and notifies nobody.
    pub fn switch_active_root(&mut self, to: R) -> SwitchOutcome<R> {
        let from = self.current;
        if from == to {
            return SwitchOutcome::AlreadyActive(to);
        }
        self.current = to;
        tracing::debug!(from = ?from, to = ?to, "active root switched");
        for subscriber in &mut self.subscribers {
            subscriber(from, to);
        }
        SwitchOutcome::Switched { from, to }
    }

    /// Record a successfully dispatched link, persisting it when a store
    /// is attached.
    pub fn record_link(&mut self, raw: &str) {
        self.last_link = Some(raw.to_string());
        if let Some(store) = &mut self.store {
            store.set_string(&self.store_key, raw);
        }
    }

    /// The most recently recorded link, if any.
    #[must_use]
    pub fn last_active_link(&self) -> Option<&str> {
        self.last_link.as_deref()
    }
}

// Subscriber closures are not Debug; show everything else.
impl<R: Copy + Eq + Debug + Send + Sync + 'static> Debug for RootSelector<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootSelector")
            .field("current", &self.current)
            .field("default_root", &self.default_root)
            .field("last_link", &self.last_link)
            .field("store", &self.store)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::{DecisionNode, FnProbe};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Root {
        Launch,
        Onboarding,
        Main,
    }

    fn first_run_tree(first_run: Arc<AtomicBool>) -> DecisionTree<Root> {
        DecisionTree::new(DecisionNode::branch(
            FnProbe::new("first_run", move || {
                first_run.load(Ordering::Relaxed)
            }),
            DecisionNode::leaf(Root::Onboarding),
            DecisionNode::leaf(Root::Main),
        ))
    }

    #[test]
    fn launch_picks_onboarding_on_first_run() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut selector = RootSelector::new(Root::Launch, first_run_tree(flag), Root::Main);
        assert_eq!(selector.current_root(), Root::Launch);
        assert_eq!(selector.complete_launch(), Root::Onboarding);
        assert_eq!(selector.current_root(), Root::Onboarding);
    }

    #[test]
    fn empty_tree_falls_back_to_default() {
        let tree = DecisionTree::new(DecisionNode::empty());
        let mut selector = RootSelector::new(Root::Launch, tree, Root::Main);
        assert_eq!(selector.complete_launch(), Root::Main);
    }

    #[test]
    fn switch_to_active_root_is_a_noop() {
        let tree = DecisionTree::new(DecisionNode::leaf(Root::Main));
        let mut selector = RootSelector::new(Root::Main, tree, Root::Main);
        assert_eq!(
            selector.switch_active_root(Root::Main),
            SwitchOutcome::AlreadyActive(Root::Main)
        );
    }

    #[test]
    fn subscribers_see_actual_changes_only() {
        let tree = DecisionTree::new(DecisionNode::leaf(Root::Main));
        let mut selector = RootSelector::new(Root::Launch, tree, Root::Main);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        selector.subscribe(move |from, to| sink.lock().unwrap().push((from, to)));

        selector.switch_active_root(Root::Main);
        selector.switch_active_root(Root::Main); // no-op
        selector.switch_active_root(Root::Onboarding);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(Root::Launch, Root::Main), (Root::Main, Root::Onboarding)]
        );
    }

    #[test]
    fn launch_waits_for_the_gate() {
        #[derive(Debug)]
        struct ManualGate {
            done: bool,
        }
        impl LaunchGate for ManualGate {
            fn notify_when_done(&mut self, ready: Box<dyn FnOnce() + Send + '_>) {
                if self.done {
                    ready();
                }
            }
        }

        let tree = DecisionTree::new(DecisionNode::leaf(Root::Main));
        let mut selector = RootSelector::new(Root::Launch, tree, Root::Main);

        let mut gate = ManualGate { done: false };
        assert_eq!(selector.complete_launch_after(&mut gate), None);
        assert_eq!(selector.current_root(), Root::Launch);

        gate.done = true;
        assert_eq!(selector.complete_launch_after(&mut gate), Some(Root::Main));
        assert_eq!(selector.current_root(), Root::Main);
    }

    #[test]
    fn immediate_gate_fires_synchronously() {
        let tree = DecisionTree::new(DecisionNode::leaf(Root::Onboarding));
        let mut selector = RootSelector::new(Root::Launch, tree, Root::Main);
        let root = selector.complete_launch_after(&mut ImmediateGate);
        assert_eq!(root, Some(Root::Onboarding));
    }

    #[test]
    fn recorded_link_persists_through_the_store() {
        let mut store = MemoryStore::new();
        store.set_string("nav.last", "sauron://wallet");

        let tree = DecisionTree::new(DecisionNode::leaf(Root::Main));
        let mut selector = RootSelector::new(Root::Launch, tree, Root::Main)
            .with_store(Box::new(store), "nav.last");

        // Prior session's link is visible immediately.
        assert_eq!(selector.last_active_link(), Some("sauron://wallet"));

        selector.record_link("sauron://home/edit%20portfolio");
        assert_eq!(
            selector.last_active_link(),
            Some("sauron://home/edit%20portfolio")
        );
    }
}
