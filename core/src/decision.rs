//! `DecisionTree` - binary predicate tree for the initial-root decision.
//!
//! Internal nodes hold a zero-argument boolean [`Probe`] and two optional
//! children; leaf nodes hold a payload and no probe. Evaluation walks from
//! the root, branching per probe result, and returns the payload of the
//! node it lands on.

use crate::{TreeError, MAX_TREE_DEPTH};
use std::fmt::Debug;

/// A zero-argument boolean predicate.
///
/// Probes are the only side-effecting surface of a [`DecisionTree`]: they
/// may read external flags or services, but must answer synchronously and,
/// at the moment of evaluation, purely. The same probe answers make the
/// same tree yield the same leaf.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Probe`",
    label = "this type cannot gate a decision-tree branch",
    note = "wrap a closure in `FnProbe::new(name, closure)` or implement `check(&self) -> bool`"
)]
pub trait Probe: Send + Sync + Debug {
    /// Answer the predicate against whatever external state it reads.
    fn check(&self) -> bool;
}

// Blanket implementation for boxed probes
#[diagnostic::do_not_recommend]
impl Probe for Box<dyn Probe> {
    fn check(&self) -> bool {
        (**self).check()
    }
}

/// A [`Probe`] built from a closure, with a name for traces and logs.
///
/// # Example
///
/// ```
/// use lodestar::{FnProbe, Probe};
///
/// let probe = FnProbe::new("first_run", || true);
/// assert!(probe.check());
/// ```
pub struct FnProbe {
    name: &'static str,
    f: Box<dyn Fn() -> bool + Send + Sync>,
}

impl FnProbe {
    /// Wrap a closure as a named probe.
    pub fn new(name: &'static str, f: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self { name, f: Box::new(f) }
    }

    /// The name given at construction.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Debug for FnProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FnProbe").field(&self.name).finish()
    }
}

impl Probe for FnProbe {
    fn check(&self) -> bool {
        (self.f)()
    }
}

/// One node of a [`DecisionTree`].
///
/// A node with a probe is a branch; a node without one is a leaf. Children
/// are exclusively owned (`Box`, no sharing, no cycles) - the tree is small
/// and static, so nothing fancier is needed.
pub struct DecisionNode<T> {
    probe: Option<Box<dyn Probe>>,
    payload: Option<T>,
    when_true: Option<Box<DecisionNode<T>>>,
    when_false: Option<Box<DecisionNode<T>>>,
}

impl<T> DecisionNode<T> {
    /// A leaf carrying a payload.
    #[must_use]
    pub fn leaf(payload: T) -> Self {
        Self {
            probe: None,
            payload: Some(payload),
            when_true: None,
            when_false: None,
        }
    }

    /// A leaf carrying nothing. Evaluating a tree that lands here yields
    /// `None`; callers must supply their own static default.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            probe: None,
            payload: None,
            when_true: None,
            when_false: None,
        }
    }

    /// A branch with both children present.
    #[must_use]
    pub fn branch(probe: impl Probe + 'static, when_true: Self, when_false: Self) -> Self {
        Self {
            probe: Some(Box::new(probe)),
            payload: None,
            when_true: Some(Box::new(when_true)),
            when_false: Some(Box::new(when_false)),
        }
    }

    /// A branch where one or both children may be absent.
    ///
    /// Walking into an absent child returns the payload of the node the
    /// walk is standing on, so pair this with [`with_payload`](Self::with_payload)
    /// unless a `None` result is acceptable.
    #[must_use]
    pub fn partial(
        probe: impl Probe + 'static,
        when_true: Option<Self>,
        when_false: Option<Self>,
    ) -> Self {
        Self {
            probe: Some(Box::new(probe)),
            payload: None,
            when_true: when_true.map(Box::new),
            when_false: when_false.map(Box::new),
        }
    }

    /// Attach a payload to a branch node, returned when the walk falls off
    /// an absent child.
    #[must_use]
    pub fn with_payload(mut self, payload: T) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Whether this node is a leaf (no probe).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.probe.is_none()
    }

    fn depth(&self) -> usize {
        let t = self.when_true.as_ref().map_or(0, |n| n.depth());
        let f = self.when_false.as_ref().map_or(0, |n| n.depth());
        1 + t.max(f)
    }
}

impl<T: Debug> Debug for DecisionNode<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionNode")
            .field("probe", &self.probe)
            .field("payload", &self.payload)
            .field("has_true_child", &self.when_true.is_some())
            .field("has_false_child", &self.when_false.is_some())
            .finish()
    }
}

/// Binary decision tree with payload leaves.
///
/// Built once by its owner and immutable thereafter. Evaluation is
/// idempotent: for fixed probe answers, repeated calls return the same
/// payload.
///
/// # Contract
///
/// Walking starts at the root. A node with a probe branches to `when_true`
/// or `when_false`; if the chosen child is absent, the *current* node's
/// payload is returned (which may be `None`). A node without a probe is a
/// leaf and returns its payload immediately. The evaluator itself has no
/// fallback behavior; every caller defines a static default for the `None`
/// case.
///
/// # Example
///
/// ```
/// use lodestar::{DecisionNode, DecisionTree, FnProbe};
///
/// let tree = DecisionTree::new(DecisionNode::branch(
///     FnProbe::new("first_run", || false),
///     DecisionNode::leaf("onboarding"),
///     DecisionNode::leaf("main"),
/// ));
/// assert_eq!(tree.evaluate(), Some("main"));
/// ```
pub struct DecisionTree<T> {
    root: DecisionNode<T>,
}

impl<T: Clone + Send + Sync + 'static> DecisionTree<T> {
    /// Create a tree from its root node.
    #[must_use]
    pub fn new(root: DecisionNode<T>) -> Self {
        Self { root }
    }

    /// Walk the tree and return the landing node's payload.
    pub fn evaluate(&self) -> Option<T> {
        let mut current = &self.root;
        loop {
            let Some(probe) = &current.probe else {
                return current.payload.clone();
            };
            let child = if probe.check() {
                &current.when_true
            } else {
                &current.when_false
            };
            match child {
                Some(next) => current = next,
                // Fell off the tree: the last visited node answers.
                None => return current.payload.clone(),
            }
        }
    }

    /// Walk the tree capturing every probe decision along the way.
    ///
    /// The `result` field always equals what [`evaluate`](Self::evaluate)
    /// would return for the same probe answers.
    #[must_use]
    pub fn evaluate_with_trace(&self) -> DecisionTrace<T> {
        let mut steps = Vec::new();
        let mut current = &self.root;
        loop {
            let Some(probe) = &current.probe else {
                return DecisionTrace {
                    result: current.payload.clone(),
                    steps,
                    fell_off: false,
                };
            };
            let outcome = probe.check();
            steps.push(DecisionStep {
                probe: format!("{probe:?}"),
                outcome,
            });
            let child = if outcome {
                &current.when_true
            } else {
                &current.when_false
            };
            match child {
                Some(next) => current = next,
                None => {
                    return DecisionTrace {
                        result: current.payload.clone(),
                        steps,
                        fell_off: true,
                    }
                }
            }
        }
    }

    /// Depth of the tree, for validation.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Validate the tree against [`MAX_TREE_DEPTH`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DepthExceeded`] if nesting is too deep.
    pub fn validate(&self) -> Result<(), TreeError> {
        let depth = self.depth();
        if depth > MAX_TREE_DEPTH {
            return Err(TreeError::DepthExceeded {
                depth,
                max: MAX_TREE_DEPTH,
            });
        }
        Ok(())
    }
}

impl<T: Debug> Debug for DecisionTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionTree").field("root", &self.root).finish()
    }
}

/// Trace of one [`DecisionTree`] evaluation.
pub struct DecisionTrace<T> {
    /// The final result (identical to what `evaluate()` returns).
    pub result: Option<T>,
    /// Each probe that fired, in walk order.
    pub steps: Vec<DecisionStep>,
    /// Whether the walk ended by stepping toward an absent child.
    pub fell_off: bool,
}

impl<T: Debug> Debug for DecisionTrace<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionTrace")
            .field("result", &self.result)
            .field("steps", &self.steps)
            .field("fell_off", &self.fell_off)
            .finish()
    }
}

/// One probe decision in a [`DecisionTrace`].
#[derive(Debug)]
pub struct DecisionStep {
    /// Debug description of the probe (e.g. `FnProbe("first_run")`).
    pub probe: String,
    /// What the probe answered.
    pub outcome: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn first_run_tree(answer: bool) -> DecisionTree<&'static str> {
        DecisionTree::new(DecisionNode::branch(
            FnProbe::new("first_run", move || answer),
            DecisionNode::leaf("onboarding"),
            DecisionNode::leaf("main"),
        ))
    }

    #[test]
    fn leaf_returns_payload_immediately() {
        let tree = DecisionTree::new(DecisionNode::leaf(7));
        assert_eq!(tree.evaluate(), Some(7));
    }

    #[test]
    fn branch_follows_probe_answer() {
        assert_eq!(first_run_tree(true).evaluate(), Some("onboarding"));
        assert_eq!(first_run_tree(false).evaluate(), Some("main"));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let tree = first_run_tree(true);
        for _ in 0..10 {
            assert_eq!(tree.evaluate(), Some("onboarding"));
        }
    }

    #[test]
    fn empty_tree_returns_none() {
        let tree: DecisionTree<&str> = DecisionTree::new(DecisionNode::empty());
        assert_eq!(tree.evaluate(), None);
    }

    #[test]
    fn falling_off_returns_current_node_payload() {
        let tree = DecisionTree::new(
            DecisionNode::partial(
                FnProbe::new("always", || true),
                None,
                Some(DecisionNode::leaf("unreached")),
            )
            .with_payload("fallback"),
        );
        assert_eq!(tree.evaluate(), Some("fallback"));
    }

    #[test]
    fn falling_off_without_payload_returns_none() {
        let tree: DecisionTree<&str> = DecisionTree::new(DecisionNode::partial(
            FnProbe::new("always", || true),
            None,
            Some(DecisionNode::leaf("unreached")),
        ));
        assert_eq!(tree.evaluate(), None);
    }

    #[test]
    fn probes_read_external_state_at_evaluation_time() {
        let flag = Arc::new(AtomicBool::new(false));
        let probe_flag = Arc::clone(&flag);
        let tree = DecisionTree::new(DecisionNode::branch(
            FnProbe::new("flag", move || probe_flag.load(Ordering::Relaxed)),
            DecisionNode::leaf("on"),
            DecisionNode::leaf("off"),
        ));

        assert_eq!(tree.evaluate(), Some("off"));
        flag.store(true, Ordering::Relaxed);
        assert_eq!(tree.evaluate(), Some("on"));
    }

    #[test]
    fn nested_branches_walk_to_the_leaf() {
        let tree = DecisionTree::new(DecisionNode::branch(
            FnProbe::new("outer", || true),
            DecisionNode::branch(
                FnProbe::new("inner", || false),
                DecisionNode::leaf("a"),
                DecisionNode::leaf("b"),
            ),
            DecisionNode::leaf("c"),
        ));
        assert_eq!(tree.evaluate(), Some("b"));
    }

    #[test]
    fn trace_records_walk_and_matches_evaluate() {
        let tree = DecisionTree::new(DecisionNode::branch(
            FnProbe::new("outer", || true),
            DecisionNode::branch(
                FnProbe::new("inner", || false),
                DecisionNode::leaf("a"),
                DecisionNode::leaf("b"),
            ),
            DecisionNode::leaf("c"),
        ));

        let trace = tree.evaluate_with_trace();
        assert_eq!(trace.result, tree.evaluate());
        assert_eq!(trace.steps.len(), 2);
        assert!(trace.steps[0].probe.contains("outer"));
        assert!(trace.steps[0].outcome);
        assert!(trace.steps[1].probe.contains("inner"));
        assert!(!trace.steps[1].outcome);
        assert!(!trace.fell_off);
    }

    #[test]
    fn trace_marks_fell_off() {
        let tree: DecisionTree<&str> = DecisionTree::new(DecisionNode::partial(
            FnProbe::new("always", || true),
            None,
            None,
        ));
        let trace = tree.evaluate_with_trace();
        assert!(trace.fell_off);
        assert_eq!(trace.result, None);
    }

    #[test]
    fn depth_and_validate() {
        let tree = first_run_tree(true);
        assert_eq!(tree.depth(), 2);
        assert!(tree.validate().is_ok());

        let mut node = DecisionNode::leaf(0);
        for _ in 0..crate::MAX_TREE_DEPTH {
            node = DecisionNode::branch(FnProbe::new("x", || true), node, DecisionNode::leaf(1));
        }
        let deep = DecisionTree::new(node);
        assert!(matches!(
            deep.validate(),
            Err(TreeError::DepthExceeded { .. })
        ));
    }

    #[test]
    fn tree_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DecisionTree<u8>>();
    }
}
