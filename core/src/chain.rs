//! `DispatchChain` - first-claim-wins routing of raw URLs to handlers.
//!
//! Handlers are probed in registration order with a cheap [`can_open`]
//! test; the first one to claim a URL is the only one asked to open it.
//! At most one handler ever acts on a given URL.
//!
//! [`can_open`]: LinkHandler::can_open

use std::fmt::Debug;

use crate::DispatchError;

/// One destination's entry point for raw deep-link URLs.
///
/// `Ctx` is the mutable application state a handler acts on; the chain
/// itself never inspects it.
///
/// `can_open` must be cheap and side-effect free: a literal check of the
/// URL's shape, no parsing of the tail. All real work happens in `open`,
/// and only after the handler has claimed the URL.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle deep links for context `{Ctx}`",
    label = "this type is not a link handler",
    note = "implement `name`, a cheap `can_open` prefix test, and `open`"
)]
pub trait LinkHandler<Ctx>: Send + Sync + Debug {
    /// Stable handler name, used in traces and logs.
    fn name(&self) -> &'static str;

    /// Whether this handler claims the URL. Must not mutate anything.
    fn can_open(&self, raw: &str) -> bool;

    /// Open a claimed URL against the application state.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when the URL claims this handler's
    /// directory but names no recognized route, or fails to parse. The
    /// handler must leave `ctx` unmodified in that case.
    fn open(&self, raw: &str, ctx: &mut Ctx) -> Result<(), DispatchError>;
}

impl<Ctx> LinkHandler<Ctx> for Box<dyn LinkHandler<Ctx>> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn can_open(&self, raw: &str) -> bool {
        (**self).can_open(raw)
    }

    fn open(&self, raw: &str, ctx: &mut Ctx) -> Result<(), DispatchError> {
        (**self).open(raw, ctx)
    }
}

/// What became of one dispatched URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler claimed the URL and opened it.
    Handled {
        /// Name of the handler that acted.
        handler: &'static str,
    },
    /// No handler claimed the URL; nothing was mutated.
    NoHandler,
    /// A handler claimed the URL but could not open it; nothing was
    /// mutated.
    Rejected(DispatchError),
}

impl DispatchOutcome {
    /// Whether a handler successfully opened the URL.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }
}

/// One handler's claim decision, recorded during a traced dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerProbe {
    /// The probed handler's name.
    pub handler: &'static str,
    /// Whether it claimed the URL.
    pub accepted: bool,
}

/// Full record of one traced dispatch: every probe made, in order, and
/// the final outcome. Probing stops at the first handler that accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTrace {
    /// The dispatch result.
    pub outcome: DispatchOutcome,
    /// Claim decisions in probe order.
    pub probed: Vec<HandlerProbe>,
}

/// An ordered chain of link handlers sharing one context type.
///
/// Registration order is probe order. The chain guarantees exclusivity:
/// for any URL, at most one handler's `open` runs.
#[derive(Debug)]
pub struct DispatchChain<Ctx> {
    handlers: Vec<Box<dyn LinkHandler<Ctx>>>,
}

impl<Ctx> DispatchChain<Ctx> {
    /// An empty chain. Dispatching through it always yields
    /// [`DispatchOutcome::NoHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a handler. Later registrations are probed later.
    pub fn push(&mut self, handler: Box<dyn LinkHandler<Ctx>>) {
        self.handlers.push(handler);
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the chain has no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatch a raw URL: probe handlers in order, let the first claimant
    /// open it.
    ///
    /// An unclaimed URL or a failed open leaves `ctx` untouched and is
    /// reported through the outcome, never a panic.
    pub fn manage(&self, raw: &str, ctx: &mut Ctx) -> DispatchOutcome {
        for handler in &self.handlers {
            if handler.can_open(raw) {
                return match handler.open(raw, ctx) {
                    Ok(()) => {
                        tracing::debug!(handler = handler.name(), url = raw, "deep link dispatched");
                        DispatchOutcome::Handled {
                            handler: handler.name(),
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            handler = handler.name(),
                            url = raw,
                            error = %err,
                            "deep link rejected by claiming handler"
                        );
                        DispatchOutcome::Rejected(err)
                    }
                };
            }
        }
        tracing::warn!(url = raw, "no handler claimed deep link");
        DispatchOutcome::NoHandler
    }

    /// Like [`manage`](Self::manage), but records every claim probe.
    pub fn manage_with_trace(&self, raw: &str, ctx: &mut Ctx) -> DispatchTrace {
        let mut probed = Vec::new();
        for handler in &self.handlers {
            let accepted = handler.can_open(raw);
            probed.push(HandlerProbe {
                handler: handler.name(),
                accepted,
            });
            if accepted {
                let outcome = match handler.open(raw, ctx) {
                    Ok(()) => DispatchOutcome::Handled {
                        handler: handler.name(),
                    },
                    Err(err) => DispatchOutcome::Rejected(err),
                };
                return DispatchTrace { outcome, probed };
            }
        }
        DispatchTrace {
            outcome: DispatchOutcome::NoHandler,
            probed,
        }
    }
}

impl<Ctx> Default for DispatchChain<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}
