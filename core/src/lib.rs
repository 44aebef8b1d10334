//! lodestar - navigation and deep-link routing engine
//!
//! A mobile client's navigation core: decides which top-level application
//! context ("root") is active, parses URLs into typed in-app destinations,
//! dispatches them to the right navigation context, and constructs
//! well-formed URLs for any reachable destination.
//!
//! # Architecture
//!
//! The engine is generic over two seams:
//!
//! - [`Directory`] - the closed set of root-level navigation domains. A
//!   domain crate supplies the concrete enum; the engine only needs the raw
//!   path segment round-trip.
//! - `Ctx` - the dispatch context that handlers mutate. [`LinkHandler<Ctx>`]
//!   and [`DispatchChain<Ctx>`] never inspect the context themselves; they
//!   screen URLs and delegate.
//!
//! ```text
//! incoming URL
//!       ↓ DispatchChain::manage (first-match-wins)
//! LinkHandler::open
//!       ↓ LinkCodec::parse
//! DeepLink<D>  →  RootSelector::switch_active_root  →  destination context
//! ```
//!
//! The initial root is picked by a [`DecisionTree`]: a binary tree of
//! zero-argument boolean [`Probe`]s whose leaves carry the candidate roots.
//! Expressing the policy as data keeps it independently testable and
//! swappable without touching the selector's other responsibilities.
//!
//! # Example
//!
//! ```
//! use lodestar::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Dir { Home, Settings }
//!
//! impl Directory for Dir {
//!     fn segment(&self) -> &'static str {
//!         match self {
//!             Dir::Home => "home",
//!             Dir::Settings => "settings",
//!         }
//!     }
//!     fn from_segment(segment: &str) -> Option<Self> {
//!         match segment {
//!             "home" => Some(Dir::Home),
//!             "settings" => Some(Dir::Settings),
//!             _ => None,
//!         }
//!     }
//!     fn all() -> &'static [Self] {
//!         &[Dir::Home, Dir::Settings]
//!     }
//! }
//!
//! let codec = LinkCodec::new("myapp", "myapp.example");
//! let link = DeepLink::new(Dir::Home).param("q", "bitcoin");
//! let url = codec.build(&link, SchemeKind::Internal).unwrap();
//! assert_eq!(url, "myapp://home/?q=bitcoin");
//!
//! let (parsed, kind) = codec.parse::<Dir>(&url).unwrap();
//! assert_eq!(parsed, link);
//! assert_eq!(kind, SchemeKind::Internal);
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod chain;
mod codec;
mod decision;
mod directory;
mod encoding;
mod link;
mod selector;
mod store;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use chain::{DispatchChain, DispatchOutcome, DispatchTrace, HandlerProbe, LinkHandler};
pub use codec::LinkCodec;
pub use decision::{DecisionNode, DecisionStep, DecisionTrace, DecisionTree, FnProbe, Probe};
pub use directory::{prefix_collisions, Directory};
pub use encoding::{decode_component, encode_component};
pub use link::{DeepLink, SchemeKind};
pub use selector::{ImmediateGate, LaunchGate, RootSelector, SwitchOutcome};
pub use store::{KeyValueStore, MemoryStore};

#[cfg(feature = "config")]
pub use config::{CodecConfig, SelectorConfig};

/// Prelude module for convenient imports.
///
/// ```
/// use lodestar::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        DecisionNode,
        DecisionTree,
        DeepLink,
        Directory,
        DispatchChain,
        DispatchError,
        DispatchOutcome,
        FnProbe,
        KeyValueStore,
        LinkCodec,
        LinkError,
        LinkHandler,
        MemoryStore,
        Probe,
        RootSelector,
        SchemeKind,
        SwitchOutcome,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed depth for a [`DecisionTree`].
///
/// The initial-root decision is a small, static gate; anything deeper than
/// this is a configuration defect. Validate at construction time via
/// [`DecisionTree::validate`].
pub const MAX_TREE_DEPTH: usize = 32;

/// Maximum number of path segments beyond the directory in a single link.
pub const MAX_SEGMENTS: usize = 16;

/// Maximum number of query parameters in a single link.
pub const MAX_PARAMS: usize = 32;

/// Maximum total length of a built or parsed link, in bytes.
///
/// Links beyond this are rejected before any decoding work happens.
pub const MAX_LINK_LENGTH: usize = 2048;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from building or parsing deep links.
///
/// Building validates structure before assembly and re-parses the assembled
/// string, so a corrupt link is never handed out. Parsing never panics on
/// malformed input; it reports one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The link exceeds [`MAX_LINK_LENGTH`].
    TooLong {
        /// Actual length in bytes.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// More path segments than [`MAX_SEGMENTS`].
    TooManySegments {
        /// Actual segment count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// More query parameters than [`MAX_PARAMS`].
    TooManyParams {
        /// Actual parameter count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A path segment is empty, which would be ambiguous once encoded.
    EmptySegment,
    /// The URL scheme is neither the internal scheme nor `https`.
    UnknownScheme {
        /// The scheme that was seen.
        scheme: String,
    },
    /// The first path component maps to no known directory.
    UnknownDirectory {
        /// The decoded directory segment.
        segment: String,
    },
    /// The link is structurally invalid.
    Malformed {
        /// What was wrong with it.
        reason: &'static str,
    },
}

impl std::fmt::Display for LinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLong { len, max } => {
                write!(f, "link length is {len} bytes, but maximum allowed is {max}")
            }
            Self::TooManySegments { count, max } => {
                write!(f, "link has {count} path segments, but maximum allowed is {max}")
            }
            Self::TooManyParams { count, max } => {
                write!(f, "link has {count} query parameters, but maximum allowed is {max}")
            }
            Self::EmptySegment => write!(f, "link contains an empty path segment"),
            Self::UnknownScheme { scheme } => {
                write!(f, "scheme \"{scheme}\" is neither the internal scheme nor https")
            }
            Self::UnknownDirectory { segment } => {
                write!(f, "directory segment \"{segment}\" matches no known directory")
            }
            Self::Malformed { reason } => write!(f, "malformed link: {reason}"),
        }
    }
}

impl std::error::Error for LinkError {}

/// Errors from dispatching a URL through the chain.
///
/// All of these are non-fatal: dispatch aborts at the point of detection,
/// no navigation state is mutated, and the outcome is logged. Nothing here
/// propagates past the dispatch entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The URL scheme matched neither known scheme.
    SchemeMismatch {
        /// The scheme that was seen, if any.
        scheme: String,
    },
    /// The path parsed to a directory but the remaining segment maps to no
    /// known route in that directory.
    RouteUnrecognized {
        /// The directory segment that did resolve.
        directory: &'static str,
        /// The route segment that did not.
        segment: String,
    },
    /// The URL failed to parse inside the handler.
    Link(LinkError),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SchemeMismatch { scheme } => {
                write!(f, "scheme \"{scheme}\" matches no registered handler scheme")
            }
            Self::RouteUnrecognized { directory, segment } => {
                write!(
                    f,
                    "route \"{segment}\" could not be initialized for directory \"{directory}\""
                )
            }
            Self::Link(e) => write!(f, "link could not be parsed: {e}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Link(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LinkError> for DispatchError {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

/// Errors from decision-tree validation.
///
/// Caught at construction time, not evaluation time. A misconfigured tree
/// is a defect to fix in testing, not a runtime error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Tree nesting exceeds [`MAX_TREE_DEPTH`].
    DepthExceeded {
        /// Actual depth of the tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DepthExceeded { depth, max } => {
                write!(f, "decision tree depth is {depth}, but maximum allowed is {max}")
            }
        }
    }
}

impl std::error::Error for TreeError {}
