//! `Directory` - the closed set of root-level navigation domains.
//!
//! The engine never enumerates concrete directories itself; a domain crate
//! supplies the enum and the engine works through this trait, the same way
//! the dispatch side works through an opaque `Ctx`.

use std::fmt::Debug;
use std::hash::Hash;

/// A root-level navigation domain, identified by one raw URL path segment.
///
/// # Invariants
///
/// - The set of directories is closed and known at build time; `all()`
///   enumerates every member.
/// - `segment()` is stable, lowercase, and URL-safe as-is.
/// - `from_segment(d.segment()) == Some(d)` for every member, and
///   `from_segment` returns `None` (never a default) for anything else.
/// - No directory's segment is a string prefix of another's; otherwise
///   prefix-based dispatch becomes ambiguous. This is a build-time
///   invariant - check it in tests with [`prefix_collisions`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Directory`",
    label = "this type cannot name a navigation domain",
    note = "Directory is a closed enum with a lossless raw-segment round-trip"
)]
pub trait Directory: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// The raw path segment identifying this directory in URLs.
    fn segment(&self) -> &'static str;

    /// Resolve a raw segment back to a directory.
    ///
    /// Returns `None` on unrecognized input; callers must treat that as
    /// "cannot dispatch", not "fall back to a default".
    fn from_segment(segment: &str) -> Option<Self>;

    /// Every directory, in registration order.
    fn all() -> &'static [Self];
}

/// Find directory pairs whose segments are string prefixes of each other.
///
/// Dispatch matches on literal string prefixes of the encoded directory
/// segment, so any collision here makes handler selection ambiguous. Call
/// from a unit test in the domain crate; an empty result upholds the
/// invariant.
#[must_use]
pub fn prefix_collisions<D: Directory>() -> Vec<(D, D)> {
    let all = D::all();
    let mut collisions = Vec::new();
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            let (sa, sb) = (a.segment(), b.segment());
            if sa.starts_with(sb) || sb.starts_with(sa) {
                collisions.push((*a, *b));
            }
        }
    }
    collisions
}
