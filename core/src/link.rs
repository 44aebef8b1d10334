//! `DeepLink` - the typed value behind every navigable URL.
//!
//! A deep link is a directory plus an ordered list of extra path segments,
//! a unique-key parameter list, and an optional fragment. The same value
//! renders in two dialects: the app-internal scheme and the universal
//! (https host) form. See [`LinkCodec`](crate::LinkCodec).

use crate::Directory;

/// Which URL dialect a link was built in or parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeKind {
    /// App-internal scheme (e.g. `sauron://...`), understood only by the
    /// app itself.
    Internal,
    /// Universal https form with a recognized host, openable by the OS
    /// from any context.
    Universal,
}

impl SchemeKind {
    /// Whether this is the app-internal dialect.
    #[must_use]
    pub fn is_internal(self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// A parsed or to-be-built deep link.
///
/// Parameters keep insertion order (preserved in built output) but order is
/// not semantically significant on parse; keys are unique, with the last
/// write winning. The fragment is kept only if non-empty.
///
/// # Example
///
/// ```ignore
/// let link = DeepLink::new(AppDirectory::Onboarding)
///     .segment("portfolio_curation")
///     .param("q", "bitcoin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink<D: Directory> {
    directory: D,
    segments: Vec<String>,
    params: Vec<(String, String)>,
    fragment: Option<String>,
}

impl<D: Directory> DeepLink<D> {
    /// A link pointing at a directory's default route.
    #[must_use]
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            segments: Vec::new(),
            params: Vec::new(),
            fragment: None,
        }
    }

    /// Append a path segment (raw, unencoded form).
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Set a query parameter. Setting an existing key replaces its value,
    /// keeping keys unique.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    /// Set the fragment. An empty string clears it; a link carries at most
    /// one fragment.
    #[must_use]
    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        self.fragment = if fragment.is_empty() { None } else { Some(fragment) };
        self
    }

    /// The target directory.
    #[must_use]
    pub fn directory(&self) -> D {
        self.directory
    }

    /// Path segments beyond the directory, in order (raw, decoded form).
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The route segment: the first path segment, or `""` for the
    /// directory's default route.
    #[must_use]
    pub fn route_segment(&self) -> &str {
        self.segments.first().map_or("", String::as_str)
    }

    /// All parameters in insertion order.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Look up one parameter by key.
    #[must_use]
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The fragment, if one was set.
    #[must_use]
    pub fn fragment_value(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    // Assembly entry point for the codec's parser.
    pub(crate) fn from_parts(
        directory: D,
        segments: Vec<String>,
        params: Vec<(String, String)>,
        fragment: Option<String>,
    ) -> Self {
        Self {
            directory,
            segments,
            params,
            fragment,
        }
    }
}
