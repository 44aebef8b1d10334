//! `LinkCodec` - builds and parses both deep-link dialects.
//!
//! The app supports two URL forms that resolve to the same in-app
//! destination: the internal scheme for in-app and test links, and the
//! universal https form for web-originated opens. Centralizing both
//! constructions here keeps the dialects from drifting apart.
//!
//! ```text
//! internal:   <scheme>://<directory>/<seg>/.../?<k>=<v>&<k>=<v>/#<fragment>
//! universal:  https://<host>/<directory>/<seg>/.../?<k>=<v>&.../#<fragment>
//! ```

use crate::encoding::{decode_component, encode_component};
use crate::{DeepLink, Directory, LinkError, SchemeKind, MAX_LINK_LENGTH, MAX_PARAMS, MAX_SEGMENTS};

/// Builder/parser for the two deep-link dialects.
///
/// Holds the app-internal scheme (e.g. `"sauron"`) and the recognized
/// universal host (e.g. `"sauron.app"`). Cheap to clone; handlers keep
/// their own copy.
///
/// # Round-trip invariant
///
/// For any valid [`DeepLink`], `parse(build(link, kind))` reproduces the
/// same directory, segments, and parameter map, and the same fragment when
/// one was set. `build` re-parses its own output and refuses to hand out a
/// string that violates this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCodec {
    scheme: String,
    host: String,
}

impl LinkCodec {
    /// Create a codec for the given internal scheme and universal host.
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// The app-internal scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The recognized universal-link host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The internal-scheme prefix for a directory, e.g. `sauron://home`.
    ///
    /// Handlers precompute this for their literal prefix test.
    #[must_use]
    pub fn internal_prefix<D: Directory>(&self, directory: D) -> String {
        format!("{}://{}", self.scheme, directory.segment())
    }

    /// The universal prefix for a directory, e.g. `https://sauron.app/home`.
    #[must_use]
    pub fn universal_prefix<D: Directory>(&self, directory: D) -> String {
        format!("https://{}/{}", self.host, directory.segment())
    }

    /// Classify a raw URL's scheme without parsing the rest.
    ///
    /// `None` means the scheme matches neither dialect; dispatch rejects
    /// such URLs before any prefix comparison.
    #[must_use]
    pub fn scheme_of(&self, raw: &str) -> Option<SchemeKind> {
        let (scheme, _) = raw.split_once("://")?;
        if scheme == self.scheme {
            Some(SchemeKind::Internal)
        } else if scheme == "https" {
            Some(SchemeKind::Universal)
        } else {
            None
        }
    }

    /// Render a link in the requested dialect.
    ///
    /// Segments, parameter keys/values, and the fragment are each
    /// percent-encoded individually before concatenation. Parameter
    /// insertion order is preserved in the output.
    ///
    /// # Errors
    ///
    /// Returns a [`LinkError`] if the link violates a structural limit or
    /// if the assembled string does not parse back to the same value.
    pub fn build<D: Directory>(
        &self,
        link: &DeepLink<D>,
        kind: SchemeKind,
    ) -> Result<String, LinkError> {
        let segments = link.segments();
        if segments.len() > MAX_SEGMENTS {
            return Err(LinkError::TooManySegments {
                count: segments.len(),
                max: MAX_SEGMENTS,
            });
        }
        if link.params().len() > MAX_PARAMS {
            return Err(LinkError::TooManyParams {
                count: link.params().len(),
                max: MAX_PARAMS,
            });
        }
        if segments.iter().any(String::is_empty) {
            return Err(LinkError::EmptySegment);
        }

        // Directory segments are URL-safe by invariant; no encoding pass.
        let mut out = match kind {
            SchemeKind::Internal => self.internal_prefix(link.directory()),
            SchemeKind::Universal => self.universal_prefix(link.directory()),
        };

        for segment in segments {
            out.push('/');
            out.push_str(&encode_component(segment));
        }

        if !link.params().is_empty() {
            out.push_str("/?");
            for (i, (key, value)) in link.params().iter().enumerate() {
                if i > 0 {
                    out.push('&');
                }
                out.push_str(&encode_component(key));
                out.push('=');
                out.push_str(&encode_component(value));
            }
        }

        if let Some(fragment) = link.fragment_value() {
            out.push_str("/#");
            out.push_str(&encode_component(fragment));
        }

        if out.len() > MAX_LINK_LENGTH {
            return Err(LinkError::TooLong {
                len: out.len(),
                max: MAX_LINK_LENGTH,
            });
        }

        // A built link must survive its own parser; hand out nothing that
        // doesn't.
        let (reparsed, rekind) = self.parse::<D>(&out)?;
        if reparsed != *link || rekind != kind {
            return Err(LinkError::Malformed {
                reason: "assembled link did not re-parse to the same value",
            });
        }

        Ok(out)
    }

    /// Parse a raw URL in either dialect.
    ///
    /// Extracts the directory from the first path component, the remaining
    /// path as ordered decoded segments, the query string into a parameter
    /// list (last value wins on duplicate keys), and an optional fragment.
    /// Never panics on malformed input.
    ///
    /// # Errors
    ///
    /// Returns a [`LinkError`] describing the first structural problem
    /// found.
    pub fn parse<D: Directory>(&self, raw: &str) -> Result<(DeepLink<D>, SchemeKind), LinkError> {
        if raw.len() > MAX_LINK_LENGTH {
            return Err(LinkError::TooLong {
                len: raw.len(),
                max: MAX_LINK_LENGTH,
            });
        }

        let Some((scheme, rest)) = raw.split_once("://") else {
            // A scheme-only URL like `mailto:x` still names its scheme.
            return match raw.split_once(':') {
                Some((scheme, _)) => Err(LinkError::UnknownScheme {
                    scheme: scheme.to_string(),
                }),
                None => Err(LinkError::Malformed {
                    reason: "missing scheme separator",
                }),
            };
        };

        let (kind, mut path) = if scheme == self.scheme {
            (SchemeKind::Internal, rest)
        } else if scheme == "https" {
            match rest.strip_prefix(self.host.as_str()) {
                Some(after_host) => match after_host.strip_prefix('/') {
                    Some(path) => (SchemeKind::Universal, path),
                    None if after_host.is_empty() => {
                        return Err(LinkError::Malformed {
                            reason: "universal link has no directory",
                        })
                    }
                    None => {
                        return Err(LinkError::Malformed {
                            reason: "unrecognized universal-link host",
                        })
                    }
                },
                None => {
                    return Err(LinkError::Malformed {
                        reason: "unrecognized universal-link host",
                    })
                }
            }
        } else {
            return Err(LinkError::UnknownScheme {
                scheme: scheme.to_string(),
            });
        };

        // Fragment first, then query; both markers tolerate the grammar's
        // slash form ("/#", "/?") and the bare form web links produce.
        let fragment = match split_off(&mut path, "/#", '#') {
            Some(frag_raw) => {
                let frag = decode_component(frag_raw).ok_or(LinkError::Malformed {
                    reason: "undecodable fragment",
                })?;
                (!frag.is_empty()).then_some(frag)
            }
            None => None,
        };

        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(query) = split_off(&mut path, "/?", '?') {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key_raw, value_raw) = pair.split_once('=').unwrap_or((pair, ""));
                let key = decode_component(key_raw).ok_or(LinkError::Malformed {
                    reason: "undecodable parameter key",
                })?;
                let value = decode_component(value_raw).ok_or(LinkError::Malformed {
                    reason: "undecodable parameter value",
                })?;
                // Last value wins on duplicate keys.
                match params.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = value,
                    None => params.push((key, value)),
                }
            }
            if params.len() > MAX_PARAMS {
                return Err(LinkError::TooManyParams {
                    count: params.len(),
                    max: MAX_PARAMS,
                });
            }
        }

        let path = path.strip_suffix('/').unwrap_or(path);
        if path.is_empty() {
            return Err(LinkError::Malformed {
                reason: "missing directory",
            });
        }

        let mut components = path.split('/');
        let dir_segment = components.next().unwrap_or("");
        let directory = D::from_segment(dir_segment).ok_or_else(|| LinkError::UnknownDirectory {
            segment: dir_segment.to_string(),
        })?;

        let mut segments = Vec::new();
        for component in components {
            if component.is_empty() {
                return Err(LinkError::EmptySegment);
            }
            let segment = decode_component(component).ok_or(LinkError::Malformed {
                reason: "undecodable path segment",
            })?;
            segments.push(segment);
        }
        if segments.len() > MAX_SEGMENTS {
            return Err(LinkError::TooManySegments {
                count: segments.len(),
                max: MAX_SEGMENTS,
            });
        }

        Ok((
            DeepLink::from_parts(directory, segments, params, fragment),
            kind,
        ))
    }
}

/// Split `path` at the first occurrence of `slashed` (preferred) or `bare`,
/// returning the tail and truncating `path` to the head.
fn split_off<'a>(path: &mut &'a str, slashed: &str, bare: char) -> Option<&'a str> {
    if let Some(i) = path.find(slashed) {
        let tail = &path[i + slashed.len()..];
        *path = &path[..i];
        Some(tail)
    } else if let Some(i) = path.find(bare) {
        let tail = &path[i + bare.len_utf8()..];
        *path = &path[..i];
        Some(tail)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Dir {
        Onboarding,
        Home,
        Wallet,
    }

    impl Directory for Dir {
        fn segment(&self) -> &'static str {
            match self {
                Dir::Onboarding => "onboarding",
                Dir::Home => "home",
                Dir::Wallet => "wallet",
            }
        }
        fn from_segment(segment: &str) -> Option<Self> {
            match segment {
                "onboarding" => Some(Dir::Onboarding),
                "home" => Some(Dir::Home),
                "wallet" => Some(Dir::Wallet),
                _ => None,
            }
        }
        fn all() -> &'static [Self] {
            &[Dir::Onboarding, Dir::Home, Dir::Wallet]
        }
    }

    fn codec() -> LinkCodec {
        LinkCodec::new("sauron", "sauron.app")
    }

    #[test]
    fn builds_internal_form() {
        let link = DeepLink::new(Dir::Onboarding)
            .segment("portfolio_curation")
            .param("q", "bitcoin");
        let url = codec().build(&link, SchemeKind::Internal).unwrap();
        assert_eq!(url, "sauron://onboarding/portfolio_curation/?q=bitcoin");
    }

    #[test]
    fn builds_universal_form() {
        let link = DeepLink::new(Dir::Home).segment("edit portfolio");
        let url = codec().build(&link, SchemeKind::Universal).unwrap();
        assert_eq!(url, "https://sauron.app/home/edit%20portfolio");
    }

    #[test]
    fn builds_bare_directory() {
        let url = codec()
            .build(&DeepLink::new(Dir::Wallet), SchemeKind::Internal)
            .unwrap();
        assert_eq!(url, "sauron://wallet");
    }

    #[test]
    fn builds_fragment_after_query() {
        let link = DeepLink::new(Dir::Home).param("q", "eth").fragment("top");
        let url = codec().build(&link, SchemeKind::Internal).unwrap();
        assert_eq!(url, "sauron://home/?q=eth/#top");
    }

    #[test]
    fn round_trips_both_dialects() {
        let link = DeepLink::new(Dir::Home)
            .segment("edit portfolio")
            .param("q", "bit coin")
            .param("pcf", "true")
            .fragment("sec tion");

        for kind in [SchemeKind::Internal, SchemeKind::Universal] {
            let url = codec().build(&link, kind).unwrap();
            let (parsed, parsed_kind) = codec().parse::<Dir>(&url).unwrap();
            assert_eq!(parsed, link);
            assert_eq!(parsed_kind, kind);
        }
    }

    #[test]
    fn parses_encoded_space_segment() {
        let (link, kind) = codec()
            .parse::<Dir>("sauron://home/edit%20portfolio")
            .unwrap();
        assert_eq!(kind, SchemeKind::Internal);
        assert_eq!(link.directory(), Dir::Home);
        assert_eq!(link.segments(), ["edit portfolio"]);
    }

    #[test]
    fn parse_duplicate_key_last_wins() {
        let (link, _) = codec().parse::<Dir>("sauron://home/?q=a&q=b").unwrap();
        assert_eq!(link.param_value("q"), Some("b"));
        assert_eq!(link.params().len(), 1);
    }

    #[test]
    fn parse_accepts_bare_query_and_fragment_markers() {
        let (link, _) = codec().parse::<Dir>("https://sauron.app/home?q=x#frag").unwrap();
        assert_eq!(link.param_value("q"), Some("x"));
        assert_eq!(link.fragment_value(), Some("frag"));
    }

    #[test]
    fn parse_rejects_unknown_scheme() {
        assert_eq!(
            codec().parse::<Dir>("gondor://home"),
            Err(LinkError::UnknownScheme {
                scheme: "gondor".to_string()
            })
        );
        assert_eq!(
            codec().parse::<Dir>("mailto:x@y.z"),
            Err(LinkError::UnknownScheme {
                scheme: "mailto".to_string()
            })
        );
    }

    #[test]
    fn parse_rejects_unknown_directory() {
        assert_eq!(
            codec().parse::<Dir>("sauron://profile/x"),
            Err(LinkError::UnknownDirectory {
                segment: "profile".to_string()
            })
        );
    }

    #[test]
    fn parse_rejects_unrecognized_host() {
        assert!(matches!(
            codec().parse::<Dir>("https://mordor.app/home"),
            Err(LinkError::Malformed { .. })
        ));
    }

    #[test]
    fn parse_rejects_missing_directory() {
        assert!(matches!(
            codec().parse::<Dir>("sauron://"),
            Err(LinkError::Malformed { .. })
        ));
        assert!(matches!(
            codec().parse::<Dir>("https://sauron.app"),
            Err(LinkError::Malformed { .. })
        ));
    }

    #[test]
    fn parse_rejects_interior_empty_segment() {
        assert_eq!(
            codec().parse::<Dir>("sauron://home//x"),
            Err(LinkError::EmptySegment)
        );
    }

    #[test]
    fn parse_tolerates_one_trailing_slash() {
        let (link, _) = codec().parse::<Dir>("sauron://home/").unwrap();
        assert!(link.segments().is_empty());
    }

    #[test]
    fn build_rejects_empty_segment() {
        let link = DeepLink::new(Dir::Home).segment("");
        assert_eq!(
            codec().build(&link, SchemeKind::Internal),
            Err(LinkError::EmptySegment)
        );
    }

    #[test]
    fn build_rejects_oversized_link() {
        let link = DeepLink::new(Dir::Home).segment("x".repeat(crate::MAX_LINK_LENGTH));
        assert!(matches!(
            codec().build(&link, SchemeKind::Internal),
            Err(LinkError::TooLong { .. })
        ));
    }

    #[test]
    fn scheme_of_classifies_dialects() {
        let c = codec();
        assert_eq!(c.scheme_of("sauron://home"), Some(SchemeKind::Internal));
        assert_eq!(
            c.scheme_of("https://sauron.app/home"),
            Some(SchemeKind::Universal)
        );
        assert_eq!(c.scheme_of("gondor://home"), None);
        assert_eq!(c.scheme_of("not a url"), None);
    }

    #[test]
    fn prefixes_match_built_links() {
        let c = codec();
        let url = c
            .build(
                &DeepLink::new(Dir::Home).segment("edit portfolio"),
                SchemeKind::Internal,
            )
            .unwrap();
        assert!(url.starts_with(&c.internal_prefix(Dir::Home)));

        let url = c
            .build(&DeepLink::new(Dir::Home), SchemeKind::Universal)
            .unwrap();
        assert!(url.starts_with(&c.universal_prefix(Dir::Home)));
    }
}
