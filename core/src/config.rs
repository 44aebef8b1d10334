//! Serde-deserializable configuration (requires the `config` feature).
//!
//! Lets tools and test harnesses describe a codec and selector defaults in
//! JSON or YAML instead of code. The engine itself never reads files; the
//! caller deserializes with whichever serde format it prefers and converts.

use serde::Deserialize;

use crate::LinkCodec;

/// Declarative form of a [`LinkCodec`].
///
/// ```json
/// { "scheme": "sauron", "host": "sauron.app" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    /// App-internal URL scheme, without `://`.
    pub scheme: String,
    /// Universal-link host.
    pub host: String,
}

impl CodecConfig {
    /// Build the codec this configuration describes.
    #[must_use]
    pub fn into_codec(self) -> LinkCodec {
        LinkCodec::new(self.scheme, self.host)
    }
}

/// Declarative selector defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorConfig {
    /// Name of the root used when the decision tree yields nothing.
    #[serde(default = "default_root_name")]
    pub default_root: String,
}

fn default_root_name() -> String {
    "main".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_config_from_json() {
        let config: CodecConfig =
            serde_json::from_str(r#"{ "scheme": "sauron", "host": "sauron.app" }"#).unwrap();
        let codec = config.into_codec();
        assert_eq!(codec.scheme(), "sauron");
        assert_eq!(codec.host(), "sauron.app");
    }

    #[test]
    fn codec_config_from_yaml() {
        let config: CodecConfig = serde_yaml::from_str("scheme: sauron\nhost: sauron.app\n").unwrap();
        assert_eq!(config.into_codec().scheme(), "sauron");
    }

    #[test]
    fn codec_config_rejects_unknown_fields() {
        let result: Result<CodecConfig, _> =
            serde_json::from_str(r#"{ "scheme": "s", "host": "h", "port": 80 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn selector_config_defaults_to_main() {
        let config: SelectorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.default_root, "main");

        let config: SelectorConfig =
            serde_yaml::from_str("default_root: onboarding\n").unwrap();
        assert_eq!(config.default_root, "onboarding");
    }
}
