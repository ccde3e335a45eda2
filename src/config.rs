//! Runtime configuration.
//!
//! The whole subsystem needs exactly one secret (the YouTube Data API key)
//! and one switch (debug diagnostics in the rendered output).

/// Configuration for the enrichment pipeline.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// YouTube Data API v3 key.
    pub api_key: String,
    /// When set, provider error detail is surfaced as an HTML comment in the
    /// tag output. Production renders leave this off.
    pub debug: bool,
}

impl Config {
    /// Create a config with the given API key and debug off.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            debug: false,
        }
    }

    /// Read configuration from `TUBEMETA_API_KEY` and `TUBEMETA_DEBUG`.
    ///
    /// A missing key yields an empty string; the provider will then surface
    /// the API's own unauthorized error on first use rather than guessing
    /// here.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("TUBEMETA_API_KEY").unwrap_or_default(),
            debug: std::env::var("TUBEMETA_DEBUG")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Toggle debug diagnostics.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_debug_off() {
        let config = Config::new("key123");
        assert_eq!(config.api_key, "key123");
        assert!(!config.debug);
        assert!(Config::new("key123").with_debug(true).debug);
    }
}
