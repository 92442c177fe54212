// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use url::Url;

use crate::error::ConfigError;

/// Feed addresses must start with this prefix unless configured otherwise
pub const DEFAULT_TRUSTED_PREFIX: &str = "https://herohero.co";

/// Size of the chunks written to disk and reported as progress steps
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Everything a single archive run needs to know
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Address of the RSS feed
    pub feed_url: String,
    /// Required prefix of `feed_url`
    pub trusted_prefix: String,
    /// Directory in which the per-feed download directory is created
    pub base_dir: PathBuf,
    /// Number of bytes written per progress step
    pub chunk_size: usize,
}

impl ArchiveConfig {
    /// Create a config for `feed_url` with default settings
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            trusted_prefix: DEFAULT_TRUSTED_PREFIX.to_string(),
            base_dir: PathBuf::from("."),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_trusted_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.trusted_prefix = prefix.into();
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Check the feed address against the trusted prefix and parse it
    ///
    /// Runs before any network call so a wrong address fails fast.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if !self.feed_url.starts_with(&self.trusted_prefix) {
            return Err(ConfigError::UntrustedFeedUrl {
                url: self.feed_url.clone(),
                expected_prefix: self.trusted_prefix.clone(),
            });
        }

        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }

        Ok(Url::parse(&self.feed_url)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_herohero() {
        let config = ArchiveConfig::new("https://herohero.co/services/functions/rss-feed");
        assert_eq!(config.trusted_prefix, DEFAULT_TRUSTED_PREFIX);
        assert_eq!(config.base_dir, PathBuf::from("."));
        assert_eq!(config.chunk_size, 1024 * 1024);
    }

    #[test]
    fn validate_accepts_trusted_address() {
        let config = ArchiveConfig::new("https://herohero.co/services/functions/rss-feed?id=1");
        let url = config.validate().unwrap();
        assert_eq!(url.host_str(), Some("herohero.co"));
    }

    #[test]
    fn validate_rejects_other_hosts() {
        let config = ArchiveConfig::new("https://example.com/feed.xml");
        match config.validate() {
            Err(ConfigError::UntrustedFeedUrl {
                expected_prefix, ..
            }) => assert_eq!(expected_prefix, "https://herohero.co"),
            other => panic!("Expected UntrustedFeedUrl, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_plain_http() {
        let config = ArchiveConfig::new("http://herohero.co/feed");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_uses_custom_prefix() {
        let config =
            ArchiveConfig::new("http://127.0.0.1:8080/feed").with_trusted_prefix("http://127.0.0.1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_chunk_size() {
        let config = ArchiveConfig::new("https://herohero.co/feed").with_chunk_size(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroChunkSize)));
    }

    #[test]
    fn validate_reports_unparseable_url() {
        let config = ArchiveConfig::new("https://herohero.co:notaport/feed");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));
    }
}
