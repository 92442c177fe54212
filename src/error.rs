// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors in the run configuration, detected before any network access
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Feed address '{url}' is not trusted, expected it to start with '{expected_prefix}'")]
    UntrustedFeedUrl {
        url: String,
        expected_prefix: String,
    },

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Chunk size must be greater than zero")]
    ZeroChunkSize,
}

/// Errors that can occur when fetching or parsing the feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to fetch feed from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse RSS feed: {0}")]
    ParseFailed(#[from] rss::Error),

    #[error("Feed has no usable channel title")]
    MissingChannelTitle,
}

/// Errors that can occur while streaming an enclosure to disk
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed for {url}: {source}")]
    HttpFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to create file {path}: {source}")]
    FileCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {path}: {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream error while downloading {url}: {source}")]
    StreamFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors confined to a single feed item
#[derive(Error, Debug)]
pub enum EpisodeError {
    #[error("Item is missing its <{field}> element")]
    MissingField { field: &'static str },

    #[error("Failed to parse date '{date_str}': {source}")]
    InvalidDate {
        date_str: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid enclosure URL '{url}': {source}")]
    InvalidEnclosureUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to check destination {path}: {source}")]
    DestinationCheckFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Errors that abort a whole archive run
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
