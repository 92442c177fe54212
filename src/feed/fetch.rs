// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bytes::Bytes;
use tracing::info;

use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, FeedError};
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

use super::parse::{Feed, parse_feed};

/// Fetch raw feed bytes from a URL (without parsing)
pub async fn fetch_feed_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes, FeedError> {
    client
        .get_bytes(url)
        .await
        .map_err(|e| FeedError::FetchFailed {
            url: url.to_string(),
            source: e,
        })
}

/// Validate the configured address, then fetch and parse the feed
///
/// The trusted-prefix check happens before any request is made.
pub async fn fetch_feed<C: HttpClient>(
    client: &C,
    config: &ArchiveConfig,
    reporter: &SharedProgressReporter,
) -> Result<Feed, ArchiveError> {
    let url = config.validate()?;
    reporter.report(ProgressEvent::FetchingFeed {
        url: url.to_string(),
    });
    let bytes = fetch_feed_bytes(client, url.as_str()).await?;
    let feed = parse_feed(&bytes)?;
    info!(title = %feed.title, items = feed.items.len(), "feed parsed");
    Ok(feed)
}
