// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use url::Url;

use crate::config::ArchiveConfig;
use crate::episode::{
    DownloadTarget, EpisodeInfo, download_enclosure, episode_filename, select_extension,
};
use crate::error::{ArchiveError, EpisodeError, FeedError};
use crate::feed::{Feed, Item, fetch_feed};
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Why an item was passed over without counting as a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The item carries no `<enclosure>`
    NoEnclosure,
    /// Something already occupies the destination path
    ///
    /// Presence alone counts; a truncated file from an interrupted run is
    /// treated as complete.
    AlreadyExists { filename: String },
}

/// What happened to one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Downloaded { filename: String, bytes: u64 },
    Skipped(SkipReason),
    Failed { error: String },
}

/// Outcome of one item together with its 1-based sequence index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub index: usize,
    pub outcome: ItemOutcome,
}

/// Result of a complete archive run
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub feed_title: String,
    /// Directory holding the downloaded files
    pub directory: PathBuf,
    /// One report per feed item, oldest first
    pub items: Vec<ItemReport>,
}

impl ArchiveSummary {
    pub fn downloaded(&self) -> usize {
        self.count(|outcome| matches!(outcome, ItemOutcome::Downloaded { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, ItemOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, ItemOutcome::Failed { .. }))
    }

    /// `(index, error)` of every failed item
    pub fn failures(&self) -> Vec<(usize, &str)> {
        self.items
            .iter()
            .filter_map(|report| match &report.outcome {
                ItemOutcome::Failed { error } => Some((report.index, error.as_str())),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

/// Archive every item of the configured feed
///
/// This is the main entry point for the library. It:
/// 1. Validates the feed address and fetches the feed
/// 2. Creates the download directory named after the channel title
/// 3. Processes the items oldest first, one download at a time
///
/// Only configuration, feed and directory errors are returned as `Err`;
/// problems with individual items end up in the summary.
pub async fn archive_feed<C: HttpClient>(
    client: &C,
    config: &ArchiveConfig,
    reporter: SharedProgressReporter,
) -> Result<ArchiveSummary, ArchiveError> {
    let feed = fetch_feed(client, config, &reporter).await?;
    let directory = prepare_directory(&config.base_dir, &feed.title).await?;

    reporter.report(ProgressEvent::FeedParsed {
        feed_title: feed.title.clone(),
        directory: directory.clone(),
        total_items: feed.items.len(),
    });

    let summary = archive_items(client, &feed, &directory, config.chunk_size, &reporter).await;

    reporter.report(ProgressEvent::ArchiveCompleted {
        directory: summary.directory.clone(),
        downloaded_count: summary.downloaded(),
        skipped_count: summary.skipped(),
        failed_count: summary.failed(),
    });

    info!(
        directory = %summary.directory.display(),
        downloaded = summary.downloaded(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "archive run finished"
    );

    Ok(summary)
}

/// Create `<base_dir>/<channel title>` if needed
///
/// The title is passed through `sanitize_filename` so it always names a
/// single directory below `base_dir`.
pub async fn prepare_directory(base_dir: &Path, feed_title: &str) -> Result<PathBuf, ArchiveError> {
    let name = sanitize_filename::sanitize(feed_title);
    if name.trim().is_empty() {
        return Err(FeedError::MissingChannelTitle.into());
    }

    let directory = base_dir.join(name);
    tokio::fs::create_dir_all(&directory)
        .await
        .map_err(|e| ArchiveError::CreateDirectoryFailed {
            path: directory.clone(),
            source: e,
        })?;

    Ok(directory)
}

/// Process the feed's items oldest first into `directory`
///
/// Never fails as a whole: each item yields exactly one report.
pub async fn archive_items<C: HttpClient>(
    client: &C,
    feed: &Feed,
    directory: &Path,
    chunk_size: usize,
    reporter: &SharedProgressReporter,
) -> ArchiveSummary {
    let items = feed.items_oldest_first();
    let total = items.len();
    let mut reports = Vec::with_capacity(total);

    for (offset, item) in items.enumerate() {
        let index = offset + 1;
        reporter.report(ProgressEvent::ItemStarted { index, total });

        let outcome = match process_item(client, item, index, directory, chunk_size, reporter).await
        {
            Ok(ItemOutcome::Skipped(reason)) => {
                debug!(index, ?reason, "item skipped");
                reporter.report(ProgressEvent::ItemSkipped {
                    index,
                    reason: reason.clone(),
                });
                ItemOutcome::Skipped(reason)
            }
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(index, guid = ?item.guid, error = %e, "item failed");
                reporter.report(ProgressEvent::ItemFailed {
                    index,
                    error: e.to_string(),
                });
                ItemOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        reports.push(ItemReport { index, outcome });
    }

    ArchiveSummary {
        feed_title: feed.title.clone(),
        directory: directory.to_path_buf(),
        items: reports,
    }
}

async fn process_item<C: HttpClient>(
    client: &C,
    item: &Item,
    index: usize,
    directory: &Path,
    chunk_size: usize,
    reporter: &SharedProgressReporter,
) -> Result<ItemOutcome, EpisodeError> {
    let info = EpisodeInfo::from_item(item)?;

    let Some(enclosure) = &item.enclosure else {
        return Ok(ItemOutcome::Skipped(SkipReason::NoEnclosure));
    };

    let url = Url::parse(&enclosure.url).map_err(|e| EpisodeError::InvalidEnclosureUrl {
        url: enclosure.url.clone(),
        source: e,
    })?;

    let title = info.title()?;
    let extension = select_extension(&enclosure.mime_type, &url);
    let filename = episode_filename(index, info.published_date(), &title, &extension);
    let destination = directory.join(&filename);

    let exists = tokio::fs::try_exists(&destination)
        .await
        .map_err(|e| EpisodeError::DestinationCheckFailed {
            path: destination.clone(),
            source: e,
        })?;
    if exists {
        return Ok(ItemOutcome::Skipped(SkipReason::AlreadyExists { filename }));
    }

    debug!(index, guid = %info.guid, %url, %filename, "downloading enclosure");
    let target = DownloadTarget {
        index,
        url: &url,
        destination: &destination,
        chunk_size,
    };
    let bytes = download_enclosure(client, &target, reporter).await?;

    Ok(ItemOutcome::Downloaded { filename, bytes })
}
