// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

use crate::archive::SkipReason;

/// Events emitted while archiving a feed
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The feed address passed validation and is being requested
    FetchingFeed { url: String },

    /// The feed was parsed and its download directory exists
    FeedParsed {
        feed_title: String,
        directory: PathBuf,
        total_items: usize,
    },

    /// Processing of an item begins (`index` is 1-based)
    ItemStarted { index: usize, total: usize },

    /// The item was skipped without error
    ItemSkipped { index: usize, reason: SkipReason },

    /// The enclosure responded and the destination file was created
    DownloadStarting {
        index: usize,
        filename: String,
        /// Expected content length in bytes, if known
        content_length: Option<u64>,
    },

    /// A chunk was written to disk
    DownloadProgress {
        index: usize,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
        /// 0 when the total is unknown
        percent: u8,
    },

    DownloadCompleted {
        index: usize,
        filename: String,
        bytes_downloaded: u64,
    },

    /// The item failed; the run continues with the next one
    ItemFailed { index: usize, error: String },

    ArchiveCompleted {
        directory: PathBuf,
        downloaded_count: usize,
        skipped_count: usize,
        failed_count: usize,
    },
}

/// Receives progress events; implementations render or record them
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// Ignores every event. Used for quiet mode and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

impl NoopReporter {
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

/// Percentage of `total` covered by `downloaded`, capped at 100
///
/// Unknown or zero totals report 0.
pub fn percent_complete(downloaded: u64, total: Option<u64>) -> u8 {
    match total {
        Some(total) if total > 0 => {
            let percent = u128::from(downloaded) * 100 / u128::from(total);
            percent.min(100) as u8
        }
        _ => 0,
    }
}

/// Running byte count of one download
#[derive(Debug, Clone, Copy)]
pub struct ProgressTracker {
    downloaded: u64,
    total: Option<u64>,
}

impl ProgressTracker {
    pub fn new(total: Option<u64>) -> Self {
        Self {
            downloaded: 0,
            total,
        }
    }

    /// Account for `bytes` more bytes and return the new percentage
    pub fn advance(&mut self, bytes: u64) -> u8 {
        self.downloaded += bytes;
        self.percent()
    }

    pub fn percent(&self) -> u8 {
        percent_complete(self.downloaded, self.total)
    }

    pub fn downloaded(&self) -> u64 {
        self.downloaded
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }
}
