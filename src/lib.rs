// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod archive;
pub mod config;
pub mod episode;
pub mod error;
pub mod feed;
pub mod http;
pub mod progress;

// Re-export main types for convenience
pub use archive::{ArchiveSummary, ItemOutcome, ItemReport, SkipReason, archive_feed};
pub use config::ArchiveConfig;
pub use episode::{EpisodeInfo, episode_filename, sanitize_title, select_extension};
pub use error::{ArchiveError, ConfigError, DownloadError, EpisodeError, FeedError};
pub use feed::{Enclosure, Feed, Item, fetch_feed, parse_feed};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
