mod download;
mod filename;
mod metadata;

pub use download::{DownloadTarget, download_enclosure};
pub use filename::{episode_filename, sanitize_title, select_extension};
pub use metadata::{EpisodeInfo, derive_title, parse_pub_date};
