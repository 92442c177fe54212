// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use bytes::BytesMut;
use futures::StreamExt;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::error::DownloadError;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, ProgressTracker, SharedProgressReporter};

/// Where and how a single enclosure is written
#[derive(Debug, Clone, Copy)]
pub struct DownloadTarget<'a> {
    /// 1-based sequence index of the item, used in progress events
    pub index: usize,
    pub url: &'a Url,
    pub destination: &'a Path,
    /// Bytes per write and per progress event
    pub chunk_size: usize,
}

/// Stream an enclosure to `target.destination`
///
/// The destination is created only once the server has answered with a
/// non-error status, and creation fails if the file already exists. The body
/// is regrouped into `chunk_size` pieces (the last one may be shorter) and a
/// progress event is emitted after each piece hits the disk.
/// Returns the number of bytes written.
pub async fn download_enclosure<C: HttpClient>(
    client: &C,
    target: &DownloadTarget<'_>,
    reporter: &SharedProgressReporter,
) -> Result<u64, DownloadError> {
    let url = target.url.as_str();

    let response = client
        .get_stream(url)
        .await
        .map_err(|e| DownloadError::HttpFailed {
            url: url.to_string(),
            source: e,
        })?;

    if response.status >= 400 {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target.destination)
        .await
        .map_err(|e| DownloadError::FileCreateFailed {
            path: target.destination.to_path_buf(),
            source: e,
        })?;

    let filename = target
        .destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    reporter.report(ProgressEvent::DownloadStarting {
        index: target.index,
        filename: filename.clone(),
        content_length: response.content_length,
    });

    let mut sink = ChunkSink {
        file,
        target,
        tracker: ProgressTracker::new(response.content_length),
        reporter,
    };

    let mut buffer = BytesMut::with_capacity(target.chunk_size);
    let mut stream = response.body;

    while let Some(piece) = stream.next().await {
        let piece = piece.map_err(|e| DownloadError::StreamFailed {
            url: url.to_string(),
            source: e,
        })?;
        buffer.extend_from_slice(&piece);

        while buffer.len() >= target.chunk_size {
            let chunk = buffer.split_to(target.chunk_size);
            sink.write_chunk(&chunk).await?;
        }
    }

    if !buffer.is_empty() {
        sink.write_chunk(&buffer).await?;
    }

    let bytes_downloaded = sink.finish().await?;
    debug!(url, bytes_downloaded, "download finished");

    reporter.report(ProgressEvent::DownloadCompleted {
        index: target.index,
        filename,
        bytes_downloaded,
    });

    Ok(bytes_downloaded)
}

/// Output file plus the progress bookkeeping that follows each write
struct ChunkSink<'a> {
    file: File,
    target: &'a DownloadTarget<'a>,
    tracker: ProgressTracker,
    reporter: &'a SharedProgressReporter,
}

impl ChunkSink<'_> {
    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), DownloadError> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| self.write_error(e))?;

        let percent = self.tracker.advance(chunk.len() as u64);
        self.reporter.report(ProgressEvent::DownloadProgress {
            index: self.target.index,
            bytes_downloaded: self.tracker.downloaded(),
            total_bytes: self.tracker.total(),
            percent,
        });
        Ok(())
    }

    async fn finish(mut self) -> Result<u64, DownloadError> {
        self.file.flush().await.map_err(|e| self.write_error(e))?;
        Ok(self.tracker.downloaded())
    }

    fn write_error(&self, source: std::io::Error) -> DownloadError {
        DownloadError::FileWriteFailed {
            path: self.target.destination.to_path_buf(),
            source,
        }
    }
}
