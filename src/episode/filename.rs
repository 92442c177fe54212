// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::NaiveDate;
use url::Url;

/// Extension used when neither the content type nor the URL decide
const DEFAULT_EXTENSION: &str = "mp4";

/// Characters kept verbatim in the title part of a filename
fn is_valid_filename_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '-' | '_')
}

/// Replace every character outside the allowed set with `_`
///
/// Length is preserved: one replacement per offending character.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if is_valid_filename_char(c) { c } else { '_' })
        .collect()
}

/// Pick the file extension for an enclosure
///
/// Video content types map to `webm` or `mp4`; anything else takes the
/// extension of the URL's last path segment.
pub fn select_extension(mime_type: &str, url: &Url) -> String {
    if mime_type.contains("video") {
        let ext = if mime_type.contains("webm") {
            "webm"
        } else {
            "mp4"
        };
        return ext.to_string();
    }

    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_EXTENSION)
        .to_string()
}

/// Build the destination filename of the `index`-th archived item
///
/// Format: `"<YYYY-MM-DD> <index:03> - <sanitized title>.<ext>"`.
pub fn episode_filename(index: usize, published: NaiveDate, title: &str, extension: &str) -> String {
    format!(
        "{} {:03} - {}.{}",
        published.format("%Y-%m-%d"),
        index,
        sanitize_title(title),
        extension
    )
}
