// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::FeedError;

/// A parsed feed document
#[derive(Debug, Clone)]
pub struct Feed {
    /// Channel title, names the download directory
    pub title: String,
    /// Items in document order (usually newest first)
    pub items: Vec<Item>,
}

/// One `<item>` as it appears in the feed
///
/// Fields are kept raw; validation happens per item while archiving so that
/// one broken item cannot take down the whole feed.
#[derive(Debug, Clone, Default)]
pub struct Item {
    pub guid: Option<String>,
    pub pub_date: Option<String>,
    pub description: Option<String>,
    pub enclosure: Option<Enclosure>,
}

/// Media reference attached to an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    /// Declared content type, empty when the attribute is absent
    pub mime_type: String,
}

impl Feed {
    /// Items in archive order, oldest first
    pub fn items_oldest_first(&self) -> impl ExactSizeIterator<Item = &Item> {
        self.items.iter().rev()
    }
}

/// Parse RSS XML bytes into a `Feed`
pub fn parse_feed(xml_bytes: &[u8]) -> Result<Feed, FeedError> {
    let channel = rss::Channel::read_from(xml_bytes)?;

    let title = channel.title().trim();
    if title.is_empty() {
        return Err(FeedError::MissingChannelTitle);
    }

    Ok(Feed {
        title: title.to_string(),
        items: channel.items().iter().map(parse_item).collect(),
    })
}

fn parse_item(item: &rss::Item) -> Item {
    Item {
        guid: item.guid().map(|g| g.value().to_string()),
        pub_date: item.pub_date().map(String::from),
        description: item.description().map(String::from),
        enclosure: item.enclosure().map(|enclosure| Enclosure {
            url: enclosure.url().to_string(),
            mime_type: enclosure.mime_type().to_string(),
        }),
    }
}
