// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_subscriber::EnvFilter;

use herocast::{
    ArchiveConfig, NoopReporter, ProgressEvent, ProgressReporter, ReqwestClient,
    SharedProgressReporter, SkipReason, archive_feed,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "[-] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");

const MIB: f64 = 1024.0 * 1024.0;

/// Archive every episode of a subscription RSS feed
#[derive(Parser, Debug)]
#[command(name = "herocast")]
#[command(about = "Archive every episode of a subscription RSS feed")]
#[command(version)]
struct Args {
    /// RSS feed URL, e.g. https://herohero.co/services/functions/rss-feed?...
    feed: String,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Prints status lines and renders the running download as an in-place bar
struct ConsoleReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn start_bar(&self) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template(&format!("  {DOWNLOAD}[{{bar:30.cyan/blue}}] {{wide_msg}}"))
            .unwrap()
            .progress_chars("█▓░");

        let bar = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stdout());
        bar.set_style(style);
        *self.bar.lock().unwrap() = Some(bar.clone());
        bar
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().unwrap().take()
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingFeed { url } => {
                println!("{SEARCH}Fetching feed: {}", url.cyan());
            }

            ProgressEvent::FeedParsed {
                feed_title,
                directory,
                total_items,
            } => {
                println!(
                    "{HEADPHONES}{} • {} items → {}",
                    feed_title.bold().green(),
                    total_items.to_string().cyan(),
                    directory.display().to_string().dimmed()
                );
            }

            ProgressEvent::ItemStarted { index, total } => {
                println!(
                    "\nProcessing item {} of {}",
                    index.to_string().cyan(),
                    total.to_string().cyan()
                );
            }

            ProgressEvent::ItemSkipped { index, reason } => match reason {
                SkipReason::NoEnclosure => {
                    println!("{SKIP}Item {index} has no media file, skipping...");
                }
                SkipReason::AlreadyExists { filename } => {
                    println!("{SKIP}{} already exists, skipping...", filename.yellow());
                }
            },

            ProgressEvent::DownloadStarting {
                filename,
                content_length,
                ..
            } => {
                println!("{DOWNLOAD}Downloading {}...", filename.bold());
                let bar = self.start_bar();
                bar.set_message(progress_message(0, 0, content_length));
            }

            ProgressEvent::DownloadProgress {
                bytes_downloaded,
                total_bytes,
                percent,
                ..
            } => {
                if let Some(bar) = self.bar.lock().unwrap().as_ref() {
                    bar.set_position(u64::from(percent));
                    bar.set_message(progress_message(percent, bytes_downloaded, total_bytes));
                }
            }

            ProgressEvent::DownloadCompleted {
                filename,
                bytes_downloaded,
                ..
            } => {
                if let Some(bar) = self.take_bar() {
                    bar.finish_and_clear();
                }
                println!(
                    "{SUCCESS}Download of {} finished ({:.1} MB)",
                    filename.green(),
                    bytes_downloaded as f64 / MIB
                );
            }

            ProgressEvent::ItemFailed { index, error } => {
                if let Some(bar) = self.take_bar() {
                    bar.abandon();
                }
                println!(
                    "{FAILURE}{} {}",
                    format!("Error while processing item {index}:").red(),
                    error.red()
                );
            }

            ProgressEvent::ArchiveCompleted {
                directory,
                downloaded_count,
                skipped_count,
                failed_count,
            } => {
                println!(
                    "\n{PARTY}{} {} downloaded, {} skipped, {} failed",
                    "Archive complete:".bold().green(),
                    downloaded_count.to_string().green().bold(),
                    skipped_count.to_string().yellow(),
                    if failed_count > 0 {
                        failed_count.to_string().red().bold()
                    } else {
                        failed_count.to_string().green()
                    }
                );
                println!(
                    "{FOLDER}All files were saved to: {}\n",
                    directory.display().to_string().cyan()
                );
            }
        }
    }
}

/// `"<percent>% downloaded (<done> MB / <total> MB)"`, total 0 when unknown
fn progress_message(percent: u8, bytes_downloaded: u64, total_bytes: Option<u64>) -> String {
    format!(
        "{}% downloaded ({:.1} MB / {:.1} MB)",
        percent,
        bytes_downloaded as f64 / MIB,
        total_bytes.unwrap_or(0) as f64 / MIB
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "herocast".bold().magenta(),
            "- Feed Archiver".dimmed()
        );
    }

    let config = ArchiveConfig::new(args.feed);
    let client = ReqwestClient::new();

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(ConsoleReporter::new())
    };

    archive_feed(&client, &config, reporter)
        .await
        .context("Failed to archive feed")?;

    Ok(())
}
