//! # opinion_pulse
//!
//! Scrapes a small batch of articles from the El País Opinión section with
//! a headless browser, translates their headlines from Spanish to English,
//! and reports which translated words recur across the batch.
//!
//! ## Usage
//!
//! ```sh
//! # chromedriver must be listening (default http://localhost:9515)
//! opinion_pulse -i ./downloaded_images
//! ```
//!
//! ## Architecture
//!
//! The application is a three-stage pipeline:
//! 1. **Extraction**: drive a WebDriver session to the section listing and
//!    pull up to N articles (title, snippet, best-effort image download)
//! 2. **Translation**: translate each headline, strictly one request at a
//!    time, in extraction order
//! 3. **Analysis**: count repeated words across the translated headlines
//!
//! Every recoverable failure (missing snippet, missing image, dropped
//! article, translation abort) ends in a logged diagnostic and the run
//! continues; only an unreachable listing ends the run early, with a
//! graceful "No articles found." report.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analysis;
mod browser;
mod cli;
mod extractor;
mod media;
mod models;
mod translator;
mod utils;

use browser::BrowserSession;
use cli::Cli;
use translator::GtxClient;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("opinion_pulse starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: the image directory must exist and be writable before
    // the browser spins up.
    if let Err(e) = ensure_writable_dir(&args.image_output_dir).await {
        error!(
            path = %args.image_output_dir,
            error = %e,
            "Image output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let http = reqwest::Client::new();

    // ---- Extraction ----
    let session = BrowserSession::connect(&args.webdriver_url, !args.no_headless).await?;
    let extraction = async {
        session
            .open_section(extractor::HOMEPAGE, extractor::SECTION_LINK_TEXT)
            .await?;
        extractor::extract_articles(
            &session,
            &http,
            Path::new(&args.image_output_dir),
            args.max_articles,
        )
        .await
    }
    .await;

    // Teardown happens before the result is inspected, so the driver
    // session is released even when navigation or extraction failed.
    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to close browser session cleanly");
    }

    let mut articles = match extraction {
        Ok(articles) => articles,
        Err(e) => {
            error!(error = %e, "Extraction failed; nothing to report");
            Vec::new()
        }
    };

    if articles.is_empty() {
        println!("No articles found.");
        return Ok(());
    }
    info!(count = articles.len(), "Articles ready for translation");

    // ---- Translation ----
    let translator_client = GtxClient::new(&args.source_lang, &args.target_lang)?;
    let translated_titles = translator::translate_titles(&translator_client, &mut articles).await;

    // ---- Analysis ----
    let repeated = analysis::repeated_words(&translated_titles, args.repeat_threshold);

    // ---- Report ----
    println!("Translated Titles:");
    for article in &articles {
        println!("Original: {}", article.title);
        println!("Translated: {}\n", article.translated_or_fallback());
    }
    println!(
        "Repeated Words in Titles: {}",
        analysis::format_report(&repeated)
    );

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        articles = articles.len(),
        repeated_words = repeated.len(),
        "Execution complete"
    );

    Ok(())
}
