//! Article extraction from the El País Opinión listing.
//!
//! Given a session already positioned on the section listing, scans up to
//! a configured number of `article` containers in document order.
//! Each container is processed independently: a missing title skips that
//! one article (logged, never fatal), a missing snippet falls back to the
//! sentinel, and the representative image is captured best-effort through
//! the media fetcher. Only a listing that never appears at all fails the
//! whole extraction.
//!
//! Per-item failures are threaded through [`SkipReason`] rather than caught
//! ambiently, so tests and callers can see why an article was dropped.

use crate::browser::BrowserSession;
use crate::media::{self, FetchOutcome};
use crate::models::Article;
use crate::utils::truncate_for_log;
use fantoccini::Locator;
use fantoccini::elements::Element;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use thiserror::Error as ThisError;
use tracing::{debug, info, instrument, warn};

/// Origin the run navigates to.
pub const HOMEPAGE: &str = "https://elpais.com/";
/// Visible text of the section navigation link.
pub const SECTION_LINK_TEXT: &str = "Opinión";

const ARTICLE_SELECTOR: &str = "article";
const TITLE_SELECTOR: &str = "h2.c_t a";
const CONTENT_SELECTOR: &str = "p.c_d";
const IMAGE_SELECTOR: &str = "figure.c_m img";

/// How long the listing gets to produce its first `article` element before
/// the run is declared dead.
const LISTING_WAIT: Duration = Duration::from_secs(10);
/// Bounded wait for an article's image, polled inside its own container.
const IMAGE_WAIT: Duration = Duration::from_secs(5);
const IMAGE_POLL: Duration = Duration::from_millis(250);

/// Why one article container was dropped from the batch.
#[derive(Debug, ThisError)]
pub enum SkipReason {
    /// No element matched the title selector inside this container.
    #[error("title element not found: {0}")]
    MissingTitle(String),
    /// The title element carried no visible text.
    #[error("title element is empty")]
    EmptyTitle,
    /// The driver failed while reading an element that was already located.
    #[error("element lookup failed: {0}")]
    ElementLookup(String),
}

/// Extract up to `limit` articles from the listing the session is on.
///
/// Returns the successfully extracted articles in document order with
/// skipped items collapsed out. As a side effect, writes zero or more
/// `article_{index}.jpg` files under `image_dir` (1-based index matching
/// each article's position in the scan, including skipped slots).
///
/// # Errors
///
/// Fails only if no article container appears within the bounded wait.
/// That is fatal to the run; the caller reports an empty run and stops.
#[instrument(level = "info", skip_all, fields(limit = limit))]
pub async fn extract_articles(
    session: &BrowserSession,
    http: &reqwest::Client,
    image_dir: &Path,
    limit: usize,
) -> Result<Vec<Article>, Box<dyn Error>> {
    session.wait_for_css(ARTICLE_SELECTOR, LISTING_WAIT).await?;

    let containers = session.find_all_css(ARTICLE_SELECTOR).await?;
    debug!(found = containers.len(), "Located article containers");

    let mut outcomes = Vec::new();
    for (i, container) in containers.into_iter().take(limit).enumerate() {
        let index = i + 1;
        let outcome = extract_one(&container, index).await;

        if let Ok(article) = &outcome {
            info!(
                index,
                title = %article.title,
                content = %truncate_for_log(&article.content, 120),
                "Extracted article"
            );
            if let Err(e) = capture_image(session, http, &container, image_dir, index).await {
                warn!(index, error = %e, "Image not found");
            }
        }
        outcomes.push(outcome);
    }

    let articles = collect_extracted(outcomes);
    info!(count = articles.len(), "Extraction complete");
    Ok(articles)
}

/// Collapse per-item outcomes into the final batch, logging each skip.
/// Document order is preserved; skipped slots leave no placeholder.
fn collect_extracted(outcomes: Vec<Result<Article, SkipReason>>) -> Vec<Article> {
    let mut articles = Vec::new();
    for (i, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(article) => articles.push(article),
            Err(reason) => warn!(index = i + 1, %reason, "Error processing article; skipping"),
        }
    }
    articles
}

/// Pull title and snippet out of one article container.
async fn extract_one(container: &Element, index: usize) -> Result<Article, SkipReason> {
    let title_element = container
        .find(Locator::Css(TITLE_SELECTOR))
        .await
        .map_err(|e| SkipReason::MissingTitle(e.to_string()))?;
    let title = title_element
        .text()
        .await
        .map_err(|e| SkipReason::ElementLookup(e.to_string()))?
        .trim()
        .to_string();
    if title.is_empty() {
        return Err(SkipReason::EmptyTitle);
    }

    if let Ok(Some(href)) = title_element.attr("href").await {
        debug!(index, %href, "Article link");
    }

    // Snippet is best-effort: a missing element, read failure, or blank
    // text all fall back to the sentinel via Article::new.
    let content = match container.find(Locator::Css(CONTENT_SELECTOR)).await {
        Ok(element) => element
            .text()
            .await
            .map(|t| t.trim().to_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    };

    Ok(Article::new(title, content))
}

/// Locate the article's image with a bounded wait scoped to its container
/// and hand it to the media fetcher. Any miss is reported as `Err` for the
/// caller to log; nothing here can fail the article.
async fn capture_image(
    session: &BrowserSession,
    http: &reqwest::Client,
    container: &Element,
    image_dir: &Path,
    index: usize,
) -> Result<(), Box<dyn Error>> {
    let image_element = wait_for_child(container, IMAGE_SELECTOR, IMAGE_WAIT)
        .await
        .ok_or("no image element in media container")?;
    let src = image_element
        .attr("src")
        .await?
        .ok_or("image element has no src attribute")?;

    let page_url = session.current_url().await?;
    let image_url = page_url.join(&src)?;

    let dest = media::image_destination(image_dir, index);
    match media::download_image(http, image_url.as_str(), &dest).await? {
        FetchOutcome::Saved => {}
        FetchOutcome::Skipped(status) => {
            debug!(index, status, "Image fetch answered non-success; no file written");
        }
    }
    Ok(())
}

/// Poll for a child of `container` matching `selector`, up to `timeout`.
async fn wait_for_child(
    container: &Element,
    selector: &str,
    timeout: Duration,
) -> Option<Element> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Ok(element) = container.find(Locator::Css(selector)).await {
            return Some(element);
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(IMAGE_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SENTINEL_CONTENT;

    fn ok(title: &str) -> Result<Article, SkipReason> {
        Ok(Article::new(title.to_string(), "snippet".to_string()))
    }

    #[test]
    fn test_collect_extracted_collapses_gaps_in_order() {
        let outcomes = vec![
            ok("uno"),
            Err(SkipReason::MissingTitle("no such element".to_string())),
            ok("tres"),
            Err(SkipReason::EmptyTitle),
            ok("cinco"),
        ];

        let articles = collect_extracted(outcomes);
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["uno", "tres", "cinco"]);
    }

    #[test]
    fn test_collect_extracted_all_skipped() {
        let outcomes: Vec<Result<Article, SkipReason>> =
            vec![Err(SkipReason::EmptyTitle), Err(SkipReason::EmptyTitle)];
        assert!(collect_extracted(outcomes).is_empty());
    }

    #[test]
    fn test_missing_content_becomes_sentinel() {
        // The extraction path feeds an empty snippet into Article::new when
        // the content selector matches nothing.
        let article = Article::new("Titular".to_string(), String::new());
        assert_eq!(article.content, SENTINEL_CONTENT);
    }

    #[test]
    fn test_skip_reason_messages() {
        let missing = SkipReason::MissingTitle("no such element".to_string());
        assert_eq!(
            missing.to_string(),
            "title element not found: no such element"
        );
        assert_eq!(SkipReason::EmptyTitle.to_string(), "title element is empty");
    }

    #[test]
    fn test_image_url_resolution_against_page() {
        let page = url::Url::parse("https://elpais.com/opinion/").unwrap();
        assert_eq!(
            page.join("/imagenes/foto.jpg").unwrap().as_str(),
            "https://elpais.com/imagenes/foto.jpg"
        );
        assert_eq!(
            page.join("https://cdn.example.com/a.jpg").unwrap().as_str(),
            "https://cdn.example.com/a.jpg"
        );
    }
}
