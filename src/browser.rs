//! Headless browser session management.
//!
//! [`BrowserSession`] is an explicitly owned handle around a fantoccini
//! WebDriver client. The orchestrator creates it, hands it to the extractor
//! by reference, and closes it on every path out of extraction (including
//! the fatal listing-timeout path), so the underlying driver session is
//! always torn down.
//!
//! Connects to a running chromedriver-compatible endpoint
//! (default `http://localhost:9515`).

use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Pause after clicking the section link, giving the listing time to settle
/// before element queries begin.
const SECTION_SETTLE: Duration = Duration::from_secs(2);

/// An owned headless Chrome session.
pub struct BrowserSession {
    client: Client,
}

impl BrowserSession {
    /// Connect to the WebDriver endpoint and start a Chrome session.
    ///
    /// The session always disables the automation-controlled blink feature
    /// (the target site blocks obvious bots); `headless` additionally adds
    /// `--headless` and `--disable-gpu`.
    #[instrument(level = "info", skip_all, fields(%webdriver_url, headless = headless))]
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, Box<dyn Error>> {
        let mut args = vec!["--disable-blink-features=AutomationControlled"];
        if headless {
            args.push("--headless");
            args.push("--disable-gpu");
        }

        let mut chrome_opts = Map::new();
        chrome_opts.insert("args".to_string(), json!(args));
        let mut caps = Map::new();
        caps.insert("goog:chromeOptions".to_string(), Value::Object(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;

        info!("Browser session established");
        Ok(Self { client })
    }

    /// Navigate to `homepage`, then follow the navigation link whose visible
    /// text is `link_text` and wait for the page to settle.
    ///
    /// # Errors
    ///
    /// Fails if the homepage cannot be loaded or the section link is absent;
    /// both are fatal to the run.
    #[instrument(level = "info", skip(self))]
    pub async fn open_section(&self, homepage: &str, link_text: &str) -> Result<(), Box<dyn Error>> {
        self.client.goto(homepage).await?;
        debug!("Homepage loaded");

        let section_link = self.client.find(Locator::LinkText(link_text)).await?;
        section_link.click().await?;
        tokio::time::sleep(SECTION_SETTLE).await;

        info!(section = link_text, "Section opened");
        Ok(())
    }

    /// Block until at least one element matches `selector`, up to `timeout`.
    pub async fn wait_for_css(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Element, Box<dyn Error>> {
        let element = self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await?;
        Ok(element)
    }

    /// All current matches for `selector`, in document order.
    pub async fn find_all_css(&self, selector: &str) -> Result<Vec<Element>, Box<dyn Error>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        Ok(elements)
    }

    /// URL of the page the session is currently on.
    pub async fn current_url(&self) -> Result<url::Url, Box<dyn Error>> {
        Ok(self.client.current_url().await?)
    }

    /// End the session and shut the browser down.
    pub async fn close(self) -> Result<(), Box<dyn Error>> {
        self.client.close().await?;
        info!("Browser session closed");
        Ok(())
    }
}
