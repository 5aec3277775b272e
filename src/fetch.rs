use crate::config::FetcherConfig;
use crate::results::{FetchReport, RawPage};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use std::time::Duration;
use thiserror::Error;

/// Errors a fetch attempt can end with
#[derive(Debug, Error)]
pub enum FetchError {
    // The cause is carried by the source chain, not repeated in the
    // display string
    #[error("failed to connect to WebDriver at {url}")]
    Connect {
        url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    #[error("browser command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),
}

/// Retrieves a page's rendered markup for a validated URL.
///
/// Implementations report progress through the `FetchReport` log and
/// signal failure through its tagged result, never by panicking.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchReport;
}

/// Fetcher that drives a remote browser through a WebDriver endpoint.
///
/// Each fetch opens a fresh session: navigate, wait out the initial page
/// load, wait for a `body` element, let the page settle, screenshot, read
/// the page source, close the session.
pub struct WebDriverFetcher {
    config: FetcherConfig,
}

impl WebDriverFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    async fn fetch_page(&self, url: &str, log: &mut Vec<String>) -> Result<RawPage, FetchError> {
        note(log, format!(
            "Connecting to WebDriver at {}...",
            self.config.webdriver_url
        ));

        let client = match ClientBuilder::native()
            .connect(&self.config.webdriver_url)
            .await
        {
            Ok(client) => client,
            Err(e) => {
                // The report log is for display, so it spells out the cause
                log.push(format!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.config.webdriver_url, e
                ));
                return Err(FetchError::Connect {
                    url: self.config.webdriver_url.clone(),
                    source: e,
                });
            }
        };

        note(log, format!("Connected! Navigating to {}...", url));
        if let Err(e) = client.goto(url).await {
            log.push(format!("Navigation failed: {}", e));
            close_quietly(client).await;
            return Err(e.into());
        }

        tokio::time::sleep(Duration::from_secs(self.config.page_load_wait_secs)).await;

        // The body can lag behind navigation on pages that render through
        // scripts or sit behind an interstitial; a timeout here is logged
        // but the fetch continues with whatever the page has.
        note(log, "Waiting for page body...".to_string());
        match client
            .wait()
            .at_most(Duration::from_secs(self.config.body_wait_timeout_secs))
            .for_element(Locator::Css("body"))
            .await
        {
            Ok(_) => note(log, "Page body present".to_string()),
            Err(e) => note(log, format!("Timed out waiting for page body: {}", e)),
        }

        tokio::time::sleep(Duration::from_secs(self.config.settle_wait_secs)).await;

        note(log, format!(
            "Taking page screenshot to {}",
            self.config.screenshot_path.display()
        ));
        let screenshot = match client.screenshot().await {
            Ok(png) => match tokio::fs::write(&self.config.screenshot_path, &png).await {
                Ok(()) => Some(self.config.screenshot_path.clone()),
                Err(e) => {
                    note(log, format!("Failed to write screenshot: {}", e));
                    None
                }
            },
            Err(e) => {
                note(log, format!("Screenshot capture failed: {}", e));
                None
            }
        };

        note(log, "Scraping page content...".to_string());
        let html = match client.source().await {
            Ok(source) => source,
            Err(e) => {
                log.push(format!("Failed to read page source: {}", e));
                close_quietly(client).await;
                return Err(e.into());
            }
        };

        close_quietly(client).await;
        note(log, "Scraping completed".to_string());

        Ok(RawPage { html, screenshot })
    }
}

#[async_trait]
impl PageFetcher for WebDriverFetcher {
    async fn fetch(&self, url: &str) -> FetchReport {
        let mut log = Vec::new();
        let result = self.fetch_page(url, &mut log).await;
        FetchReport { log, result }
    }
}

/// Records a progress line in both the report log and the process log
fn note(log: &mut Vec<String>, message: String) {
    ::log::info!("{}", message);
    log.push(message);
}

/// Closes a WebDriver session, downgrading failure to a warning
async fn close_quietly(client: Client) {
    if let Err(e) = client.close().await {
        ::log::warn!("failed to close WebDriver session: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_connect_error_display_does_not_repeat_the_cause() {
        let err = FetchError::Connect {
            url: "http://localhost:4444".to_string(),
            source: fantoccini::error::NewSessionError::NotW3C(serde_json::json!(
                "connection refused"
            )),
        };

        // Chain-walking reporters print the source themselves; the display
        // string carries only this error's own context
        assert_eq!(
            err.to_string(),
            "failed to connect to WebDriver at http://localhost:4444"
        );
        assert!(err.source().is_some());
        assert!(!err.to_string().contains("connection refused"));
    }
}
