use crate::glean_browser::{
    page,
    session::{BrowserSession, DriverError, SessionFactory, Settle, WaitPolicy},
};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashMap;
use tokio::time::sleep;
use tracing::{debug, warn};
use webdriver::capabilities::Capabilities;

/// Chrome command-line arguments for a scraping session.
pub fn chrome_arguments(headless: bool) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-extensions".to_string(),
        "--window-size=1440,900".to_string(),
    ];
    if headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}

/// Thin wrapper around a `fantoccini` WebDriver client.
pub struct GleanDriver {
    client: Option<Client>,
}

impl GleanDriver {
    /// Start a Chrome session on a running WebDriver service, e.g.
    /// Chromedriver on `http://localhost:9515`.
    pub async fn new(webdriver_url: &str, headless: bool) -> Result<Self, DriverError> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args".to_string(), json!(chrome_arguments(headless)));
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await
            .map_err(|e| DriverError::Session {
                endpoint: webdriver_url.to_string(),
                message: e.to_string(),
            })?;

        debug!(target: "browser.session", endpoint = %webdriver_url, headless, "opened");
        Ok(Self {
            client: Some(client),
        })
    }

    fn client(&self) -> Result<&Client, DriverError> {
        self.client.as_ref().ok_or(DriverError::Closed)
    }
}

#[async_trait]
impl BrowserSession for GleanDriver {
    async fn goto(&mut self, url: &str) -> Result<(), DriverError> {
        debug!(target: "browser.session", %url, "goto");
        self.client()?.goto(url).await?;
        Ok(())
    }

    async fn settle(&mut self, settle: Settle) -> Result<(), DriverError> {
        match settle {
            Settle::Fixed(pause) => {
                sleep(pause).await;
                Ok(())
            }
            Settle::DocumentReady(wait) => page::wait_for_document_ready(self.client()?, wait).await,
        }
    }

    async fn click_when_clickable(
        &mut self,
        selector: &str,
        wait: WaitPolicy,
    ) -> Result<(), DriverError> {
        let element = page::wait_for_clickable(self.client()?, selector, wait).await?;
        element.click().await?;
        Ok(())
    }

    async fn wait_for_present(
        &mut self,
        selector: &str,
        wait: WaitPolicy,
    ) -> Result<(), DriverError> {
        page::wait_for_present(self.client()?, selector, wait).await?;
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        Ok(self.client()?.source().await?)
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        match self.client.take() {
            Some(client) => {
                client.close().await?;
                debug!(target: "browser.session", "closed");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Drop for GleanDriver {
    fn drop(&mut self) {
        if self.client.is_some() {
            warn!(target: "browser.session", "driver dropped without close; session may linger");
        }
    }
}

/// Opens one Chrome session per call against a fixed WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct ChromeSessionFactory {
    pub webdriver_url: String,
    pub headless: bool,
}

impl ChromeSessionFactory {
    pub fn new(webdriver_url: impl Into<String>, headless: bool) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            headless,
        }
    }
}

#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, DriverError> {
        let driver = GleanDriver::new(&self.webdriver_url, self.headless).await?;
        Ok(Box::new(driver))
    }
}
