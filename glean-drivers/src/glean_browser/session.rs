use async_trait::async_trait;
use fantoccini::error::CmdError;
use std::time::Duration;

/// Errors surfaced by browser sessions.
#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error("failed to start browser session at {endpoint}: {message}")]
    Session { endpoint: String, message: String },

    #[error("webdriver command failed: {0}")]
    Command(#[from] CmdError),

    #[error("timed out after {waited_ms} ms waiting for `{selector}` to be {condition}")]
    Timeout {
        selector: String,
        condition: &'static str,
        waited_ms: u64,
    },

    #[error("unexpected script result: {0}")]
    Script(String),

    #[error("browser session already closed")]
    Closed,
}

/// Upper bound and polling cadence for a wait-for-condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll: Duration::from_millis(500),
        }
    }
}

/// What to do after a navigation before touching the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// Blind sleep.
    Fixed(Duration),
    /// Poll `document.readyState` until it reports `complete`.
    DocumentReady(WaitPolicy),
}

/// One live browser session.
///
/// Implementations must tolerate `close` being called more than once; every
/// other method fails with [`DriverError::Closed`] after the first close.
#[async_trait]
pub trait BrowserSession: Send {
    async fn goto(&mut self, url: &str) -> Result<(), DriverError>;

    async fn settle(&mut self, settle: Settle) -> Result<(), DriverError>;

    /// Wait until the first element matching `selector` is displayed and
    /// enabled, then click it.
    async fn click_when_clickable(
        &mut self,
        selector: &str,
        wait: WaitPolicy,
    ) -> Result<(), DriverError>;

    /// Wait until at least one element matches `selector`.
    async fn wait_for_present(&mut self, selector: &str, wait: WaitPolicy)
        -> Result<(), DriverError>;

    /// Snapshot the current rendered markup.
    async fn page_source(&mut self) -> Result<String, DriverError>;

    async fn close(&mut self) -> Result<(), DriverError>;
}

/// Opens a fresh [`BrowserSession`] per unit of work.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, DriverError>;
}
