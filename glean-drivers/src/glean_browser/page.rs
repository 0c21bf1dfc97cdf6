//! Bounded wait-for-condition primitives over a WebDriver client.
//!
//! Each wait polls at `WaitPolicy::poll` and gives up with
//! [`DriverError::Timeout`] once `WaitPolicy::timeout` has elapsed.
use crate::glean_browser::session::{DriverError, WaitPolicy};
use fantoccini::{elements::Element, error::CmdError, Client, Locator};
use std::time::Instant;
use tokio::time::sleep;
use tracing::debug;

/// Wait for the first element matching `selector` to be displayed and enabled.
pub async fn wait_for_clickable(
    client: &Client,
    selector: &str,
    wait: WaitPolicy,
) -> Result<Element, DriverError> {
    let started = Instant::now();
    loop {
        match client.find(Locator::Css(selector)).await {
            Ok(element) => {
                let displayed = element.is_displayed().await.unwrap_or(false);
                let enabled = element.is_enabled().await.unwrap_or(false);
                if displayed && enabled {
                    debug!(
                        target: "browser.wait",
                        %selector,
                        waited_ms = started.elapsed().as_millis() as u64,
                        "clickable"
                    );
                    return Ok(element);
                }
            }
            Err(e) if e.is_no_such_element() => {}
            Err(e) => return Err(e.into()),
        }

        if started.elapsed() >= wait.timeout {
            return Err(timeout(selector, "clickable", wait));
        }
        sleep(wait.poll).await;
    }
}

/// Wait for at least one element matching `selector` to exist in the DOM.
pub async fn wait_for_present(
    client: &Client,
    selector: &str,
    wait: WaitPolicy,
) -> Result<Element, DriverError> {
    let started = Instant::now();
    let found = client
        .wait()
        .at_most(wait.timeout)
        .every(wait.poll)
        .for_element(Locator::Css(selector))
        .await;

    match found {
        Ok(element) => {
            debug!(
                target: "browser.wait",
                %selector,
                waited_ms = started.elapsed().as_millis() as u64,
                "present"
            );
            Ok(element)
        }
        Err(CmdError::WaitTimeout) => Err(timeout(selector, "present", wait)),
        Err(e) => Err(e.into()),
    }
}

/// Wait for `document.readyState` to report `complete`.
pub async fn wait_for_document_ready(client: &Client, wait: WaitPolicy) -> Result<(), DriverError> {
    let started = Instant::now();
    loop {
        let state = client
            .execute("return document.readyState;", vec![])
            .await?;
        match state.as_str() {
            Some("complete") => return Ok(()),
            Some(_) => {}
            None => return Err(DriverError::Script(format!("readyState was {state}"))),
        }

        if started.elapsed() >= wait.timeout {
            return Err(timeout("document", "ready", wait));
        }
        sleep(wait.poll).await;
    }
}

fn timeout(selector: &str, condition: &'static str, wait: WaitPolicy) -> DriverError {
    DriverError::Timeout {
        selector: selector.to_string(),
        condition,
        waited_ms: wait.timeout.as_millis() as u64,
    }
}
