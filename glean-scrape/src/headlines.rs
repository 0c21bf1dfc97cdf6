//! Static-page fetcher: one GET, one `(text, href)` pair per promo.
//!
//! Any fetch or extraction failure aborts the whole run.
use crate::error::{ExtractError, ScrapeError};
use crate::html::{compile, first_text};
use glean_http::{HttpClient, RequestOpts};
use scraper::Html;
use std::time::Duration;
use tracing::info;

/// `(headline text, link)`; serializes as a two-element array.
pub type Headline = (String, String);

/// Where the pairs live in the page.
#[derive(Debug, Clone)]
pub struct HeadlineRule {
    /// Selects every promo container.
    pub container: String,
    /// First match inside a container supplies the text.
    pub text: String,
    /// First match inside a container supplies the link attribute.
    pub link: String,
    pub link_attr: String,
}

impl Default for HeadlineRule {
    fn default() -> Self {
        Self {
            container: "div.PagePromo".into(),
            text: "span".into(),
            link: "a".into(),
            link_attr: "href".into(),
        }
    }
}

/// Pull one pair per container, in document order.
pub fn extract_headlines(html: &str, rule: &HeadlineRule) -> Result<Vec<Headline>, ExtractError> {
    let container = compile(&rule.container)?;
    let text = compile(&rule.text)?;
    let link = compile(&rule.link)?;

    let doc = Html::parse_document(html);
    doc.select(&container)
        .enumerate()
        .map(|(index, promo)| -> Result<Headline, ExtractError> {
            let headline = first_text(promo, &text).ok_or_else(|| {
                ExtractError::MissingChild {
                    container: rule.container.clone(),
                    index,
                    child: rule.text.clone(),
                }
            })?;

            let anchor = promo
                .select(&link)
                .next()
                .ok_or_else(|| ExtractError::MissingChild {
                    container: rule.container.clone(),
                    index,
                    child: rule.link.clone(),
                })?;
            let href = anchor.value().attr(&rule.link_attr).ok_or_else(|| {
                ExtractError::MissingAttribute {
                    container: rule.container.clone(),
                    index,
                    child: rule.link.clone(),
                    attr: rule.link_attr.clone(),
                }
            })?;

            Ok((headline, href.to_string()))
        })
        .collect()
}

/// GET `url` with `timeout` and extract every headline.
pub async fn fetch_headlines(
    url: &str,
    timeout: Duration,
    rule: &HeadlineRule,
) -> Result<Vec<Headline>, ScrapeError> {
    let client = HttpClient::new(url)?.with_timeout(timeout);
    let body = client.get_text("", RequestOpts::default()).await?;
    let headlines = extract_headlines(&body, rule)?;
    info!(%url, count = headlines.len(), "headlines.extracted");
    Ok(headlines)
}
