//! Listing extraction from a rendered results page.
use crate::error::ExtractError;
use crate::html::{compile, first_text, text_of};
use scraper::Html;
use serde::Serialize;

/// One flight-search result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub times: Vec<String>,
    pub duration: String,
    pub fares: Vec<String>,
    pub stops: Vec<String>,
}

/// Selectors for a results page. `fare_label` is searched inside each
/// `fare_button`; every other field selector is searched inside a listing.
#[derive(Debug, Clone)]
pub struct ListingRule {
    pub listing: String,
    pub time: String,
    pub duration: String,
    pub fare_button: String,
    pub fare_label: String,
    pub stop: String,
}

impl Default for ListingRule {
    fn default() -> Self {
        Self {
            listing: "li.air-booking-select-detail".into(),
            time: "span.time--value".into(),
            duration: "div.select-detail--flight-duration".into(),
            fare_button: "button.fare-button--button".into(),
            fare_label: "span.swa-g-screen-reader-only".into(),
            stop: "div.select-detail--change-planes".into(),
        }
    }
}

/// Parse every listing on the page. A page without listings is an error.
pub fn extract_listings(html: &str, rule: &ListingRule) -> Result<Vec<Listing>, ExtractError> {
    let listing_sel = compile(&rule.listing)?;
    let time_sel = compile(&rule.time)?;
    let duration_sel = compile(&rule.duration)?;
    let fare_button_sel = compile(&rule.fare_button)?;
    let fare_label_sel = compile(&rule.fare_label)?;
    let stop_sel = compile(&rule.stop)?;

    let doc = Html::parse_document(html);
    let rows: Vec<_> = doc.select(&listing_sel).collect();
    if rows.is_empty() {
        return Err(ExtractError::NoListings(rule.listing.clone()));
    }

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| -> Result<Listing, ExtractError> {
            let times = row.select(&time_sel).map(text_of).collect();

            let duration =
                first_text(row, &duration_sel).ok_or_else(|| ExtractError::MissingChild {
                    container: rule.listing.clone(),
                    index,
                    child: rule.duration.clone(),
                })?;

            // Buttons without a screen-reader label are not bookable fares.
            let fares = row
                .select(&fare_button_sel)
                .filter_map(|button| first_text(button, &fare_label_sel))
                .collect();

            let stops = row.select(&stop_sel).map(text_of).collect();

            Ok(Listing {
                times,
                duration,
                fares,
                stops,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(times: &[&str], duration: &str, fares: &[Option<&str>], stops: &[&str]) -> String {
        let times: String = times
            .iter()
            .map(|t| format!(r#"<span class="time--value">{t}</span>"#))
            .collect();
        let fares: String = fares
            .iter()
            .map(|f| match f {
                Some(label) => format!(
                    r#"<button class="fare-button--button"><span class="fare-button--value">$99</span><span class="swa-g-screen-reader-only">{label}</span></button>"#
                ),
                None => r#"<button class="fare-button--button">Unavailable</button>"#.to_string(),
            })
            .collect();
        let stops: String = stops
            .iter()
            .map(|s| format!(r#"<div class="select-detail--change-planes">{s}</div>"#))
            .collect();
        format!(
            r#"<li class="air-booking-select-detail">{times}<div class="select-detail--flight-duration">{duration}</div>{fares}{stops}</li>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!("<html><body><ul>{}</ul></body></html>", rows.concat())
    }

    #[test]
    fn one_listing_per_row() {
        let html = page(&[
            row(
                &["6:00AM", "7:05AM"],
                "1h 5m",
                &[Some("Wanna Get Away $99"), Some("Business Select $299")],
                &[],
            ),
            row(
                &["9:10AM", "1:40PM"],
                "4h 30m",
                &[Some("Wanna Get Away $149")],
                &["Change planes MDW"],
            ),
        ]);

        let listings = extract_listings(&html, &ListingRule::default()).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(
            listings[0],
            Listing {
                times: vec!["6:00AM".into(), "7:05AM".into()],
                duration: "1h 5m".into(),
                fares: vec!["Wanna Get Away $99".into(), "Business Select $299".into()],
                stops: vec![],
            }
        );
        assert_eq!(listings[1].stops, vec!["Change planes MDW".to_string()]);
    }

    #[test]
    fn unlabelled_fare_buttons_are_skipped() {
        let html = page(&[row(&["6:00AM"], "1h", &[None, Some("Anytime $250"), None], &[])]);
        let listings = extract_listings(&html, &ListingRule::default()).unwrap();
        assert_eq!(listings[0].fares, vec!["Anytime $250".to_string()]);
    }

    #[test]
    fn no_labelled_fares_is_empty_not_error() {
        let html = page(&[row(&["6:00AM"], "1h", &[None, None], &[])]);
        let listings = extract_listings(&html, &ListingRule::default()).unwrap();
        assert!(listings[0].fares.is_empty());
        assert!(listings[0].stops.is_empty());
    }

    #[test]
    fn zero_listings_is_an_error() {
        let err = extract_listings("<html><body><ul></ul></body></html>", &ListingRule::default())
            .unwrap_err();
        assert_eq!(
            err,
            ExtractError::NoListings("li.air-booking-select-detail".into())
        );
    }

    #[test]
    fn missing_duration_is_an_error() {
        let html = page(&[
            r#"<li class="air-booking-select-detail"><span class="time--value">6:00AM</span></li>"#.to_string(),
        ]);
        let err = extract_listings(&html, &ListingRule::default()).unwrap_err();
        assert!(matches!(err, ExtractError::MissingChild { index: 0, .. }));
    }
}
