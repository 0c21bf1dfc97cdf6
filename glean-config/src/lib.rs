//! Loader for glean configuration with YAML + environment overlays.
//!
//! Every value the pipelines depend on (endpoints, selectors, timeouts) is a
//! named field here with a default equal to the value the scrapers were
//! originally written against, so an empty configuration is a working one.
//!
//! Precedence, lowest to highest: field defaults, YAML sources in the order
//! they were added, `GLEAN__SECTION__KEY` environment variables. String
//! values may reference `${VAR}` and are expanded after merging.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GleanConfig {
    pub version: Option<String>,
    pub logging: LoggingConfig,
    pub headlines: HeadlinesConfig,
    pub spots: SpotsConfig,
    pub flights: FlightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the rolling log file; falls back to `GLEAN_LOG_DIR`.
    pub dir: Option<String>,
    /// `text` or `json`.
    pub format: String,
    pub file: bool,
    pub stderr: bool,
    /// Used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: "text".into(),
            file: true,
            stderr: true,
            filter: "info".into(),
        }
    }
}

/// Static-page fetcher settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeadlinesConfig {
    pub url: String,
    /// CSS selector for each promo container.
    pub container: String,
    /// Selector, relative to a container, for the headline text.
    pub text: String,
    /// Selector, relative to a container, for the link element.
    pub link: String,
    pub link_attr: String,
    pub timeout_secs: u64,
    pub output: String,
}

impl Default for HeadlinesConfig {
    fn default() -> Self {
        Self {
            url: "https://apnews.com/politics".into(),
            container: "div.PagePromo".into(),
            text: "span".into(),
            link: "a".into(),
            link_attr: "href".into(),
            timeout_secs: 2,
            output: "headlines.json".into(),
        }
    }
}

/// Endpoint-query fetcher settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpotsConfig {
    pub base_url: String,
    /// Dotted path pulled out of every response body.
    pub data_path: String,
    pub timeout_secs: u64,
}

impl Default for SpotsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://services.surfline.com/kbyg/mapview".into(),
            data_path: "data.spots".into(),
            timeout_secs: 5,
        }
    }
}

/// How the browser waits after each navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleMode {
    /// Sleep for the CLI `--time` value.
    #[default]
    Fixed,
    /// Poll `document.readyState` until `complete`.
    DocumentReady,
}

/// Browser-driven fetcher settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlightsConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub home_url: String,
    pub booking_url: String,
    pub submit_selector: String,
    pub results_selector: String,
    pub wait_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub settle: SettleMode,
    pub selectors: ListingSelectors,
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: false,
            home_url: "https://www.southwest.com/".into(),
            booking_url: "https://www.southwest.com/air/booking/select-depart.html".into(),
            submit_selector: ".actionable_primary".into(),
            results_selector: ".air-booking-select-detail".into(),
            wait_timeout_secs: 10,
            poll_interval_ms: 500,
            settle: SettleMode::Fixed,
            selectors: ListingSelectors::default(),
        }
    }
}

/// Selectors used when parsing a rendered results page.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    pub listing: String,
    pub time: String,
    pub duration: String,
    pub fare_button: String,
    pub fare_label: String,
    pub stop: String,
}

impl Default for ListingSelectors {
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

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct GleanConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env: Environment,
}

impl Default for GleanConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl GleanConfigLoader {
    /// Start from defaults with `GLEAN__` env overrides.
    ///
    /// ```
    /// use glean_config::GleanConfigLoader;
    ///
    /// let config = GleanConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.spots.data_path, "data.spots");
    /// assert_eq!(config.flights.wait_timeout_secs, 10);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env: Environment::with_prefix("GLEAN")
                .separator("__")
                .try_parsing(true),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when absent, so a bare checkout runs on
    /// defaults and environment alone.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use glean_config::{GleanConfigLoader, SettleMode};
    ///
    /// let cfg = GleanConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// flights:
    ///   headless: true
    ///   settle: document_ready
    ///   selectors:
    ///     listing: "li.result"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(cfg.flights.headless);
    /// assert_eq!(cfg.flights.settle, SettleMode::DocumentReady);
    /// assert_eq!(cfg.flights.selectors.listing, "li.result");
    /// assert_eq!(cfg.flights.selectors.time, "span.time--value");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge every source, expand `${VAR}` placeholders and deserialize.
    ///
    /// ```
    /// use glean_config::GleanConfigLoader;
    ///
    /// unsafe { std::env::set_var("SPOTS_HOST", "http://127.0.0.1:9000"); }
    ///
    /// let config = GleanConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// spots:
    ///   base_url: "${SPOTS_HOST}/kbyg/mapview"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.spots.base_url, "http://127.0.0.1:9000/kbyg/mapview");
    ///
    /// unsafe { std::env::remove_var("SPOTS_HOST"); }
    /// ```
    pub fn load(self) -> Result<GleanConfig, ConfigError> {
        let cfg = self.builder.add_source(self.env).build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
