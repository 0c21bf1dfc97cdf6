//! Startup and shutdown shared by the `headlines`, `spots` and `flights`
//! binaries.
use anyhow::{Context, Result};
use clap::Args;
use glean_common::observability::{LogConfig, LogFormat, init_logging};
use glean_common::output::write_json_pretty;
use glean_config::{GleanConfig, GleanConfigLoader, LoggingConfig};
use glean_scrape::BatchReport;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG: &str = "glean.yaml";

/// Flags common to the batch binaries. `-t/--time` lives with each binary
/// because its default differs.
#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// JSON array of parameter sets, one fetch per element.
    #[arg(short, long, default_value = "params.json")]
    pub params: PathBuf,

    /// Where the accumulated records are written.
    #[arg(short, long, default_value = "output.json")]
    pub output: PathBuf,

    /// Configuration file; skipped when absent.
    #[arg(short, long, default_value = DEFAULT_CONFIG, env = "GLEAN_CONFIG")]
    pub config: PathBuf,

    /// Also write the failed parameter sets with their reasons.
    #[arg(long)]
    pub failures: Option<PathBuf>,
}

/// Load configuration (env wins) and install the tracing subscriber.
pub fn bootstrap(app_name: &'static str, config_path: &Path) -> Result<GleanConfig> {
    let cfg = GleanConfigLoader::new()
        .with_optional_file(config_path)
        .load()
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    let log_file = init_logging(log_config(app_name, &cfg.logging))?;
    info!(app = app_name, log_file = ?log_file, config = %config_path.display(), "glean.start");
    Ok(cfg)
}

fn log_config(app_name: &'static str, logging: &LoggingConfig) -> LogConfig {
    LogConfig {
        app_name,
        log_dir: logging.dir.as_ref().map(PathBuf::from),
        file_sink: logging.file,
        emit_stderr: logging.stderr,
        format: LogFormat::from_name(&logging.format),
        default_filter: logging.filter.clone(),
    }
}

/// Write records (and failures when asked for) and print a one-line summary.
pub fn finish<T: Serialize>(args: &BatchArgs, report: &BatchReport<T>) -> Result<()> {
    write_json_pretty(&args.output, &report.records)?;
    if let Some(path) = &args.failures {
        write_json_pretty(path, &report.failures)?;
    }

    info!(
        output = %args.output.display(),
        records = report.records.len(),
        failed = report.failures.len(),
        "glean.done"
    );
    println!(
        "wrote {} records to {} ({} failed)",
        report.records.len(),
        args.output.display(),
        report.failures.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use glean_scrape::ItemFailure;
    use serde_json::json;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        batch: BatchArgs,
    }

    #[test]
    fn batch_flag_defaults() {
        let cli = Cli::try_parse_from(["spots"]).unwrap();
        assert_eq!(cli.batch.params, PathBuf::from("params.json"));
        assert_eq!(cli.batch.output, PathBuf::from("output.json"));
        assert!(cli.batch.failures.is_none());
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from(["spots", "-p", "in.json", "-o", "out.json", "-c", "x.yaml"])
            .unwrap();
        assert_eq!(cli.batch.params, PathBuf::from("in.json"));
        assert_eq!(cli.batch.output, PathBuf::from("out.json"));
        assert_eq!(cli.batch.config, PathBuf::from("x.yaml"));
    }

    #[test]
    fn logging_section_maps_onto_log_config() {
        let logging = LoggingConfig {
            dir: Some("/tmp/glean".into()),
            format: "json".into(),
            file: false,
            stderr: true,
            filter: "debug".into(),
        };
        let lc = log_config("spots", &logging);
        assert_eq!(lc.app_name, "spots");
        assert_eq!(lc.log_dir, Some(PathBuf::from("/tmp/glean")));
        assert!(!lc.file_sink);
        assert_eq!(lc.format, LogFormat::Json);
        assert_eq!(lc.default_filter, "debug");
    }

    #[test]
    fn finish_writes_records_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let args = BatchArgs {
            params: dir.path().join("params.json"),
            output: dir.path().join("output.json"),
            config: dir.path().join("glean.yaml"),
            failures: Some(dir.path().join("failures.json")),
        };
        let report = BatchReport {
            records: vec![json!({ "params": { "a": 1 }, "data": [] })],
            failures: vec![ItemFailure {
                index: 1,
                params: serde_json::from_value(json!({ "a": 2 })).unwrap(),
                stage: None,
                reason: "http: network error: refused".into(),
            }],
        };

        finish(&args, &report).unwrap();

        let out: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&args.output).unwrap()).unwrap();
        assert_eq!(out[0]["params"]["a"], json!(1));
        let failures: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(args.failures.as_ref().unwrap()).unwrap(),
        )
        .unwrap();
        assert_eq!(failures[0]["index"], json!(1));
        assert!(failures[0].get("stage").is_none());
    }
}
