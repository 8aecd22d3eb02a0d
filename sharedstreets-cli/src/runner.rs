//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, service creation
//! and output writing so command handlers stay small.

use std::future::Future;
use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sharedstreets::config::{ConfigFile, SourceConfig};
use sharedstreets::coord::MAX_ZOOM;
use sharedstreets::logging::{init_logging, LoggingGuard};
use sharedstreets::source::HttpTileSource;
use sharedstreets::{GraphError, StreetGraphService};

use crate::error::CliError;

/// Options accepted by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Layer URL template, overriding config.ini
    #[arg(long, global = true)]
    pub url_template: Option<String>,

    /// Zoom level layers are published at, overriding config.ini
    #[arg(long, global = true)]
    pub reference_zoom: Option<u8>,

    /// Config file to use instead of ~/.sharedstreets/config.ini
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging for the library
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    source_config: SourceConfig,
    runtime: Runtime,
}

impl CliRunner {
    /// Load config, apply command-line overrides and initialize logging.
    pub fn new(global: &GlobalArgs) -> Result<Self, CliError> {
        let config = load_config(global)?;
        let source_config = config.to_source_config()?;

        let logging_guard = init_logging(&config.logging.file, global.verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::ServiceCreation(format!("tokio runtime: {}", e)))?;

        Ok(Self {
            logging_guard,
            source_config,
            runtime,
        })
    }

    pub fn source_config(&self) -> &SourceConfig {
        &self.source_config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("SharedStreets v{}", sharedstreets::VERSION);
        info!(
            command,
            url_template = %self.source_config.url_template(),
            reference_zoom = self.source_config.reference_zoom(),
            "SharedStreets CLI"
        );
    }

    /// Create an HTTP-backed service from the effective configuration.
    pub fn create_service(&self) -> Result<StreetGraphService<HttpTileSource>, CliError> {
        let service = StreetGraphService::from_config(self.source_config.clone())?;
        info!("Service created successfully");
        Ok(service)
    }

    /// Drive a request to completion; Ctrl-C cancels it through `cancellation`.
    pub fn block_on<T>(
        &self,
        cancellation: CancellationToken,
        request: impl Future<Output = Result<T, GraphError>>,
    ) -> Result<T, CliError> {
        self.runtime.block_on(async {
            let watcher = tokio::spawn({
                let token = cancellation.clone();
                async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        warn!("Interrupted, cancelling request");
                        token.cancel();
                    }
                }
            });
            let result = request.await;
            watcher.abort();
            result.map_err(CliError::Request)
        })
    }
}

/// Load the config file and apply the global overrides.
pub fn load_config(global: &GlobalArgs) -> Result<ConfigFile, CliError> {
    let mut config = match &global.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    if let Some(template) = &global.url_template {
        config.source.url_template = template.clone();
    }
    if let Some(zoom) = global.reference_zoom {
        if zoom > MAX_ZOOM {
            return Err(CliError::InvalidArgument(format!(
                "--reference-zoom {} exceeds the maximum zoom {}",
                zoom, MAX_ZOOM
            )));
        }
        config.source.reference_zoom = zoom;
    }

    Ok(config)
}

/// Write JSON to `output`, or pretty-print it to stdout.
pub fn write_json(output: Option<&Path>, value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::InvalidArgument(format!("cannot render JSON: {}", e)))?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered + "\n").map_err(|error| CliError::FileWrite {
                path: path.to_path_buf(),
                error,
            })?;
            info!(path = %path.display(), "Output written");
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.ini");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let dir = TempDir::new().unwrap();
        let global = GlobalArgs {
            config: Some(config_in(&dir, "[source]\nreference_zoom = 10\n")),
            url_template: Some("http://localhost/{z}/{x}/{y}/{layer}.pbf".to_string()),
            reference_zoom: Some(11),
            verbose: false,
        };

        let config = load_config(&global).unwrap();
        assert_eq!(config.source.reference_zoom, 11);
        assert_eq!(
            config.source.url_template,
            "http://localhost/{z}/{x}/{y}/{layer}.pbf"
        );
    }

    #[test]
    fn test_file_values_used_without_overrides() {
        let dir = TempDir::new().unwrap();
        let global = GlobalArgs {
            config: Some(config_in(&dir, "[source]\nreference_zoom = 10\n")),
            ..GlobalArgs::default()
        };

        assert_eq!(load_config(&global).unwrap().source.reference_zoom, 10);
    }

    #[test]
    fn test_reference_zoom_override_is_bounded() {
        let dir = TempDir::new().unwrap();
        let global = GlobalArgs {
            config: Some(dir.path().join("absent.ini")),
            reference_zoom: Some(MAX_ZOOM + 1),
            ..GlobalArgs::default()
        };

        assert!(matches!(
            load_config(&global),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bad_template_override_fails_conversion() {
        let dir = TempDir::new().unwrap();
        let global = GlobalArgs {
            config: Some(dir.path().join("absent.ini")),
            url_template: Some("http://localhost/{z}.pbf".to_string()),
            ..GlobalArgs::default()
        };

        let config = load_config(&global).unwrap();
        assert!(config.to_source_config().is_err());
    }

    #[test]
    fn test_write_json_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.geojson");

        write_json(Some(&path), &serde_json::json!({"type": "FeatureCollection"})).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["type"], "FeatureCollection");
    }
}
