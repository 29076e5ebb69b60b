//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::Cli;
use crate::config::ClientConfig;
use crate::services::io::STDIO_MARKER;
use anyhow::{Context, Result};
use std::time::Duration;

/// Convert CLI arguments to a validated `ClientConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build `ClientConfig` from CLI arguments
    ///
    /// The API key falls back to the `CUTOUT_API_KEY` environment variable
    /// and then the user config file when no `--api-key` flag is given.
    pub(crate) fn from_cli(cli: &Cli) -> Result<ClientConfig> {
        let mut builder = ClientConfig::builder();

        if let Some(api_key) = &cli.api_key {
            builder = builder.api_key(api_key.clone());
        }
        if let Some(endpoint) = &cli.endpoint {
            builder = builder.endpoint(endpoint.clone());
        }
        if let Some(timeout_secs) = cli.timeout {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }

        builder.build().context("Invalid configuration")
    }

    /// Validate CLI arguments for consistency
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if let Some(timeout_secs) = cli.timeout {
            if timeout_secs == 0 {
                anyhow::bail!("--timeout must be greater than zero seconds");
            }
        }

        if cli.input.len() > 1 {
            match &cli.output {
                Some(path) if path.as_os_str() == STDIO_MARKER => {
                    anyhow::bail!("Cannot write multiple outputs to stdout");
                },
                Some(path) if !path.is_dir() => {
                    anyhow::bail!(
                        "Output '{}' must be an existing directory when processing multiple inputs",
                        path.display()
                    );
                },
                _ => {},
            }
        }

        if cli.input.iter().filter(|input| *input == STDIO_MARKER).count() > 1 {
            anyhow::bail!("stdin ('-') may be given at most once");
        }

        Ok(())
    }
}
