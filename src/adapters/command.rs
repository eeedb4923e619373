//! Catalog produced by an external command.
//!
//! The command prints JSON on stdout: a category list for rendering, or a
//! `{"position": N, "queue": [...]}` object when used as a stream source.
//! It is run once per render, or once per poll iteration.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::process::Command;
use tokio::time::timeout;

use super::{CatalogProvider, StreamSource};
use crate::domain::Category;
use crate::stream::StreamBatch;

/// Default limit for one provider run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct CommandCatalog {
    argv: Vec<String>,
    timeout: Duration,
}

impl CommandCatalog {
    pub fn new(argv: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            anyhow::bail!("Catalog command is empty");
        }
        Ok(Self {
            argv,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the command and parse its stdout as JSON
    async fn fetch<T: DeserializeOwned>(&self) -> Result<T> {
        let program = &self.argv[0];

        let child = Command::new(program)
            .args(&self.argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn catalog command '{}'", program))?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .with_context(|| {
                format!(
                    "Catalog command '{}' timed out after {:?}",
                    program, self.timeout
                )
            })?
            .with_context(|| format!("Failed to wait for catalog command '{}'", program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            anyhow::bail!(
                "Catalog command '{}' failed with exit code {}: {}",
                program,
                exit_code,
                stderr.trim()
            );
        }

        let stdout =
            String::from_utf8(output.stdout).context("Catalog command output is not valid UTF-8")?;

        serde_json::from_str(&stdout)
            .with_context(|| format!("Catalog command '{}' printed invalid JSON", program))
    }
}

#[async_trait]
impl CatalogProvider for CommandCatalog {
    fn name(&self) -> &str {
        "command"
    }

    async fn derive_categories(&self) -> Result<Vec<Category>> {
        self.fetch().await
    }
}

#[async_trait]
impl StreamSource for CommandCatalog {
    async fn next_batch(&mut self) -> Result<StreamBatch> {
        self.fetch().await
    }
}
