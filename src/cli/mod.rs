//! Command-line interface for mediatree.
//!
//! Provides commands for rendering a catalog, pruning a symlink tree,
//! streaming to a player and showing the resolved configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;

use crate::adapters::{CatalogProvider, CommandCatalog, JsonCatalog};
use crate::config::{self, ResolvedConfig};
use crate::domain::OutputTarget;
use crate::output::{
    clean_symlinks, FilesystemRenderer, NamePolicy, PlaylistRenderer, Renderer, StdoutRenderer,
};
use crate::stream::{CommandTemplate, ProcessRunner, StreamDriver};

/// mediatree - Render media catalogs and stream them to a player
#[derive(Parser, Debug)]
#[command(name = "mediatree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Less output (-q hides progress, -qq hides warnings)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a catalog into the work directory
    Render {
        /// Output mode
        #[arg(short, long, value_enum, default_value = "stdout")]
        mode: OutputMode,

        /// Subdirectory for this catalog inside the work dir (e.g. E-OurStudio)
        #[arg(short, long)]
        subdir: Option<String>,

        /// Catalog JSON file
        #[arg(long, conflicts_with = "catalog_cmd")]
        catalog: Option<PathBuf>,

        /// Shell command printing the catalog JSON
        #[arg(long)]
        catalog_cmd: Option<String>,

        /// Print each source once (stdout mode, output unordered)
        #[arg(long)]
        uniq: bool,

        /// Prefix category links with their key (filesystem mode)
        #[arg(long)]
        include_keyname: bool,

        /// Remove all links before rebuilding (filesystem mode)
        #[arg(long)]
        clean: bool,

        /// Strip characters Windows filesystems reject from file names
        #[arg(long)]
        safe_filenames: bool,

        /// Work directory
        work_dir: Option<PathBuf>,
    },

    /// Remove broken symlinks from a rendered tree
    Clean {
        /// Directory holding the category directories (wd/subdir)
        dir: PathBuf,

        /// Remove every link, not only broken ones
        #[arg(long)]
        all: bool,
    },

    /// Poll a stream source forever and feed the queue to a player
    Stream {
        /// Shell command printing {"position": N, "queue": [...]}
        #[arg(long)]
        source_cmd: String,

        /// Player command; `{}` is replaced by the start position
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Output mode for `render`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// URLs or file names, one per line
    Stdout,

    /// Directory tree of symlinks
    Filesystem,

    /// Nested M3U playlists
    M3u,

    /// Flat M3U playlists for players without nested playlist support
    M3ucompat,

    /// HTML link pages
    Html,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Render {
                mode,
                subdir,
                catalog,
                catalog_cmd,
                uniq,
                include_keyname,
                clean,
                safe_filenames,
                work_dir,
            } => {
                let cfg = config::config()?;
                let provider = catalog_provider(catalog, catalog_cmd, cfg.provider_timeout)?;
                let options = RenderOptions {
                    mode,
                    work_dir: work_dir.unwrap_or_else(|| cfg.work_dir.clone()),
                    subdir,
                    uniq,
                    include_keyname: include_keyname || cfg.include_keyname,
                    clean,
                    policy: if safe_filenames {
                        NamePolicy::Portable
                    } else {
                        cfg.name_policy
                    },
                };
                render(provider.as_ref(), options).await
            }
            Commands::Clean { dir, all } => {
                let report = clean_symlinks(&dir, all).await?;
                tracing::info!(
                    "Checked {} link(s), removed {}",
                    report.checked,
                    report.removed
                );
                Ok(())
            }
            Commands::Stream {
                source_cmd,
                command,
            } => stream(&source_cmd, command).await,
            Commands::Config => show_config(),
        }
    }
}

/// Default log filter for a `-q` count
///
/// Link removal notices stay visible until `-qq`.
pub fn log_filter(quiet: u8) -> &'static str {
    match quiet {
        0 => "info",
        1 => "warn,mediatree::output::janitor=info",
        _ => "error",
    }
}

/// Everything `render` needs once flags and config are merged
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub mode: OutputMode,
    pub work_dir: PathBuf,
    pub subdir: Option<String>,
    pub uniq: bool,
    pub include_keyname: bool,
    pub clean: bool,
    pub policy: NamePolicy,
}

impl RenderOptions {
    fn target(&self) -> Result<OutputTarget> {
        let sd = self
            .subdir
            .clone()
            .context("--subdir is required for this output mode")?;
        Ok(OutputTarget::new(self.work_dir.clone(), sd))
    }
}

fn catalog_provider(
    catalog: Option<PathBuf>,
    catalog_cmd: Option<String>,
    timeout: Duration,
) -> Result<Box<dyn CatalogProvider>> {
    match (catalog, catalog_cmd) {
        (Some(path), _) => Ok(Box::new(JsonCatalog::new(path))),
        (None, Some(cmd)) => Ok(Box::new(shell_command(&cmd, timeout)?)),
        (None, None) => anyhow::bail!("No catalog given. Use --catalog <file> or --catalog-cmd <cmd>"),
    }
}

fn shell_command(cmd: &str, timeout: Duration) -> Result<CommandCatalog> {
    Ok(CommandCatalog::new(["sh", "-c", cmd])?.with_timeout(timeout))
}

/// Build the renderer for the selected mode
pub fn build_renderer(options: &RenderOptions) -> Result<Box<dyn Renderer>> {
    let renderer: Box<dyn Renderer> = match options.mode {
        OutputMode::Stdout => {
            Box::new(StdoutRenderer::new(options.work_dir.clone()).unique(options.uniq))
        }
        OutputMode::Filesystem => Box::new(
            FilesystemRenderer::new(options.target()?, options.policy)
                .include_keyname(options.include_keyname),
        ),
        OutputMode::M3u => Box::new(PlaylistRenderer::m3u(options.target()?, options.policy)),
        OutputMode::M3ucompat => {
            Box::new(PlaylistRenderer::m3u_flat(options.target()?, options.policy))
        }
        OutputMode::Html => Box::new(PlaylistRenderer::html(options.target()?, options.policy)),
    };
    Ok(renderer)
}

/// Render one pass of the catalog
pub async fn render(provider: &dyn CatalogProvider, options: RenderOptions) -> Result<()> {
    let renderer = build_renderer(&options)?;

    // The symlink tree never deletes on its own; prune before adding
    if options.mode == OutputMode::Filesystem {
        let tree = options.target()?.subdir();
        let report = clean_symlinks(&tree, options.clean).await?;
        if report.removed > 0 {
            tracing::info!("Removed {} stale link(s) from {}", report.removed, tree.display());
        }
    }

    let categories = provider
        .derive_categories()
        .await
        .with_context(|| format!("Failed to load catalog from {} provider", provider.name()))?;
    tracing::debug!("Loaded {} categories", categories.len());

    let summary = renderer
        .render(&categories)
        .await
        .with_context(|| format!("{} output failed", renderer.name()))?;

    tracing::info!(
        "{} output: {} artifact(s), {} entries, {} skipped",
        renderer.name(),
        summary.artifacts,
        summary.entries,
        summary.skipped
    );

    Ok(())
}

/// Run the streaming driver until Ctrl+C or a failure
async fn stream(source_cmd: &str, command: Vec<String>) -> Result<()> {
    let cfg = config::config()?;
    let command = if command.is_empty() {
        cfg.stream_command.clone()
    } else {
        command
    };
    let template = CommandTemplate::new(command)?;
    let mut source = shell_command(source_cmd, cfg.provider_timeout)?;

    // Set up Ctrl+C handler
    let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        let _ = stop_tx.send(()).await;
    });

    let mut driver = StreamDriver::new(template, ProcessRunner);
    let summary = driver.run(&mut source, &mut stop_rx).await?;

    tracing::info!(
        "Stream stopped after {} iteration(s), last position {}",
        summary.iterations,
        summary
            .position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string())
    );

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg: &ResolvedConfig = config::config()?;

    println!(
        "Config file:     {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!("Work dir:        {}", cfg.work_dir.display());
    println!("Name policy:     {:?}", cfg.name_policy);
    println!("Include keyname: {}", cfg.include_keyname);
    println!("Source timeout:  {:?}", cfg.provider_timeout);
    if cfg.stream_command.is_empty() {
        println!("Stream command:  (none)");
    } else {
        println!("Stream command:  {}", cfg.stream_command.join(" "));
    }

    Ok(())
}
