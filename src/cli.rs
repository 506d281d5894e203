// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - run (default): start the page and replay the demo session
// - config --show | --path | --reset: inspect or regenerate the config file
// - projects [--remote] [--filter TAG]: list project records

use crate::catalog::{self, github::GithubSource, ProjectRecord, FILTER_ALL};
use crate::config::{Config, VERSION};
use crate::util::truncate_utf8_safe;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;

/// Descriptions longer than this are cut in the project listing
const DESCRIPTION_WIDTH: usize = 72;

/// folio - portfolio page presentation layer
#[derive(Parser)]
#[command(name = "folio")]
#[command(version = VERSION)]
#[command(about = "Portfolio page components, driven headless", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether the command inspects or rewrites the config file itself
    pub fn manages_config(&self) -> bool {
        matches!(self.command, Some(Commands::Config { .. }))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the page and replay a scripted visitor session (default)
    Run,

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// List the project catalog
    Projects {
        /// Fetch from the repository API instead of the bundled catalog
        #[arg(long)]
        remote: bool,

        /// Only projects carrying this tag (slugged, e.g. ai-ml)
        #[arg(long, value_name = "TAG")]
        filter: Option<String>,
    },
}

/// Handle CLI commands. Returns true if a command was handled (exit after).
pub async fn handle_cli(cli: &Cli, config: &Config) -> Result<bool> {
    match &cli.command {
        Some(Commands::Config { show, reset, path }) => {
            if *path {
                handle_config_path()?;
            } else if *show {
                handle_config_show(config);
            } else if *reset {
                handle_config_reset()?;
            } else {
                println!("Usage: folio config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            Ok(true)
        }
        Some(Commands::Projects { remote, filter }) => {
            handle_projects(config, *remote, filter.as_deref()).await?;
            Ok(true)
        }
        Some(Commands::Run) | None => Ok(false),
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show(config: &Config) {
    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Error writing config {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

async fn handle_projects(config: &Config, remote: bool, filter: Option<&str>) -> Result<()> {
    let projects = if remote {
        let source = GithubSource::new(config.github.clone())?;
        source
            .fetch_projects()
            .await
            .with_context(|| format!("Failed to fetch repositories for {}", config.github.username))?
    } else {
        catalog::bundled().context("Bundled catalog is malformed")?
    };

    let filter = filter.unwrap_or(FILTER_ALL);
    let listed = select_projects(&projects, filter);
    if listed.is_empty() {
        bail!("No projects match filter {filter:?}");
    }

    for project in &listed {
        println!("{}", format_project(project));
    }
    println!();
    println!("{} of {} projects", listed.len(), projects.len());
    Ok(())
}

fn select_projects<'a>(projects: &'a [ProjectRecord], filter: &str) -> Vec<&'a ProjectRecord> {
    projects.iter().filter(|p| p.matches_filter(filter)).collect()
}

fn format_project(project: &ProjectRecord) -> String {
    let description = truncate_utf8_safe(&project.description, DESCRIPTION_WIDTH);
    let ellipsis = if description.len() < project.description.len() {
        "..."
    } else {
        ""
    };
    format!(
        "{}\n    [{}] {}{}",
        project.name,
        project.data_tags(),
        description,
        ellipsis
    )
}
