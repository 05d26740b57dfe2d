use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use super::simulate::SimulateCommand;
use crate::config::DialogSettings;
use crate::tui;

/// Modal dialog lifecycle for terminal applications
#[derive(Parser)]
#[command(
    name = "dialog-control",
    version,
    about = "Modal dialog lifecycle for terminal applications",
    long_about = r#"Runs an interactive feed with modal dialogs on top, or replays a scripted
dialog scenario headlessly and prints every lifecycle event as JSON.

Examples:
  dialog-control                                              # Start the interactive demo
  dialog-control simulate -s "mount d1; open d1; wait 200; esc d1; wait 200"
  dialog-control --debug simulate -s "mount d1; open d1; close d1; wait 200""#
)]
pub struct Cli {
    /// Current working directory
    #[arg(short = 'c', long = "cwd", global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scripted dialog scenario without a terminal
    Simulate(SimulateCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        // Change working directory if specified, so relative config files resolve there
        if let Some(cwd) = &self.cwd {
            std::env::set_current_dir(cwd)
                .map_err(|e| anyhow::anyhow!("Failed to change directory to {}: {}", cwd.display(), e))?;
            info!("Changed working directory to: {}", cwd.display());
        }

        let settings = DialogSettings::init().await?;
        debug!(?settings, "Dialog settings initialized");

        match self.command {
            Some(Commands::Simulate(simulate)) => simulate.execute(&settings).await,
            None => {
                info!("Starting interactive mode");
                tui::run(settings).await
            }
        }
    }
}
