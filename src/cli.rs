use std::path::{Path, PathBuf};

mod list;
mod show;
mod summary;
mod terminal;

use anyhow::Context;
use asvs::{Config, Standard};
use clap::ArgAction;
use list::List;
use show::Show;
use summary::Summary;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The CSV export of the standard
    #[arg(short, long, value_name = "CSV", default_value = "asvs.csv", global = true)]
    file: PathBuf,

    /// A TOML configuration file
    #[arg(short, long, value_name = "TOML", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path).map_err(anyhow::Error::msg)?,
            None => Config::default(),
        };
        let standard = load(&self.file, &config)?;

        self.command
            .unwrap_or_else(|| Command::Summary(Summary::default()))
            .run(&standard)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[instrument(skip(config))]
fn load(path: &Path, config: &Config) -> anyhow::Result<Standard> {
    asvs::storage::load(path, config)
        .with_context(|| format!("Failed to load standard from {}", path.display()))
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Summarise the standard (default)
    Summary(Summary),

    /// List requirements, optionally filtered by level or chapter
    List(List),

    /// Show a chapter, section or requirement by its unique id
    Show(Show),
}

impl Command {
    fn run(self, standard: &Standard) -> anyhow::Result<()> {
        match self {
            Self::Summary(command) => command.run(standard),
            Self::List(command) => command.run(standard)?,
            Self::Show(command) => command.run(standard)?,
        }
        Ok(())
    }
}
