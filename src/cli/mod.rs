//! Contains all the definition of command line arguments.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config;
use crate::msg::{ConsoleProgressBar, Entry, UIBindings, INFO};
use crate::paths::{self, APP_NAME};
use crate::Bootstrap;

/// Inspect the Xi-cam directory layout and write into its log.
#[derive(Parser, Debug)]
#[command(version, about, arg_required_else_help(true))]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
    /// Suppress non-critical messages
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Application name the directories are derived from
    #[arg(long, default_value = APP_NAME)]
    pub app: String,

    #[command(subcommand)]
    command: Option<Subcommands>,
}

#[derive(Subcommand, Debug)]
enum Subcommands {
    /// Print every resolved directory
    Paths {
        /// Resolve as if running on this OS (e.g. `Darwin`)
        #[arg(long, value_name = "NAME")]
        os: Option<String>,
    },
    /// Print the logging configuration in effect
    Config,
    /// Write a message into the application log
    Log {
        /// Numeric level: 10, 20, 30, 40 or 50
        #[arg(short, long, default_value_t = INFO)]
        level: i32,
        /// Channel (logger name) of the message
        #[arg(short, long, default_value = "cli")]
        channel: String,
        /// Message parts, joined by spaces
        #[arg(required = true)]
        parts: Vec<String>,
    },
    /// Drive a console progress bar, mostly to try the progress operations
    Progress {
        #[arg(long, default_value_t = 20)]
        steps: i32,
        /// Delay between two steps, in milliseconds
        #[arg(long, default_value_t = 100)]
        delay: u64,
    },
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        let Some(command) = self.command else {
            return Ok(());
        };

        match command {
            Subcommands::Paths { os } => {
                let os = os.as_deref().unwrap_or(paths::os_name());
                let set = paths::resolve_paths(&self.app, os)?;
                for (name, path) in set.entries() {
                    println!("{name}: {}", path.display());
                }
            }
            Subcommands::Config => {
                let set = paths::resolve_paths(&self.app, paths::os_name())?;
                let conf = config::load_or_default(&set.config_file())?;
                println!("# {}", set.config_file().display());
                print!("{}", conf.to_toml()?);
            }
            Subcommands::Log {
                level,
                channel,
                parts,
            } => {
                let started = Bootstrap::new(&self.app)
                    .verbose(self.verbose)
                    .quiet(self.quiet)
                    .run()?;
                started.facility.log(&Entry::new(&channel, parts).level(level));
            }
            Subcommands::Progress { steps, delay } => {
                let bindings =
                    UIBindings::new().progressbar(Arc::new(ConsoleProgressBar::new()));
                let started = Bootstrap::new(&self.app)
                    .verbose(self.verbose)
                    .quiet(self.quiet)
                    .bindings(bindings)
                    .run()?;
                let facility = started.facility;

                let delay = Duration::from_millis(delay);
                facility.show_busy();
                thread::sleep(delay * 5);
                for step in 0..=steps {
                    facility.show_progress(step, 0, steps);
                    thread::sleep(delay);
                }
                facility.hide_progress();
                facility.log(&Entry::new("cli", [format!("finished {steps} steps")]));
            }
        }
        Ok(())
    }
}

pub fn run() -> Result<()> {
    Cli::parse().execute()
}
