use anyhow::{Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::{LevelFilter, Log};
use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use crate::config::LoggingSettings;

/// Third-party log targets that flood the log with chatter nobody reads.
/// Their records are only kept at `error` level.
pub const NOISY_TARGETS: &[&str] = &[
    "hyper",
    "h2",
    "reqwest",
    "rustls",
    "mio",
    "tao",
    "wry",
    "winit",
    "wgpu_core",
    "naga",
];

/// Builder of the process log sink.
///
/// Lines arrive at the sink already formatted by
/// [`MessageFacility`](crate::msg::MessageFacility), so every output here
/// writes the message text verbatim. The outputs only differ in which
/// levels they accept.
#[derive(Debug)]
pub struct Logger {
    console: bool,
    colored: bool,
    console_level: LevelFilter,
    output_sender: Option<Sender<String>>,
    log_file: Option<PathBuf>,
    quiet_targets: Vec<Cow<'static, str>>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub fn new() -> Self {
        #[cfg(not(debug_assertions))]
        let console_level = LevelFilter::Info;
        #[cfg(debug_assertions)]
        let console_level = LevelFilter::Debug;

        Self {
            console: true,
            colored: false,
            console_level,
            output_sender: None,
            log_file: None,
            quiet_targets: NOISY_TARGETS.iter().map(|t| Cow::Borrowed(*t)).collect(),
        }
    }

    /// Create a logger from the `[logging]` table of the configuration file.
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        let mut logger = Self::new()
            .console(settings.console)
            .colored(settings.colored)
            .verbose(settings.verbose);
        logger
            .quiet_targets
            .extend(settings.quiet_targets.iter().cloned().map(Cow::Owned));
        logger
    }

    /// Set verbose output, this will print `debug` lines on the console as well.
    pub fn verbose(mut self, v: bool) -> Self {
        if v {
            self.console_level = LevelFilter::Debug;
        }
        self
    }

    /// Keep only `error` lines on the console. The log file is not affected.
    pub fn quiet(mut self, q: bool) -> Self {
        if q {
            self.console_level = LevelFilter::Error;
        }
        self
    }

    /// Enable or disable the console output entirely.
    pub fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Color console lines by their level.
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Additionally send every line through `sender`, so that a GUI can mirror the log.
    pub fn sender(mut self, sender: Sender<String>) -> Self {
        self.output_sender = Some(sender);
        self
    }

    /// Append every line (at any level) to the file at `path`.
    pub fn log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.log_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Only keep `error` records whose target is `target`.
    pub fn quiet_target<S: Into<Cow<'static, str>>>(mut self, target: S) -> Self {
        self.quiet_targets.push(target.into());
        self
    }

    /// Build the dispatcher without installing it, returning the maximum
    /// level it accepts together with the sink itself.
    ///
    /// # Error
    ///
    /// Fails if the log file cannot be opened for appending.
    pub fn into_log(self) -> Result<(LevelFilter, Box<dyn Log>)> {
        let mut root = fern::Dispatch::new().level(LevelFilter::Debug);
        for target in self.quiet_targets {
            root = root.level_for(target, LevelFilter::Error);
        }

        if self.console {
            let console = if self.colored {
                let colors = ColoredLevelConfig::new()
                    .info(Color::BrightBlue)
                    .debug(Color::Magenta)
                    .warn(Color::Yellow)
                    .error(Color::Red);
                fern::Dispatch::new().format(move |out, msg, rec| {
                    out.finish(format_args!(
                        "\x1b[{}m{msg}\x1b[0m",
                        colors.get_color(&rec.level()).to_fg_str()
                    ));
                })
            } else {
                fern::Dispatch::new().format(|out, msg, _| out.finish(format_args!("{msg}")))
            };
            // errors go to `stderr`, everything else to `stdout`
            root = root.chain(
                console
                    .level(self.console_level)
                    .chain(
                        fern::Dispatch::new()
                            .filter(|meta| meta.level() > log::Level::Error)
                            .chain(io::stdout()),
                    )
                    .chain(
                        fern::Dispatch::new()
                            .level(LevelFilter::Error)
                            .chain(io::stderr()),
                    ),
            );
        }

        if let Some(sender) = self.output_sender {
            root = root.chain(
                fern::Dispatch::new()
                    .format(|out, msg, _| out.finish(format_args!("{msg}")))
                    .chain(sender),
            );
        }

        if let Some(path) = self.log_file {
            let file = fern::log_file(&path)
                .with_context(|| format!("unable to open log file '{}'", path.display()))?;
            root = root.chain(
                fern::Dispatch::new()
                    .format(|out, msg, _| out.finish(format_args!("{msg}")))
                    .chain(file),
            );
        }

        Ok(root.into_log())
    }

    /// Setup the global logger using [`log`] and [`fern`], this must be called
    /// before any message is expected to reach the console or the log file.
    ///
    /// - If [`verbose`](Logger::verbose) was called with `true`, the console
    ///     shows `debug` lines as well.
    /// - If [`quiet`](Logger::quiet) was called with `true`, the console only
    ///     shows errors, the log file still receives everything.
    pub fn setup(self) -> Result<()> {
        let (level, logger) = self.into_log()?;
        log::set_max_level(level);
        log::set_boxed_logger(logger).context("a global logger was already installed")?;
        Ok(())
    }
}
