use anyhow::Result;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::config::{self, Configuration};
use crate::msg::{self, fault, MessageFacility, UIBindings};
use crate::paths::{self, PathSet};
use crate::utils::{self, Logger};

/// Everything a freshly started process needs to report messages.
#[derive(Debug)]
pub struct Started {
    pub facility: Arc<MessageFacility>,
    pub paths: PathSet,
    pub config: Configuration,
}

/// The once-per-process startup sequence:
///
/// 1. resolve the directory layout and create the user directories,
/// 2. load `logging.toml` from the user config directory, if any,
/// 3. install the log sink: `<user cache>/logs/out.log` at `DEBUG` level,
///     plus the console and an optional GUI channel, with noisy targets quieted,
/// 4. enable the native fault handler, falling back to the crash log file
///     when it was already enabled,
/// 5. build the [`MessageFacility`] and route panics into it.
///
/// The thread calling [`run`](Bootstrap::run) is the main thread in log lines.
#[derive(Debug)]
pub struct Bootstrap {
    app_name: String,
    os_name: String,
    bindings: UIBindings,
    output_sender: Option<Sender<String>>,
    verbose: bool,
    quiet: bool,
    install_logger: bool,
}

impl Bootstrap {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            os_name: paths::os_name().to_string(),
            bindings: UIBindings::new(),
            output_sender: None,
            verbose: false,
            quiet: false,
            install_logger: true,
        }
    }

    pub fn bindings(mut self, bindings: UIBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Mirror every log line into `sender`, e.g. for a GUI log viewer.
    pub fn sender(mut self, sender: Sender<String>) -> Self {
        self.output_sender = Some(sender);
        self
    }

    pub fn verbose(mut self, v: bool) -> Self {
        self.verbose = v;
        self
    }

    pub fn quiet(mut self, q: bool) -> Self {
        self.quiet = q;
        self
    }

    /// Pretend to run on `os_name`, which only affects where plugins live.
    pub fn os_name(mut self, os_name: &str) -> Self {
        self.os_name = os_name.to_string();
        self
    }

    /// Keep the facility's sink private instead of installing it as the
    /// global [`log`] logger, for hosts that already installed their own.
    pub fn private_sink(mut self) -> Self {
        self.install_logger = false;
        self
    }

    pub fn run(self) -> Result<Started> {
        let paths = paths::resolve_paths(&self.app_name, &self.os_name)?;
        self.run_with_paths(paths)
    }

    /// Same as [`run`](Self::run) with an already resolved directory layout.
    pub fn run_with_paths(self, paths: PathSet) -> Result<Started> {
        paths.ensure_user_dirs()?;
        let config = config::load_or_default(&paths.config_file())?;

        utils::ensure_dir(paths.log_dir())?;
        let mut logger = Logger::from_settings(&config.logging)
            .verbose(self.verbose)
            .quiet(self.quiet)
            .log_file(paths.log_file());
        if let Some(sender) = self.output_sender {
            logger = logger.sender(sender);
        }

        let mut facility = MessageFacility::new(self.bindings).app_name(self.app_name);
        if self.install_logger {
            logger.setup()?;
        } else {
            let (_, sink) = logger.into_log()?;
            facility = facility.sink(sink);
        }

        if fault::enable().is_err() {
            fault::enable_with_file(&paths.crash_log_file())?;
        }

        let facility = Arc::new(facility);
        msg::install_crash_handler(Arc::clone(&facility));

        Ok(Started {
            facility,
            paths,
            config,
        })
    }
}
