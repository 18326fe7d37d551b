//! Per-user and per-site directory layout of the application.
//!
//! The base locations follow each platform's convention (XDG on Linux,
//! `~/Library` on macOS, `AppData` on Windows). On top of them:
//!
//! - `user_plugin_dir` lives under the config directory, except on macOS where it
//!   lives under the cache directory. The macOS config directory
//!   (`~/Library/Application Support`) contains a space, which breaks the
//!   activation scripts of virtual environments created for plugins.
//! - `site_plugin_dir` always lives under the site config directory.
//! - `user_dev_dir` is always `~/Xi-cam/plugins`.

use anyhow::{anyhow, Result};
use std::env;
use std::path::{Path, PathBuf};

use crate::utils;

/// Name used for every per-application directory.
pub const APP_NAME: &str = "xicam";
/// OS name reported for macOS, the only platform whose plugin dir is relocated.
pub const DARWIN: &str = "Darwin";

const PLUGINS_DIR: &str = "plugins";
const DEV_PLUGIN_DIR: [&str; 2] = ["Xi-cam", "plugins"];
const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "out.log";
const CRASH_LOG_FILE: &str = "crash_log.log";

/// Platform base directories, before the application name is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDirs {
    pub cache: PathBuf,
    pub config: PathBuf,
    pub site_config: PathBuf,
    pub home: PathBuf,
}

impl BaseDirs {
    /// Detect base directories of the running host.
    ///
    /// # Error
    ///
    /// Fails when the home, cache or config directory cannot be determined,
    /// usually because of missing environment variables such as `HOME`.
    pub fn detect() -> Result<Self> {
        let home = utils::home_dir()?;
        let cache =
            dirs::cache_dir().ok_or_else(|| anyhow!("cache directory cannot be determined"))?;
        let config =
            dirs::config_dir().ok_or_else(|| anyhow!("config directory cannot be determined"))?;

        Ok(Self {
            cache,
            config,
            site_config: site_config_root(),
            home,
        })
    }
}

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        fn site_config_root() -> PathBuf {
            env::var_os("PROGRAMDATA")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(r"C:\ProgramData"))
        }
    } else if #[cfg(target_os = "macos")] {
        fn site_config_root() -> PathBuf {
            PathBuf::from("/Library/Application Support")
        }
    } else {
        fn site_config_root() -> PathBuf {
            // only the first, most important entry of `XDG_CONFIG_DIRS` is used
            env::var_os("XDG_CONFIG_DIRS")
                .and_then(|dirs| env::split_paths(&dirs).find(|p| p.is_absolute()))
                .unwrap_or_else(|| PathBuf::from("/etc/xdg"))
        }
    }
}

/// Name of the running OS family: `Darwin`, `Linux`, `Windows`, or
/// [`std::env::consts::OS`] for anything else.
pub fn os_name() -> &'static str {
    match env::consts::OS {
        "macos" => DARWIN,
        "linux" => "Linux",
        "windows" => "Windows",
        other => other,
    }
}

/// Every directory the application reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    pub user_cache_dir: PathBuf,
    pub user_config_dir: PathBuf,
    pub user_plugin_dir: PathBuf,
    pub site_config_dir: PathBuf,
    pub site_plugin_dir: PathBuf,
    pub user_dev_dir: PathBuf,
}

impl PathSet {
    /// Compute the directory layout of `app_name` from already known base
    /// directories, as if running on `os_name`.
    pub fn from_base(base: &BaseDirs, app_name: &str, os_name: &str) -> Self {
        let user_cache_dir = base.cache.join(app_name);
        let user_config_dir = base.config.join(app_name);
        let site_config_dir = base.site_config.join(app_name);

        let user_plugin_dir = if os_name == DARWIN {
            user_cache_dir.join(PLUGINS_DIR)
        } else {
            user_config_dir.join(PLUGINS_DIR)
        };
        let site_plugin_dir = site_config_dir.join(PLUGINS_DIR);
        let user_dev_dir = DEV_PLUGIN_DIR
            .iter()
            .fold(base.home.clone(), |path, seg| path.join(seg));

        Self {
            user_cache_dir,
            user_config_dir,
            user_plugin_dir,
            site_config_dir,
            site_plugin_dir,
            user_dev_dir,
        }
    }

    /// Create the user cache, config and plugin directories if missing.
    ///
    /// Site directories are managed by the system administrator and are
    /// never created here.
    pub fn ensure_user_dirs(&self) -> Result<()> {
        for dir in [
            &self.user_cache_dir,
            &self.user_config_dir,
            &self.user_plugin_dir,
        ] {
            utils::ensure_dir(dir)?;
        }
        Ok(())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.user_cache_dir.join(LOG_DIR)
    }

    /// Path to the main log file, `<user cache>/logs/out.log`.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir().join(LOG_FILE)
    }

    /// Path to the file receiving native crash reports, `<user cache>/logs/crash_log.log`.
    pub fn crash_log_file(&self) -> PathBuf {
        self.log_dir().join(CRASH_LOG_FILE)
    }

    pub fn config_file(&self) -> PathBuf {
        self.user_config_dir.join(crate::config::CONFIG_FILE_NAME)
    }

    /// All six directories paired with a display name, in a stable order.
    pub fn entries(&self) -> [(&'static str, &Path); 6] {
        [
            ("user_cache_dir", self.user_cache_dir.as_path()),
            ("user_config_dir", self.user_config_dir.as_path()),
            ("user_plugin_dir", self.user_plugin_dir.as_path()),
            ("site_config_dir", self.site_config_dir.as_path()),
            ("site_plugin_dir", self.site_plugin_dir.as_path()),
            ("user_dev_dir", self.user_dev_dir.as_path()),
        ]
    }
}

/// Resolve the directory layout of `app_name` on this host, with the plugin
/// directory placed as `os_name` requires.
pub fn resolve_paths(app_name: &str, os_name: &str) -> Result<PathSet> {
    let base = BaseDirs::detect()?;
    Ok(PathSet::from_base(&base, app_name, os_name))
}
