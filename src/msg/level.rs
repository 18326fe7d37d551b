use std::fmt;

/// Severity of a message.
///
/// The discriminants are the numeric levels callers may pass around as plain
/// integers, see [`LogLevel::from_i32`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum LogLevel {
    Debug = 10,
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

pub const DEBUG: i32 = LogLevel::Debug as i32;
pub const INFO: i32 = LogLevel::Info as i32;
pub const WARNING: i32 = LogLevel::Warning as i32;
pub const ERROR: i32 = LogLevel::Error as i32;
pub const CRITICAL: i32 = LogLevel::Critical as i32;

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Look up the level of a raw integer, `None` if it is not one of the five known levels.
    pub fn from_i32(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|lvl| *lvl as i32 == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// The closest [`log::Level`]. `Critical` has no counterpart and becomes `Error`.
    pub fn to_log_level(self) -> log::Level {
        match self {
            Self::Debug => log::Level::Debug,
            Self::Info => log::Level::Info,
            Self::Warning => log::Level::Warn,
            Self::Error | Self::Critical => log::Level::Error,
        }
    }
}

impl From<LogLevel> for i32 {
    fn from(value: LogLevel) -> Self {
        value as i32
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
