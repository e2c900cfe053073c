/// Structured logging for the flood monitoring core
///
/// Provides component-tagged log lines with UTC timestamps and severity
/// levels. Output goes to the console and, optionally, to an append-only
/// log file. Until `init_logger` is called every logging call is a no-op,
/// so library users that do not want output get none.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::MonitorError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Monitor,
    Simulator,
    Floodgate,
    Refresh,
    Alerts,
    Session,
    Config,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Monitor => write!(f, "MON"),
            Component::Simulator => write!(f, "SIM"),
            Component::Floodgate => write!(f, "GATE"),
            Component::Refresh => write!(f, "RFSH"),
            Component::Alerts => write!(f, "ALRT"),
            Component::Session => write!(f, "SESS"),
            Component::Config => write!(f, "CFG"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    fn format_entry(level: LogLevel, component: Component, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        format!("{} {:<5} {:<4} {}", timestamp, level, component, message)
    }

    fn log(&self, level: LogLevel, component: Component, message: &str) {
        if level < self.min_level {
            return;
        }

        let entry = Self::format_entry(level, component, message);

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}: {}", component, message),
                LogLevel::Warning => eprintln!("   ⚠ {}: {}", component, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize (or replace) the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    let logger = Logger {
        min_level,
        log_file: log_file.map(String::from),
        console_timestamps,
    };
    // A poisoned lock only means another thread panicked mid-log
    let mut guard = LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Some(logger);
}

fn dispatch(level: LogLevel, component: Component, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, component, message);
        }
    }
}

pub fn info(component: Component, message: &str) {
    dispatch(LogLevel::Info, component, message);
}

pub fn warn(component: Component, message: &str) {
    dispatch(LogLevel::Warning, component, message);
}

pub fn error(component: Component, message: &str) {
    dispatch(LogLevel::Error, component, message);
}

pub fn debug(component: Component, message: &str) {
    dispatch(LogLevel::Debug, component, message);
}

// ---------------------------------------------------------------------------
// Rejection Logging
// ---------------------------------------------------------------------------

/// Severity for a rejected request: busy rejections are routine (the user
/// tapped twice), configuration problems are not.
pub fn rejection_level(err: &MonitorError) -> LogLevel {
    match err {
        MonitorError::Busy(_) | MonitorError::AlreadyRefreshing => LogLevel::Warning,
        MonitorError::NoPendingAction => LogLevel::Debug,
        MonitorError::ConfigRead(_)
        | MonitorError::ConfigParse(_)
        | MonitorError::Configuration(_) => LogLevel::Error,
    }
}

/// Log a rejected operation at the level its error deserves
pub fn log_rejection(component: Component, operation: &str, err: &MonitorError) {
    let message = format!("{} rejected: {}", operation, err);
    dispatch(rejection_level(err), component, &message);
}
