// Tagged console logging for the reconciler.
//
// Provides leveled, tagged output with timestamps. Debug output is gated by
// a process-wide flag so library users opt in explicitly; everything else is
// shown by default. No file persistence - this crate is a library and leaves
// log routing to its host application.

use chrono::Utc;
use colored::Colorize;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// TAGS AND LEVELS
// =============================================================================

/// Source module of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    Reconciler,
    Query,
    Classifier,
}

impl LogTag {
    fn as_str(&self) -> &'static str {
        match self {
            LogTag::Reconciler => "RECONCILER",
            LogTag::Query => "QUERY",
            LogTag::Classifier => "CLASSIFIER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

static DEBUG_ENABLED: Lazy<AtomicBool> = Lazy::new(|| AtomicBool::new(false));

/// Enable or disable debug-level output for the whole process
pub fn set_debug_enabled(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

// =============================================================================
// LOGGING API
// =============================================================================

/// Log a tagged event at a given level.
///
/// Debug lines are dropped unless debug output has been enabled.
pub fn log(tag: LogTag, level: LogLevel, event: &str, message: &str) {
    if level == LogLevel::Debug && !is_debug_enabled() {
        return;
    }

    let timestamp = Utc::now().format("%H:%M:%S%.3f");
    let level_str = match level {
        LogLevel::Error => level.as_str().red().bold(),
        LogLevel::Warning => level.as_str().yellow().bold(),
        LogLevel::Info => level.as_str().green(),
        LogLevel::Debug => level.as_str().dimmed(),
    };

    println!(
        "{} {} {} [{}] {}",
        format!("[{}]", timestamp).dimmed(),
        level_str,
        tag.as_str().cyan(),
        event,
        message
    );
}

pub fn error(tag: LogTag, event: &str, message: &str) {
    log(tag, LogLevel::Error, event, message);
}

pub fn warning(tag: LogTag, event: &str, message: &str) {
    log(tag, LogLevel::Warning, event, message);
}

pub fn info(tag: LogTag, event: &str, message: &str) {
    log(tag, LogLevel::Info, event, message);
}

pub fn debug(tag: LogTag, event: &str, message: &str) {
    log(tag, LogLevel::Debug, event, message);
}
