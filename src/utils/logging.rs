//! Pipeline Logging
//!
//! Lines go to stderr as `<timestamp> <LEVEL> [<module>] <message> | k=v ...`.
//! Field values are classified by key before they are rendered, so key
//! material never reaches the output and addresses and digests are
//! shortened. Debug lines are dropped unless enabled.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

pub fn disable_debug() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        })
    }
}

/// How a field value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Shown as is
    Plain,
    /// Never shown: keys, nonce entropy
    Secret,
    /// `0x1234ab...cdef`
    Address,
    /// First 10 and last 6 hex digits
    Digest,
}

impl FieldClass {
    /// Classify a field by its key
    ///
    /// `to` is matched exactly so that keys like `total` stay plain.
    pub fn of(key: &str) -> Self {
        let key = key.to_ascii_lowercase();
        const SECRET: [&str; 6] = ["private_key", "secret", "seed", "entropy", "noncedata", "signing_key"];
        const ADDRESS: [&str; 3] = ["address", "recipient", "sender"];
        const DIGEST: [&str; 2] = ["hash", "digest"];

        if SECRET.iter().any(|k| key.contains(k)) {
            FieldClass::Secret
        } else if key == "to" || ADDRESS.iter().any(|k| key.contains(k)) {
            FieldClass::Address
        } else if DIGEST.iter().any(|k| key.contains(k)) {
            FieldClass::Digest
        } else {
            FieldClass::Plain
        }
    }

    pub fn render(self, value: &str) -> String {
        let value = value.trim();
        match self {
            FieldClass::Plain => value.to_string(),
            FieldClass::Secret => "[REDACTED]".to_string(),
            FieldClass::Address => elide(value, 8, 4),
            FieldClass::Digest => {
                let head = if value.starts_with("0x") { 12 } else { 10 };
                elide(value, head, 6)
            }
        }
    }
}

/// Keep `head` leading and `tail` trailing chars of a hex string
fn elide(value: &str, head: usize, tail: usize) -> String {
    if value.is_empty() {
        return "[EMPTY]".to_string();
    }
    if !value.is_ascii() {
        return "[REDACTED]".to_string();
    }
    if value.len() <= head + tail + 3 {
        return value.to_string();
    }
    format!("{}...{}", &value[..head], &value[value.len() - tail..])
}

/// One log line under construction
#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field, rendered according to [`FieldClass::of`]
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        let rendered = FieldClass::of(key).render(&value.to_string());
        self.fields.push((key, rendered));
        self
    }

    /// The line without its timestamp
    pub fn render(&self) -> String {
        let mut line = format!("{} [{}] {}", self.level, self.module, self.message);
        if !self.fields.is_empty() {
            line.push_str(" |");
            for (key, value) in &self.fields {
                line.push_str(&format!(" {}={}", key, value));
            }
        }
        line
    }

    pub fn log(self) {
        if self.level == LogLevel::Debug && !is_debug_enabled() {
            return;
        }
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        eprintln!("[{}] {}", timestamp, self.render());
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:ident, $module:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::$level,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($args:tt)*) => { $crate::__log_at!(Debug, $($args)*) };
}

#[macro_export]
macro_rules! log_info {
    ($($args:tt)*) => { $crate::__log_at!(Info, $($args)*) };
}

#[macro_export]
macro_rules! log_warn {
    ($($args:tt)*) => { $crate::__log_at!(Warn, $($args)*) };
}

#[macro_export]
macro_rules! log_error {
    ($($args:tt)*) => { $crate::__log_at!(Error, $($args)*) };
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_classify_keys() {
        assert_eq!(FieldClass::of("noncedata"), FieldClass::Secret);
        assert_eq!(FieldClass::of("signing_key"), FieldClass::Secret);
        assert_eq!(FieldClass::of("to"), FieldClass::Address);
        assert_eq!(FieldClass::of("recovered_sender"), FieldClass::Address);
        assert_eq!(FieldClass::of("tx_hash"), FieldClass::Digest);

        // Only the exact key `to` is an address
        assert_eq!(FieldClass::of("total"), FieldClass::Plain);
        assert_eq!(FieldClass::of("storage_keys"), FieldClass::Plain);
        assert_eq!(FieldClass::of("nonce"), FieldClass::Plain);
    }

    #[test]
    fn test_render_classes() {
        assert_eq!(FieldClass::Secret.render("5a5a5a5a"), "[REDACTED]");
        assert_eq!(FieldClass::Address.render(ADDR), "0x5aAeb6...eAed");
        assert_eq!(FieldClass::Address.render(""), "[EMPTY]");

        let digest = "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470";
        assert_eq!(FieldClass::Digest.render(digest), "c5d2460186...85a470");
        assert_eq!(FieldClass::Digest.render("0x1234"), "0x1234");
        assert_eq!(FieldClass::Plain.render(" 4142 "), "4142");
    }

    #[test]
    fn test_entry_render() {
        let entry = LogEntry::new(LogLevel::Warn, "tx::pipeline", "Recovered signer does not match key")
            .field("y_parity", 1)
            .field("entropy", "5a5a5a5a5a5a5a5a")
            .field("expected_sender", ADDR);

        assert_eq!(entry.fields[0], ("y_parity", "1".to_string()));
        assert_eq!(
            entry.render(),
            "WARN [tx::pipeline] Recovered signer does not match key | y_parity=1 entropy=[REDACTED] expected_sender=0x5aAeb6...eAed"
        );
        assert_eq!(
            LogEntry::new(LogLevel::Info, "collaborators", "Transaction broadcast").render(),
            "INFO [collaborators] Transaction broadcast"
        );
    }

    #[test]
    fn test_debug_toggle() {
        enable_debug();
        assert!(is_debug_enabled());
        disable_debug();
        assert!(!is_debug_enabled());
    }
}
