//! Rolling Logger
//!
//! A `log` backend that keeps the most recent lines in a circular buffer
//! and forwards every line to a sink (the browser console on wasm32,
//! stderr elsewhere).

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Default number of lines kept in memory
pub const DEFAULT_CAPACITY: usize = 500;

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Destination for formatted log lines
pub trait Sink: Send + Sync {
    fn write(&self, level: Level, line: &str);
}

/// Writes to the browser console with the matching console method
#[cfg(target_arch = "wasm32")]
pub struct ConsoleSink;

#[cfg(target_arch = "wasm32")]
impl Sink for ConsoleSink {
    fn write(&self, level: Level, line: &str) {
        use wasm_bindgen::JsValue;
        let value = JsValue::from_str(line);
        match level {
            Level::Error => web_sys::console::error_1(&value),
            Level::Warn => web_sys::console::warn_1(&value),
            Level::Info => web_sys::console::info_1(&value),
            Level::Debug => web_sys::console::debug_1(&value),
            Level::Trace => web_sys::console::log_1(&value),
        }
    }
}

/// Writes to stderr (native builds and tests)
#[cfg(not(target_arch = "wasm32"))]
pub struct StderrSink;

#[cfg(not(target_arch = "wasm32"))]
impl Sink for StderrSink {
    fn write(&self, _level: Level, line: &str) {
        eprintln!("{}", line);
    }
}

fn default_sink() -> Box<dyn Sink> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(ConsoleSink)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(StderrSink)
    }
}

/// Logger with a bounded ring buffer of formatted lines
pub struct RollingLogger {
    level: LevelFilter,
    capacity: usize,
    buffer: Mutex<VecDeque<String>>,
    sink: Box<dyn Sink>,
}

impl RollingLogger {
    pub fn new(level: LevelFilter, capacity: usize, sink: Box<dyn Sink>) -> Self {
        Self {
            level,
            capacity: capacity.max(1),
            buffer: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
            sink,
        }
    }

    /// Snapshot of buffered lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        match self.buffer.lock() {
            Ok(buffer) => buffer.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    fn push(&self, line: String) {
        let mut buffer = match self.buffer.lock() {
            Ok(buffer) => buffer,
            Err(poisoned) => poisoned.into_inner(),
        };
        while buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(line);
    }
}

/// Format one record as a single line
pub fn format_line(record: &Record) -> String {
    format!(
        "{} {:<5} [{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.target(),
        record.args()
    )
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record);
        self.sink.write(record.level(), &line);
        self.push(line);
    }

    fn flush(&self) {}
}

/// Install the global logger with the default sink
pub fn init(level: LevelFilter, capacity: usize) -> Result<(), SetLoggerError> {
    init_with_sink(level, capacity, default_sink())
}

/// Install the global logger with a custom sink
pub fn init_with_sink(level: LevelFilter, capacity: usize, sink: Box<dyn Sink>) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(level, capacity, sink));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Lines buffered by the global logger (empty if not installed)
pub fn recent() -> Vec<String> {
    LOGGER.get().map(RollingLogger::lines).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<(Level, String)>>>);

    impl Sink for Capture {
        fn write(&self, level: Level, line: &str) {
            self.0.lock().unwrap().push((level, line.to_string()));
        }
    }

    fn emit(logger: &RollingLogger, level: Level, msg: &str) {
        logger.log(
            &Record::builder()
                .args(format_args!("{}", msg))
                .level(level)
                .target("planning::test")
                .build(),
        );
    }

    #[test]
    fn test_buffer_keeps_latest_lines() {
        let logger = RollingLogger::new(LevelFilter::Trace, 3, Box::new(Capture::default()));
        for i in 0..5 {
            emit(&logger, Level::Info, &format!("line {}", i));
        }

        let lines = logger.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("line 2"));
        assert!(lines[2].ends_with("line 4"));
    }

    #[test]
    fn test_level_filter_applies_to_sink_and_buffer() {
        let capture = Capture::default();
        let logger = RollingLogger::new(LevelFilter::Warn, 10, Box::new(capture.clone()));

        emit(&logger, Level::Debug, "hidden");
        emit(&logger, Level::Error, "shown");

        let written = capture.0.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, Level::Error);
        assert!(written[0].1.contains("[planning::test] shown"));
        assert_eq!(logger.lines().len(), 1);
    }
}
