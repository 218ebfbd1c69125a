//! Defines the diagnostic console that logs to standard error.

use std::io::{self, Write};

use log::LevelFilter;
use spin::{Mutex, Once};

pub struct Console {
    sink: Mutex<io::Stderr>,
}

static DEFAULT: Once<Console> = Once::new();

impl Console {
    pub fn init(verbosity: u8) -> &'static Self {
        let console = Self::default();
        console.install(verbosity);
        console
    }

    pub fn default() -> &'static Self {
        DEFAULT.call_once(|| Console {
            sink: Mutex::new(io::stderr()),
        })
    }

    pub fn install(&'static self, verbosity: u8) {
        // A logger may already be installed (e.g. when called twice); keep the first one.
        if log::set_logger(self).is_ok() {
            log::set_max_level(level_for(verbosity));
        }
    }
}

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

impl log::Log for Console {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut sink = self.sink.lock();
        // Nowhere left to report a failing stderr.
        let _ = write_log_entry_to(&mut *sink, record);
    }

    fn flush(&self) {
        let _ = self.sink.lock().flush();
    }
}

fn write_log_entry_to(writer: &mut impl Write, record: &log::Record) -> io::Result<()> {
    #[cfg(debug_assertions)]
    return writeln!(
        writer,
        "[{} {}:{} {}] {}",
        record.level(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.target(),
        record.args()
    );
    #[cfg(not(debug_assertions))]
    return writeln!(writer, "[{:5}] {}", record.level(), record.args());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(3), LevelFilter::Trace);
        assert_eq!(level_for(200), LevelFilter::Trace);
    }

    #[test]
    fn entry_contains_message() {
        let mut out = Vec::new();
        write_log_entry_to(
            &mut out,
            &log::Record::builder()
                .level(log::Level::Info)
                .args(format_args!("mapped {} bytes", 4096))
                .build(),
        )
        .unwrap();
        let line = String::from_utf8(out).unwrap();
        assert!(line.contains("INFO"));
        assert!(line.ends_with("mapped 4096 bytes\n"));
    }
}
