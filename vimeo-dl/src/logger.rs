use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Metadata, Record};

static LOGGER: Logger = Logger;

/// Installs the stdout logger. `verbose` also shows debug records, tagged with
/// their source location.
pub fn init(verbose: bool) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    Ok(())
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.target().starts_with("vimeo_dl")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", format_record(record, log::max_level() >= LevelFilter::Debug));
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record, verbose: bool) -> String {
    if verbose {
        let location = match (record.file(), record.line()) {
            (Some(file), Some(line)) => format!("[{file}:{line}]").dimmed(),
            _ => "[unk]".dimmed(),
        };

        return format!("{} {} {}", label(record.level()), location, record.args());
    }

    match record.level() {
        Level::Info => record.args().to_string(),
        level => format!("{} {}", label(level), record.args()),
    }
}

fn label(level: Level) -> ColoredString {
    match level {
        Level::Debug => "[DEBUG]".bold().blue(),
        Level::Error => "[ERROR]".bold().red(),
        Level::Info => "[INFO]".bold().green(),
        Level::Trace => "[TRACE]".bold().purple(),
        Level::Warn => "[WARN]".bold().yellow(),
    }
}
