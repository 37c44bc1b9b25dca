//! Shared pieces of the index benchmark workspace: logger setup, default
//! tunables, the table/index model and random value generators.

use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::{pattern::PatternEncoder, Encode},
    filter::threshold::ThresholdFilter,
};
use std::path::Path;
use std::{backtrace, env};

pub mod constants;
pub mod names;
pub mod types;

const LOGGING_PATTERN: &str = "{d(%H:%M:%S%.3f)} {l} {t} - {m}\n";

/// Pattern encoder that appends a captured backtrace to error records when
/// `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` is set.
#[derive(Debug)]
struct BacktracePatternEncoder {
    pattern_encoder: PatternEncoder,
    is_backtrace_enabled: bool,
}

impl BacktracePatternEncoder {
    fn new(pattern: &str) -> Self {
        BacktracePatternEncoder {
            pattern_encoder: PatternEncoder::new(pattern),
            is_backtrace_enabled: env::var("RUST_BACKTRACE").is_ok()
                || env::var("RUST_LIB_BACKTRACE").is_ok(),
        }
    }
}

impl Encode for BacktracePatternEncoder {
    fn encode(
        &self,
        w: &mut dyn log4rs::encode::Write,
        record: &log::Record<'_>,
    ) -> anyhow::Result<()> {
        if record.level() != log::Level::Error || !self.is_backtrace_enabled {
            return self.pattern_encoder.encode(w, record);
        }

        let args = format_args!(
            "{}\nBacktrace:\n{}",
            record.args(),
            backtrace::Backtrace::capture()
        );
        let with_backtrace = log::Record::builder()
            .args(args)
            .level(record.level())
            .target(record.target())
            .module_path(record.module_path())
            .file(record.file())
            .line(record.line())
            .build();
        self.pattern_encoder.encode(w, &with_backtrace)
    }
}

/// Install the global logger.
///
/// Records at `log_level` and above go to stderr. When `file_path` is given,
/// the same records are appended to that file as well, so a long benchmark
/// run leaves a trace of every phase timing behind.
pub fn initialize_logger(log_level: LevelFilter, file_path: Option<&Path>) -> anyhow::Result<()> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(BacktracePatternEncoder::new(LOGGING_PATTERN)))
        .build();

    let mut config_builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(log_level)))
            .build("stderr", Box::new(stderr)),
    );
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = file_path {
        let logfile = FileAppender::builder()
            .encoder(Box::new(BacktracePatternEncoder::new(LOGGING_PATTERN)))
            .build(path)?;
        config_builder =
            config_builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
        root = root.appender("logfile");
    }

    let config = config_builder.build(root.build(log_level))?;
    log4rs::init_config(config)?;

    Ok(())
}
