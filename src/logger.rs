use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::queue::AsyncQueue;

/// `log` backend that formats records on the calling thread and hands
/// the finished lines to a background drain, keeping I/O stalls out of
/// the render workers.
pub struct AsyncLogger {
    level: LevelFilter,
    started: Instant,
    queue: AsyncQueue<String>,
}

impl AsyncLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            started: Instant::now(),
            queue: AsyncQueue::new(|line: String| {
                eprintln!("{line}");
            }),
        }
    }
}

impl Log for AsyncLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.queue.push(format!(
            "[{:9.3}s] {:<5} {}: {}",
            self.started.elapsed().as_secs_f32(),
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {
        while !self.queue.is_empty() {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
    }
}

/// Installs the async logger as the global `log` backend.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(AsyncLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filter_is_respected() {
        let logger = AsyncLogger::new(LevelFilter::Warn);
        let info = Metadata::builder().level(log::Level::Info).build();
        let warn = Metadata::builder().level(log::Level::Warn).build();
        assert!(!logger.enabled(&info));
        assert!(logger.enabled(&warn));
    }

    #[test]
    fn flush_waits_for_the_drain() {
        let logger = AsyncLogger::new(LevelFilter::Trace);
        for i in 0..50 {
            logger.log(
                &Record::builder()
                    .args(format_args!("line {i}"))
                    .level(log::Level::Info)
                    .target("lumen::test")
                    .build(),
            );
        }
        logger.flush();
        assert!(logger.queue.is_empty());
    }
}
