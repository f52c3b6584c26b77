//! `log` backend: the browser console on wasm32, `env_logger` elsewhere.

#[cfg(any(target_arch = "wasm32", test))]
use log::Record;

#[cfg(any(target_arch = "wasm32", test))]
fn format_record(record: &Record) -> String {
    format!("[{}] {}: {}", record.level(), record.target(), record.args())
}

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, LevelFilter, Log, Metadata, Record};

    /// Debug output is compiled out of release builds.
    pub const MAX_LEVEL: LevelFilter = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    pub struct ConsoleLogger;

    pub static LOGGER: ConsoleLogger = ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= MAX_LEVEL
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = super::format_record(record);
            match record.level() {
                Level::Error => web_sys::console::error_1(&line.into()),
                Level::Warn => web_sys::console::warn_1(&line.into()),
                _ => web_sys::console::log_1(&line.into()),
            }
        }

        fn flush(&self) {}
    }
}

/// Install the console logger. A second call is a no-op.
#[cfg(target_arch = "wasm32")]
pub fn init() {
    if log::set_logger(&console::LOGGER).is_ok() {
        log::set_max_level(console::MAX_LEVEL);
    }
}

/// Install `env_logger` (filtered by `RUST_LOG`). A second call is a no-op.
#[cfg(not(target_arch = "wasm32"))]
pub fn init() {
    let _ = env_logger::try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn record_format_has_level_and_target() {
        let line = format_record(
            &Record::builder()
                .args(format_args!("saved {} bytes", 42))
                .level(Level::Warn)
                .target("potato_land::save")
                .build(),
        );
        assert_eq!(line, "[WARN] potato_land::save: saved 42 bytes");
    }

    #[test]
    fn init_twice_is_harmless() {
        init();
        init();
        log::info!("logger installed");
    }
}
