//! Logger setup for binaries, benches and tests of the grid workspace.
//!
//! Library crates only ever talk to the `log` facade; installing a logger is the job of whoever owns the process.
use log::LevelFilter;

/// Log to stderr at `info`, or whatever `RUST_LOG` asks for.
///
/// If called multiple times in the same process, only applies once.
pub fn log_to_stderr() {
    log_to_stderr_at(LevelFilter::Info);
}

/// Like [log_to_stderr], with an explicit default level.  `RUST_LOG` still wins when set.
///
/// Only the first call in a process has any effect, including its level.
pub fn log_to_stderr_at(default_level: LevelFilter) {
    static ONCE: std::sync::Once = std::sync::Once::new();

    ONCE.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder
            .filter_level(default_level)
            .parse_default_env()
            .format(|buf, record| {
                use std::io::Write;

                let now = time::OffsetDateTime::now_utc();

                writeln!(
                    buf,
                    "{} {} time={} target={}",
                    record.level(),
                    record.args(),
                    now,
                    record.target()
                )
            });

        // Tests run in parallel threads of one process, and something else may have set a logger first.
        if builder.try_init().is_err() {
            log::debug!("A logger was already installed; keeping it");
        }
    });
}
