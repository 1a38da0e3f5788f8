// crates/smelter-cli/src/logging.rs

use std::io::Write;

use log::LevelFilter;

/// Initialize env_logger once per binary. `RUST_LOG` wins when set; without
/// it only warnings and errors come through.
pub fn init() {
    let mut builder = env_logger::Builder::from_default_env();

    if std::env::var("RUST_LOG").is_err() {
        builder.filter_level(LevelFilter::Warn);
    }

    builder.format(|buf, record| {
        writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
    });

    let _ = builder.try_init();
}
