use anyhow::Result;

use delta_engine::device::DeviceInit;
use delta_engine::logging::{LoggingConfig, init_logging};
use delta_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "delta · hardcoded red triangle".to_string(),
        ..RuntimeConfig::default()
    };
    let init = DeviceInit::from_env();
    log::info!("starting delta viewer ({:?})", init.backends);

    Runtime::run(config, init)
}
