use anyhow::Result;
use hestia::config::Config;
use hestia::controller::{Controller, ControllerCommand};
use hestia::ports::{MemoryOutputs, SystemClock};
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let override_path = std::env::var_os("HESTIA_CONFIG").map(std::path::PathBuf::from);
    let config = Config::load_with_override(override_path.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    config.validate()?;

    hestia::logging::init_logging(&config.logging)?;

    info!("Hestia HVAC controller {} starting up", env!("APP_VERSION"));

    let (_commands_tx, commands_rx) = mpsc::unbounded_channel::<ControllerCommand>();
    let mut controller = Controller::new(
        config,
        Box::new(SystemClock::new()),
        Box::new(MemoryOutputs::new()),
    );

    match controller.run(commands_rx).await {
        Ok(()) => {
            info!("Controller shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("Controller failed with error: {}", e);
            Err(anyhow::anyhow!("Controller error: {}", e))
        }
    }
}
