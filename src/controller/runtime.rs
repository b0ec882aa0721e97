//! Host runtime loop for the controller
//!
//! Drives `Controller::tick` on the configured poll interval and applies
//! external commands between ticks. All timing inside the controller is
//! deadline-based on the injected clock, so interval jitter is harmless.

use tokio::sync::mpsc;
use tokio::time::{Duration, interval};

use crate::error::Result;

use super::Controller;
use super::types::ControllerCommand;

impl Controller {
    /// Run the controller main loop until shutdown
    pub async fn run(
        &mut self,
        mut commands_rx: mpsc::UnboundedReceiver<ControllerCommand>,
    ) -> Result<()> {
        self.logger.info("Starting HVAC controller main loop");

        let mut poll_interval = interval(Duration::from_millis(self.config.poll_interval_ms));

        loop {
            tokio::select! {
                _ = poll_interval.tick() => {
                    let tick_started = std::time::Instant::now();
                    self.tick();
                    let dur_ms = tick_started.elapsed().as_millis() as u64;
                    if dur_ms > self.config.poll_interval_ms {
                        self.overrun_count = self.overrun_count.saturating_add(1);
                    }
                    if let Ok(snapshot) = serde_json::to_string(&self.snapshot()) {
                        self.logger.debug(&snapshot);
                    }
                }
                Some(cmd) = commands_rx.recv() => {
                    if matches!(cmd, ControllerCommand::Shutdown) {
                        self.logger.info("Shutdown command received");
                        break;
                    }
                    self.handle_command(cmd);
                }
                _ = tokio::signal::ctrl_c() => {
                    self.logger.info("Shutdown signal received");
                    break;
                }
            }
        }

        self.logger.info("Controller shutdown complete");
        Ok(())
    }

    /// Apply one external command
    pub fn handle_command(&mut self, cmd: ControllerCommand) {
        match cmd {
            ControllerCommand::SetSystemMode(mode) => self.set_system_mode(mode),
            ControllerCommand::SetFanMode(mode) => self.set_fan_mode(mode),
            ControllerCommand::SetCoolSetpoint(temp_f) => {
                // Rejections are logged by the setter
                let _ = self.set_cool_setpoint(temp_f);
            }
            ControllerCommand::SetHeatSetpoint(temp_f) => {
                let _ = self.set_heat_setpoint(temp_f);
            }
            ControllerCommand::SetTemperature(temp_f) => self.set_temperature(temp_f),
            ControllerCommand::SetAvailable(item, value) => self.set_available(item, value),
            ControllerCommand::SetEnabled(item, value) => self.set_enabled(item, value),
            // Handled by the run loop before dispatch
            ControllerCommand::Shutdown => {}
        }
    }
}
