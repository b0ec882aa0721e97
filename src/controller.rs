//! HVAC supervisor
//!
//! The `Controller` owns one driver per physical actuator, the availability
//! flags, the user modes and setpoints, and the current goal hardware mode.
//! Each `tick` services the drivers, latches the fan mode, sequences the
//! active goal, and on a throttled cadence re-derives the goal from the
//! measured temperature. The controller is the sole writer of actuator
//! drivers and of the output port.

use crate::actuator::{Compressor, Device, Relay, ReversingValve};
use crate::config::{Config, SETPOINT_DEADBAND_F};
use crate::hardware::{Availability, HardwareItem};
use crate::logging::{StructuredLogger, get_logger};
use crate::ports::{Clock, OutputPort};

mod decide;
mod runtime;
mod sequence;
mod types;

pub use types::{
    ControllerCommand, ControllerSnapshot, DeviceSnapshot, FanMode, GoalMode, SystemMode,
};

/// Measured-temperature sentinel meaning "no sample yet"
pub const TEMP_UNSET_F: i16 = -128;

/// One driver per hardware item, created at boot and never destroyed
struct DeviceBank {
    comp1: Compressor,
    comp2: Compressor,
    gas_heat: Relay,
    valve: ReversingValve,
    fan_low: Relay,
    fan_high: Relay,
    coach_low: Relay,
    coach_high: Relay,
}

impl DeviceBank {
    fn new(config: &Config, now: u64) -> Self {
        let hw = &config.hardware;
        let timing = &config.timing;
        Self {
            comp1: Compressor::new(
                hw.pin(HardwareItem::Comp1),
                timing.compressor_restart_delay_ms,
                now,
            ),
            comp2: Compressor::new(
                hw.pin(HardwareItem::Comp2),
                timing.compressor_restart_delay_ms,
                now,
            ),
            gas_heat: Relay::new(hw.pin(HardwareItem::GasHeat)),
            valve: ReversingValve::new(hw.pin(HardwareItem::ReversingValve), timing.valve_settle_ms),
            fan_low: Relay::new(hw.pin(HardwareItem::FanLow)),
            fan_high: Relay::new(hw.pin(HardwareItem::FanHigh)),
            coach_low: Relay::new(hw.pin(HardwareItem::CoachHeatLow)),
            coach_high: Relay::new(hw.pin(HardwareItem::CoachHeatHigh)),
        }
    }

    fn get(&self, item: HardwareItem) -> &dyn Device {
        match item {
            HardwareItem::Comp1 => &self.comp1,
            HardwareItem::Comp2 => &self.comp2,
            HardwareItem::GasHeat => &self.gas_heat,
            HardwareItem::ReversingValve => &self.valve,
            HardwareItem::FanLow => &self.fan_low,
            HardwareItem::FanHigh => &self.fan_high,
            HardwareItem::CoachHeatLow => &self.coach_low,
            HardwareItem::CoachHeatHigh => &self.coach_high,
        }
    }

    fn get_mut(&mut self, item: HardwareItem) -> &mut dyn Device {
        match item {
            HardwareItem::Comp1 => &mut self.comp1,
            HardwareItem::Comp2 => &mut self.comp2,
            HardwareItem::GasHeat => &mut self.gas_heat,
            HardwareItem::ReversingValve => &mut self.valve,
            HardwareItem::FanLow => &mut self.fan_low,
            HardwareItem::FanHigh => &mut self.fan_high,
            HardwareItem::CoachHeatLow => &mut self.coach_low,
            HardwareItem::CoachHeatHigh => &mut self.coach_high,
        }
    }

    fn tick_all(&mut self, now: u64, outputs: &mut dyn OutputPort) {
        for item in HardwareItem::ALL {
            self.get_mut(item).tick(now, outputs);
        }
    }
}

/// Supervisor for the HVAC actuator set
pub struct Controller {
    config: Config,
    clock: Box<dyn Clock>,
    outputs: Box<dyn OutputPort>,
    availability: Availability,
    devices: DeviceBank,
    logger: StructuredLogger,

    system_mode: SystemMode,
    user_fan_mode: FanMode,
    /// Latched copy of the user fan mode, updated at the top of each tick
    fan_mode: FanMode,
    heat_setpoint_f: i16,
    cool_setpoint_f: i16,
    current_temp_f: i16,
    goal_mode: GoalMode,
    next_decide_at: u64,

    total_ticks: u64,
    overrun_count: u64,
}

impl Controller {
    /// Build a controller from configuration and host capabilities.
    ///
    /// The compressors record the construction tick as their last stop, so
    /// the first start after boot still waits out the restart delay.
    pub fn new(config: Config, clock: Box<dyn Clock>, outputs: Box<dyn OutputPort>) -> Self {
        let logger = get_logger("controller");
        let now = clock.now_ms();
        let devices = DeviceBank::new(&config, now);

        let system_mode = config
            .defaults
            .system_mode
            .parse::<SystemMode>()
            .unwrap_or_else(|_| {
                logger.warn(&format!(
                    "Unknown default system mode '{}'; starting off",
                    config.defaults.system_mode
                ));
                SystemMode::Off
            });
        let fan_mode = config
            .defaults
            .fan_mode
            .parse::<FanMode>()
            .unwrap_or_else(|_| {
                logger.warn(&format!(
                    "Unknown default fan mode '{}'; using auto",
                    config.defaults.fan_mode
                ));
                FanMode::Auto
            });

        let next_decide_at = now.saturating_add(config.timing.decide_period_ms);
        let heat_setpoint_f = config.setpoints.heat_f;
        let cool_setpoint_f = config.setpoints.cool_f;

        Self {
            config,
            clock,
            outputs,
            availability: Availability::default(),
            devices,
            logger,
            system_mode,
            user_fan_mode: fan_mode,
            fan_mode,
            heat_setpoint_f,
            cool_setpoint_f,
            current_temp_f: TEMP_UNSET_F,
            goal_mode: GoalMode::Off,
            next_decide_at,
            total_ticks: 0,
            overrun_count: 0,
        }
    }

    /// Advance the controller by one tick.
    ///
    /// Phases run in a fixed order: driver service, fan-mode latch, goal
    /// sequencing, throttled goal derivation. A goal chosen in the last
    /// phase is enacted starting from the next tick.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();

        // Phase A: service every driver
        self.devices.tick_all(now, self.outputs.as_mut());

        // Phase B: latch fan mode
        self.fan_mode = self.user_fan_mode;

        // Phase C: enact the active goal
        self.enact_goal(now);

        // Phase D: throttled goal derivation
        self.maybe_decide(now);

        self.total_ticks = self.total_ticks.saturating_add(1);
    }

    /// Overwrite the system mode
    pub fn set_system_mode(&mut self, mode: SystemMode) {
        if mode != self.system_mode {
            self.logger.info(&format!(
                "System mode changed: {} -> {}",
                self.system_mode, mode
            ));
        }
        self.system_mode = mode;
    }

    /// Overwrite the user fan mode; takes effect on the next tick
    pub fn set_fan_mode(&mut self, mode: FanMode) {
        if mode != self.user_fan_mode {
            self.logger.info(&format!(
                "Fan mode changed: {} -> {}",
                self.user_fan_mode, mode
            ));
        }
        self.user_fan_mode = mode;
    }

    /// Set the cooling setpoint; rejected when it would collapse the deadband
    pub fn set_cool_setpoint(&mut self, temp_f: i16) -> bool {
        if temp_f < self.heat_setpoint_f + SETPOINT_DEADBAND_F {
            self.logger.warn(&format!(
                "Rejected cooling setpoint {} °F: below heating setpoint {} °F + deadband",
                temp_f, self.heat_setpoint_f
            ));
            return false;
        }
        if temp_f != self.cool_setpoint_f {
            self.logger.info(&format!(
                "Cooling setpoint changed: {} -> {} °F",
                self.cool_setpoint_f, temp_f
            ));
        }
        self.cool_setpoint_f = temp_f;
        true
    }

    /// Set the heating setpoint; rejected when it would collapse the deadband
    pub fn set_heat_setpoint(&mut self, temp_f: i16) -> bool {
        if temp_f + SETPOINT_DEADBAND_F > self.cool_setpoint_f {
            self.logger.warn(&format!(
                "Rejected heating setpoint {} °F: above cooling setpoint {} °F - deadband",
                temp_f, self.cool_setpoint_f
            ));
            return false;
        }
        if temp_f != self.heat_setpoint_f {
            self.logger.info(&format!(
                "Heating setpoint changed: {} -> {} °F",
                self.heat_setpoint_f, temp_f
            ));
        }
        self.heat_setpoint_f = temp_f;
        true
    }

    /// Overwrite the measured temperature
    pub fn set_temperature(&mut self, temp_f: i16) {
        self.current_temp_f = temp_f;
    }

    /// Update the system availability flag for one device.
    ///
    /// A true → false transition commands the device to stop immediately;
    /// compressor and valve drivers then wind down through their own delay
    /// states rather than yanking the output.
    pub fn set_available(&mut self, item: HardwareItem, value: bool) {
        let prev = self.availability.set_available(item, value);
        if prev && !value {
            self.logger
                .info(&format!("{} unavailable; commanding stop", item));
            let now = self.clock.now_ms();
            self.devices.get_mut(item).stop(now, self.outputs.as_mut());
        }
    }

    /// Update the user enablement flag for one device
    pub fn set_enabled(&mut self, item: HardwareItem, value: bool) {
        let prev = self.availability.set_enabled(item, value);
        if prev && !value {
            self.logger
                .info(&format!("{} disabled; commanding stop", item));
            let now = self.clock.now_ms();
            self.devices.get_mut(item).stop(now, self.outputs.as_mut());
        }
    }

    /// Accessors for hosts and observability
    pub fn system_mode(&self) -> SystemMode {
        self.system_mode
    }

    pub fn fan_mode(&self) -> FanMode {
        self.user_fan_mode
    }

    pub fn goal_mode(&self) -> GoalMode {
        self.goal_mode
    }

    pub fn cool_setpoint(&self) -> i16 {
        self.cool_setpoint_f
    }

    pub fn heat_setpoint(&self) -> i16 {
        self.heat_setpoint_f
    }

    /// Last measured temperature; `TEMP_UNSET_F` until the first sample
    pub fn temperature(&self) -> i16 {
        self.current_temp_f
    }

    /// Whether the named device output is energized
    pub fn is_on(&self, item: HardwareItem) -> bool {
        self.devices.get(item).is_on()
    }

    /// Whether the named device has an armed deadline and needs ticking
    pub fn is_polling(&self, item: HardwareItem) -> bool {
        self.devices.get(item).is_polling()
    }

    /// Total energized time of the named device in seconds
    pub fn run_time_seconds(&self, item: HardwareItem) -> u64 {
        self.devices.get(item).run_time_ms(self.clock.now_ms()) / 1000
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Point-in-time state for logging and host UIs
    pub fn snapshot(&self) -> ControllerSnapshot {
        let now = self.clock.now_ms();
        let devices = HardwareItem::ALL
            .iter()
            .map(|item| {
                let device = self.devices.get(*item);
                DeviceSnapshot {
                    name: item.name().to_string(),
                    on: device.is_on(),
                    polling: device.is_polling(),
                    run_time_seconds: device.run_time_ms(now) / 1000,
                }
            })
            .collect();
        ControllerSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            system_mode: self.system_mode,
            fan_mode: self.user_fan_mode,
            goal_mode: self.goal_mode,
            heat_setpoint_f: self.heat_setpoint_f,
            cool_setpoint_f: self.cool_setpoint_f,
            temperature_f: self.current_temp_f,
            devices,
            total_ticks: self.total_ticks,
            overrun_count: self.overrun_count,
            poll_interval_ms: self.config.poll_interval_ms,
        }
    }
}
