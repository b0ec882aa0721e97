//! Configuration management for Hestia
//!
//! This module handles loading, validation, and management of the controller
//! configuration from YAML files.

use crate::error::{HestiaError, Result};
use crate::hardware::HardwareItem;
use crate::ports::OutputPin;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod defaults;

/// Minimum gap between the heating and cooling setpoints in °F
pub const SETPOINT_DEADBAND_F: i16 = 2;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output line assignment per hardware item
    pub hardware: HardwareConfig,

    /// Sequencing delays and decision cadence
    pub timing: TimingConfig,

    /// Initial temperature setpoints
    pub setpoints: SetpointConfig,

    /// Initial operational modes
    pub defaults: DefaultsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Host tick period in milliseconds
    pub poll_interval_ms: u64,
}

/// Output line assignment per hardware item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    /// First compressor contactor line
    pub comp1_pin: u16,

    /// Second compressor contactor line
    pub comp2_pin: u16,

    /// Gas furnace demand line
    pub gas_heat_pin: u16,

    /// Reversing valve solenoid line
    pub reversing_valve_pin: u16,

    /// Blower low-stage line
    pub fan_low_pin: u16,

    /// Blower high-stage line
    pub fan_high_pin: u16,

    /// Coach heat low-stage line
    pub coach_heat_low_pin: u16,

    /// Coach heat high-stage line
    pub coach_heat_high_pin: u16,
}

impl HardwareConfig {
    /// Output line bound to one hardware item
    pub fn pin(&self, item: HardwareItem) -> OutputPin {
        let raw = match item {
            HardwareItem::Comp1 => self.comp1_pin,
            HardwareItem::Comp2 => self.comp2_pin,
            HardwareItem::GasHeat => self.gas_heat_pin,
            HardwareItem::ReversingValve => self.reversing_valve_pin,
            HardwareItem::FanLow => self.fan_low_pin,
            HardwareItem::FanHigh => self.fan_high_pin,
            HardwareItem::CoachHeatLow => self.coach_heat_low_pin,
            HardwareItem::CoachHeatHigh => self.coach_heat_high_pin,
        };
        OutputPin(raw)
    }
}

/// Sequencing delays and decision cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Goal-mode re-evaluation interval
    pub decide_period_ms: u64,

    /// A fan stage must run this long before a compressor may start
    pub fan_to_comp_delay_ms: u64,

    /// Comp1 must run this long before Comp2 may start
    pub comp_stagger_ms: u64,

    /// Minimum compressor off-time between runs
    pub compressor_restart_delay_ms: u64,

    /// Reversing valve settling time, both transition directions
    pub valve_settle_ms: u64,
}

/// Initial temperature setpoints in °F
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SetpointConfig {
    /// Heating setpoint
    pub heat_f: i16,

    /// Cooling setpoint
    pub cool_f: i16,
}

/// Initial operational modes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// System mode at startup (off, cool, heat, auto)
    pub system_mode: String,

    /// Fan mode at startup (auto, low, high, circulate)
    pub fan_mode: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional console-specific level override
    pub console_level: Option<String>,

    /// Optional file-specific level override
    pub file_level: Option<String>,

    /// Path to log file
    pub file: String,

    /// Log format (structured or simple)
    pub format: String,

    /// Max log file size in MB
    pub max_file_size_mb: u32,

    /// Number of backup files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        let default_paths = [
            "hestia_config.yaml",
            "/data/hestia_config.yaml",
            "/etc/hestia/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Load configuration with an optional override path.
    /// When `override_path` is `Some`, the file must exist and be valid,
    /// otherwise an error is returned without falling back to defaults.
    pub fn load_with_override(override_path: Option<&Path>) -> Result<Self> {
        match override_path {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.setpoints.cool_f < self.setpoints.heat_f + SETPOINT_DEADBAND_F {
            return Err(HestiaError::validation(
                "setpoints",
                "Cooling setpoint must be at least 2 °F above heating setpoint",
            ));
        }

        if self.timing.decide_period_ms == 0 {
            return Err(HestiaError::validation(
                "timing.decide_period_ms",
                "Must be greater than 0",
            ));
        }
        if self.timing.fan_to_comp_delay_ms == 0 {
            return Err(HestiaError::validation(
                "timing.fan_to_comp_delay_ms",
                "Must be greater than 0",
            ));
        }
        if self.timing.comp_stagger_ms == 0 {
            return Err(HestiaError::validation(
                "timing.comp_stagger_ms",
                "Must be greater than 0",
            ));
        }
        if self.timing.compressor_restart_delay_ms == 0 {
            return Err(HestiaError::validation(
                "timing.compressor_restart_delay_ms",
                "Must be greater than 0",
            ));
        }
        if self.timing.valve_settle_ms == 0 {
            return Err(HestiaError::validation(
                "timing.valve_settle_ms",
                "Must be greater than 0",
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(HestiaError::validation(
                "poll_interval_ms",
                "Must be greater than 0",
            ));
        }

        // Every actuator needs its own output line
        let mut pins: Vec<u16> = HardwareItem::ALL
            .iter()
            .map(|item| self.hardware.pin(*item).0)
            .collect();
        pins.sort_unstable();
        pins.dedup();
        if pins.len() != HardwareItem::ALL.len() {
            return Err(HestiaError::validation(
                "hardware",
                "Output pins must be distinct",
            ));
        }

        Ok(())
    }
}
