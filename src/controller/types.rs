use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HestiaError;
use crate::hardware::HardwareItem;

/// User-facing system mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemMode {
    /// No conditioning
    Off,
    /// Cooling only
    Cool,
    /// Heating only
    Heat,
    /// Heat or cool as the temperature demands
    Auto,
}

/// User-facing fan mode
///
/// Circulate currently behaves as Low; continuous airflow while the goal is
/// Off is reserved for a future revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanMode {
    /// Fan runs only when a goal requires airflow
    Auto,
    /// Low stage
    Low,
    /// High stage
    High,
    /// Placeholder for continuous circulation
    Circulate,
}

/// Hardware operating target chosen by the supervisor.
///
/// Distinct from the user-visible system mode; derived from the measured
/// temperature against the setpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalMode {
    Off,
    LowCool,
    HighCool,
    LowHeat,
    HighHeat,
    MaxHeat,
    LowFan,
    HighFan,
}

impl fmt::Display for SystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SystemMode::Off => "off",
            SystemMode::Cool => "cool",
            SystemMode::Heat => "heat",
            SystemMode::Auto => "auto",
        };
        f.write_str(s)
    }
}

impl FromStr for SystemMode {
    type Err = HestiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(SystemMode::Off),
            "cool" => Ok(SystemMode::Cool),
            "heat" => Ok(SystemMode::Heat),
            "auto" => Ok(SystemMode::Auto),
            other => Err(HestiaError::validation(
                "system_mode".to_string(),
                format!("Unknown system mode '{}'", other),
            )),
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FanMode::Auto => "auto",
            FanMode::Low => "low",
            FanMode::High => "high",
            FanMode::Circulate => "circulate",
        };
        f.write_str(s)
    }
}

impl FromStr for FanMode {
    type Err = HestiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(FanMode::Auto),
            "low" => Ok(FanMode::Low),
            "high" => Ok(FanMode::High),
            "circulate" => Ok(FanMode::Circulate),
            other => Err(HestiaError::validation(
                "fan_mode".to_string(),
                format!("Unknown fan mode '{}'", other),
            )),
        }
    }
}

impl fmt::Display for GoalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GoalMode::Off => "off",
            GoalMode::LowCool => "low_cool",
            GoalMode::HighCool => "high_cool",
            GoalMode::LowHeat => "low_heat",
            GoalMode::HighHeat => "high_heat",
            GoalMode::MaxHeat => "max_heat",
            GoalMode::LowFan => "low_fan",
            GoalMode::HighFan => "high_fan",
        };
        f.write_str(s)
    }
}

/// Commands accepted by the controller from external components
#[derive(Debug, Clone)]
pub enum ControllerCommand {
    SetSystemMode(SystemMode),
    SetFanMode(FanMode),
    SetCoolSetpoint(i16),
    SetHeatSetpoint(i16),
    SetTemperature(i16),
    SetAvailable(HardwareItem, bool),
    SetEnabled(HardwareItem, bool),
    /// Stop the runtime loop; handled by `Controller::run`
    Shutdown,
}

/// Point-in-time state of one actuator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub name: String,
    pub on: bool,
    pub polling: bool,
    pub run_time_seconds: u64,
}

/// Full controller state for observability consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub timestamp: String,
    pub system_mode: SystemMode,
    pub fan_mode: FanMode,
    pub goal_mode: GoalMode,
    pub heat_setpoint_f: i16,
    pub cool_setpoint_f: i16,
    pub temperature_f: i16,
    pub devices: Vec<DeviceSnapshot>,
    pub total_ticks: u64,
    pub overrun_count: u64,
    pub poll_interval_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_strings_round_trip() {
        for mode in [
            SystemMode::Off,
            SystemMode::Cool,
            SystemMode::Heat,
            SystemMode::Auto,
        ] {
            assert_eq!(mode.to_string().parse::<SystemMode>().ok(), Some(mode));
        }
        for mode in [FanMode::Auto, FanMode::Low, FanMode::High, FanMode::Circulate] {
            assert_eq!(mode.to_string().parse::<FanMode>().ok(), Some(mode));
        }
        assert!("frantic".parse::<SystemMode>().is_err());
    }

    #[test]
    fn goal_mode_serializes_snake_case() {
        let json = serde_json::to_string(&GoalMode::HighCool).unwrap();
        assert_eq!(json, "\"high_cool\"");
    }
}
