use super::*;

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            comp1_pin: 0,
            comp2_pin: 1,
            gas_heat_pin: 2,
            reversing_valve_pin: 3,
            fan_low_pin: 4,
            fan_high_pin: 5,
            coach_heat_low_pin: 6,
            coach_heat_high_pin: 7,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            decide_period_ms: 30_000,
            fan_to_comp_delay_ms: 15_000,
            comp_stagger_ms: 15_000,
            compressor_restart_delay_ms: 120_000,
            valve_settle_ms: 60_000,
        }
    }
}

impl Default for SetpointConfig {
    fn default() -> Self {
        Self {
            heat_f: 70,
            cool_f: 73,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            system_mode: "off".to_string(),
            fan_mode: "auto".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "/tmp/hestia.log".to_string(),
            format: "structured".to_string(),
            max_file_size_mb: 10,
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hardware: HardwareConfig::default(),
            timing: TimingConfig::default(),
            setpoints: SetpointConfig::default(),
            defaults: DefaultsConfig::default(),
            logging: LoggingConfig::default(),
            poll_interval_ms: 1000,
        }
    }
}
