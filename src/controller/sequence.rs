//! Goal-mode sequencing
//!
//! One pass per tick for the active goal. Every path funnels fan handling
//! through a single selection subroutine and starts compressors only behind
//! the airflow, stagger and valve interlocks. Gates that fail on one tick
//! simply retry on the next; the drivers make repeated starts and stops
//! harmless.

use crate::actuator::Device;
use crate::hardware::HardwareItem;

use super::Controller;
use super::types::{FanMode, GoalMode};

/// Requested fan behavior for one sequencing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FanPreference {
    /// Both stages stopped
    Off,
    /// Low stage, falling back to high
    Low,
    /// High stage, falling back to low
    High,
}

impl Controller {
    pub(crate) fn enact_goal(&mut self, now: u64) {
        let user_pref = self.user_fan_preference();
        match self.goal_mode {
            GoalMode::Off => self.enact_idle(now, user_pref),
            GoalMode::LowFan => self.enact_idle(now, FanPreference::Low),
            GoalMode::HighFan => self.enact_idle(now, FanPreference::High),
            GoalMode::LowCool => self.enact_cool(now, false),
            GoalMode::HighCool => self.enact_cool(now, true),
            GoalMode::LowHeat => self.enact_low_heat(now),
            GoalMode::HighHeat => self.enact_high_heat(now),
            GoalMode::MaxHeat => self.enact_max_heat(now),
        }
    }

    /// Fan behavior implied by the latched user fan mode
    fn user_fan_preference(&self) -> FanPreference {
        match self.fan_mode {
            FanMode::Auto => FanPreference::Off,
            // Circulate behaves as Low in this revision
            FanMode::Low | FanMode::Circulate => FanPreference::Low,
            FanMode::High => FanPreference::High,
        }
    }

    /// The fan-selection subroutine shared by every goal path.
    ///
    /// Falls through to the other stage when the preferred one is unusable;
    /// the outgoing stage is stopped before the incoming one is started.
    fn select_fans(&mut self, now: u64, pref: FanPreference) {
        let low_usable = self.availability.usable(HardwareItem::FanLow);
        let high_usable = self.availability.usable(HardwareItem::FanHigh);
        let out = self.outputs.as_mut();
        match pref {
            FanPreference::Off => {
                self.devices.fan_low.stop(now, out);
                self.devices.fan_high.stop(now, out);
            }
            FanPreference::Low => {
                if low_usable {
                    self.devices.fan_high.stop(now, out);
                    self.devices.fan_low.start(now, out);
                } else if high_usable {
                    self.devices.fan_low.stop(now, out);
                    self.devices.fan_high.start(now, out);
                } else {
                    self.devices.fan_low.stop(now, out);
                    self.devices.fan_high.stop(now, out);
                }
            }
            FanPreference::High => {
                if high_usable {
                    self.devices.fan_low.stop(now, out);
                    self.devices.fan_high.start(now, out);
                } else if low_usable {
                    self.devices.fan_high.stop(now, out);
                    self.devices.fan_low.start(now, out);
                } else {
                    self.devices.fan_low.stop(now, out);
                    self.devices.fan_high.stop(now, out);
                }
            }
        }
    }

    /// Whether a fan stage has supplied airflow long enough for a compressor
    fn airflow_ready(&self, now: u64) -> bool {
        let delay = self.config.timing.fan_to_comp_delay_ms;
        self.devices.fan_low.on_for(now, delay) || self.devices.fan_high.on_for(now, delay)
    }

    /// All heat sources and compressors stopped; valve wound down once the
    /// compressors are off; fans per the given preference.
    ///
    /// While the valve is still energized the pass returns before fan
    /// selection; its settling progresses on subsequent ticks.
    fn enact_idle(&mut self, now: u64, pref: FanPreference) {
        let out = self.outputs.as_mut();
        self.devices.gas_heat.stop(now, out);
        self.devices.coach_high.stop(now, out);
        self.devices.coach_low.stop(now, out);
        self.devices.comp2.stop(now, out);
        self.devices.comp1.stop(now, out);
        if self.devices.valve.is_on() {
            if !self.devices.comp1.is_on() && !self.devices.comp2.is_on() {
                self.devices.valve.stop(now, out);
            }
            return;
        }
        self.select_fans(now, pref);
    }

    fn enact_cool(&mut self, now: u64, high: bool) {
        let out = self.outputs.as_mut();
        self.devices.gas_heat.stop(now, out);
        self.devices.coach_high.stop(now, out);
        self.devices.coach_low.stop(now, out);
        if !high {
            self.devices.comp2.stop(now, out);
        }

        // Cooling must not run against the heat-pump valve position; a valve
        // still transitioning toward it counts as occupied
        if self.devices.valve.is_on() || self.devices.valve.requested() {
            self.devices.comp2.stop(now, out);
            self.devices.comp1.stop(now, out);
            if !self.devices.comp1.is_on() && !self.devices.comp2.is_on() {
                self.devices.valve.stop(now, out);
            }
            return;
        }

        self.select_fans(
            now,
            if high {
                FanPreference::High
            } else {
                FanPreference::Low
            },
        );
        self.protect_compressors(now);

        if self.airflow_ready(now)
            && self.availability.usable(HardwareItem::Comp1)
            && !self.devices.comp1.is_on()
        {
            self.devices.comp1.start(now, self.outputs.as_mut());
        }

        if high
            && self
                .devices
                .comp1
                .on_for(now, self.config.timing.comp_stagger_ms)
            && self.availability.usable(HardwareItem::Comp2)
            && !self.devices.comp2.is_on()
        {
            self.devices.comp2.start(now, self.outputs.as_mut());
        }
    }

    /// A running compressor loses its airflow, or the lag compressor its
    /// lead, whenever a fan stage or Comp1 drops out mid-run. Both must come
    /// down the same tick; restart then waits out the usual delays.
    fn protect_compressors(&mut self, now: u64) {
        let airflow_ready = self.airflow_ready(now);
        if !airflow_ready {
            let out = self.outputs.as_mut();
            self.devices.comp2.stop(now, out);
            self.devices.comp1.stop(now, out);
        }
        if !self.devices.comp1.is_on() {
            let out = self.outputs.as_mut();
            self.devices.comp2.stop(now, out);
        }
    }

    /// Low-heat priority ladder: coach heat, then heat pump, then idle
    fn enact_low_heat(&mut self, now: u64) {
        let user_pref = self.user_fan_preference();
        if self.availability.usable(HardwareItem::CoachHeatLow) {
            let out = self.outputs.as_mut();
            self.devices.comp2.stop(now, out);
            self.devices.comp1.stop(now, out);
            self.devices.valve.stop(now, out);
            self.devices.gas_heat.stop(now, out);
            self.devices.coach_high.stop(now, out);
            self.devices.coach_low.start(now, out);
            self.select_fans(now, user_pref);
        } else if self.availability.usable(HardwareItem::ReversingValve) {
            self.enact_heat_pump(now, false);
        } else {
            self.enact_idle(now, user_pref);
        }
    }

    /// High-heat priority ladder: coach heat, heat pump, gas, then idle
    fn enact_high_heat(&mut self, now: u64) {
        let user_pref = self.user_fan_preference();
        if self.availability.usable(HardwareItem::CoachHeatHigh) {
            let out = self.outputs.as_mut();
            self.devices.comp2.stop(now, out);
            self.devices.comp1.stop(now, out);
            self.devices.valve.stop(now, out);
            self.devices.gas_heat.stop(now, out);
            self.devices.coach_low.stop(now, out);
            self.devices.coach_high.start(now, out);
            self.select_fans(now, user_pref);
        } else if self.availability.usable(HardwareItem::ReversingValve) {
            self.enact_heat_pump(now, true);
        } else if self.availability.usable(HardwareItem::GasHeat) {
            let out = self.outputs.as_mut();
            self.devices.comp2.stop(now, out);
            self.devices.comp1.stop(now, out);
            self.devices.valve.stop(now, out);
            self.devices.coach_high.stop(now, out);
            self.devices.coach_low.stop(now, out);
            self.devices.gas_heat.start(now, out);
            self.select_fans(now, user_pref);
        } else {
            self.enact_idle(now, user_pref);
        }
    }

    /// Heat-pump branch shared by the low and high heat ladders.
    ///
    /// The valve transitions only with both compressors off; compressors
    /// start only behind airflow and a settled valve. Fans run through the
    /// settle window so the airflow delay is usually already met when the
    /// valve comes on.
    fn enact_heat_pump(&mut self, now: u64, high: bool) {
        let out = self.outputs.as_mut();
        if !high {
            self.devices.comp2.stop(now, out);
        }
        self.devices.gas_heat.stop(now, out);
        self.devices.coach_high.stop(now, out);
        self.devices.coach_low.stop(now, out);

        if !self.devices.valve.settled_on() {
            self.devices.comp2.stop(now, out);
            self.devices.comp1.stop(now, out);
            if !self.devices.comp1.is_on() && !self.devices.comp2.is_on() {
                self.devices.valve.start(now, out);
            }
        }

        self.select_fans(
            now,
            if high {
                FanPreference::High
            } else {
                FanPreference::Low
            },
        );
        self.protect_compressors(now);

        if self.airflow_ready(now)
            && self.devices.valve.settled_on()
            && self.availability.usable(HardwareItem::Comp1)
            && !self.devices.comp1.is_on()
        {
            self.devices.comp1.start(now, self.outputs.as_mut());
        }

        if high
            && self
                .devices
                .comp1
                .on_for(now, self.config.timing.comp_stagger_ms)
            && self.availability.usable(HardwareItem::Comp2)
            && !self.devices.comp2.is_on()
        {
            self.devices.comp2.start(now, self.outputs.as_mut());
        }
    }

    /// Run every usable heat source in parallel.
    ///
    /// Coach and gas heat engage immediately; the heat-pump side follows the
    /// same valve changeover and compressor staging rules as the ladders,
    /// with compressors and fans held off until the fans are usable and the
    /// valve has settled on.
    fn enact_max_heat(&mut self, now: u64) {
        let out = self.outputs.as_mut();

        // Compressors must not run off the refrigerant cycle in heating
        if !self.devices.valve.settled_on() {
            self.devices.comp2.stop(now, out);
            self.devices.comp1.stop(now, out);
        }

        if self.availability.usable(HardwareItem::CoachHeatHigh) {
            self.devices.coach_low.stop(now, out);
            self.devices.coach_high.start(now, out);
        } else if self.availability.usable(HardwareItem::CoachHeatLow)
            && !self.devices.coach_high.is_on()
        {
            self.devices.coach_low.start(now, out);
        }

        if self.availability.usable(HardwareItem::GasHeat) {
            self.devices.gas_heat.start(now, out);
        }

        if self.availability.usable(HardwareItem::ReversingValve) && !self.devices.valve.requested()
        {
            self.devices.comp2.stop(now, out);
            self.devices.comp1.stop(now, out);
            if !self.devices.comp1.is_on() && !self.devices.comp2.is_on() {
                self.devices.valve.start(now, out);
            }
            return;
        }

        let fans_usable = self.availability.usable(HardwareItem::FanLow)
            || self.availability.usable(HardwareItem::FanHigh);
        if !fans_usable || !self.devices.valve.settled_on() {
            self.devices.comp2.stop(now, out);
            self.devices.comp1.stop(now, out);
            self.devices.fan_low.stop(now, out);
            self.devices.fan_high.stop(now, out);
            return;
        }

        self.select_fans(now, FanPreference::High);
        self.protect_compressors(now);

        if self.airflow_ready(now)
            && self.availability.usable(HardwareItem::Comp1)
            && !self.devices.comp1.is_on()
        {
            self.devices.comp1.start(now, self.outputs.as_mut());
        }

        if self
            .devices
            .comp1
            .on_for(now, self.config.timing.comp_stagger_ms)
            && self.availability.usable(HardwareItem::Comp2)
            && !self.devices.comp2.is_on()
        {
            self.devices.comp2.start(now, self.outputs.as_mut());
        }
    }
}
