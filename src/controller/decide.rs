//! Goal-mode derivation
//!
//! Runs on a throttled cadence inside the tick. The chosen goal takes effect
//! on the next tick's sequencing pass.

use super::types::{GoalMode, SystemMode};
use super::{Controller, TEMP_UNSET_F};

impl Controller {
    /// Re-derive the goal hardware mode when the decide deadline has passed
    pub(crate) fn maybe_decide(&mut self, now: u64) {
        if now < self.next_decide_at {
            return;
        }
        self.next_decide_at = self
            .next_decide_at
            .saturating_add(self.config.timing.decide_period_ms);

        if self.current_temp_f == TEMP_UNSET_F {
            self.logger
                .warn("No temperature sample yet; keeping current goal mode");
            return;
        }

        let goal = derive_goal(
            self.system_mode,
            self.current_temp_f,
            self.cool_setpoint_f,
            self.heat_setpoint_f,
        );
        if goal != self.goal_mode {
            self.logger.info(&format!(
                "Goal mode changed: {} -> {} (temp={} °F, cool={} °F, heat={} °F)",
                self.goal_mode,
                goal,
                self.current_temp_f,
                self.cool_setpoint_f,
                self.heat_setpoint_f
            ));
            self.goal_mode = goal;
        }
    }
}

/// Map system mode, measured temperature and setpoints to a hardware goal
pub(crate) fn derive_goal(mode: SystemMode, temp_f: i16, cool_f: i16, heat_f: i16) -> GoalMode {
    match mode {
        SystemMode::Off => GoalMode::Off,
        SystemMode::Cool => cool_goal(temp_f, cool_f),
        SystemMode::Heat => heat_goal(temp_f, heat_f),
        SystemMode::Auto => {
            if temp_f > cool_f {
                cool_goal(temp_f, cool_f)
            } else if temp_f < heat_f {
                heat_goal(temp_f, heat_f)
            } else {
                GoalMode::Off
            }
        }
    }
}

fn cool_goal(temp_f: i16, cool_f: i16) -> GoalMode {
    if temp_f > cool_f + 1 {
        GoalMode::HighCool
    } else if temp_f > cool_f {
        GoalMode::LowCool
    } else {
        GoalMode::Off
    }
}

fn heat_goal(temp_f: i16, heat_f: i16) -> GoalMode {
    if temp_f >= heat_f {
        GoalMode::Off
    } else if temp_f >= heat_f - 1 {
        GoalMode::LowHeat
    } else if temp_f >= heat_f - 4 {
        GoalMode::HighHeat
    } else {
        GoalMode::MaxHeat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cool_mode_banding() {
        // cool setpoint 73
        assert_eq!(
            derive_goal(SystemMode::Cool, 76, 73, 70),
            GoalMode::HighCool
        );
        assert_eq!(
            derive_goal(SystemMode::Cool, 75, 73, 70),
            GoalMode::HighCool
        );
        assert_eq!(derive_goal(SystemMode::Cool, 74, 73, 70), GoalMode::LowCool);
        assert_eq!(derive_goal(SystemMode::Cool, 73, 73, 70), GoalMode::Off);
        assert_eq!(derive_goal(SystemMode::Cool, 60, 73, 70), GoalMode::Off);
    }

    #[test]
    fn heat_mode_banding() {
        // heat setpoint 70
        assert_eq!(derive_goal(SystemMode::Heat, 70, 73, 70), GoalMode::Off);
        assert_eq!(derive_goal(SystemMode::Heat, 75, 73, 70), GoalMode::Off);
        assert_eq!(derive_goal(SystemMode::Heat, 69, 73, 70), GoalMode::LowHeat);
        assert_eq!(
            derive_goal(SystemMode::Heat, 68, 73, 70),
            GoalMode::HighHeat
        );
        assert_eq!(
            derive_goal(SystemMode::Heat, 66, 73, 70),
            GoalMode::HighHeat
        );
        assert_eq!(derive_goal(SystemMode::Heat, 65, 73, 70), GoalMode::MaxHeat);
    }

    #[test]
    fn auto_mode_prefers_cool_then_heat_then_off() {
        assert_eq!(
            derive_goal(SystemMode::Auto, 76, 73, 70),
            GoalMode::HighCool
        );
        assert_eq!(derive_goal(SystemMode::Auto, 74, 73, 70), GoalMode::LowCool);
        assert_eq!(derive_goal(SystemMode::Auto, 72, 73, 70), GoalMode::Off);
        assert_eq!(derive_goal(SystemMode::Auto, 70, 73, 70), GoalMode::Off);
        assert_eq!(derive_goal(SystemMode::Auto, 69, 73, 70), GoalMode::LowHeat);
        assert_eq!(derive_goal(SystemMode::Auto, 64, 73, 70), GoalMode::MaxHeat);
    }

    #[test]
    fn off_mode_is_always_off() {
        for t in [-40, 0, 70, 110] {
            assert_eq!(derive_goal(SystemMode::Off, t, 73, 70), GoalMode::Off);
        }
    }
}
