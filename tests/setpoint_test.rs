use hestia::config::Config;
use hestia::controller::{Controller, GoalMode, SystemMode};
use hestia::ports::{Clock, ManualClock, MemoryOutputs};

const TICK_MS: u64 = 1000;

fn harness() -> (Controller, ManualClock) {
    let clock = ManualClock::new(0);
    let controller = Controller::new(
        Config::default(),
        Box::new(clock.clone()),
        Box::new(MemoryOutputs::new()),
    );
    (controller, clock)
}

fn run_to(controller: &mut Controller, clock: &ManualClock, until_ms: u64) {
    while clock.now_ms() < until_ms {
        clock.advance(TICK_MS);
        controller.tick();
    }
}

// Deadband rejection: with cool at 73 and heat at 70, a heating setpoint of
// 72 would leave only 1 °F and must be refused; raising cool to 74 is fine.
#[test]
fn deadband_rejection() {
    let (mut controller, _clock) = harness();
    assert_eq!(controller.cool_setpoint(), 73);
    assert_eq!(controller.heat_setpoint(), 70);

    assert!(!controller.set_heat_setpoint(72));
    assert_eq!(controller.heat_setpoint(), 70);

    assert!(controller.set_cool_setpoint(74));
    assert_eq!(controller.cool_setpoint(), 74);
}

#[test]
fn deadband_always_holds_under_random_setter_calls() {
    let (mut controller, _clock) = harness();
    let mut x = 42u64;
    for _ in 0..2000 {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let value = 55 + ((x >> 33) % 30) as i16;
        if x % 2 == 0 {
            let _ = controller.set_cool_setpoint(value);
        } else {
            let _ = controller.set_heat_setpoint(value);
        }
        assert!(controller.cool_setpoint() >= controller.heat_setpoint() + 2);
    }
}

// Setpoint changes feed the next goal derivation
#[test]
fn raising_cool_setpoint_satisfies_demand() {
    let (mut controller, clock) = harness();
    run_to(&mut controller, &clock, 150_000);

    controller.set_system_mode(SystemMode::Cool);
    controller.set_temperature(74);
    run_to(&mut controller, &clock, 185_000);
    assert_eq!(controller.goal_mode(), GoalMode::LowCool);

    assert!(controller.set_cool_setpoint(75));
    run_to(&mut controller, &clock, 215_000);
    assert_eq!(controller.goal_mode(), GoalMode::Off);
}

// No temperature sample: derivation is skipped and the goal holds
#[test]
fn goal_holds_without_temperature_sample() {
    let (mut controller, clock) = harness();
    controller.set_system_mode(SystemMode::Cool);
    run_to(&mut controller, &clock, 200_000);
    assert_eq!(controller.goal_mode(), GoalMode::Off);
    assert_eq!(controller.temperature(), hestia::controller::TEMP_UNSET_F);

    // First sample arrives; the next decide acts on it
    controller.set_temperature(76);
    run_to(&mut controller, &clock, 240_000);
    assert_eq!(controller.goal_mode(), GoalMode::HighCool);
}
