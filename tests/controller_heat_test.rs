use hestia::config::Config;
use hestia::controller::{Controller, GoalMode, SystemMode};
use hestia::hardware::HardwareItem;
use hestia::ports::{Clock, ManualClock, MemoryOutputs};

const TICK_MS: u64 = 1000;

fn harness() -> (Controller, ManualClock, MemoryOutputs) {
    let clock = ManualClock::new(0);
    let outputs = MemoryOutputs::new();
    let controller = Controller::new(
        Config::default(),
        Box::new(clock.clone()),
        Box::new(outputs.clone()),
    );
    (controller, clock, outputs)
}

fn run_to(controller: &mut Controller, clock: &ManualClock, until_ms: u64) {
    while clock.now_ms() < until_ms {
        clock.advance(TICK_MS);
        controller.tick();
    }
}

// Heat-pump engage: with coach heat unavailable, HighHeat falls to the
// reversing valve. Compressors stay off through the 60 s settle, then stage
// in behind the airflow and stagger delays. Dropping the valve availability
// takes both compressors down within one tick and winds the valve off.
#[test]
fn heat_pump_engages_and_winds_down_on_valve_loss() {
    let (mut controller, clock, outputs) = harness();
    controller.set_available(HardwareItem::CoachHeatHigh, false);
    run_to(&mut controller, &clock, 150_000);

    controller.set_system_mode(SystemMode::Heat);
    controller.set_temperature(68);

    let valve_pin = controller.config().hardware.pin(HardwareItem::ReversingValve);

    let mut valve_on_at = None;
    let mut fan_high_on_at = None;
    let mut comp1_on_at = None;
    let mut comp2_on_at = None;
    while clock.now_ms() < 260_000 {
        clock.advance(TICK_MS);
        controller.tick();
        let now = clock.now_ms();
        if valve_on_at.is_none() && controller.is_on(HardwareItem::ReversingValve) {
            valve_on_at = Some(now);
        }
        if fan_high_on_at.is_none() && controller.is_on(HardwareItem::FanHigh) {
            fan_high_on_at = Some(now);
        }
        if comp1_on_at.is_none() && controller.is_on(HardwareItem::Comp1) {
            comp1_on_at = Some(now);
        }
        if comp2_on_at.is_none() && controller.is_on(HardwareItem::Comp2) {
            comp2_on_at = Some(now);
        }
        // Compressors must not run until the valve has settled on
        if valve_on_at.is_none() {
            assert!(!controller.is_on(HardwareItem::Comp1));
            assert!(!controller.is_on(HardwareItem::Comp2));
        }
    }

    assert_eq!(controller.goal_mode(), GoalMode::HighHeat);
    // Fans run through the settle window, so airflow is ready when it ends
    assert_eq!(fan_high_on_at, Some(181_000));
    assert_eq!(valve_on_at, Some(241_000));
    assert_eq!(comp1_on_at, Some(242_000));
    assert_eq!(comp2_on_at, Some(258_000));

    // Valve drops out
    controller.set_available(HardwareItem::ReversingValve, false);
    clock.advance(TICK_MS);
    controller.tick();
    assert!(!controller.is_on(HardwareItem::Comp1));
    assert!(!controller.is_on(HardwareItem::Comp2));
    // The ladder falls through to gas heat
    assert!(controller.is_on(HardwareItem::GasHeat));
    // Valve output holds through its settle-off window
    assert!(outputs.level(valve_pin));

    let dropped_at = clock.now_ms() - TICK_MS;
    let mut valve_off_at = None;
    while clock.now_ms() < 330_000 {
        clock.advance(TICK_MS);
        controller.tick();
        if valve_off_at.is_none() && !outputs.level(valve_pin) {
            valve_off_at = Some(clock.now_ms());
        }
        assert!(!controller.is_on(HardwareItem::Comp1));
        assert!(!controller.is_on(HardwareItem::Comp2));
    }
    assert_eq!(valve_off_at, Some(dropped_at + 60_000));
}

// Coach heat preference: LowHeat picks the coach stage when usable, with no
// compressor, valve or gas activity; losing it falls through to the heat pump.
#[test]
fn coach_heat_preferred_until_unavailable() {
    let (mut controller, clock, _outputs) = harness();
    run_to(&mut controller, &clock, 150_000);

    controller.set_system_mode(SystemMode::Heat);
    controller.set_temperature(69);
    run_to(&mut controller, &clock, 185_000);

    assert_eq!(controller.goal_mode(), GoalMode::LowHeat);
    assert!(controller.is_on(HardwareItem::CoachHeatLow));
    assert!(!controller.is_on(HardwareItem::CoachHeatHigh));
    assert!(!controller.is_on(HardwareItem::Comp1));
    assert!(!controller.is_on(HardwareItem::ReversingValve));
    assert!(!controller.is_on(HardwareItem::GasHeat));
    // Fan follows the user mode; Auto means no forced airflow for coach heat
    assert!(!controller.is_on(HardwareItem::FanLow));
    assert!(!controller.is_on(HardwareItem::FanHigh));

    controller.set_available(HardwareItem::CoachHeatLow, false);
    // The stop is commanded immediately by the availability setter
    assert!(!controller.is_on(HardwareItem::CoachHeatLow));

    clock.advance(TICK_MS);
    controller.tick();
    // Heat-pump branch takes over: forced low airflow, valve settling
    assert!(controller.is_on(HardwareItem::FanLow));
    assert!(controller.is_polling(HardwareItem::ReversingValve));

    let mut valve_on_at = None;
    let mut comp1_on_at = None;
    while clock.now_ms() < 255_000 {
        clock.advance(TICK_MS);
        controller.tick();
        let now = clock.now_ms();
        if valve_on_at.is_none() && controller.is_on(HardwareItem::ReversingValve) {
            valve_on_at = Some(now);
        }
        if comp1_on_at.is_none() && controller.is_on(HardwareItem::Comp1) {
            comp1_on_at = Some(now);
        }
        assert!(!controller.is_on(HardwareItem::GasHeat));
    }
    assert_eq!(valve_on_at, Some(246_000));
    assert_eq!(comp1_on_at, Some(247_000));
}

// MaxHeat runs every usable heat source in parallel while honoring all
// compressor interlocks: coach and gas engage at once, fans and compressors
// wait for the settled valve.
#[test]
fn max_heat_runs_all_heat_sources() {
    let (mut controller, clock, _outputs) = harness();
    run_to(&mut controller, &clock, 150_000);

    controller.set_system_mode(SystemMode::Heat);
    controller.set_temperature(64);
    run_to(&mut controller, &clock, 182_000);

    assert_eq!(controller.goal_mode(), GoalMode::MaxHeat);
    assert!(controller.is_on(HardwareItem::CoachHeatHigh));
    assert!(controller.is_on(HardwareItem::GasHeat));
    // Valve still settling: fans and compressors held off
    assert!(!controller.is_on(HardwareItem::ReversingValve));
    assert!(!controller.is_on(HardwareItem::FanHigh));
    assert!(!controller.is_on(HardwareItem::Comp1));

    run_to(&mut controller, &clock, 280_000);
    assert!(controller.is_on(HardwareItem::CoachHeatHigh));
    assert!(controller.is_on(HardwareItem::GasHeat));
    assert!(controller.is_on(HardwareItem::ReversingValve));
    assert!(controller.is_on(HardwareItem::FanHigh));
    assert!(controller.is_on(HardwareItem::Comp1));
    assert!(controller.is_on(HardwareItem::Comp2));
    assert!(!controller.is_on(HardwareItem::FanLow));
    assert!(!controller.is_on(HardwareItem::CoachHeatLow));
}

// Coach high dropping out of MaxHeat brings the low stage in; when the high
// stage returns, the low stage must yield the same tick.
#[test]
fn max_heat_coach_stages_stay_mutually_exclusive() {
    let (mut controller, clock, _outputs) = harness();
    controller.set_available(HardwareItem::CoachHeatHigh, false);
    run_to(&mut controller, &clock, 150_000);

    controller.set_system_mode(SystemMode::Heat);
    controller.set_temperature(64);
    run_to(&mut controller, &clock, 185_000);

    assert_eq!(controller.goal_mode(), GoalMode::MaxHeat);
    assert!(controller.is_on(HardwareItem::CoachHeatLow));
    assert!(!controller.is_on(HardwareItem::CoachHeatHigh));
    assert!(controller.is_on(HardwareItem::GasHeat));

    controller.set_available(HardwareItem::CoachHeatHigh, true);
    clock.advance(TICK_MS);
    controller.tick();
    assert!(controller.is_on(HardwareItem::CoachHeatHigh));
    assert!(!controller.is_on(HardwareItem::CoachHeatLow));

    // And the low stage stays out from there on
    let horizon = clock.now_ms() + 30_000;
    run_to(&mut controller, &clock, horizon);
    assert!(controller.is_on(HardwareItem::CoachHeatHigh));
    assert!(!controller.is_on(HardwareItem::CoachHeatLow));
}

// Without coach high and the valve, HighHeat falls through to gas alone
#[test]
fn high_heat_falls_back_to_gas() {
    let (mut controller, clock, _outputs) = harness();
    controller.set_available(HardwareItem::CoachHeatHigh, false);
    controller.set_available(HardwareItem::ReversingValve, false);
    run_to(&mut controller, &clock, 150_000);

    controller.set_system_mode(SystemMode::Heat);
    controller.set_temperature(67);
    run_to(&mut controller, &clock, 185_000);

    assert_eq!(controller.goal_mode(), GoalMode::HighHeat);
    assert!(controller.is_on(HardwareItem::GasHeat));
    assert!(!controller.is_on(HardwareItem::Comp1));
    assert!(!controller.is_on(HardwareItem::Comp2));
    assert!(!controller.is_on(HardwareItem::ReversingValve));
    assert!(!controller.is_on(HardwareItem::CoachHeatLow));
}
