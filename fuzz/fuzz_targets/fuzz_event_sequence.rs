#![no_main]
use libfuzzer_sys::fuzz_target;

use hestia::config::Config;
use hestia::controller::{Controller, FanMode, SystemMode};
use hestia::hardware::HardwareItem;
use hestia::ports::{ManualClock, MemoryOutputs};

// Interpret the input as an (op, arg) event stream driving the controller;
// the compressor and fan interlocks must survive any sequence.
fuzz_target!(|data: &[u8]| {
    let clock = ManualClock::new(0);
    let outputs = MemoryOutputs::new();
    let mut controller = Controller::new(
        Config::default(),
        Box::new(clock.clone()),
        Box::new(outputs.clone()),
    );

    for chunk in data.chunks_exact(2) {
        let (op, arg) = (chunk[0], chunk[1]);
        clock.advance(250 + u64::from(arg) * 16);

        match op % 8 {
            0 => controller.set_temperature(40 + i16::from(arg % 60)),
            1 => controller.set_system_mode(match arg % 4 {
                0 => SystemMode::Off,
                1 => SystemMode::Cool,
                2 => SystemMode::Heat,
                _ => SystemMode::Auto,
            }),
            2 => controller.set_fan_mode(match arg % 4 {
                0 => FanMode::Auto,
                1 => FanMode::Low,
                2 => FanMode::High,
                _ => FanMode::Circulate,
            }),
            3 => {
                let item = HardwareItem::ALL[(arg % 8) as usize];
                controller.set_available(item, arg & 0x10 != 0);
            }
            4 => {
                let item = HardwareItem::ALL[(arg % 8) as usize];
                controller.set_enabled(item, arg & 0x10 != 0);
            }
            5 => {
                let _ = controller.set_cool_setpoint(60 + i16::from(arg % 20));
            }
            6 => {
                let _ = controller.set_heat_setpoint(55 + i16::from(arg % 20));
            }
            _ => {}
        }

        controller.tick();

        let comp1 = controller.is_on(HardwareItem::Comp1);
        let comp2 = controller.is_on(HardwareItem::Comp2);
        let fan_low = controller.is_on(HardwareItem::FanLow);
        let fan_high = controller.is_on(HardwareItem::FanHigh);
        assert!(!(comp1 || comp2) || fan_low || fan_high);
        assert!(!comp2 || comp1);
        assert!(!(fan_low && fan_high));
        assert!(controller.cool_setpoint() >= controller.heat_setpoint() + 2);
    }
});
